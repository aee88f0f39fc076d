//! Indented text dump of a syntax tree.

use std::io::{self, Write};

use crate::ast::{Node, NodeKind, Visited};

/// Write `node` and its subtree, one node per line, indented two spaces
/// per level starting at `depth`.
///
/// A node whose identity is already in `visited` is not printed again,
/// nor is anything below it.
pub fn print_program<W: Write>(
    node: &Node,
    depth: usize,
    visited: &mut Visited,
    out: &mut W,
) -> io::Result<()> {
    if !visited.enter(node.id) {
        return Ok(());
    }
    write_line(out, depth, &label(node))?;

    let inner = depth + 1;
    match &node.kind {
        NodeKind::FuncDecl {
            params,
            return_type,
            body,
            ..
        } => {
            print_all(params, inner, visited, out)?;
            if let Some(ty) = return_type {
                write_line(out, inner, "Returns")?;
                print_program(ty, inner + 1, visited, out)?;
            }
            print_all(body, inner, visited, out)?;
        }
        NodeKind::If {
            condition,
            then_block,
            elifs,
            else_block,
        } => {
            print_program(condition, inner, visited, out)?;
            print_section(out, inner, "Then", then_block, visited)?;
            for clause in elifs {
                write_line(out, inner, "Elif")?;
                print_program(&clause.condition, inner + 1, visited, out)?;
                print_section(out, inner + 1, "Then", &clause.body, visited)?;
            }
            if let Some(block) = else_block {
                print_section(out, inner, "Else", block, visited)?;
            }
        }
        NodeKind::Switch {
            subject,
            cases,
            default,
        } => {
            print_program(subject, inner, visited, out)?;
            print_all(cases, inner, visited, out)?;
            if let Some(block) = default {
                print_section(out, inner, "Default", block, visited)?;
            }
        }
        _ => {
            for child in node.children() {
                print_program(child, inner, visited, out)?;
            }
        }
    }
    Ok(())
}

fn print_all<W: Write>(
    nodes: &[Node],
    depth: usize,
    visited: &mut Visited,
    out: &mut W,
) -> io::Result<()> {
    for node in nodes {
        print_program(node, depth, visited, out)?;
    }
    Ok(())
}

fn print_section<W: Write>(
    out: &mut W,
    depth: usize,
    title: &str,
    block: &[Node],
    visited: &mut Visited,
) -> io::Result<()> {
    write_line(out, depth, title)?;
    print_all(block, depth + 1, visited, out)
}

fn write_line<W: Write>(out: &mut W, depth: usize, text: &str) -> io::Result<()> {
    writeln!(out, "{:width$}{text}", "", width = depth * 2)
}

/// Kind name plus whatever the node carries besides children.
fn label(node: &Node) -> String {
    let name = node.kind.name();
    match &node.kind {
        NodeKind::PackageDecl { name: detail }
        | NodeKind::FuncDecl { name: detail, .. }
        | NodeKind::Param { name: detail }
        | NodeKind::Identifier { name: detail }
        | NodeKind::NumberLiteral { text: detail } => format!("{name} {detail}"),
        NodeKind::StringLiteral { value } => format!("{name} {value:?}"),
        NodeKind::BoolLiteral { value } => format!("{name} {value}"),
        NodeKind::For { index, item, .. } => format!("{name} {index}, {item}"),
        NodeKind::BinaryExpr { op, .. } => format!("{name} {}", op.symbol()),
        NodeKind::UnaryExpr { op, .. } => format!("{name} {}", op.symbol()),
        NodeKind::MemberAccess { member, .. } => format!("{name} .{member}"),
        _ => name.to_owned(),
    }
}
