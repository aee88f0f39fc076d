//! Surface AST for Galaxy.
//!
//! Every node owns its children. Traversals still carry a [`Visited`]
//! registry keyed by [`NodeId`]: a cloned subtree keeps the ids of the
//! original, so if a construction path ever attaches the same node under
//! two parents the second occurrence is recognised and skipped.

use std::collections::HashSet;
use std::fmt;

use tracing::trace;

use crate::span::Span;

/// Identity of a node, unique within one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub span: Span,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
        }
    }
}

/// One `elif` arm of an `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ElifClause {
    pub condition: Node,
    pub body: Vec<Node>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },
    /// `import "path"` or `import name`; `path` is a string literal or an
    /// identifier.
    Import {
        path: Box<Node>,
    },
    PackageDecl {
        name: String,
    },
    FuncDecl {
        name: String,
        params: Vec<Node>,
        return_type: Option<Box<Node>>,
        body: Vec<Node>,
    },
    Param {
        name: String,
    },
    If {
        condition: Box<Node>,
        then_block: Vec<Node>,
        elifs: Vec<ElifClause>,
        else_block: Option<Vec<Node>>,
    },
    For {
        index: String,
        item: String,
        iterable: Box<Node>,
        body: Vec<Node>,
    },
    Switch {
        subject: Box<Node>,
        cases: Vec<Node>,
        default: Option<Vec<Node>>,
    },
    Case {
        pattern: Box<Node>,
        body: Vec<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    ExprStmt {
        expr: Box<Node>,
    },
    BinaryExpr {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryExpr {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Assignment {
        target: Box<Node>,
        value: Box<Node>,
    },
    RangeExpr {
        start: Box<Node>,
        end: Box<Node>,
    },
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    MemberAccess {
        object: Box<Node>,
        member: String,
    },
    Identifier {
        name: String,
    },
    /// Exact literal text, e.g. `3.` or `10`.
    NumberLiteral {
        text: String,
    },
    StringLiteral {
        value: String,
    },
    BoolLiteral {
        value: bool,
    },
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::Import { .. } => "Import",
            NodeKind::PackageDecl { .. } => "PackageDecl",
            NodeKind::FuncDecl { .. } => "FuncDecl",
            NodeKind::Param { .. } => "Param",
            NodeKind::If { .. } => "If",
            NodeKind::For { .. } => "For",
            NodeKind::Switch { .. } => "Switch",
            NodeKind::Case { .. } => "Case",
            NodeKind::Return { .. } => "Return",
            NodeKind::ExprStmt { .. } => "ExprStmt",
            NodeKind::BinaryExpr { .. } => "BinaryExpr",
            NodeKind::UnaryExpr { .. } => "UnaryExpr",
            NodeKind::Assignment { .. } => "Assignment",
            NodeKind::RangeExpr { .. } => "RangeExpr",
            NodeKind::Call { .. } => "Call",
            NodeKind::MemberAccess { .. } => "MemberAccess",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::NumberLiteral { .. } => "NumberLiteral",
            NodeKind::StringLiteral { .. } => "StringLiteral",
            NodeKind::BoolLiteral { .. } => "BoolLiteral",
        }
    }
}

impl Node {
    pub fn new(id: NodeId, span: Span, kind: NodeKind) -> Self {
        Node { id, span, kind }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        match &self.kind {
            NodeKind::Program { body } => out.extend(body),
            NodeKind::Import { path } => out.push(&**path),
            NodeKind::FuncDecl {
                params,
                return_type,
                body,
                ..
            } => {
                out.extend(params);
                out.extend(return_type.as_deref());
                out.extend(body);
            }
            NodeKind::If {
                condition,
                then_block,
                elifs,
                else_block,
            } => {
                out.push(&**condition);
                out.extend(then_block);
                for clause in elifs {
                    out.push(&clause.condition);
                    out.extend(&clause.body);
                }
                out.extend(else_block.iter().flatten());
            }
            NodeKind::For { iterable, body, .. } => {
                out.push(&**iterable);
                out.extend(body);
            }
            NodeKind::Switch {
                subject,
                cases,
                default,
            } => {
                out.push(&**subject);
                out.extend(cases);
                out.extend(default.iter().flatten());
            }
            NodeKind::Case { pattern, body } => {
                out.push(&**pattern);
                out.extend(body);
            }
            NodeKind::Return { value } => out.extend(value.as_deref()),
            NodeKind::ExprStmt { expr } => out.push(&**expr),
            NodeKind::BinaryExpr { left, right, .. } => {
                out.push(&**left);
                out.push(&**right);
            }
            NodeKind::UnaryExpr { operand, .. } => out.push(&**operand),
            NodeKind::Assignment { target, value } => {
                out.push(&**target);
                out.push(&**value);
            }
            NodeKind::RangeExpr { start, end } => {
                out.push(&**start);
                out.push(&**end);
            }
            NodeKind::Call { callee, args } => {
                out.push(&**callee);
                out.extend(args);
            }
            NodeKind::MemberAccess { object, .. } => out.push(&**object),
            NodeKind::PackageDecl { .. }
            | NodeKind::Param { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::NumberLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BoolLiteral { .. } => {}
        }
        out
    }

    /// Move the children out, in the same order as [`Node::children`].
    ///
    /// The node keeps its own data (names, operators, literal text).
    /// Optional and list slots are left empty; a required child slot is
    /// left holding a payload-free stand-in with the child's id and span.
    pub fn take_children(&mut self) -> Vec<Node> {
        let mut out = Vec::new();
        match &mut self.kind {
            NodeKind::Program { body } => out.append(body),
            NodeKind::Import { path } => out.push(detach(path)),
            NodeKind::FuncDecl {
                params,
                return_type,
                body,
                ..
            } => {
                out.append(params);
                out.extend(return_type.take().map(|ty| *ty));
                out.append(body);
            }
            NodeKind::If {
                condition,
                then_block,
                elifs,
                else_block,
            } => {
                out.push(detach(condition));
                out.append(then_block);
                for clause in elifs.iter_mut() {
                    let hole = stand_in(&clause.condition);
                    out.push(std::mem::replace(&mut clause.condition, hole));
                    out.append(&mut clause.body);
                }
                out.extend(else_block.take().into_iter().flatten());
            }
            NodeKind::For { iterable, body, .. } => {
                out.push(detach(iterable));
                out.append(body);
            }
            NodeKind::Switch {
                subject,
                cases,
                default,
            } => {
                out.push(detach(subject));
                out.append(cases);
                out.extend(default.take().into_iter().flatten());
            }
            NodeKind::Case { pattern, body } => {
                out.push(detach(pattern));
                out.append(body);
            }
            NodeKind::Return { value } => out.extend(value.take().map(|v| *v)),
            NodeKind::ExprStmt { expr } => out.push(detach(expr)),
            NodeKind::BinaryExpr { left, right, .. }
            | NodeKind::Assignment {
                target: left,
                value: right,
            }
            | NodeKind::RangeExpr {
                start: left,
                end: right,
            } => {
                out.push(detach(left));
                out.push(detach(right));
            }
            NodeKind::UnaryExpr { operand, .. } => out.push(detach(operand)),
            NodeKind::Call { callee, args } => {
                out.push(detach(callee));
                out.append(args);
            }
            NodeKind::MemberAccess { object, .. } => out.push(detach(object)),
            NodeKind::PackageDecl { .. }
            | NodeKind::Param { .. }
            | NodeKind::Identifier { .. }
            | NodeKind::NumberLiteral { .. }
            | NodeKind::StringLiteral { .. }
            | NodeKind::BoolLiteral { .. } => {}
        }
        out
    }
}

fn stand_in(node: &Node) -> Node {
    Node::new(node.id, node.span, NodeKind::BoolLiteral { value: false })
}

fn detach(slot: &mut Box<Node>) -> Node {
    let hole = stand_in(slot);
    std::mem::replace(&mut **slot, hole)
}

/// Per-traversal set of node identities already processed.
///
/// Create one per traversal call; it is not meant to be reused.
#[derive(Debug, Default)]
pub struct Visited {
    seen: HashSet<NodeId>,
}

impl Visited {
    pub fn new() -> Self {
        Visited::default()
    }

    /// Mark `id` as entered. Returns `false` if it was already there.
    pub fn enter(&mut self, id: NodeId) -> bool {
        self.seen.insert(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.seen.contains(&id)
    }
}

/// Hooks for a depth-first walk over the tree.
pub trait Visitor {
    fn enter(&mut self, _node: &Node) {}
    fn leave(&mut self, _node: &Node) {}
}

/// Depth-first walk; a node whose identity is already in `visited` is
/// skipped together with its subtree.
pub fn walk<V: Visitor>(node: &Node, visitor: &mut V, visited: &mut Visited) {
    if !visited.enter(node.id) {
        trace!(id = %node.id, "skipping revisited node");
        return;
    }
    visitor.enter(node);
    for child in node.children() {
        walk(child, visitor, visited);
    }
    visitor.leave(node);
}

/// Number of distinct nodes reachable from `root`.
pub fn count_nodes(root: &Node) -> usize {
    struct Counter(usize);

    impl Visitor for Counter {
        fn enter(&mut self, _node: &Node) {
            self.0 += 1;
        }
    }

    let mut counter = Counter(0);
    walk(root, &mut counter, &mut Visited::new());
    counter.0
}

/// Release a tree in post-order, children before their parent.
///
/// Each identity is released once; a repeated occurrence is dropped
/// without being counted. Returns the number of nodes released.
pub fn release(node: Node, visited: &mut Visited) -> usize {
    release_with(node, visited, &mut |_: &Node| {})
}

/// [`release`], calling `on_release` for each node just before it is
/// dropped. Its children are already gone by then; its own data is not.
pub fn release_with<F: FnMut(&Node)>(
    mut node: Node,
    visited: &mut Visited,
    on_release: &mut F,
) -> usize {
    if !visited.enter(node.id) {
        trace!(id = %node.id, "node already released");
        return 0;
    }
    let released: usize = node
        .take_children()
        .into_iter()
        .map(|child| release_with(child, visited, on_release))
        .sum();
    on_release(&node);
    trace!(id = %node.id, kind = node.kind.name(), "released node");
    drop(node);
    released + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u32, name: &str) -> Node {
        Node::new(
            NodeId(id),
            Span::default(),
            NodeKind::Identifier {
                name: name.to_owned(),
            },
        )
    }

    fn binary(id: u32, left: Node, right: Node) -> Node {
        Node::new(
            NodeId(id),
            Span::default(),
            NodeKind::BinaryExpr {
                op: BinaryOp::Add,
                left: Box::new(left),
                right: Box::new(right),
            },
        )
    }

    #[test]
    fn children_follow_source_order() {
        let tree = binary(3, leaf(1, "a"), leaf(2, "b"));
        let ids: Vec<_> = tree.children().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn walk_visits_shared_subtree_once() {
        let shared = binary(3, leaf(1, "a"), leaf(2, "b"));
        let root = Node::new(
            NodeId(10),
            Span::default(),
            NodeKind::Program {
                body: vec![shared.clone(), shared],
            },
        );

        struct Names(Vec<String>);
        impl Visitor for Names {
            fn enter(&mut self, node: &Node) {
                if let NodeKind::Identifier { name } = &node.kind {
                    self.0.push(name.clone());
                }
            }
        }

        let mut names = Names(Vec::new());
        walk(&root, &mut names, &mut Visited::new());
        assert_eq!(names.0, vec!["a", "b"]);
        assert_eq!(count_nodes(&root), 4);
    }

    #[test]
    fn release_counts_each_identity_once() {
        let shared = leaf(1, "x");
        let root = binary(2, shared.clone(), shared);
        let mut visited = Visited::new();
        assert_eq!(release(root, &mut visited), 2);
        assert!(visited.contains(NodeId(1)));
        assert!(visited.contains(NodeId(2)));
    }

    #[test]
    fn release_frees_children_before_parent() {
        let tree = binary(5, binary(3, leaf(1, "a"), leaf(2, "b")), leaf(4, "c"));
        let mut order = Vec::new();
        let released = release_with(tree, &mut Visited::new(), &mut |node: &Node| {
            let stand_in = NodeKind::BoolLiteral { value: false };
            assert!(node.children().iter().all(|c| c.kind == stand_in));
            order.push(node.id);
        });
        assert_eq!(released, 5);
        assert_eq!(
            order,
            vec![NodeId(1), NodeId(2), NodeId(3), NodeId(4), NodeId(5)]
        );
    }

    #[test]
    fn released_parent_still_owns_its_data() {
        let access = Node::new(
            NodeId(2),
            Span::default(),
            NodeKind::MemberAccess {
                object: Box::new(leaf(1, "io")),
                member: "print".to_owned(),
            },
        );
        let mut seen = Vec::new();
        release_with(access, &mut Visited::new(), &mut |node: &Node| {
            seen.push(match &node.kind {
                NodeKind::MemberAccess { member, .. } => member.clone(),
                NodeKind::Identifier { name } => name.clone(),
                other => other.name().to_owned(),
            });
        });
        assert_eq!(seen, vec!["io", "print"]);
    }

    #[test]
    fn take_children_matches_children() {
        let tree = Node::new(
            NodeId(9),
            Span::default(),
            NodeKind::If {
                condition: Box::new(leaf(1, "c")),
                then_block: vec![leaf(2, "t")],
                elifs: vec![ElifClause {
                    condition: leaf(3, "d"),
                    body: vec![leaf(4, "e")],
                    span: Span::default(),
                }],
                else_block: Some(vec![leaf(5, "f")]),
            },
        );
        let mut tree = tree;
        let borrowed: Vec<_> = tree.children().iter().map(|n| n.id).collect();
        let owned: Vec<_> = tree.take_children().iter().map(|n| n.id).collect();
        assert_eq!(borrowed, owned);
        assert_eq!(owned.len(), 5);
        assert!(matches!(
            &tree.kind,
            NodeKind::If { then_block, else_block: None, .. } if then_block.is_empty()
        ));
    }
}
