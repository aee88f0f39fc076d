//! Front end for the Galaxy language.
//!
//! The pipeline is:
//!
//!   source .gx
//!     -> lexer    (tokens + diagnostics)
//!     -> parser   (AST + diagnostics)
//!     -> compiler (diagnostic gate, then an external `CodeGenerator`)
//!
//! Higher-level tools (the CLI, editors, etc.) should depend on this
//! crate rather than reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling and diagnostics
// ---------------------------------------------------------------------

pub mod span;
pub mod diagnostic;
pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;
pub mod printer;

// ---------------------------------------------------------------------
// Orchestration and the backend boundary
// ---------------------------------------------------------------------

pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use ast::{Node, NodeId, NodeKind, Visited, release, release_with};
pub use compiler::{
    CodeGenerator, CompileOptions, FrontendOutput, analyze, analyze_lexed, analyze_path,
};
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error::CoreError;
pub use lexer::{
    LexOptions, LexOutput, OverflowPolicy, Token, TokenKind, read_source, tokenize, tokenize_with,
};
pub use parser::{ParseOutput, parse};
pub use printer::print_program;
pub use span::Span;
