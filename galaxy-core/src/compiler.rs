//! Front-end orchestration.
//!
//! `analyze` runs the lexer and then the parser over one compilation unit.
//! The resulting [`FrontendOutput`] is the handoff point to a backend:
//! generation is only attempted when no diagnostic was recorded.

use std::fs::File;
use std::path::Path;

use tracing::{debug, warn};

use crate::ast::{Node, count_nodes};
use crate::diagnostic::Diagnostics;
use crate::error::CoreError;
use crate::lexer::{LexOptions, LexOutput, OverflowPolicy, read_source, tokenize_with};
use crate::parser::parse;

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    pub overflow: OverflowPolicy,
}

impl CompileOptions {
    pub fn lex_options(&self) -> LexOptions {
        LexOptions {
            overflow: self.overflow,
        }
    }
}

/// Everything the front end produced for one source file.
#[derive(Debug)]
pub struct FrontendOutput {
    pub program: Node,
    /// Lexer diagnostics first, then parser diagnostics.
    pub diagnostics: Diagnostics,
    pub token_count: usize,
}

/// A backend that lowers a checked program.
pub trait CodeGenerator {
    type Artifact;

    fn generate(&mut self, program: &Node) -> Result<Self::Artifact, CoreError>;
}

impl FrontendOutput {
    pub fn is_generation_eligible(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Hand the program to `generator`, unless the front end recorded
    /// any diagnostic.
    pub fn generate<G: CodeGenerator>(
        &self,
        generator: &mut G,
    ) -> Result<G::Artifact, CoreError> {
        if !self.is_generation_eligible() {
            let count = self.diagnostics.len();
            warn!(count, "refusing to generate code for a program with diagnostics");
            return Err(CoreError::CompilationFailed { count });
        }
        generator.generate(&self.program)
    }
}

/// Lex and parse `source`. Language defects end up in the returned
/// diagnostics, never as an error.
pub fn analyze(source: &str, source_name: &str, options: &CompileOptions) -> FrontendOutput {
    analyze_lexed(tokenize_with(source, source_name, &options.lex_options()))
}

/// Parse an already lexed file. The tokens are dropped once the tree is
/// built.
pub fn analyze_lexed(lexed: LexOutput<'_>) -> FrontendOutput {
    let token_count = lexed.tokens.len();
    let parsed = parse(&lexed.tokens);

    let mut diagnostics = lexed.diagnostics;
    diagnostics.extend(parsed.diagnostics);

    debug!(
        source = lexed.tokens.last().map_or("", |token| token.source_name),
        tokens = token_count,
        nodes = count_nodes(&parsed.program),
        diagnostics = diagnostics.len(),
        "front end finished"
    );

    FrontendOutput {
        program: parsed.program,
        diagnostics,
        token_count,
    }
}

/// Read and analyze a source file; the path doubles as the source name.
pub fn analyze_path(
    path: impl AsRef<Path>,
    options: &CompileOptions,
) -> Result<FrontendOutput, CoreError> {
    let path = path.as_ref();
    let source = read_source(File::open(path)?)?;
    let name = path.display().to_string();
    Ok(analyze(&source, &name, options))
}
