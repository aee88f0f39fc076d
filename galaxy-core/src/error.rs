use thiserror::Error;

/// Failures that stop a compilation outright.
///
/// Language defects in the source are not errors here; they are
/// collected as [`crate::diagnostic::Diagnostic`]s and only surface as
/// [`CoreError::CompilationFailed`] once generation is requested.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source: {0}")]
    SourceIo(#[from] std::io::Error),
    #[error("compilation failed with {count} diagnostic(s)")]
    CompilationFailed { count: usize },
    #[error("code generation failed: {0}")]
    Generation(String),
}

/// Grow `items` by one slot or abort the process.
///
/// Running out of memory while storing tokens or nodes is not a
/// language defect and cannot be recovered from, so it never becomes a
/// diagnostic or a `CoreError`.
pub(crate) fn reserve_or_abort<T>(items: &mut Vec<T>, what: &str) {
    if items.try_reserve(1).is_err() {
        tracing::error!(what, "insufficient memory");
        eprintln!("insufficient memory while storing {what}");
        std::process::abort();
    }
}

/// Byte offset as stored in a [`crate::span::Span`].
///
/// Sources past `u32::MAX` bytes cannot be addressed; like running out of
/// memory, that aborts rather than producing wrong positions.
pub(crate) fn offset_or_abort(index: usize) -> u32 {
    match u32::try_from(index) {
        Ok(offset) => offset,
        Err(_) => {
            tracing::error!(index, "source offset does not fit in a span");
            eprintln!("source too large: byte offset {index} exceeds {}", u32::MAX);
            std::process::abort();
        }
    }
}
