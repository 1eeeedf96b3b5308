use std::path::PathBuf;

/// Errors that can occur across codemedic.
///
/// Only configuration and input failures surface as this type; stage results
/// are plain text by the time they reach the report. The binary converts to
/// `miette::Report` at the boundary.
///
/// # Examples
///
/// ```
/// use codemedic_core::CodemedicError;
///
/// let err = CodemedicError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CodemedicError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The Python grammar could not be loaded.
    #[error("parse error: {0}")]
    Parse(String),

    /// The completion client could not be constructed.
    #[error("LLM error: {0}")]
    Llm(String),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

impl miette::Diagnostic for CodemedicError {
    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            CodemedicError::FileNotFound(_) => Some(Box::new(
                "create a .env file next to the codemedic binary containing DEEPSEEK_API_KEY=...",
            )),
            CodemedicError::Config(_) => {
                Some(Box::new("each non-comment line must look like KEY=VALUE"))
            }
            _ => None,
        }
    }
}
