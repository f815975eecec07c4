use twig_tree::DiffError;

/// Errors from loading or diffing JSON documents.
#[derive(Debug, thiserror::Error)]
pub enum JsonTreeError {
    /// The adapter configuration could not be read.
    #[error("invalid adapter config: {0}")]
    Config(String),

    #[error("invalid JSON document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Diff(#[from] DiffError),
}

/// Convenience alias for JSON adapter results.
pub type JsonTreeResult<T> = Result<T, JsonTreeError>;
