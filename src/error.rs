use thiserror::Error;

/// Failures at the remote content boundary.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("{0}")]
    Rejected(String),

    #[error("network support is not compiled in")]
    Unavailable,
}
