/// Result alias used across the crate.
pub type DeintResult<T> = Result<T, DeintError>;

/// Crate error type.
#[derive(thiserror::Error, Debug)]
pub enum DeintError {
    /// Filter construction or argument error. No frames are produced.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input data or geometry (frame index, plane sizes, stream headers).
    #[error("validation error: {0}")]
    Validation(String),

    /// Accelerator memory could not be allocated for the in-flight request.
    #[error("resource exhausted: {0}")]
    Resource(String),

    /// Kernel backend failure that is not a resource shortage.
    #[error("backend error: {0}")]
    Backend(String),

    /// File IO failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeintError {
    /// Build a [`DeintError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`DeintError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DeintError::Resource`].
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Build a [`DeintError::Backend`].
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
