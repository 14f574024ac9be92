/// Convenience result type used across the crate.
pub type RetroResult<T> = Result<T, RetroError>;

/// Error type for pipeline, upload and export failures.
#[derive(thiserror::Error, Debug)]
pub enum RetroError {
    /// Caller-supplied data does not fit the operation (wrong value type, bad chunk size...).
    #[error("validation error: {0}")]
    Validation(String),

    /// The uploaded bytes could not be decoded into a raster.
    #[error("decode error: {0}")]
    Decode(String),

    /// JPEG encoding of the export failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// A pipeline run failed part way (mismatched buffers, worker pool failure...).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Anything else, with its source preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetroError {
    /// Build a [`RetroError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RetroError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`RetroError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`RetroError::Evaluation`].
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
