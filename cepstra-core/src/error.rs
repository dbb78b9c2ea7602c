use std::path::PathBuf;

use thiserror::Error;

/// All errors produced by cepstra-core.
#[derive(Debug, Error)]
pub enum CepstraError {
    #[error("audio file not found: {path}")]
    AudioNotFound { path: PathBuf },

    #[error("cannot decode audio file {path}: {reason}")]
    AudioDecode { path: PathBuf, reason: String },

    #[error("decoded audio is empty: {path}")]
    EmptyAudio { path: PathBuf },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("no analysis frames: {0}")]
    EmptyInput(String),

    #[error("feature vector has {actual} coefficients, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("feature extraction failed: {0}")]
    ExtractionFailure(#[source] anyhow::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CepstraError {
    /// Pipeline stage the error originates from, for log context.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::AudioNotFound { .. } | Self::Io(_) => "open",
            Self::AudioDecode { .. } | Self::EmptyAudio { .. } => "decode",
            Self::InvalidConfiguration(_) => "configure",
            Self::EmptyInput(_) => "framing",
            Self::ShapeMismatch { .. } => "reshape",
            Self::ExtractionFailure(_) => "extract",
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}

impl From<ndarray::ShapeError> for CepstraError {
    fn from(e: ndarray::ShapeError) -> Self {
        Self::ExtractionFailure(anyhow::Error::new(e))
    }
}

pub type Result<T> = std::result::Result<T, CepstraError>;
