use thiserror::Error;

/// Transient failure to acquire a raw code from a [`SampleSource`].
///
/// A failed acquisition skips the current sampler tick; it is never fatal
/// and never retried within the same tick.
///
/// [`SampleSource`]: crate::sampling::SampleSource
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("acquisition failed: {0}")]
pub struct AcquisitionError(pub String);

impl AcquisitionError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("sample source error: {0}")]
    Source(#[from] AcquisitionError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
