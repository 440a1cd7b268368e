use std::borrow::Cow;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QuakeError>;

/// Failures that abort an import run or a store operation.
///
/// Row-level problems never surface here; the decoder reports them as
/// [`SkipReason`](crate::SkipReason) and the ingestor keeps going.
#[derive(Debug, Error)]
pub enum QuakeError {
    #[error("File not found at location: {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to encode batch: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode batch: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("invalid store header: {reason}")]
    InvalidHeader { reason: Cow<'static, str> },

    #[error("store log corrupted at offset {offset}: {reason}")]
    LogCorruption {
        offset: u64,
        reason: Cow<'static, str>,
    },

    #[error("lock error: {0}")]
    Lock(Cow<'static, str>),

    #[error("invalid options: {reason}")]
    InvalidOptions { reason: Cow<'static, str> },
}
