use thiserror::Error;

use crate::BoxedError;

/// Errors raised while decoding a payload.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// Aggregating the payload would exceed the configured in-memory limit.
    #[error("Exceeded limit on max bytes to buffer : {0}")]
    BufferLimit(usize),
    /// The payload stream failed. The original error is carried unchanged.
    #[error("{0}")]
    Source(#[source] BoxedError),
}
