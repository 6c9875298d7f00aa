use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use crate::codec::CodecError;
use crate::http::StatusError;
use crate::method::InvokeError;

/// `BoxedError` is an alias of `Box<dyn std::error::Error + Send + Sync>`.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Errors that can happen inside volley.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// Handler method invocation failed.
    Invoke(InvokeError),
    /// Payload decoding failed.
    Codec(CodecError),
    /// Http status error.
    HttpStatus(StatusError),
    /// An invalid header name or value.
    InvalidHeader(String),
    /// Custom error that does not fall under any other error kind.
    Other(BoxedError),
}

impl Error {
    /// Create a custom error.
    #[inline]
    pub fn other(error: impl Into<BoxedError>) -> Self {
        Self::Other(error.into())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invoke(e) => Display::fmt(e, f),
            Self::Codec(e) => Display::fmt(e, f),
            Self::HttpStatus(e) => Display::fmt(e, f),
            Self::InvalidHeader(msg) => write!(f, "invalid header: {msg}"),
            Self::Other(e) => Display::fmt(e, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Invoke(e) => Some(e),
            Self::Codec(e) => Some(e),
            Self::HttpStatus(e) => Some(e),
            Self::InvalidHeader(_) => None,
            Self::Other(e) => Some(e.as_ref()),
        }
    }
}

impl From<InvokeError> for Error {
    #[inline]
    fn from(e: InvokeError) -> Self {
        Self::Invoke(e)
    }
}
impl From<CodecError> for Error {
    #[inline]
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}
impl From<StatusError> for Error {
    #[inline]
    fn from(e: StatusError) -> Self {
        Self::HttpStatus(e)
    }
}
impl From<BoxedError> for Error {
    #[inline]
    fn from(e: BoxedError) -> Self {
        Self::Other(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    #[test]
    fn test_display_passes_through() {
        let err: Error = StatusError::bad_request().brief("no way").into();
        assert_eq!(err.to_string(), "400 Bad Request \"no way\"");

        let err = Error::other("plain failure");
        assert_eq!(err.to_string(), "plain failure");
    }

    #[test]
    fn test_io_failure_is_other() {
        let err = Error::other(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(matches!(err, Error::Other(_)));
        let source = err.source().and_then(|e| e.downcast_ref::<std::io::Error>());
        assert_eq!(source.map(std::io::Error::kind), Some(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_source_keeps_status_error() {
        let err: Error = StatusError::not_found().into();
        let source = err.source().and_then(|e| e.downcast_ref::<StatusError>());
        assert_eq!(source.map(|e| e.code), Some(StatusCode::NOT_FOUND));
    }
}
