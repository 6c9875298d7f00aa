use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use crate::BoxedError;
use crate::http::StatusCode;

macro_rules! default_errors {
    ($($(#[$docs:meta])* $sname:ident, $code:path, $brief:expr;)+) => {
        $(
            $(#[$docs])*
            #[must_use]
            pub fn $sname() -> Self {
                Self::new($code, $brief)
            }
        )+

        /// Create a `StatusError` for `code`. Returns `None` when `code` is not an error status
        /// this type knows about.
        #[must_use]
        pub fn from_code(code: StatusCode) -> Option<Self> {
            match code {
                $($code => Some(Self::$sname()),)+
                _ => None,
            }
        }
    }
}

/// An error that maps to an HTTP status.
///
/// Resolvers and handler methods return it when a failure should end up as a specific status
/// code; the invoker hands it back untouched so the dispatch layer can pick the code up.
#[derive(Debug)]
#[non_exhaustive]
pub struct StatusError {
    /// Http error status code.
    pub code: StatusCode,
    /// Brief information about http error.
    pub brief: String,
    /// Detail information about http error.
    pub detail: Option<String>,
    /// Cause about http error. Only meant for debugging.
    pub cause: Option<BoxedError>,
}

impl StatusError {
    fn new(code: StatusCode, brief: &str) -> Self {
        Self {
            code,
            brief: brief.to_owned(),
            detail: None,
            cause: None,
        }
    }

    /// Sets brief field and returns `Self`.
    #[must_use]
    pub fn brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = brief.into();
        self
    }
    /// Sets detail field and returns `Self`.
    #[must_use]
    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
    /// Sets cause field and returns `Self`.
    #[must_use]
    pub fn cause<C>(mut self, cause: C) -> Self
    where
        C: Into<BoxedError>,
    {
        self.cause = Some(cause.into());
        self
    }

    default_errors! {
        /// 400 Bad Request
        bad_request,            StatusCode::BAD_REQUEST,            "The request could not be understood by the server due to malformed syntax.";
        /// 401 Unauthorized
        unauthorized,           StatusCode::UNAUTHORIZED,           "The request requires user authentication.";
        /// 403 Forbidden
        forbidden,              StatusCode::FORBIDDEN,              "The server refused to authorize the request.";
        /// 404 Not Found
        not_found,              StatusCode::NOT_FOUND,              "The requested resource could not be found.";
        /// 405 Method Not Allowed
        method_not_allowed,     StatusCode::METHOD_NOT_ALLOWED,     "The request method is not supported for the requested resource.";
        /// 406 Not Acceptable
        not_acceptable,         StatusCode::NOT_ACCEPTABLE,         "The requested resource is capable of generating only content not acceptable according to the Accept headers sent in the request.";
        /// 409 Conflict
        conflict,               StatusCode::CONFLICT,               "The request could not be processed because of a conflict in the request.";
        /// 412 Precondition Failed
        precondition_failed,    StatusCode::PRECONDITION_FAILED,    "The server does not meet one of the preconditions specified in the request.";
        /// 413 Payload Too Large
        payload_too_large,      StatusCode::PAYLOAD_TOO_LARGE,      "The request is larger than the server is willing or able to process.";
        /// 415 Unsupported Media Type
        unsupported_media_type, StatusCode::UNSUPPORTED_MEDIA_TYPE, "The request entity has a media type which the server or resource does not support.";
        /// 422 Unprocessable Entity
        unprocessable_entity,   StatusCode::UNPROCESSABLE_ENTITY,   "The request was well-formed but was unable to be followed due to semantic errors.";
        /// 500 Internal Server Error
        internal_server_error,  StatusCode::INTERNAL_SERVER_ERROR,  "The server encountered an internal error while processing this request.";
        /// 501 Not Implemented
        not_implemented,        StatusCode::NOT_IMPLEMENTED,        "The server either does not recognize the request method, or it lacks the ability to fulfill the request.";
        /// 503 Service Unavailable
        service_unavailable,    StatusCode::SERVICE_UNAVAILABLE,    "The server is currently unavailable.";
    }
}

impl StdError for StatusError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_ref().map(|cause| cause.as_ref() as _)
    }
}

impl Display for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:?}", self.code, self.brief)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StatusError::unsupported_media_type().brief("boo");
        assert_eq!(err.to_string(), "415 Unsupported Media Type \"boo\"");
    }

    #[test]
    fn test_from_code() {
        let err = StatusError::from_code(StatusCode::CONFLICT).map(|e| e.code);
        assert_eq!(err, Some(StatusCode::CONFLICT));
        assert!(StatusError::from_code(StatusCode::OK).is_none());
    }

    #[test]
    fn test_cause_is_source() {
        let err = StatusError::bad_request().cause("inner");
        assert_eq!(err.source().map(|e| e.to_string()), Some("inner".to_owned()));
    }
}
