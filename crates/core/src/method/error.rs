use std::error::Error as StdError;

use thiserror::Error;

use crate::BoxedError;
use crate::http::StatusError;

/// An argument could not be read the way the method asked for it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ArgumentError {
    /// The method asked for a parameter it does not declare.
    #[error("argument [{index}] is out of range, the method has {len} parameter(s)")]
    OutOfRange {
        /// Requested position.
        index: usize,
        /// Number of parameters.
        len: usize,
    },
    /// The argument is not of the expected type.
    #[error("argument [{index}] is `{actual}`, expected `{expected}`")]
    TypeMismatch {
        /// Position of the argument.
        index: usize,
        /// Expected type.
        expected: String,
        /// Actual type.
        actual: String,
    },
    /// No value was resolved for a parameter that cannot be absent.
    #[error("argument [{index}] is absent, `{expected}` is required")]
    Absent {
        /// Position of the argument.
        index: usize,
        /// Expected type.
        expected: String,
    },
    /// The argument is lent by the invoker and has no value of its own.
    #[error("argument [{index}] is lent by the invoker, use the exchange passed to the method")]
    Lent {
        /// Position of the argument.
        index: usize,
    },
}

/// Failure reported by a method body.
#[derive(Debug, Error)]
pub enum MethodError {
    /// The method could not use its arguments.
    #[error(transparent)]
    IllegalArgument(#[from] ArgumentError),
    /// The method ran and failed.
    #[error("{0}")]
    Target(#[source] BoxedError),
}

impl MethodError {
    /// Wrap an application error raised by the method body.
    #[inline]
    pub fn target(error: impl Into<BoxedError>) -> Self {
        Self::Target(error.into())
    }
}

impl From<StatusError> for MethodError {
    #[inline]
    fn from(e: StatusError) -> Self {
        Self::Target(Box::new(e))
    }
}

/// Failure of [`InvocableHandlerMethod::invoke`](super::InvocableHandlerMethod::invoke).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvokeError {
    /// No registered resolver supports a parameter.
    #[error("Could not resolve parameter [{index}] in {signature}: No suitable resolver")]
    NoResolver {
        /// Position of the parameter.
        index: usize,
        /// Signature of the method.
        signature: String,
    },
    /// A resolver failed. The resolver's own error is carried unchanged and is the `source()`.
    #[error("{0}")]
    Resolve(#[source] BoxedError),
    /// The resolved arguments do not fit the method.
    #[error("{message}")]
    Rejected {
        /// Diagnostic message naming the receiver, the method and every argument.
        message: String,
        /// What was wrong with the arguments.
        #[source]
        source: ArgumentError,
    },
    /// The method body failed. The body's own error is carried unchanged and is the `source()`.
    #[error("{0}")]
    Target(#[source] BoxedError),
    /// The method body panicked.
    #[error("{message}")]
    Failed {
        /// Diagnostic message naming the receiver, the method and every argument.
        message: String,
        /// Panic payload rendered as an error.
        #[source]
        source: BoxedError,
    },
}

impl InvokeError {
    /// Downcast the error raised by a resolver or by the method body.
    #[must_use]
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            Self::Resolve(e) | Self::Target(e) => e.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take out the error raised by a resolver or by the method body.
    pub fn into_inner(self) -> Result<BoxedError, Self> {
        match self {
            Self::Resolve(e) | Self::Target(e) => Ok(e),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_resolver_message() {
        let err = InvokeError::NoResolver {
            index: 0,
            signature: "Controller::handle(String) -> String".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "Could not resolve parameter [0] in Controller::handle(String) -> String: No suitable resolver"
        );
    }

    #[test]
    fn test_downcast_target() {
        let err = InvokeError::Target(Box::new(StatusError::conflict().brief("taken")));
        assert_eq!(err.downcast_ref::<StatusError>().map(|e| e.code), Some(crate::http::StatusCode::CONFLICT));
        assert!(err.into_inner().is_ok());

        let err = InvokeError::NoResolver {
            index: 1,
            signature: String::new(),
        };
        assert!(err.downcast_ref::<StatusError>().is_none());
        assert!(err.into_inner().is_err());
    }

    #[test]
    fn test_error_chain_reaches_original() {
        let err = crate::Error::from(InvokeError::Target(Box::new(StatusError::conflict().brief("taken"))));
        let mut chain = Some(&err as &(dyn StdError + 'static));
        let mut found = None;
        while let Some(current) = chain {
            if let Some(status) = current.downcast_ref::<StatusError>() {
                found = Some(status.code);
                break;
            }
            chain = current.source();
        }
        assert_eq!(found, Some(crate::http::StatusCode::CONFLICT));

        let err = InvokeError::Resolve(Box::new(StatusError::bad_request()));
        assert!(err.source().is_some_and(|e| e.is::<StatusError>()));
        assert_eq!(err.to_string(), StatusError::bad_request().to_string());
    }

    #[test]
    fn test_method_error_from_status() {
        let err: MethodError = StatusError::not_found().into();
        assert!(matches!(err, MethodError::Target(_)));
    }
}
