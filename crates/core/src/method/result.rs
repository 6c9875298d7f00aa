use std::any::Any;

use super::{ReturnType, Value};

/// Outcome of an invocation that still needs handling by the dispatch layer.
#[derive(Debug)]
pub struct HandlerResult {
    value: Option<Value>,
    return_type: ReturnType,
    handler: String,
}

impl HandlerResult {
    /// Create a new `HandlerResult`.
    #[must_use]
    pub fn new(handler: impl Into<String>, value: Option<Value>, return_type: ReturnType) -> Self {
        Self {
            value,
            return_type,
            handler: handler.into(),
        }
    }

    /// The returned value, `None` when the method returned nothing.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Borrow the returned value as a `T`.
    #[inline]
    #[must_use]
    pub fn value_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(Value::downcast_ref::<T>)
    }

    /// Take out the returned value.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    /// Declared return type of the method.
    #[inline]
    #[must_use]
    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }

    /// Signature of the method that produced this result.
    #[inline]
    #[must_use]
    pub fn handler(&self) -> &str {
        &self.handler
    }
}
