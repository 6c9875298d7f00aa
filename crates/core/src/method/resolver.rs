//! Argument resolvers.
//!
//! A resolver turns one [`MethodParameter`] into an argument value, reading from the current
//! [`Request`] and [`Depot`]. [`ArgumentResolvers`] keeps an ordered list of them; the first one
//! that [supports](ArgumentResolver::supports) a parameter resolves it.
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use super::{MethodParameter, SourceFrom, Value};
use crate::http::StatusError;
use crate::{BoxedError, Depot, Request, Response};

/// Strategy for resolving method parameters into argument values.
#[async_trait]
pub trait ArgumentResolver: Send + Sync + 'static {
    #[doc(hidden)]
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Whether this resolver can produce a value for `param`.
    fn supports(&self, param: &MethodParameter) -> bool;

    /// Produce the value for `param`.
    ///
    /// `Ok(None)` leaves the argument absent. An error aborts the invocation and is reported to
    /// the caller unchanged.
    async fn resolve(&self, param: &MethodParameter, req: &Request, depot: &Depot) -> Result<Option<Value>, BoxedError>;
}

/// Ordered list of [`ArgumentResolver`]s.
#[derive(Clone, Default)]
pub struct ArgumentResolvers {
    resolvers: Vec<Arc<dyn ArgumentResolver>>,
}

impl ArgumentResolvers {
    /// Create an empty list.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// List holding [`ExchangeResolver`], [`HeaderResolver`] and [`QueryResolver`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new().push(ExchangeResolver).push(HeaderResolver).push(QueryResolver)
    }

    /// Append `resolver` and returns `Self`.
    #[inline]
    #[must_use]
    pub fn push(mut self, resolver: impl ArgumentResolver) -> Self {
        self.resolvers.push(Arc::new(resolver));
        self
    }

    /// Append a shared resolver and returns `Self`.
    #[inline]
    #[must_use]
    pub fn push_shared(mut self, resolver: Arc<dyn ArgumentResolver>) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Number of resolvers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    /// Whether the list is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// First resolver supporting `param`, in registration order.
    #[must_use]
    pub fn find(&self, param: &MethodParameter) -> Option<&dyn ArgumentResolver> {
        self.resolvers.iter().find(|r| r.supports(param)).map(|r| &**r)
    }
}

impl Debug for ArgumentResolvers {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.resolvers.iter().map(|r| r.type_name()))
            .finish()
    }
}

/// Lends the current [`Request`], [`Depot`] or [`Response`] to the method.
///
/// The method receives the exchange directly as its own arguments; the resolved value is only a
/// placeholder. Lending the [`Response`] tells the invoker the method handles the response itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExchangeResolver;

#[async_trait]
impl ArgumentResolver for ExchangeResolver {
    fn supports(&self, param: &MethodParameter) -> bool {
        let ty = param.ty();
        ty.is::<Request>() || ty.is::<Depot>() || ty.is::<Response>()
    }

    async fn resolve(&self, param: &MethodParameter, _req: &Request, _depot: &Depot) -> Result<Option<Value>, BoxedError> {
        let ty = param.ty();
        let value = if ty.is::<Request>() {
            Value::lent::<Request>()
        } else if ty.is::<Depot>() {
            Value::lent::<Depot>()
        } else {
            Value::lent::<Response>()
        };
        Ok(Some(value))
    }
}

/// Reads a `T` stored in the [`Depot`].
///
/// Supports parameters of type `T` with source [`SourceFrom::Depot`]. A named parameter reads the
/// keyed entry, an unnamed one the entry injected by type.
pub struct DepotResolver<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> DepotResolver<T> {
    /// Create a new `DepotResolver`.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for DepotResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Debug for DepotResolver<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepotResolver")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

#[async_trait]
impl<T> ArgumentResolver for DepotResolver<T>
where
    T: Any + Send + Sync + Clone + Debug,
{
    fn supports(&self, param: &MethodParameter) -> bool {
        param.get_source() == Some(SourceFrom::Depot) && param.ty().is::<T>()
    }

    async fn resolve(&self, param: &MethodParameter, _req: &Request, depot: &Depot) -> Result<Option<Value>, BoxedError> {
        let found = match param.get_name() {
            Some(key) => depot.get::<T>(key),
            None => depot.obtain::<T>(),
        };
        Ok(found.cloned().map(Value::new))
    }
}

/// Reads a request header as a `String`.
///
/// Supports named `String` parameters with source [`SourceFrom::Header`]. A header value that is
/// not visible ASCII is rejected with `400 Bad Request`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeaderResolver;

#[async_trait]
impl ArgumentResolver for HeaderResolver {
    fn supports(&self, param: &MethodParameter) -> bool {
        param.get_source() == Some(SourceFrom::Header) && param.get_name().is_some() && param.ty().is::<String>()
    }

    async fn resolve(&self, param: &MethodParameter, req: &Request, _depot: &Depot) -> Result<Option<Value>, BoxedError> {
        let Some(name) = param.get_name() else {
            return Ok(None);
        };
        match req.headers().get(name) {
            Some(value) => match value.to_str() {
                Ok(value) => Ok(Some(Value::new(value.to_owned()))),
                Err(_) => Err(StatusError::bad_request()
                    .brief(format!("Header `{name}` is not a valid string."))
                    .into()),
            },
            None => Ok(None),
        }
    }
}

/// Reads the first query value with the parameter's name as a `String`.
///
/// Supports named `String` parameters with source [`SourceFrom::Query`].
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryResolver;

#[async_trait]
impl ArgumentResolver for QueryResolver {
    fn supports(&self, param: &MethodParameter) -> bool {
        param.get_source() == Some(SourceFrom::Query) && param.get_name().is_some() && param.ty().is::<String>()
    }

    async fn resolve(&self, param: &MethodParameter, req: &Request, _depot: &Depot) -> Result<Option<Value>, BoxedError> {
        Ok(param
            .get_name()
            .and_then(|name| req.query(name))
            .map(|value| Value::new(value.to_owned())))
    }
}
