use std::borrow::Cow;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use futures_util::future::BoxFuture;

use super::descriptor::short_type_name;
use super::{Arguments, MethodError, MethodParameter, ReturnType, SourceFrom, TypeDescriptor, Value};
use crate::http::StatusCode;
use crate::{Depot, Request, Response};

/// Future returned by a method body.
pub type MethodFuture<'a> = BoxFuture<'a, Result<Option<Value>, MethodError>>;

trait Callable: Send + Sync {
    fn call<'a>(
        &'a self,
        args: &'a Arguments,
        req: &'a mut Request,
        depot: &'a mut Depot,
        res: &'a mut Response,
    ) -> MethodFuture<'a>;
}

struct Bound<T, F> {
    receiver: Arc<T>,
    body: F,
}

impl<T, F> Callable for Bound<T, F>
where
    T: Send + Sync + 'static,
    F: for<'a> Fn(&'a T, &'a Arguments, &'a mut Request, &'a mut Depot, &'a mut Response) -> MethodFuture<'a>
        + Send
        + Sync
        + 'static,
{
    fn call<'a>(
        &'a self,
        args: &'a Arguments,
        req: &'a mut Request,
        depot: &'a mut Depot,
        res: &'a mut Response,
    ) -> MethodFuture<'a> {
        (self.body)(&self.receiver, args, req, depot, res)
    }
}

/// A method bound to its receiver, with the metadata needed to invoke it reflectively.
///
/// Cloning is cheap; the receiver and the body are shared.
#[derive(Clone)]
pub struct HandlerMethod {
    receiver_type: &'static str,
    name: Cow<'static, str>,
    parameters: Vec<MethodParameter>,
    return_type: ReturnType,
    response_status: Option<StatusCode>,
    signature: String,
    callable: Arc<dyn Callable>,
}

impl HandlerMethod {
    /// Start describing method `name` of `receiver`.
    #[inline]
    pub fn builder<T>(receiver: T, name: impl Into<Cow<'static, str>>) -> HandlerMethodBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        Self::shared_builder(Arc::new(receiver), name)
    }

    /// Same as [`builder`](Self::builder) for a receiver shared with other methods.
    pub fn shared_builder<T>(receiver: Arc<T>, name: impl Into<Cow<'static, str>>) -> HandlerMethodBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        HandlerMethodBuilder {
            receiver,
            name: name.into(),
            parameters: Vec::new(),
            return_type: ReturnType::Unit,
            response_status: None,
        }
    }

    /// Full type name of the receiver.
    #[inline]
    #[must_use]
    pub fn receiver_type(&self) -> &'static str {
        self.receiver_type
    }

    /// Method name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared parameters, in order.
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[MethodParameter] {
        &self.parameters
    }

    /// Declared return type.
    #[inline]
    #[must_use]
    pub fn return_type(&self) -> ReturnType {
        self.return_type
    }

    /// Status declared for responses of this method.
    #[inline]
    #[must_use]
    pub fn response_status(&self) -> Option<StatusCode> {
        self.response_status
    }

    /// Human readable signature, e.g. `UserController::find(String, Option<u32>) -> User`.
    #[inline]
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub(crate) fn call<'a>(
        &'a self,
        args: &'a Arguments,
        req: &'a mut Request,
        depot: &'a mut Depot,
        res: &'a mut Response,
    ) -> MethodFuture<'a> {
        self.callable.call(args, req, depot, res)
    }
}

impl Debug for HandlerMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethod")
            .field("signature", &self.signature)
            .field("response_status", &self.response_status)
            .finish()
    }
}

/// Builder of [`HandlerMethod`].
pub struct HandlerMethodBuilder<T> {
    receiver: Arc<T>,
    name: Cow<'static, str>,
    parameters: Vec<MethodParameter>,
    return_type: ReturnType,
    response_status: Option<StatusCode>,
}

impl<T> HandlerMethodBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// Append a parameter of type `ty`.
    #[must_use]
    pub fn param(mut self, ty: TypeDescriptor) -> Self {
        let param = MethodParameter::new(self.parameters.len(), ty);
        self.parameters.push(param);
        self
    }

    /// Append a named parameter of type `ty`, read from `source`.
    #[must_use]
    pub fn param_from(mut self, source: SourceFrom, name: impl Into<Cow<'static, str>>, ty: TypeDescriptor) -> Self {
        let param = MethodParameter::new(self.parameters.len(), ty)
            .name(name)
            .source(source);
        self.parameters.push(param);
        self
    }

    /// Declare the return type. Defaults to [`ReturnType::Unit`].
    #[must_use]
    pub fn returns(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Declare the status of responses produced by this method.
    #[must_use]
    pub fn response_status(mut self, status: StatusCode) -> Self {
        self.response_status = Some(status);
        self
    }

    /// Finish with the method body.
    ///
    /// The body receives the receiver, the resolved [`Arguments`] and the current exchange.
    pub fn build<F>(self, body: F) -> HandlerMethod
    where
        F: for<'a> Fn(&'a T, &'a Arguments, &'a mut Request, &'a mut Depot, &'a mut Response) -> MethodFuture<'a>
            + Send
            + Sync
            + 'static,
    {
        let receiver_type = std::any::type_name::<T>();
        let params = self
            .parameters
            .iter()
            .map(|p| p.ty().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let signature = format!(
            "{}::{}({params}) -> {}",
            short_type_name(receiver_type),
            self.name,
            self.return_type
        );
        HandlerMethod {
            receiver_type,
            name: self.name,
            parameters: self.parameters,
            return_type: self.return_type,
            response_status: self.response_status,
            signature,
            callable: Arc::new(Bound {
                receiver: self.receiver,
                body,
            }),
        }
    }
}

impl<T> Debug for HandlerMethodBuilder<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethodBuilder")
            .field("receiver_type", &std::any::type_name::<T>())
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("response_status", &self.response_status)
            .finish()
    }
}
