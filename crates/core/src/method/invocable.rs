use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture, try_join_all};

use super::{
    ArgumentError, ArgumentResolvers, Arguments, HandlerMethod, HandlerResult, InvokeError, MethodError, Value,
};
use crate::{BoxedError, Depot, Request, Response};

/// A [`HandlerMethod`] that resolves its own arguments before it runs.
///
/// Parameters are resolved through the registered [`ArgumentResolvers`]. All resolutions are
/// started together and awaited in parameter order; the first failure aborts the invocation.
#[derive(Clone, Debug)]
pub struct InvocableHandlerMethod {
    method: HandlerMethod,
    resolvers: ArgumentResolvers,
}

impl InvocableHandlerMethod {
    /// Create an invocable method without any resolver.
    #[inline]
    #[must_use]
    pub fn new(method: HandlerMethod) -> Self {
        Self {
            method,
            resolvers: ArgumentResolvers::new(),
        }
    }

    /// Sets the argument resolvers and returns `Self`.
    #[inline]
    #[must_use]
    pub fn resolvers(mut self, resolvers: ArgumentResolvers) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// Get mutable reference to the argument resolvers.
    #[inline]
    pub fn resolvers_mut(&mut self) -> &mut ArgumentResolvers {
        &mut self.resolvers
    }

    /// The wrapped method.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &HandlerMethod {
        &self.method
    }

    /// Invoke the method for the current exchange.
    ///
    /// Returns `Ok(None)` when the method fully handled the response, `Ok(Some(_))` when its
    /// return value still needs handling.
    pub async fn invoke(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
    ) -> Result<Option<HandlerResult>, InvokeError> {
        self.invoke_with(req, depot, res, Vec::new()).await
    }

    /// Invoke the method, binding `provided` values by type before consulting the resolvers.
    ///
    /// Each provided value fills at most one parameter.
    pub async fn invoke_with(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        provided: Vec<Value>,
    ) -> Result<Option<HandlerResult>, InvokeError> {
        let signature = self.method.signature();
        tracing::debug!(method = %signature, "invoking handler method");

        let args = self.resolve_arguments(req, depot, provided).await?;
        if let Err(e) = self.check_arguments(&args) {
            tracing::debug!(method = %signature, error = %e, "arguments rejected");
            return Err(self.rejected(e, &args));
        }

        let outcome = AssertUnwindSafe(async { self.method.call(&args, req, depot, res).await })
            .catch_unwind()
            .await;
        let value = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(MethodError::IllegalArgument(e))) => {
                tracing::debug!(method = %signature, error = %e, "method rejected its arguments");
                return Err(self.rejected(e, &args));
            }
            Ok(Err(MethodError::Target(e))) => {
                tracing::debug!(method = %signature, error = %e, "method failed");
                return Err(InvokeError::Target(e));
            }
            Err(panic) => {
                let source = panic_error(panic);
                tracing::error!(method = %signature, error = %source, "panic occurred while invoking handler method");
                return Err(InvokeError::Failed {
                    message: self.envelope("Invocation failure", &args),
                    source,
                });
            }
        };

        if let Some(status) = self.method.response_status() {
            if res.status_code.is_none() {
                res.status_code(status);
            }
        }

        let return_type = self.method.return_type();
        if return_type.is_void() || (value.is_none() && self.is_response_handled(&args, res)) {
            tracing::debug!(method = %signature, "response handled by method");
            return Ok(None);
        }
        tracing::debug!(method = %signature, "handler method returned a value");
        Ok(Some(HandlerResult::new(signature, value, return_type)))
    }

    async fn resolve_arguments(
        &self,
        req: &Request,
        depot: &Depot,
        mut provided: Vec<Value>,
    ) -> Result<Arguments, InvokeError> {
        let mut pending: Vec<BoxFuture<'_, Result<Option<Value>, BoxedError>>> =
            Vec::with_capacity(self.method.parameters().len());
        for param in self.method.parameters() {
            let index = param.index();
            if let Some(pos) = provided.iter().position(|v| v.ty().type_id() == param.ty().type_id()) {
                tracing::trace!(index, "using provided argument");
                pending.push(future::ready(Ok(Some(provided.remove(pos)))).boxed());
                continue;
            }
            let Some(resolver) = self.resolvers.find(param) else {
                tracing::warn!(method = %self.method.signature(), index, "no suitable resolver");
                return Err(InvokeError::NoResolver {
                    index,
                    signature: self.method.signature().to_owned(),
                });
            };
            tracing::trace!(index, resolver = resolver.type_name(), "resolving argument");
            pending.push(resolver.resolve(param, req, depot));
        }
        let values = try_join_all(pending).await.map_err(|e| {
            tracing::debug!(method = %self.method.signature(), error = %e, "argument resolution failed");
            InvokeError::Resolve(e)
        })?;
        Ok(Arguments::new(values))
    }

    fn check_arguments(&self, args: &Arguments) -> Result<(), ArgumentError> {
        for (param, value) in self.method.parameters().iter().zip(args.iter()) {
            match value {
                Some(value) if value.ty().type_id() != param.ty().type_id() => {
                    return Err(ArgumentError::TypeMismatch {
                        index: param.index(),
                        expected: param.ty().to_string(),
                        actual: value.type_name(),
                    });
                }
                None if !param.ty().is_nullable() => {
                    return Err(ArgumentError::Absent {
                        index: param.index(),
                        expected: param.ty().to_string(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn is_response_handled(&self, args: &Arguments, res: &Response) -> bool {
        self.method.response_status().is_some()
            || res.is_not_modified()
            || args.iter().flatten().any(|v| v.is_lent() && v.is::<Response>())
    }

    fn rejected(&self, source: ArgumentError, args: &Arguments) -> InvokeError {
        InvokeError::Rejected {
            message: self.envelope(&source.to_string(), args),
            source,
        }
    }

    fn envelope(&self, reason: &str, args: &Arguments) -> String {
        format!(
            "{reason}\nController [{}]\nMethod [{}]\nwith argument values:{}",
            self.method.receiver_type(),
            self.method.signature(),
            args.describe()
        )
    }
}

fn panic_error(panic: Box<dyn Any + Send>) -> BoxedError {
    let message = if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    };
    format!("handler method panicked: {message}").into()
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::method::{ReturnType, TypeDescriptor};

    struct Controller;

    async fn explode() -> Result<Option<Value>, MethodError> {
        panic!("boom")
    }

    #[traced_test]
    #[tokio::test]
    async fn test_panic_in_body_is_caught() {
        let method = HandlerMethod::builder(Controller, "explode")
            .returns(ReturnType::value::<String>())
            .response_status(crate::http::StatusCode::CREATED)
            .build(|_, _, _, _, _| Box::pin(explode()));
        let invocable = InvocableHandlerMethod::new(method);
        let (mut req, mut depot, mut res) = (Request::new(), Depot::new(), Response::new());
        let err = invocable.invoke(&mut req, &mut depot, &mut res).await.unwrap_err();

        let InvokeError::Failed { message, source } = err else {
            panic!("expected a failed invocation");
        };
        assert!(message.starts_with("Invocation failure\nController ["));
        assert!(message.contains("Method [Controller::explode() -> String]"));
        assert_eq!(source.to_string(), "handler method panicked: boom");
        assert!(res.status_code.is_none());
        assert!(logs_contain("panic occurred while invoking handler method"));
    }

    #[tokio::test]
    async fn test_panic_before_body_future_is_caught() {
        let method = HandlerMethod::builder(Controller, "explode").build(|_, _, _, _, _| panic!("early"));
        let invocable = InvocableHandlerMethod::new(method);
        let (mut req, mut depot, mut res) = (Request::new(), Depot::new(), Response::new());
        let err = invocable.invoke(&mut req, &mut depot, &mut res).await.unwrap_err();
        assert!(matches!(err, InvokeError::Failed { .. }));
    }

    #[tokio::test]
    async fn test_missing_resolver_stops_invocation() {
        let method = HandlerMethod::builder(Controller, "handle")
            .param(TypeDescriptor::of::<String>())
            .build(|_, _, _, _, _| Box::pin(async { Ok(None) }));
        let invocable = InvocableHandlerMethod::new(method);
        let (mut req, mut depot, mut res) = (Request::new(), Depot::new(), Response::new());
        let err = invocable
            .invoke_with(&mut req, &mut depot, &mut res, Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::NoResolver { index: 0, .. }));
    }

    #[tokio::test]
    async fn test_provided_value_of_other_type_is_not_bound() {
        let method = HandlerMethod::builder(Controller, "handle")
            .param(TypeDescriptor::optional::<String>())
            .returns(ReturnType::value::<String>())
            .build(|_, args, _, _, _| {
                Box::pin(async move {
                    let value = args.optional::<String>(0)?.cloned().unwrap_or_else(|| "none".to_owned());
                    Ok(Some(Value::new(value)))
                })
            });
        let invocable = InvocableHandlerMethod::new(method);
        let (mut req, mut depot, mut res) = (Request::new(), Depot::new(), Response::new());
        let err = invocable
            .invoke_with(&mut req, &mut depot, &mut res, vec![Value::new(1i32)])
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::NoResolver { .. }));
    }

    #[test]
    fn test_panic_error_message() {
        let err = panic_error(Box::new("boom"));
        assert_eq!(err.to_string(), "handler method panicked: boom");
        let err = panic_error(Box::new(42u8));
        assert_eq!(err.to_string(), "handler method panicked: unknown panic payload");
    }
}
