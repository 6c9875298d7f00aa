//! Handler methods and their invocation.
//!
//! A [`HandlerMethod`] describes a method of some receiver: its parameters, its return type and
//! the status its responses carry. [`InvocableHandlerMethod`] runs it for one exchange, resolving
//! every parameter through the registered [`ArgumentResolver`]s first.
mod descriptor;
mod error;
mod handler_method;
mod invocable;
pub mod resolver;
mod result;
mod value;

pub use descriptor::{MethodParameter, ReturnType, SourceFrom, TypeDescriptor};
pub use error::{ArgumentError, InvokeError, MethodError};
pub use handler_method::{HandlerMethod, HandlerMethodBuilder, MethodFuture};
pub use invocable::InvocableHandlerMethod;
pub use resolver::{
    ArgumentResolver, ArgumentResolvers, DepotResolver, ExchangeResolver, HeaderResolver, QueryResolver,
};
pub use result::HandlerResult;
pub use value::{Arguments, Value};
