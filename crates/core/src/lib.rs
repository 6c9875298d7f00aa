//! The core lib of Volley: handler method invocation and payload decoding.
//!
//! The central piece is [`InvocableHandlerMethod`](method::InvocableHandlerMethod). It takes a
//! [`HandlerMethod`](method::HandlerMethod), resolves each of its parameters through an ordered
//! list of [`ArgumentResolver`](method::ArgumentResolver)s, calls it, and turns whatever it
//! returned into an optional [`HandlerResult`](method::HandlerResult).
//!
//! # Example
//!
//! ```
//! use volley_core::method::{ReturnType, Value};
//! use volley_core::prelude::*;
//!
//! struct Greeter;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let method = HandlerMethod::builder(Greeter, "hello")
//!     .returns(ReturnType::value::<String>())
//!     .build(|_greeter: &Greeter, _args, _req, _depot, _res| {
//!         Box::pin(async { Ok(Some(Value::new("hello".to_owned()))) })
//!     });
//! let invocable = InvocableHandlerMethod::new(method).resolvers(ArgumentResolvers::new());
//!
//! let (mut req, mut depot, mut res) = (Request::new(), Depot::new(), Response::new());
//! let result = invocable.invoke(&mut req, &mut depot, &mut res).await.unwrap().unwrap();
//! assert_eq!(result.value_ref::<String>().map(String::as_str), Some("hello"));
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use async_trait::async_trait;

#[macro_use]
mod cfg;

pub mod codec;
mod depot;
mod error;
pub mod http;
pub mod method;
cfg_feature! {
    #![feature = "test"]
    pub mod test;
}

pub use self::depot::Depot;
pub use self::error::{BoxedError, Error};
pub use self::http::{Request, Response};

/// Result type which has `volley::Error` as its error type.
pub type Result<T> = std::result::Result<T, Error>;

/// A list of things that automatically imports into application use volley_core.
pub mod prelude {
    pub use async_trait::async_trait;

    pub use crate::codec::{ByteArrayDecoder, Decoder};
    pub use crate::depot::Depot;
    pub use crate::http::{Request, Response, StatusCode, StatusError};
    pub use crate::method::{
        ArgumentResolver, ArgumentResolvers, HandlerMethod, HandlerResult, InvocableHandlerMethod,
        InvokeError,
    };
}
