//! Volley resolves handler method arguments, invokes the method and classifies what it returned.
//!
//! This crate re-exports everything from [`volley_core`].
//!
//! ```
//! use volley::method::{ReturnType, SourceFrom, TypeDescriptor, Value};
//! use volley::prelude::*;
//! use volley::test::TestClient;
//!
//! struct Search;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let method = HandlerMethod::builder(Search, "find")
//!     .param_from(SourceFrom::Query, "q", TypeDescriptor::of::<String>())
//!     .returns(ReturnType::value::<String>())
//!     .build(|_, args, _, _, _| {
//!         Box::pin(async move { Ok(Some(Value::new(format!("found {}", args.get::<String>(0)?)))) })
//!     });
//! let invocable = InvocableHandlerMethod::new(method).resolvers(ArgumentResolvers::with_defaults());
//!
//! let exchange = TestClient::get("http://localhost/search").query("q", "volley").send(&invocable).await;
//! let result = exchange.result.unwrap().unwrap();
//! assert_eq!(result.value_ref::<String>().map(String::as_str), Some("found volley"));
//! # }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use volley_core as core;
#[doc(no_inline)]
pub use volley_core::*;
