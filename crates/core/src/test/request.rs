use std::borrow::Borrow;
use std::time::SystemTime;

use headers::{HeaderMapExt, IfModifiedSince};
use http::header::{HeaderMap, HeaderValue, IntoHeaderName};
use http::{Method, Uri};
use url::Url;

use crate::method::{HandlerResult, InvocableHandlerMethod, InvokeError, Value};
use crate::{Depot, Request, Response};

/// `RequestBuilder` is the main way of building requests for tests.
///
/// You can create a `RequestBuilder` using the `new` method, or one of the simpler constructors
/// available on [`TestClient`](super::TestClient), such as `get`, `post`, etc.
#[derive(Debug)]
pub struct RequestBuilder {
    url: Url,
    method: Method,
    headers: HeaderMap,
}

impl RequestBuilder {
    /// Create a new `RequestBuilder` with the base URL and the given method.
    ///
    /// # Panics
    /// Panics if the base url is invalid.
    pub fn new<U>(url: U, method: Method) -> Self
    where
        U: AsRef<str>,
    {
        let url = Url::parse(url.as_ref()).expect("invalid url");
        Self {
            url,
            method,
            headers: HeaderMap::new(),
        }
    }

    /// Associate a query string parameter to the given value.
    ///
    /// The same key can be used multiple times.
    #[must_use]
    pub fn query<K, V>(mut self, key: K, value: V) -> Self
    where
        K: AsRef<str>,
        V: ToString,
    {
        self.url.query_pairs_mut().append_pair(key.as_ref(), &value.to_string());
        self
    }

    /// Associated a list of pairs to query parameters.
    ///
    /// The same key can be used multiple times.
    #[must_use]
    pub fn queries<P, K, V>(mut self, pairs: P) -> Self
    where
        P: IntoIterator,
        P::Item: Borrow<(K, V)>,
        K: AsRef<str>,
        V: ToString,
    {
        for pair in pairs {
            let (key, value) = pair.borrow();
            self.url.query_pairs_mut().append_pair(key.as_ref(), &value.to_string());
        }
        self
    }

    /// Modify a header for this request.
    ///
    /// When `overwrite` is set to `true`, If the header is already present, the value will be replaced.
    /// When `overwrite` is set to `false`, The new header is always appended to the request, even if the header already exists.
    ///
    /// # Panics
    /// Panics if the value is not a valid header value.
    #[must_use]
    pub fn add_header<N, V>(mut self, name: N, value: V, overwrite: bool) -> Self
    where
        N: IntoHeaderName,
        V: TryInto<HeaderValue>,
    {
        let Ok(value) = value.try_into() else {
            panic!("invalid header value");
        };
        if overwrite {
            self.headers.insert(name, value);
        } else {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the `If-Modified-Since` header.
    #[must_use]
    pub fn if_modified_since(mut self, time: SystemTime) -> Self {
        self.headers.typed_insert(IfModifiedSince::from(time));
        self
    }

    /// Build final request.
    ///
    /// # Panics
    /// Panics if the url can not be converted to an [`Uri`].
    #[must_use]
    pub fn build(self) -> Request {
        let Self { url, method, headers } = self;
        let mut req = Request::new();
        req.set_uri(url.as_str().parse::<Uri>().expect("invalid uri"));
        *req.method_mut() = method;
        *req.headers_mut() = headers;
        req
    }

    /// Invoke `target` with the built request, a new [`Depot`] and a new [`Response`].
    pub async fn send(self, target: &InvocableHandlerMethod) -> TestExchange {
        self.send_with(target, Depot::new(), Vec::new()).await
    }

    /// Invoke `target` with the built request, the given `depot` and `provided` arguments.
    pub async fn send_with(self, target: &InvocableHandlerMethod, mut depot: Depot, provided: Vec<Value>) -> TestExchange {
        let mut req = self.build();
        let mut response = Response::new();
        let result = target.invoke_with(&mut req, &mut depot, &mut response, provided).await;
        TestExchange {
            result,
            depot,
            response,
        }
    }
}

/// Everything left after a test invocation.
#[derive(Debug)]
#[non_exhaustive]
pub struct TestExchange {
    /// Outcome of the invocation.
    pub result: Result<Option<HandlerResult>, InvokeError>,
    /// The depot after the invocation.
    pub depot: Depot,
    /// The response after the invocation.
    pub response: Response,
}
