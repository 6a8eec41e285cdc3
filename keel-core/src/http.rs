// HTTP-facing types shared with the external transport

use crate::Error;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// HTTP methods
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "HEAD" => Some(HttpMethod::HEAD),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Lowercase name, as used for operation keys in API documents
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::GET => "get",
            HttpMethod::POST => "post",
            HttpMethod::PUT => "put",
            HttpMethod::DELETE => "delete",
            HttpMethod::PATCH => "patch",
            HttpMethod::HEAD => "head",
            HttpMethod::OPTIONS => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request-scoped context handed to handlers and dependency providers.
///
/// Built by the transport for every request. Keel never reads the body
/// itself; providers and handlers may.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: HttpMethod,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, Vec<String>>,
}

impl RequestContext {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: Vec::new(),
            path_params: HashMap::new(),
            query_params: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Append one value for a query key; repeated keys keep arrival order
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Parse the request body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::BadRequest(e.to_string()))
    }

    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn param(&self, name: &str) -> Option<&String> {
        self.path_params.get(name)
    }

    /// First value of a query parameter
    pub fn query(&self, name: &str) -> Option<&String> {
        self.query_params.get(name).and_then(|values| values.first())
    }
}

/// HTTP response produced by handlers and error/document helpers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn created() -> Self {
        Self::new(201)
    }

    pub fn no_content() -> Self {
        Self::new(204)
    }

    pub fn bad_request() -> Self {
        Self::new(400)
    }

    pub fn not_found() -> Self {
        Self::new(404)
    }

    pub fn internal_server_error() -> Self {
        Self::new(500)
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `value` as the body and set `Content-Type: application/json`
    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, Error> {
        self.body = serde_json::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_slice(&self.body).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async route handler. Keel stores these and never calls them; the
/// transport does.
pub type HandlerFn = Arc<
    dyn Fn(RequestContext) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>
        + Send
        + Sync,
>;

/// Wrap an async function or closure as a [`HandlerFn`].
///
/// ```
/// use keel_core::{handler, HttpMethod, HttpResponse, RequestContext};
///
/// let h = handler(|_req| async { Ok(HttpResponse::ok()) });
/// # tokio_test::block_on(async {
/// let resp = h(RequestContext::new(HttpMethod::GET, "/")).await.unwrap();
/// assert_eq!(resp.status, 200);
/// # });
/// ```
pub fn handler<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::from_str("delete"), Some(HttpMethod::DELETE));
        assert_eq!(HttpMethod::from_str("TRACE"), None);
        assert_eq!(HttpMethod::PATCH.as_str(), "PATCH");
        assert_eq!(HttpMethod::PATCH.as_lower(), "patch");
        assert_eq!(HttpMethod::OPTIONS.to_string(), "OPTIONS");
    }

    #[test]
    fn test_request_context_accessors() {
        let ctx = RequestContext::new(HttpMethod::GET, "/users/7")
            .with_header("X-Request-Id", "abc")
            .with_param("id", "7")
            .with_query("tag", "a")
            .with_query("tag", "b");

        assert_eq!(ctx.header("x-request-id").map(String::as_str), Some("abc"));
        assert_eq!(ctx.param("id").map(String::as_str), Some("7"));
        assert_eq!(ctx.query("tag").map(String::as_str), Some("a"));
        assert_eq!(ctx.query_params["tag"].len(), 2);
        assert!(ctx.query("missing").is_none());
    }

    #[test]
    fn test_request_json_body() {
        let ctx = RequestContext::new(HttpMethod::POST, "/").with_body(r#"{"n": 3}"#);
        let value: serde_json::Value = ctx.json().unwrap();
        assert_eq!(value["n"], 3);

        let bad = RequestContext::new(HttpMethod::POST, "/").with_body("{");
        assert!(matches!(bad.json::<serde_json::Value>(), Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_response_with_json() {
        let resp = HttpResponse::created()
            .with_json(&serde_json::json!({"id": 1}))
            .unwrap();
        assert_eq!(resp.status, 201);
        assert_eq!(resp.headers["Content-Type"], "application/json");
        assert!(resp.is_success());
        assert!(!HttpResponse::not_found().is_success());
    }

    #[tokio::test]
    async fn test_handler_wrapper_is_callable() {
        let h = handler(|req: RequestContext| async move {
            HttpResponse::ok().with_json(&serde_json::json!({"path": req.path}))
        });
        let resp = h(RequestContext::new(HttpMethod::GET, "/ping")).await.unwrap();
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["path"], "/ping");
    }
}
