//! Route groups
//!
//! A group forwards every route it declares to the underlying
//! [`RouteRegistry`] with its prefix prepended. Groups nest, and nested
//! prefixes compose.
//!
//! Prefix and path are concatenated, then runs of `/` are collapsed, so a
//! group at `/b/` nested with `/a/` yields `/b/a/`, never `/b//a/`.
//!
//! # Examples
//!
//! ```
//! use keel_core::{handler, HttpResponse, RouteRegistry};
//!
//! let mut registry = RouteRegistry::new();
//! {
//!     let mut api = registry.group("/api/v1");
//!     let mut users = api.group("/users/");
//!     users.get("/:id", handler(|_req| async { Ok(HttpResponse::ok()) }), []);
//! }
//! assert_eq!(registry.routes()[0].path, "/api/v1/users/:id");
//! ```

use crate::HandlerFn;
use crate::http::HttpMethod;
use crate::route_registry::{Route, RouteOption, RouteRegistry};

/// Concatenate two path pieces, collapsing repeated separators
pub fn join_paths(prefix: &str, path: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + path.len());
    for c in prefix.chars().chain(path.chars()) {
        if c == '/' && joined.ends_with('/') {
            continue;
        }
        joined.push(c);
    }
    joined
}

/// A path prefix bound to a registry
pub struct RouteGroup<'a> {
    registry: &'a mut RouteRegistry,
    prefix: String,
}

impl<'a> RouteGroup<'a> {
    pub fn new(registry: &'a mut RouteRegistry, prefix: impl Into<String>) -> Self {
        Self {
            registry,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full path a route declared in this group is registered under
    pub fn apply_prefix(&self, path: &str) -> String {
        join_paths(&self.prefix, path)
    }

    /// Nested group; its prefix is appended to this one
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        let prefix = self.apply_prefix(prefix);
        RouteGroup {
            registry: &mut *self.registry,
            prefix,
        }
    }

    pub fn add_route<O>(&mut self, method: HttpMethod, path: &str, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        let full = self.apply_prefix(path);
        self.registry.add_route(method, full, handler, options)
    }

    pub fn get<O>(&mut self, path: &str, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::GET, path, handler, options)
    }

    pub fn post<O>(&mut self, path: &str, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::POST, path, handler, options)
    }

    pub fn put<O>(&mut self, path: &str, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::PUT, path, handler, options)
    }

    pub fn delete<O>(&mut self, path: &str, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::DELETE, path, handler, options)
    }

    pub fn patch<O>(&mut self, path: &str, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.add_route(HttpMethod::PATCH, path, handler, options)
    }
}
