// Application facade

use keel_config::ApiConfig;
use keel_core::logging::{LogConfig, LogLevel, WorkerGuard, debug, info};
use keel_core::{Container, Error, HandlerFn, HttpMethod, ProviderError, RequestContext, Route, RouteGroup, RouteOption, RouteRegistry};
use keel_openapi::{ApiDocs, ApiMetadata, DOCS_PATHS, DocumentAssembler};
use once_cell::sync::OnceCell;

/// An API: its configuration, routes, dependencies and generated document.
///
/// Routes and dependencies are declared during setup. [`App::setup`] then
/// assembles the document once; the external transport serves
/// [`App::routes`] and the document at [`keel_openapi::DOCUMENT_PATH`].
///
/// ```
/// use keel::prelude::*;
///
/// let mut app = App::new(ApiConfig::new("Pets", "1.0.0"));
/// app.get(
///     "/pets/:id",
///     handler(|_req| async { Ok(HttpResponse::ok()) }),
///     [with_summary("Get a pet"), with_tags(["pets"])],
/// );
///
/// let docs = app.setup();
/// let op = docs.document().operation("/pets/{id}", "get").unwrap();
/// assert_eq!(op.summary, "Get a pet");
/// ```
pub struct App {
    config: ApiConfig,
    registry: RouteRegistry,
    container: Container,
    docs: OnceCell<ApiDocs>,
}

impl App {
    pub fn new(config: ApiConfig) -> Self {
        debug!(title = %config.title, version = %config.version, "Creating application");
        Self {
            config,
            registry: RouteRegistry::new(),
            container: Container::new(),
            docs: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Document metadata derived from the configuration
    pub fn metadata(&self) -> ApiMetadata {
        metadata_from(&self.config)
    }

    /// Mutable access to the registry. Drops any assembled document.
    fn registry_mut(&mut self) -> &mut RouteRegistry {
        self.docs.take();
        &mut self.registry
    }

    pub fn add_route<O>(&mut self, method: HttpMethod, path: &str, handler: HandlerFn, options: O) -> &Route
    where
        O: IntoIterator<Item = RouteOption>,
    {
        self.registry_mut().add_route(method, path, handler, options)
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

    /// Routes registered through the group share its path prefix
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        self.registry_mut().group(prefix)
    }

    /// Register a provider run on every resolution of `T`
    pub fn register_dependency<T, F>(&self, provider: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&RequestContext) -> Result<T, ProviderError> + Send + Sync + 'static,
    {
        self.container.register(provider);
    }

    /// Register a provider whose first successful result is shared
    pub fn register_singleton_dependency<T, F>(&self, provider: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&RequestContext) -> Result<T, ProviderError> + Send + Sync + 'static,
    {
        self.container.register_singleton(provider);
    }

    /// Container handed to handlers for dependency resolution
    pub fn container(&self) -> &Container {
        &self.container
    }

    /// Assemble the API document.
    ///
    /// The first call builds and caches it; later calls return the cached
    /// document until another route is registered.
    pub fn setup(&self) -> &ApiDocs {
        self.docs.get_or_init(|| {
            let document = DocumentAssembler::new(self.metadata()).assemble(self.registry.routes());
            info!(
                routes = self.registry.len(),
                paths = document.paths.len(),
                "Application setup complete"
            );
            ApiDocs::new(document)
        })
    }

    /// The document, if [`App::setup`] has run since the last registration
    pub fn docs(&self) -> Option<&ApiDocs> {
        self.docs.get()
    }

    pub fn routes(&self) -> &[Route] {
        self.registry.routes()
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    /// Documentation paths the transport should mount alongside the routes
    pub fn docs_routes(&self) -> &'static [&'static str] {
        DOCS_PATHS
    }

    /// Install logging; `debug` in the configuration selects DEBUG level
    pub fn init_logging(&self) -> Result<WorkerGuard, Error> {
        self.log_config().init()
    }

    /// Logging configuration derived from the application configuration
    pub fn log_config(&self) -> LogConfig {
        let level = if self.config.debug { LogLevel::Debug } else { LogLevel::Info };
        LogConfig::new().level(level)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("title", &self.config.title)
            .field("routes", &self.registry.len())
            .field("container", &self.container)
            .field("assembled", &self.docs.get().is_some())
            .finish()
    }
}

/// Document metadata for a configuration
pub fn metadata_from(config: &ApiConfig) -> ApiMetadata {
    let mut metadata = ApiMetadata::new(&config.title, &config.version)
        .description(&config.description)
        .host(&config.host)
        .base_path(&config.base_path)
        .contact(&config.contact.name, &config.contact.url, &config.contact.email)
        .license(&config.license.name, &config.license.url);
    for scheme in &config.schemes {
        metadata = metadata.scheme(scheme);
    }
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use keel_core::route_registry::with_summary;
    use keel_core::{HttpResponse, handler};

    fn noop() -> HandlerFn {
        handler(|_req| async { Ok(HttpResponse::ok()) })
    }

    #[test]
    fn test_metadata_from_config() {
        let config = ApiConfig::new("Orders", "2.1.0")
            .with_host("api.example.com")
            .with_base_path("/v2")
            .with_schemes(["https", "wss"]);
        let meta = metadata_from(&config);
        assert_eq!(meta.title, "Orders");
        assert_eq!(meta.version, "2.1.0");
        assert_eq!(meta.host, "api.example.com");
        assert_eq!(meta.base_path, "/v2");
        assert_eq!(meta.schemes, vec!["https", "wss"]);
        assert_eq!(meta.contact.name, "API Support");
        assert_eq!(meta.license.name, "MIT");
    }

    #[test]
    fn test_setup_is_cached_until_next_registration() {
        let mut app = App::new(ApiConfig::default());
        app.get("/a", noop(), [with_summary("first")]);

        let first: *const ApiDocs = app.setup();
        let second: *const ApiDocs = app.setup();
        assert_eq!(first, second);
        assert!(app.docs().is_some());

        app.get("/b", noop(), []);
        assert!(app.docs().is_none());
        assert_eq!(app.setup().document().paths.len(), 2);
    }

    #[test]
    fn test_log_level_follows_debug_flag() {
        let app = App::new(ApiConfig::default().with_debug(false));
        assert_eq!(app.log_config().level, LogLevel::Info);
        let app = App::new(ApiConfig::default());
        assert_eq!(app.log_config().level, LogLevel::Debug);
    }
}
