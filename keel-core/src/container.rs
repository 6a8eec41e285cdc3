// Dependency container

use crate::http::RequestContext;
use crate::logging::{debug, trace};
use crate::{Error, ProviderError};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type AnyInstance = Arc<dyn Any + Send + Sync>;

type ProviderFn = Arc<dyn Fn(&RequestContext) -> Result<AnyInstance, ProviderError> + Send + Sync>;

#[derive(Clone)]
struct ProviderEntry {
    type_name: &'static str,
    provide: ProviderFn,
}

/// Memoizing wrapper around a provider.
///
/// The instance slot has its own lock, separate from the container's
/// provider map. The provider runs at most once per successful
/// initialization; a failed attempt caches nothing.
struct Singleton<T> {
    provider: Box<dyn Fn(&RequestContext) -> Result<T, ProviderError> + Send + Sync>,
    instance: RwLock<Option<Arc<T>>>,
}

impl<T: Send + Sync + 'static> Singleton<T> {
    fn get(&self, ctx: &RequestContext) -> Result<Arc<T>, ProviderError> {
        if let Some(instance) = self.instance.read().as_ref() {
            return Ok(Arc::clone(instance));
        }

        let mut slot = self.instance.write();
        // Another caller may have initialized the slot while we waited.
        if let Some(instance) = slot.as_ref() {
            return Ok(Arc::clone(instance));
        }

        let instance = Arc::new((self.provider)(ctx)?);
        *slot = Some(Arc::clone(&instance));
        debug!(
            dependency = std::any::type_name::<T>(),
            "Singleton instance created"
        );
        Ok(instance)
    }
}

/// Type-keyed registry of dependency providers.
///
/// Clones share the same registrations.
///
/// # Examples
///
/// ```
/// use keel_core::{Container, HttpMethod, RequestContext};
///
/// struct Greeting(String);
///
/// let container = Container::new();
/// container.register_singleton(|_ctx| Ok(Greeting("hello".to_string())));
///
/// let ctx = RequestContext::new(HttpMethod::GET, "/");
/// let greeting = container.resolve::<Greeting>(&ctx).unwrap();
/// assert_eq!(greeting.0, "hello");
/// ```
#[derive(Clone, Default)]
pub struct Container {
    providers: Arc<RwLock<HashMap<TypeId, ProviderEntry>>>,
}

impl Container {
    pub fn new() -> Self {
        debug!("Creating new dependency container");
        Self::default()
    }

    fn insert(&self, type_id: TypeId, entry: ProviderEntry) {
        let type_name = entry.type_name;
        trace!(dependency = type_name, "Acquiring write lock for registration");
        let replaced = self.providers.write().insert(type_id, entry).is_some();
        debug!(
            dependency = type_name,
            replaced = replaced,
            "Provider registered in container"
        );
    }

    /// Register a provider invoked on every resolution of `T`
    pub fn register<T, F>(&self, provider: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&RequestContext) -> Result<T, ProviderError> + Send + Sync + 'static,
    {
        let provide: ProviderFn = Arc::new(move |ctx| {
            let instance: AnyInstance = Arc::new(provider(ctx)?);
            Ok(instance)
        });
        self.insert(
            TypeId::of::<T>(),
            ProviderEntry {
                type_name: std::any::type_name::<T>(),
                provide,
            },
        );
    }

    /// Register a provider whose first successful result is reused for
    /// every later resolution of `T`.
    ///
    /// Concurrent first resolutions invoke the provider once and all
    /// observe the same instance. If the provider fails nothing is cached
    /// and the next resolution retries it.
    pub fn register_singleton<T, F>(&self, provider: F)
    where
        T: Send + Sync + 'static,
        F: Fn(&RequestContext) -> Result<T, ProviderError> + Send + Sync + 'static,
    {
        let singleton = Arc::new(Singleton {
            provider: Box::new(provider),
            instance: RwLock::new(None),
        });
        let provide: ProviderFn = Arc::new(move |ctx| {
            let instance: AnyInstance = singleton.get(ctx)?;
            Ok(instance)
        });
        self.insert(
            TypeId::of::<T>(),
            ProviderEntry {
                type_name: std::any::type_name::<T>(),
                provide,
            },
        );
    }

    /// Register an already-built instance shared by every resolution
    pub fn register_instance<T: Send + Sync + 'static>(&self, instance: T) {
        let instance: AnyInstance = Arc::new(instance);
        let provide: ProviderFn = Arc::new(move |_ctx| Ok(Arc::clone(&instance)));
        self.insert(
            TypeId::of::<T>(),
            ProviderEntry {
                type_name: std::any::type_name::<T>(),
                provide,
            },
        );
    }

    /// Resolve `T` for a request.
    ///
    /// The provider map's read lock is held only for the lookup; the
    /// provider itself runs without it.
    pub fn resolve<T: Send + Sync + 'static>(&self, ctx: &RequestContext) -> Result<Arc<T>, Error> {
        let type_name = std::any::type_name::<T>();
        trace!(dependency = type_name, "Attempting to resolve dependency");

        let entry = self.providers.read().get(&TypeId::of::<T>()).cloned();
        let Some(entry) = entry else {
            debug!(dependency = type_name, "No provider registered");
            return Err(Error::ProviderNotFound(type_name.to_string()));
        };

        let instance = (entry.provide)(ctx).map_err(|source| {
            debug!(dependency = type_name, error = %source, "Provider failed");
            Error::Dependency {
                type_name: type_name.to_string(),
                source,
            }
        })?;

        instance.downcast::<T>().map_err(|_| Error::TypeMismatch {
            expected: type_name.to_string(),
        })
    }

    /// Resolve `T` and copy it into `target`
    pub fn resolve_into<T: Clone + Send + Sync + 'static>(
        &self,
        ctx: &RequestContext,
        target: &mut T,
    ) -> Result<(), Error> {
        let instance = self.resolve::<T>(ctx)?;
        *target = T::clone(&instance);
        Ok(())
    }

    /// Check if a provider is registered for `T`
    pub fn has<T: 'static>(&self) -> bool {
        self.providers.read().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.providers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.read().is_empty()
    }

    /// Remove every provider
    pub fn clear(&self) {
        let mut providers = self.providers.write();
        let count = providers.len();
        providers.clear();
        debug!(provider_count = count, "Cleared all providers from container");
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let providers = self.providers.read();
        let mut names: Vec<_> = providers.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        f.debug_struct("Container").field("providers", &names).finish()
    }
}
