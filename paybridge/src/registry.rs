//! Name-to-factory registry for payment providers.
//!
//! Decouples "which backend to use" from the facade: backends register a
//! [`ProviderFactory`] under a name, and the facade constructs the named
//! provider from configuration at startup. Test doubles register the same
//! way.
//!
//! A process-wide registry backs the facade's associated functions. It is
//! plain shared state guarded by an `RwLock`: register providers during
//! initialization, before concurrent traffic begins. Concurrent
//! register/unregister calls against the same name race by design, and
//! `create` observes whatever is stored at that moment.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use crate::config::ProviderConfig;
use crate::error::BoxError;
use crate::provider::Provider;

/// Builds a provider instance from its configuration.
///
/// This is the single normalized construction shape. Plain closures get a
/// blanket implementation, so lightweight backends register as
/// `|config| Ok(Box::new(MyProvider::new(config)))` while backends that
/// need setup state implement the trait on a factory struct.
pub trait ProviderFactory: Send + Sync {
    /// Constructs a provider from its configuration.
    ///
    /// # Errors
    ///
    /// Returns the backend's native error when construction fails (bad
    /// credentials shape, missing required config, ...).
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn Provider>, BoxError>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&ProviderConfig) -> Result<Box<dyn Provider>, BoxError> + Send + Sync,
{
    fn create(&self, config: &ProviderConfig) -> Result<Box<dyn Provider>, BoxError> {
        self(config)
    }
}

/// Errors raised while resolving or constructing a provider.
///
/// These surface at facade construction time only; they represent
/// configuration mistakes, not runtime payment failures, which is why they
/// are a separate type from [`PaymentError`](crate::error::PaymentError).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No factory is registered under the requested name.
    #[error("Provider '{name}' not found")]
    NotFound {
        /// The requested provider name.
        name: String,
    },

    /// The factory was found but failed to construct the provider.
    #[error("Invalid provider factory for '{name}': {source}")]
    Build {
        /// The requested provider name.
        name: String,
        /// The factory's native error.
        source: BoxError,
    },
}

/// Ordered mapping from provider name to factory.
///
/// Entries keep registration order so [`list`](Self::list) is
/// deterministic. Re-registering a name replaces the factory in place
/// (last registration wins, no error).
#[derive(Default)]
pub struct ProviderRegistry {
    entries: Vec<(String, Arc<dyn ProviderFactory>)>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ProviderRegistry").field(&self.list()).finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a factory under a name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: ProviderFactory + 'static,
    {
        let name = name.into();
        let factory: Arc<dyn ProviderFactory> = Arc::new(factory);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = factory,
            None => self.entries.push((name, factory)),
        }
    }

    /// Returns the factory registered under a name, without constructing.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProviderFactory>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| Arc::clone(f))
    }

    /// Returns all registered names, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Removes a registration; returns whether an entry existed.
    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| n != name);
        self.entries.len() != before
    }

    /// Looks up and invokes the factory for a name.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotFound`] when no factory is registered under the
    /// name; [`RegistryError::Build`] when the factory fails.
    pub fn create(
        &self,
        name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn Provider>, RegistryError> {
        let factory = self.get(name).ok_or_else(|| RegistryError::NotFound {
            name: name.to_owned(),
        })?;
        factory.create(config).map_err(|source| RegistryError::Build {
            name: name.to_owned(),
            source,
        })
    }
}

static SHARED: LazyLock<RwLock<ProviderRegistry>> =
    LazyLock::new(|| RwLock::new(ProviderRegistry::new()));

/// Returns the process-wide registry the facade resolves providers from.
///
/// Registrations persist for the lifetime of the process.
#[must_use]
pub fn shared() -> &'static RwLock<ProviderRegistry> {
    &SHARED
}

/// Acquires the shared registry for reading, recovering from poisoning.
pub(crate) fn shared_read() -> std::sync::RwLockReadGuard<'static, ProviderRegistry> {
    SHARED.read().unwrap_or_else(PoisonError::into_inner)
}

/// Acquires the shared registry for writing, recovering from poisoning.
pub(crate) fn shared_write() -> std::sync::RwLockWriteGuard<'static, ProviderRegistry> {
    SHARED.write().unwrap_or_else(PoisonError::into_inner)
}
