//! Backend registry: resolves a configured identifier to a constructor.
//!
//! Every [`BackendRegistry::create`] call builds a new backend instance; nothing
//! is cached or shared between sessions.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use parking_lot::RwLock;

use crate::backend::CipherBackend;
use crate::config::{CIPHER_CLASSES_KEY, CipherConfig};
use crate::error::{CipherError, FactoryError};
use crate::session::CipherSession;
use crate::transformation::Transformation;

/// Constructor registered under a backend identifier.
pub type BackendConstructor =
    fn(&CipherConfig, Transformation) -> Result<Box<dyn CipherBackend>, CipherError>;

#[derive(Debug, Default, Clone)]
pub struct BackendRegistry {
    constructors: BTreeMap<String, BackendConstructor>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the constructor for `id`. Identifiers are
    /// matched case-insensitively.
    pub fn register(&mut self, id: &str, constructor: BackendConstructor) -> &mut Self {
        self.constructors.insert(id.to_ascii_lowercase(), constructor);
        self
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.constructors.contains_key(&id.to_ascii_lowercase())
    }

    /// Registered identifiers in sorted order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        self.constructors.keys().map(String::as_str).collect()
    }

    /// Check that `config` names a registered backend, without constructing it.
    pub fn resolve(&self, config: &CipherConfig) -> Result<BackendConstructor, FactoryError> {
        let id = config.backend().ok_or(FactoryError::Configuration {
            key: CIPHER_CLASSES_KEY,
        })?;
        self.constructors
            .get(&id.to_ascii_lowercase())
            .copied()
            .ok_or_else(|| FactoryError::Instantiation {
                backend: id.to_string(),
                reason: format!(
                    "no backend registered under this identifier (known: {})",
                    self.identifiers().join(", ")
                ),
            })
    }

    /// Construct a new backend for `transformation`.
    pub fn create(
        &self,
        config: &CipherConfig,
        transformation: Transformation,
    ) -> Result<Box<dyn CipherBackend>, FactoryError> {
        let constructor = self.resolve(config)?;
        constructor(config, transformation).map_err(|err| FactoryError::Instantiation {
            backend: config.backend().unwrap_or_default().to_string(),
            reason: err.to_string(),
        })
    }

    /// Construct a new backend and wrap it in a fresh session.
    pub fn new_session(
        &self,
        config: &CipherConfig,
        transformation: Transformation,
    ) -> Result<CipherSession, FactoryError> {
        self.create(config, transformation).map(CipherSession::new)
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<BackendRegistry>> = OnceLock::new();

/// Process-wide registry, empty until backends are registered into it.
#[must_use]
pub fn global_registry() -> &'static RwLock<BackendRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(BackendRegistry::new()))
}
