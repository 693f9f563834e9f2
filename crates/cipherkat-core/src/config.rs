//! Backend configuration.
//!
//! The backend identifier is the only recognized option. It is read from the
//! `CIPHERKAT_CIPHER_CLASSES` environment variable or set explicitly, and the
//! resulting [`CipherConfig`] is immutable.

use std::sync::OnceLock;

/// Name of the single recognized configuration key.
pub const CIPHER_CLASSES_KEY: &str = "CIPHERKAT_CIPHER_CLASSES";

/// Immutable backend configuration shared by reference with every factory call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CipherConfig {
    cipher_classes: Option<String>,
}

impl CipherConfig {
    /// Configuration naming `backend`.
    #[must_use]
    pub fn with_backend(backend: impl Into<String>) -> Self {
        Self {
            cipher_classes: Some(backend.into()),
        }
    }

    /// Configuration with no backend identifier.
    #[must_use]
    pub fn unset() -> Self {
        Self::default()
    }

    /// Read the backend identifier from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            cipher_classes: std::env::var(CIPHER_CLASSES_KEY).ok(),
        }
    }

    /// Trimmed backend identifier, `None` when unset or blank.
    #[must_use]
    pub fn backend(&self) -> Option<&str> {
        self.cipher_classes
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

static ENV_CONFIG: OnceLock<CipherConfig> = OnceLock::new();

/// Process configuration (reads the env var on first call, caches thereafter).
#[must_use]
pub fn configured_backend() -> &'static CipherConfig {
    ENV_CONFIG.get_or_init(CipherConfig::from_env)
}
