//! Built-in cipher backends.
//!
//! - `soft`: AES block primitive from the `aes` crate; CTR, CBC and PKCS#5
//!   padding implemented here, in place on caller storage.
//! - `rustcrypto`: the `ctr` and `cbc` mode crates with `cipher` block padding.
//!
//! Both accept every transformation in [`Transformation::ALL`] with 128, 192 or
//! 256-bit keys.

#![forbid(unsafe_code)]

mod common;
pub mod rustcrypto;
pub mod soft;

use cipherkat_core::{BackendRegistry, Transformation};

pub use rustcrypto::RustCryptoBackend;
pub use soft::SoftAesBackend;

pub const SOFT: &str = "soft";
pub const RUSTCRYPTO: &str = "rustcrypto";

/// Register the built-in backends plus their family aliases
/// (`openssl` → `soft`, `jce` → `rustcrypto`).
pub fn register_builtin(registry: &mut BackendRegistry) {
    registry
        .register(SOFT, SoftAesBackend::construct)
        .register("openssl", SoftAesBackend::construct)
        .register(RUSTCRYPTO, RustCryptoBackend::construct)
        .register("jce", RustCryptoBackend::construct);
}

/// A registry holding only the built-in backends.
#[must_use]
pub fn builtin_registry() -> BackendRegistry {
    let mut registry = BackendRegistry::new();
    register_builtin(&mut registry);
    registry
}

/// Transformations every built-in backend accepts.
#[must_use]
pub fn supported_transformations() -> Vec<Transformation> {
    Transformation::ALL.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherkat_core::CipherConfig;

    #[test]
    fn builtin_registry_resolves_names_and_aliases() {
        let registry = builtin_registry();
        for (id, expected) in [
            ("soft", SOFT),
            ("OpenSSL", SOFT),
            ("rustcrypto", RUSTCRYPTO),
            ("jce", RUSTCRYPTO),
        ] {
            let backend = registry
                .create(
                    &CipherConfig::with_backend(id),
                    Transformation::AES_CBC_PKCS5PADDING,
                )
                .ok()
                .expect("builtin backend");
            assert_eq!(backend.name(), expected);
            assert_eq!(backend.transformation(), Transformation::AES_CBC_PKCS5PADDING);
        }
    }

    #[test]
    fn supported_set_matches_core() {
        assert_eq!(supported_transformations(), Transformation::ALL.to_vec());
    }
}
