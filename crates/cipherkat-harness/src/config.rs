//! Harness run configuration.
//!
//! - Backend identifier: `CIPHERKAT_CIPHER_CLASSES` (see [`CipherConfig`]).
//! - Failure policy: `CIPHERKAT_FAILURE_POLICY`, `fail-fast` (default) or
//!   `collect-all`.
//! - Extra fixtures: `CIPHERKAT_FIXTURE_DIR`, a directory of JSON fixture files
//!   merged over the built-in corpus.

use std::path::PathBuf;
use std::sync::OnceLock;

use cipherkat_core::config::configured_backend;
use cipherkat_core::{CipherConfig, Transformation};

pub const FAILURE_POLICY_KEY: &str = "CIPHERKAT_FAILURE_POLICY";
pub const FIXTURE_DIR_KEY: &str = "CIPHERKAT_FIXTURE_DIR";

/// What the validator does after a vector fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePolicy {
    /// Abort the run at the first mismatch or per-vector error.
    #[default]
    FailFast,
    /// Record every vector outcome and keep going. Setup errors still abort.
    CollectAll,
}

impl FailurePolicy {
    /// Parse from string (case-insensitive). Unknown values fall back to fail-fast.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "collect-all" | "collect_all" | "collect" | "all" => Self::CollectAll,
            _ => Self::FailFast,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FailFast => "fail-fast",
            Self::CollectAll => "collect-all",
        }
    }
}

/// Everything one harness run needs besides the registry and corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Backend selection handed to every factory call.
    pub cipher: CipherConfig,
    /// Transformations to validate, in order.
    pub transformations: Vec<Transformation>,
    pub policy: FailurePolicy,
    /// Directory of extra `*.json` fixtures, if any.
    pub fixture_dir: Option<PathBuf>,
}

impl HarnessConfig {
    /// Validate every supported transformation against `cipher`, fail-fast.
    #[must_use]
    pub fn new(cipher: CipherConfig) -> Self {
        Self {
            cipher,
            transformations: Transformation::ALL.to_vec(),
            policy: FailurePolicy::default(),
            fixture_dir: None,
        }
    }

    /// Read all harness settings from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::new(configured_backend().clone());
        config.policy = failure_policy();
        config.fixture_dir = std::env::var_os(FIXTURE_DIR_KEY)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        config
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Restrict the run to `transformations`. An empty list keeps the default.
    #[must_use]
    pub fn with_transformations(mut self, transformations: Vec<Transformation>) -> Self {
        if !transformations.is_empty() {
            self.transformations = transformations;
        }
        self
    }

    #[must_use]
    pub fn with_fixture_dir(mut self, dir: Option<PathBuf>) -> Self {
        if dir.is_some() {
            self.fixture_dir = dir;
        }
        self
    }
}

static GLOBAL_POLICY: OnceLock<FailurePolicy> = OnceLock::new();

/// Get the configured failure policy (reads env var on first call, caches thereafter).
#[must_use]
pub fn failure_policy() -> FailurePolicy {
    *GLOBAL_POLICY.get_or_init(|| {
        std::env::var(FAILURE_POLICY_KEY)
            .map(|v| FailurePolicy::from_str_loose(&v))
            .unwrap_or_default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_failure_policies() {
        assert_eq!(FailurePolicy::from_str_loose("collect-all"), FailurePolicy::CollectAll);
        assert_eq!(FailurePolicy::from_str_loose("COLLECT_ALL"), FailurePolicy::CollectAll);
        assert_eq!(FailurePolicy::from_str_loose("fail-fast"), FailurePolicy::FailFast);
        assert_eq!(FailurePolicy::from_str_loose("bogus"), FailurePolicy::FailFast);
    }

    #[test]
    fn default_is_fail_fast() {
        assert_eq!(FailurePolicy::default(), FailurePolicy::FailFast);
        assert_eq!(FailurePolicy::default().as_str(), "fail-fast");
    }

    #[test]
    fn default_config_covers_every_transformation() {
        let config = HarnessConfig::new(CipherConfig::with_backend("soft"));
        assert_eq!(config.transformations, Transformation::ALL.to_vec());
        assert_eq!(config.policy, FailurePolicy::FailFast);
        assert!(config.fixture_dir.is_none());
    }

    #[test]
    fn empty_selection_keeps_default() {
        let config = HarnessConfig::new(CipherConfig::unset()).with_transformations(Vec::new());
        assert_eq!(config.transformations.len(), Transformation::ALL.len());

        let narrowed = HarnessConfig::new(CipherConfig::unset())
            .with_transformations(vec![Transformation::AES_CBC_NOPADDING]);
        assert_eq!(narrowed.transformations, [Transformation::AES_CBC_NOPADDING]);
    }
}
