//! Known-answer validation harness for cipherkat backends.
//!
//! This crate provides:
//! - Vector corpus: built-in NIST SP 800-38A fixtures plus JSON fixture files
//! - Dual-mode validation: every vector through the buffer and array
//!   representations, with known-answer, round-trip and agreement checks
//! - Hex diffs and structured JSONL logs for failed vectors
//! - Report generation: human-readable + machine-readable run reports

#![forbid(unsafe_code)]

pub mod config;
pub mod corpus;
pub mod diff;
pub mod fixtures;
pub mod report;
pub mod structured_log;
pub mod validator;
pub mod vectors;
pub mod verify;

pub use config::{FailurePolicy, HarnessConfig};
pub use corpus::{CorpusError, TestVector, VectorCorpus};
pub use fixtures::{FixtureError, FixtureFile};
pub use report::ValidationReport;
pub use validator::{Check, DualModeValidator, Mismatch, ValidationError};
pub use verify::{VectorOutcome, VerificationSummary};

/// Format the current time the way log entries and reports stamp it.
#[must_use]
pub fn timestamp_now() -> String {
    structured_log::now_utc()
}
