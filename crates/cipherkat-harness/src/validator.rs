//! Dual-representation known-answer validation.
//!
//! Every vector runs four single-use sessions: buffer encrypt, buffer decrypt of
//! the produced ciphertext, then the same pair over plain slices. Each output is
//! checked against the known answer, and the two representations are checked
//! against each other. Backends are resolved and constructed for every selected
//! transformation, and every fixture is decoded, before the first vector runs.

use std::fmt;

use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use cipherkat_core::{
    BackendRegistry, ByteCursor, CipherConfig, CipherError, Direction, FactoryError,
    Representation, Transformation,
};

use crate::config::FailurePolicy;
use crate::corpus::{CorpusError, TestVector, VectorCorpus};
use crate::diff::{render_hex_diff, to_hex};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use crate::verify::{VectorOutcome, VerificationSummary};

/// Which comparison a [`Mismatch`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    /// Output differs from the fixture's expected bytes.
    KnownAnswer,
    /// Decrypting the harness's own ciphertext did not give the plaintext back.
    RoundTrip,
    /// Buffer and array representations produced different bytes.
    RepresentationAgreement,
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::KnownAnswer => "known-answer",
            Self::RoundTrip => "round-trip",
            Self::RepresentationAgreement => "representation-agreement",
        })
    }
}

/// Expected-vs-actual diagnostic for one failed comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub transformation: String,
    pub index: usize,
    pub label: String,
    pub check: Check,
    /// `None` for the buffer-vs-array comparison.
    pub representation: Option<Representation>,
    pub direction: Direction,
    pub expected: Vec<u8>,
    pub actual: Vec<u8>,
}

impl Mismatch {
    #[must_use]
    pub fn diff(&self) -> String {
        render_hex_diff(&self.expected, &self.actual)
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leg = match self.representation {
            Some(representation) => representation.as_str(),
            None => "buffer vs array",
        };
        writeln!(
            f,
            "{} vector #{} ({}): {} mismatch on {leg} {}",
            self.transformation, self.index, self.label, self.check, self.direction
        )?;
        writeln!(f, "  expected: {}", to_hex(&self.expected))?;
        writeln!(f, "  actual:   {}", to_hex(&self.actual))?;
        f.write_str(&self.diff())
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Factory(#[from] FactoryError),
    #[error(transparent)]
    Corpus(#[from] CorpusError),
    #[error("{transformation} vector #{index} ({label}): {representation} {direction} failed: {source}")]
    Cipher {
        transformation: String,
        index: usize,
        label: String,
        representation: Representation,
        direction: Direction,
        source: CipherError,
    },
    #[error("{0}")]
    Mismatch(Box<Mismatch>),
    #[error("structured log write failed: {0}")]
    Log(#[from] std::io::Error),
}

impl ValidationError {
    /// Configuration, instantiation or corpus failure: nothing about any
    /// particular vector.
    #[must_use]
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::Factory(_) | Self::Corpus(_))
    }

    /// Failure attributable to a single vector. A session-state error means
    /// the harness drove a session out of order and is never per-vector.
    #[must_use]
    pub fn is_per_vector(&self) -> bool {
        match self {
            Self::Cipher {
                source: CipherError::InvalidSessionState { .. },
                ..
            } => false,
            Self::Cipher { .. } | Self::Mismatch(_) => true,
            _ => false,
        }
    }
}

/// The vector currently running, for diagnostics.
struct VectorRef<'v> {
    transformation: Transformation,
    index: usize,
    vector: &'v TestVector,
}

impl VectorRef<'_> {
    fn cipher_error(
        &self,
        representation: Representation,
        direction: Direction,
        source: CipherError,
    ) -> ValidationError {
        ValidationError::Cipher {
            transformation: self.transformation.name().to_string(),
            index: self.index,
            label: self.vector.label.clone(),
            representation,
            direction,
            source,
        }
    }

    fn compare(
        &self,
        check: Check,
        representation: Option<Representation>,
        direction: Direction,
        expected: &[u8],
        actual: &[u8],
    ) -> Result<(), ValidationError> {
        if expected == actual {
            return Ok(());
        }
        Err(ValidationError::Mismatch(Box::new(Mismatch {
            transformation: self.transformation.name().to_string(),
            index: self.index,
            label: self.vector.label.clone(),
            check,
            representation,
            direction,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        })))
    }
}

/// Runs the known-answer corpus against one configured backend.
pub struct DualModeValidator<'a> {
    registry: &'a BackendRegistry,
    config: &'a CipherConfig,
    corpus: &'a VectorCorpus,
    policy: FailurePolicy,
    log: Option<&'a mut LogEmitter>,
}

impl<'a> DualModeValidator<'a> {
    #[must_use]
    pub fn new(
        registry: &'a BackendRegistry,
        config: &'a CipherConfig,
        corpus: &'a VectorCorpus,
    ) -> Self {
        Self {
            registry,
            config,
            corpus,
            policy: FailurePolicy::default(),
            log: None,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a structured log; one entry per leg, vector and transformation.
    #[must_use]
    pub fn with_log(mut self, log: &'a mut LogEmitter) -> Self {
        self.log = Some(log);
        self
    }

    /// Setup pass: resolve the backend, then decode the fixture and construct
    /// a backend for each of `transformations`. Nothing is logged.
    pub fn prepare(
        &self,
        transformations: &[Transformation],
    ) -> Result<Vec<(Transformation, Vec<TestVector>)>, ValidationError> {
        self.registry.resolve(self.config)?;
        let mut plan = Vec::with_capacity(transformations.len());
        for &transformation in transformations {
            let vectors = self.corpus.lookup(&transformation)?;
            // Surfaces unsupported transformations before the first vector.
            self.registry.create(self.config, transformation)?;
            plan.push((transformation, vectors));
        }
        Ok(plan)
    }

    /// Validate `transformations` in order.
    ///
    /// Setup errors are returned before any vector runs. Under
    /// [`FailurePolicy::FailFast`] the first per-vector error is returned;
    /// under [`FailurePolicy::CollectAll`] it becomes a failed outcome.
    /// Session-state errors abort under either policy.
    pub fn run(
        &mut self,
        transformations: &[Transformation],
    ) -> Result<VerificationSummary, ValidationError> {
        let plan = self.prepare(transformations)?;

        self.record(
            LogEntry::new("", LogLevel::Info, "run.start").with_details(json!({
                "policy": self.policy.as_str(),
                "transformations": transformations.iter().map(|t| t.name()).collect::<Vec<_>>(),
            })),
        )?;

        let mut outcomes = Vec::new();
        for (transformation, vectors) in &plan {
            let first = outcomes.len();
            for (index, vector) in vectors.iter().enumerate() {
                let at = VectorRef {
                    transformation: *transformation,
                    index,
                    vector,
                };
                let outcome = match self.check_vector(&at) {
                    Ok(()) => VectorOutcome {
                        transformation: transformation.name().to_string(),
                        index,
                        label: vector.label.clone(),
                        passed: true,
                        detail: None,
                    },
                    Err(err) if err.is_per_vector() => {
                        self.log_vector(&at, Some(&err))?;
                        if self.policy == FailurePolicy::FailFast {
                            return Err(err);
                        }
                        outcomes.push(VectorOutcome {
                            transformation: transformation.name().to_string(),
                            index,
                            label: vector.label.clone(),
                            passed: false,
                            detail: Some(err.to_string()),
                        });
                        continue;
                    }
                    Err(err) => return Err(err),
                };
                self.log_vector(&at, None)?;
                outcomes.push(outcome);
            }
            let ran = &outcomes[first..];
            let failed = ran.iter().filter(|o| !o.passed).count();
            self.record(
                LogEntry::new(
                    "",
                    if failed == 0 { LogLevel::Info } else { LogLevel::Error },
                    "transformation.summary",
                )
                .with_transformation(transformation.name())
                .with_outcome(if failed == 0 { Outcome::Pass } else { Outcome::Fail })
                .with_details(json!({ "total": ran.len(), "failed": failed })),
            )?;
        }

        let summary = VerificationSummary::from_outcomes(outcomes);
        self.record(
            LogEntry::new("", LogLevel::Info, "run.summary")
                .with_outcome(if summary.all_passed() {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                })
                .with_details(json!({
                    "total": summary.total,
                    "passed": summary.passed,
                    "failed": summary.failed,
                })),
        )?;
        if let Some(log) = self.log.as_deref_mut() {
            log.flush()?;
        }
        Ok(summary)
    }

    fn check_vector(&mut self, at: &VectorRef<'_>) -> Result<(), ValidationError> {
        let v = at.vector;
        let mut produced = Vec::with_capacity(Representation::ALL.len());
        for representation in Representation::ALL {
            let ciphertext = self.leg(at, representation, Direction::Encrypt, &v.plaintext)?;
            at.compare(
                Check::KnownAnswer,
                Some(representation),
                Direction::Encrypt,
                &v.ciphertext,
                &ciphertext,
            )?;
            let plaintext = self.leg(at, representation, Direction::Decrypt, &ciphertext)?;
            at.compare(
                Check::RoundTrip,
                Some(representation),
                Direction::Decrypt,
                &v.plaintext,
                &plaintext,
            )?;
            produced.push((ciphertext, plaintext));
        }

        let (buffer, array) = (&produced[0], &produced[1]);
        at.compare(
            Check::RepresentationAgreement,
            None,
            Direction::Encrypt,
            &buffer.0,
            &array.0,
        )?;
        at.compare(
            Check::RepresentationAgreement,
            None,
            Direction::Decrypt,
            &buffer.1,
            &array.1,
        )
    }

    /// One fresh session, one finalize.
    fn leg(
        &mut self,
        at: &VectorRef<'_>,
        representation: Representation,
        direction: Direction,
        input: &[u8],
    ) -> Result<Vec<u8>, ValidationError> {
        let result = self.execute(at, representation, direction, input);
        let (outcome, details) = match &result {
            Ok(out) => (Outcome::Pass, json!({ "output_len": out.len() })),
            Err(err) => (Outcome::Error, json!({ "error": err.to_string() })),
        };
        self.record(
            LogEntry::new("", LogLevel::Debug, "vector.leg")
                .with_transformation(at.transformation.name())
                .with_vector(at.index, &at.vector.label)
                .with_leg(representation, direction)
                .with_outcome(outcome)
                .with_details(details),
        )?;
        result
    }

    fn execute(
        &self,
        at: &VectorRef<'_>,
        representation: Representation,
        direction: Direction,
        input: &[u8],
    ) -> Result<Vec<u8>, ValidationError> {
        let transformation = at.transformation;
        let fail = |source| at.cipher_error(representation, direction, source);
        let mut session = self.registry.new_session(self.config, transformation)?;
        session
            .initialize(direction, &at.vector.key, &at.vector.iv)
            .map_err(fail)?;

        // One spare block covers padding growth on encrypt.
        let capacity = input.len() + transformation.block_size();
        match representation {
            Representation::Buffer => {
                let mut source = ByteCursor::allocate(input.len());
                source.put(input).map_err(fail)?;
                source.flip();
                let mut sink = ByteCursor::allocate(capacity);
                session
                    .finalize_buffer(&mut source, &mut sink)
                    .map_err(fail)?;
                sink.flip();
                Ok(sink.remaining_bytes())
            }
            Representation::Array => {
                let mut out = vec![0u8; capacity];
                let written = session
                    .finalize_array(input, 0, input.len(), &mut out, 0)
                    .map_err(fail)?;
                out.truncate(written);
                Ok(out)
            }
        }
    }

    fn log_vector(
        &mut self,
        at: &VectorRef<'_>,
        failure: Option<&ValidationError>,
    ) -> Result<(), ValidationError> {
        let entry = LogEntry::new("", LogLevel::Info, "vector.result")
            .with_transformation(at.transformation.name())
            .with_vector(at.index, &at.vector.label);
        let entry = match failure {
            None => entry.with_outcome(Outcome::Pass),
            Some(ValidationError::Mismatch(m)) => LogEntry {
                level: LogLevel::Error,
                ..entry
            }
            .with_outcome(Outcome::Fail)
            .with_details(json!({
                "check": m.check,
                "representation": m.representation,
                "direction": m.direction,
                "expected": to_hex(&m.expected),
                "actual": to_hex(&m.actual),
            })),
            Some(err) => LogEntry {
                level: LogLevel::Error,
                ..entry
            }
            .with_outcome(Outcome::Error)
            .with_details(json!({ "error": err.to_string() })),
        };
        self.record(entry)
    }

    fn record(&mut self, entry: LogEntry) -> Result<(), ValidationError> {
        if let Some(log) = self.log.as_deref_mut() {
            log.emit_entry(entry)?;
        }
        Ok(())
    }
}
