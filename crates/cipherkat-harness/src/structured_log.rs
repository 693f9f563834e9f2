//! Structured JSONL logging for validation runs.
//!
//! Provides:
//! - [`LogEntry`]: canonical JSONL record with required + optional fields.
//! - [`LogEmitter`]: writes JSONL lines to a file, stderr, or an in-memory buffer.
//! - [`validate_log_line`]: validates a single JSONL line against the schema.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use cipherkat_core::{Direction, Representation};

// ---------------------------------------------------------------------------
// Log entry
// ---------------------------------------------------------------------------

/// Severity level for log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Outcome of one vector leg or aggregate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

/// Canonical structured log entry.
///
/// Required fields: `timestamp`, `trace_id`, `level`, `event`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    // Required
    pub timestamp: String,
    pub trace_id: String,
    pub level: LogLevel,
    pub event: String,

    // Optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representation: Option<Representation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LogEntry {
    /// Create a new log entry with required fields only.
    #[must_use]
    pub fn new(trace_id: impl Into<String>, level: LogLevel, event: impl Into<String>) -> Self {
        Self {
            timestamp: now_utc(),
            trace_id: trace_id.into(),
            level,
            event: event.into(),
            backend: None,
            transformation: None,
            vector_index: None,
            vector_label: None,
            representation: None,
            direction: None,
            outcome: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    #[must_use]
    pub fn with_transformation(mut self, transformation: impl Into<String>) -> Self {
        self.transformation = Some(transformation.into());
        self
    }

    /// Set the vector index and label.
    #[must_use]
    pub fn with_vector(mut self, index: usize, label: impl Into<String>) -> Self {
        self.vector_index = Some(index);
        self.vector_label = Some(label.into());
        self
    }

    /// Set the representation and direction of a leg.
    #[must_use]
    pub fn with_leg(mut self, representation: Representation, direction: Direction) -> Self {
        self.representation = Some(representation);
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Set free-form details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Log emitter
// ---------------------------------------------------------------------------

enum Sink {
    Writer(Box<dyn Write>),
    Buffer(Vec<u8>),
}

/// Writes structured JSONL log entries.
pub struct LogEmitter {
    sink: Sink,
    seq: u64,
    run_id: String,
    backend: String,
}

impl LogEmitter {
    /// Create an emitter that writes to a file.
    pub fn to_file(path: &Path, run_id: &str, backend: &str) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::to_writer(
            Box::new(std::io::BufWriter::new(file)),
            run_id,
            backend,
        ))
    }

    /// Create an emitter over an arbitrary writer (e.g. stderr).
    #[must_use]
    pub fn to_writer(writer: Box<dyn Write>, run_id: &str, backend: &str) -> Self {
        Self {
            sink: Sink::Writer(writer),
            seq: 0,
            run_id: run_id.to_string(),
            backend: backend.to_string(),
        }
    }

    /// Create an emitter that keeps lines in memory (for testing).
    #[must_use]
    pub fn to_buffer(run_id: &str, backend: &str) -> Self {
        Self {
            sink: Sink::Buffer(Vec::new()),
            seq: 0,
            run_id: run_id.to_string(),
            backend: backend.to_string(),
        }
    }

    /// Switch the backend segment of subsequent trace ids.
    pub fn set_backend(&mut self, backend: &str) {
        self.backend = backend.to_string();
    }

    /// Buffered lines, for emitters created with [`LogEmitter::to_buffer`].
    #[must_use]
    pub fn buffered_lines(&self) -> Option<Vec<&str>> {
        match &self.sink {
            Sink::Buffer(buf) => std::str::from_utf8(buf).ok().map(|s| s.lines().collect()),
            Sink::Writer(_) => None,
        }
    }

    /// Generate the next trace ID: `<run_id>::<backend>::<seq>`.
    fn next_trace_id(&mut self) -> String {
        self.seq += 1;
        format!("{}::{}::{:03}", self.run_id, self.backend, self.seq)
    }

    /// Emit a log entry with auto-generated trace_id.
    pub fn emit(&mut self, level: LogLevel, event: &str) -> std::io::Result<LogEntry> {
        let trace_id = self.next_trace_id();
        let entry = LogEntry::new(&trace_id, level, event).with_backend(&self.backend);
        self.write_line(&entry)?;
        Ok(entry)
    }

    /// Emit a fully-populated log entry, filling trace_id/backend if missing.
    pub fn emit_entry(&mut self, mut entry: LogEntry) -> std::io::Result<()> {
        if entry.trace_id.is_empty() {
            entry.trace_id = self.next_trace_id();
        }
        if entry.backend.is_none() {
            entry.backend = Some(self.backend.clone());
        }
        self.write_line(&entry)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.sink {
            Sink::Writer(w) => w.flush(),
            Sink::Buffer(_) => Ok(()),
        }
    }

    fn write_line(&mut self, entry: &LogEntry) -> std::io::Result<()> {
        let line = serde_json::to_string(entry).map_err(std::io::Error::other)?;
        match &mut self.sink {
            Sink::Writer(w) => writeln!(w, "{line}"),
            Sink::Buffer(buf) => writeln!(buf, "{line}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validation error for a log line.
#[derive(Debug)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Validate a single JSONL line against the schema.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<LogEntry, Vec<LogValidationError>> {
    let error = |field: &str, message: String| LogValidationError {
        line_number,
        field: field.to_string(),
        message,
    };

    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return Err(vec![error("<json>", format!("invalid JSON: {e}"))]),
    };
    let Some(obj) = value.as_object() else {
        return Err(vec![error("<root>", "expected JSON object".to_string())]);
    };

    let mut errors = Vec::new();
    for field in ["timestamp", "trace_id", "level", "event"] {
        if !obj.contains_key(field) {
            errors.push(error(field, "required field missing".to_string()));
        }
    }

    let enums: [(&str, &[&str]); 4] = [
        ("level", &["trace", "debug", "info", "warn", "error"]),
        ("outcome", &["pass", "fail", "error"]),
        ("representation", &["buffer", "array"]),
        ("direction", &["encrypt", "decrypt"]),
    ];
    for (field, allowed) in enums {
        if let Some(v) = obj.get(field).and_then(|v| v.as_str())
            && !allowed.contains(&v)
        {
            errors.push(error(field, format!("invalid {field}: '{v}'")));
        }
    }

    // Trace ids follow <run_id>::<backend>::<seq>.
    if let Some(trace_id) = obj.get("trace_id").and_then(|v| v.as_str())
        && trace_id.split("::").count() != 3
    {
        errors.push(error(
            "trace_id",
            format!("trace_id should follow <run_id>::<backend>::<seq> format, got: '{trace_id}'"),
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value::<LogEntry>(value)
        .map_err(|e| vec![error("<deserialization>", format!("failed to deserialize: {e}"))])
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    format_utc(duration.as_secs(), duration.subsec_millis())
}

/// RFC 3339 UTC timestamp with millisecond precision for `secs` past the epoch.
fn format_utc(secs: u64, millis: u32) -> String {
    let (year, month, day) = civil_from_days(secs / 86_400);
    let rem = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{millis:03}Z",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60,
    )
}

/// Proleptic Gregorian date for a day count since 1970-01-01.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    // Shift the epoch to 0000-03-01 so leap days fall at the end of each year.
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = era * 400 + yoe + u64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_serializes_required_fields() {
        let entry = LogEntry::new("run-1::soft::001", LogLevel::Info, "run_start");
        let json = entry.to_jsonl().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["timestamp"].is_string());
        assert_eq!(parsed["trace_id"], "run-1::soft::001");
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["event"], "run_start");
        // Optional fields should be absent
        assert!(parsed.get("backend").is_none());
        assert!(parsed.get("vector_index").is_none());
        assert!(parsed.get("representation").is_none());
    }

    #[test]
    fn log_entry_with_vector_context() {
        let entry = LogEntry::new("run-1::soft::002", LogLevel::Error, "vector_mismatch")
            .with_backend("soft")
            .with_transformation("AES/CTR/NoPadding")
            .with_vector(3, "nist-f5-1")
            .with_leg(Representation::Array, Direction::Decrypt)
            .with_outcome(Outcome::Fail)
            .with_details(serde_json::json!({"expected": "00"}));

        let parsed: serde_json::Value = serde_json::from_str(&entry.to_jsonl().unwrap()).unwrap();
        assert_eq!(parsed["backend"], "soft");
        assert_eq!(parsed["transformation"], "AES/CTR/NoPadding");
        assert_eq!(parsed["vector_index"], 3);
        assert_eq!(parsed["vector_label"], "nist-f5-1");
        assert_eq!(parsed["representation"], "array");
        assert_eq!(parsed["direction"], "decrypt");
        assert_eq!(parsed["outcome"], "fail");
        assert!(parsed["details"].is_object());
    }

    #[test]
    fn utc_formatting_is_exact() {
        assert_eq!(format_utc(0, 0), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_utc(1_700_000_000, 0), "2023-11-14T22:13:20.000Z");
        // Leap day and the day after.
        assert_eq!(format_utc(951_782_400, 7), "2000-02-29T00:00:00.007Z");
        assert_eq!(format_utc(951_868_800, 0), "2000-03-01T00:00:00.000Z");
        assert_eq!(format_utc(1_735_689_599, 999), "2024-12-31T23:59:59.999Z");
    }

    #[test]
    fn validate_valid_line() {
        let entry = LogEntry::new("run-1::soft::001", LogLevel::Info, "run_start");
        let result = validate_log_line(&entry.to_jsonl().unwrap(), 1);
        assert!(result.is_ok(), "Valid line should pass: {result:?}");
    }

    #[test]
    fn validate_missing_required_field() {
        let json = r#"{"timestamp":"2026-01-01T00:00:00Z","level":"info","event":"test"}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert!(
            errors.iter().any(|e| e.field == "trace_id"),
            "Should report missing trace_id"
        );
    }

    #[test]
    fn validate_invalid_enums() {
        let json = r#"{"timestamp":"t","trace_id":"a::b::c","level":"critical","event":"x","representation":"stream"}"#;
        let errors = validate_log_line(json, 7).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "level"));
        assert!(errors.iter().any(|e| e.field == "representation"));
        assert!(errors.iter().all(|e| e.line_number == 7));
    }

    #[test]
    fn validate_bad_trace_id_format() {
        let json = r#"{"timestamp":"t","trace_id":"no-separators","level":"info","event":"x"}"#;
        let errors = validate_log_line(json, 1).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "trace_id"));
    }

    #[test]
    fn emitter_generates_sequential_trace_ids() {
        let mut emitter = LogEmitter::to_buffer("run-9", "soft");
        let first = emitter.emit(LogLevel::Info, "a").unwrap();
        emitter.set_backend("rustcrypto");
        let second = emitter.emit(LogLevel::Info, "b").unwrap();
        assert_eq!(first.trace_id, "run-9::soft::001");
        assert_eq!(second.trace_id, "run-9::rustcrypto::002");

        let lines = emitter.buffered_lines().unwrap();
        assert_eq!(lines.len(), 2);
        for (i, line) in lines.iter().enumerate() {
            assert!(validate_log_line(line, i + 1).is_ok());
        }
    }

    #[test]
    fn emit_entry_fills_missing_trace_id_and_backend() {
        let mut emitter = LogEmitter::to_buffer("run-2", "soft");
        emitter
            .emit_entry(LogEntry::new("", LogLevel::Debug, "leg_pass"))
            .unwrap();
        let lines = emitter.buffered_lines().unwrap();
        let parsed = validate_log_line(lines[0], 1).unwrap();
        assert_eq!(parsed.trace_id, "run-2::soft::001");
        assert_eq!(parsed.backend.as_deref(), Some("soft"));
    }
}
