//! Report generation for validation results.

use serde::{Deserialize, Serialize};

use crate::verify::VerificationSummary;

/// A validation report for one backend run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Report title.
    pub title: String,
    /// Backend identifier the run resolved.
    pub backend: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// SHA-256 over the fixture strings that were validated.
    pub corpus_sha256: String,
    /// Verification summary.
    pub summary: VerificationSummary,
}

impl ValidationReport {
    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Backend: {}\n", self.backend));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Corpus SHA-256: `{}`\n", self.corpus_sha256));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Transformation | Total | Passed | Failed |\n");
        out.push_str("|----------------|-------|--------|--------|\n");
        for t in &self.summary.transformations {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                t.transformation, t.total, t.passed, t.failed
            ));
        }

        out.push_str("\n| Transformation | # | Vector | Status |\n");
        out.push_str("|----------------|---|--------|--------|\n");
        for o in &self.summary.outcomes {
            let status = if o.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                o.transformation, o.index, o.label, status
            ));
        }

        let failures: Vec<_> = self.summary.failures().collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for o in failures {
                out.push_str(&format!(
                    "\n### {} #{} ({})\n\n```\n{}\n```\n",
                    o.transformation,
                    o.index,
                    o.label,
                    o.detail.as_deref().unwrap_or("").trim_end()
                ));
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VectorOutcome;

    fn report(outcomes: Vec<VectorOutcome>) -> ValidationReport {
        ValidationReport {
            title: "cipherkat validation".to_string(),
            backend: "soft".to_string(),
            timestamp: "2026-10-16T00:00:00.000Z".to_string(),
            corpus_sha256: "ab".repeat(32),
            summary: VerificationSummary::from_outcomes(outcomes),
        }
    }

    #[test]
    fn markdown_lists_transformations_and_failures() {
        let md = report(vec![
            VectorOutcome {
                transformation: "AES/CBC/NoPadding".to_string(),
                index: 0,
                label: "ok".to_string(),
                passed: true,
                detail: None,
            },
            VectorOutcome {
                transformation: "AES/CBC/NoPadding".to_string(),
                index: 1,
                label: "broken".to_string(),
                passed: false,
                detail: Some("expected: 00\nactual:   01\n".to_string()),
            },
        ])
        .to_markdown();
        assert!(md.starts_with("# cipherkat validation\n"));
        assert!(md.contains("- Backend: soft\n"));
        assert!(md.contains("| AES/CBC/NoPadding | 2 | 1 | 1 |"));
        assert!(md.contains("| AES/CBC/NoPadding | 1 | broken | FAIL |"));
        assert!(md.contains("### AES/CBC/NoPadding #1 (broken)"));
    }

    #[test]
    fn json_round_trips_summary_counts() {
        let json = report(Vec::new()).to_json();
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["backend"], "soft");
        assert_eq!(value["summary"]["total"], 0);
        assert_eq!(value["corpus_sha256"].as_str().map(str::len), Some(64));
    }
}
