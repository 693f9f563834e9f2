//! Outcome collection and summaries.

use serde::{Deserialize, Serialize};

/// Result of running one vector through every leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorOutcome {
    /// Transformation name.
    pub transformation: String,
    /// Zero-based vector index within the transformation's fixture.
    pub index: usize,
    /// Vector label.
    pub label: String,
    /// Whether all legs and cross-checks passed.
    pub passed: bool,
    /// Diagnostic if the vector failed.
    pub detail: Option<String>,
}

/// Per-transformation pass/fail counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationSummary {
    pub transformation: String,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// Aggregate verification summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// Total vectors run.
    pub total: usize,
    /// Vectors passed.
    pub passed: usize,
    /// Vectors failed.
    pub failed: usize,
    /// Counts per transformation, in first-seen order.
    pub transformations: Vec<TransformationSummary>,
    /// Individual outcomes.
    pub outcomes: Vec<VectorOutcome>,
}

impl VerificationSummary {
    /// Build a summary from a list of outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<VectorOutcome>) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed).count();
        let failed = total - passed;

        let mut transformations: Vec<TransformationSummary> = Vec::new();
        for outcome in &outcomes {
            let pos = match transformations
                .iter()
                .position(|t| t.transformation == outcome.transformation)
            {
                Some(pos) => pos,
                None => {
                    transformations.push(TransformationSummary {
                        transformation: outcome.transformation.clone(),
                        total: 0,
                        passed: 0,
                        failed: 0,
                    });
                    transformations.len() - 1
                }
            };
            let entry = &mut transformations[pos];
            entry.total += 1;
            if outcome.passed {
                entry.passed += 1;
            } else {
                entry.failed += 1;
            }
        }

        Self {
            total,
            passed,
            failed,
            transformations,
            outcomes,
        }
    }

    /// Returns true if all vectors passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Outcomes that failed.
    pub fn failures(&self) -> impl Iterator<Item = &VectorOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(transformation: &str, index: usize, passed: bool) -> VectorOutcome {
        VectorOutcome {
            transformation: transformation.to_string(),
            index,
            label: format!("v{index}"),
            passed,
            detail: (!passed).then(|| "mismatch".to_string()),
        }
    }

    #[test]
    fn counts_per_transformation() {
        let summary = VerificationSummary::from_outcomes(vec![
            outcome("AES/CTR/NoPadding", 0, true),
            outcome("AES/CTR/NoPadding", 1, false),
            outcome("AES/CBC/NoPadding", 0, true),
        ]);
        assert_eq!((summary.total, summary.passed, summary.failed), (3, 2, 1));
        assert!(!summary.all_passed());
        assert_eq!(summary.transformations.len(), 2);
        assert_eq!(summary.transformations[0].transformation, "AES/CTR/NoPadding");
        assert_eq!(summary.transformations[0].failed, 1);
        assert_eq!(summary.transformations[1].passed, 1);
        assert_eq!(summary.failures().count(), 1);
    }

    #[test]
    fn empty_summary_passes() {
        let summary = VerificationSummary::from_outcomes(Vec::new());
        assert!(summary.all_passed());
        assert!(summary.transformations.is_empty());
    }
}
