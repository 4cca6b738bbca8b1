use crate::model::chunk::Language;
use crate::model::violation::{Category, Severity, Violation};
use crate::scoring::Grade;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-claim view: key fields plus the structural and semantic findings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimAudit {
    pub chunk_index: usize,
    pub claim_index: usize,
    pub original_claim: String, // truncated to 100 chars
    pub verdict: String,
    pub confidence: f64,
    pub violations: Vec<Violation>,
    pub score: f64, // informational; run-level scoring is authoritative
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub input_label: String,
    pub run_id: String,
    pub input_fingerprint: String,
    pub transcript_language: Language,
    pub total_chunks: usize,
    pub total_claims: usize,
    pub claim_audits: Vec<ClaimAudit>,
    /// Consistency and extraction findings, in check order.
    pub run_violations: Vec<Violation>,
    pub category_scores: BTreeMap<Category, f64>,
    pub overall_score: f64,
    pub grade: Grade,
}

impl RunReport {
    /// Every finding: per-claim audits in traversal order, then run-level families.
    pub fn all_violations(&self) -> Vec<&Violation> {
        self.claim_audits
            .iter()
            .flat_map(|a| a.violations.iter())
            .chain(self.run_violations.iter())
            .collect()
    }

    pub fn owned_violations(&self) -> Vec<Violation> {
        self.all_violations().into_iter().cloned().collect()
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.all_violations()
            .iter()
            .filter(|v| v.severity == severity)
            .count()
    }

    pub fn has_critical(&self) -> bool {
        self.count_severity(Severity::CRITICAL) > 0
    }

    pub fn fixable_count(&self) -> usize {
        self.all_violations()
            .iter()
            .filter(|v| v.auto_fixable)
            .count()
    }

    /// Ready for release: no CRITICAL finding and overall score of at least 85.
    pub fn production_ready(&self) -> bool {
        !self.has_critical() && self.overall_score >= 85.0
    }
}
