use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Blocking weight of a finding.
///
/// Ordering is by `weight()`, never by declaration order.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    CRITICAL,
    WARNING,
    INFO,
}

impl Severity {
    pub fn weight(self) -> u8 {
        match self {
            Severity::CRITICAL => 3,
            Severity::WARNING => 2,
            Severity::INFO => 1,
        }
    }

    /// Base score deduction for one systemic issue of this severity.
    pub fn base_penalty(self) -> f64 {
        match self {
            Severity::CRITICAL => 15.0,
            Severity::WARNING => 5.0,
            Severity::INFO => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::CRITICAL => "CRITICAL",
            Severity::WARNING => "WARNING",
            Severity::INFO => "INFO",
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight().cmp(&other.weight())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structural,
    Semantic,
    Consistency,
    Extraction,
    Other,
}

impl Category {
    pub const WEIGHTED: [(Category, f64); 4] = [
        (Category::Structural, 0.20),
        (Category::Semantic, 0.25),
        (Category::Consistency, 0.30),
        (Category::Extraction, 0.25),
    ];

    /// Category from the leading letter of a check id; unknown letters land in `Other`.
    pub fn from_check_id(check_id: &str) -> Self {
        match check_id.chars().next() {
            Some('S') => Category::Structural,
            Some('M') => Category::Semantic,
            Some('C') => Category::Consistency,
            Some('E') => Category::Extraction,
            _ => Category::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Structural => "structural",
            Category::Semantic => "semantic",
            Category::Consistency => "consistency",
            Category::Extraction => "extraction",
            Category::Other => "other",
        }
    }
}

/// Sentinel index for findings that belong to the run, not one claim.
pub const RUN_LEVEL: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Violation {
    pub check_id: String,
    pub severity: Severity,
    pub chunk_index: i64,
    pub claim_index: i64,
    pub message: String,
    pub auto_fixable: bool,
    pub fix_description: String,
}

impl Violation {
    pub fn at(
        check_id: &str,
        severity: Severity,
        chunk_index: usize,
        claim_index: usize,
        message: String,
    ) -> Self {
        Self {
            check_id: check_id.to_string(),
            severity,
            chunk_index: chunk_index as i64,
            claim_index: claim_index as i64,
            message,
            auto_fixable: false,
            fix_description: String::new(),
        }
    }

    pub fn run_level(check_id: &str, severity: Severity, message: String) -> Self {
        Self {
            check_id: check_id.to_string(),
            severity,
            chunk_index: RUN_LEVEL,
            claim_index: RUN_LEVEL,
            message,
            auto_fixable: false,
            fix_description: String::new(),
        }
    }

    pub fn fixable(mut self, fix_description: impl Into<String>) -> Self {
        self.auto_fixable = true;
        self.fix_description = fix_description.into();
        self
    }

    pub fn fix(mut self, fix_description: impl Into<String>) -> Self {
        self.fix_description = fix_description.into();
        self
    }

    pub fn category(&self) -> Category {
        Category::from_check_id(&self.check_id)
    }

    pub fn is_run_level(&self) -> bool {
        self.chunk_index == RUN_LEVEL && self.claim_index == RUN_LEVEL
    }
}

/// Stable check identifiers. The leading letter encodes the category.
pub mod check_ids {
    pub const S1_EXPLANATION_PRESENT: &str = "S1_explanation_present";
    pub const S2_SOURCES_TYPED: &str = "S2_sources_typed";
    pub const S3_CONFIDENCE_RANGE: &str = "S3_confidence_range";
    pub const S3_CONFIDENCE_FALLBACK: &str = "S3_confidence_fallback";
    pub const S4_CLEANED_CLAIM_PRESENT: &str = "S4_cleaned_claim_present";
    pub const S5_VERDICT_VALID: &str = "S5_verdict_valid";
    pub const S6_SOURCE_API_LEAK: &str = "S6_source_api_leak";
    pub const S6_SOURCE_MONOCULTURE: &str = "S6_source_monoculture";

    pub const M1_BANNED_SOURCE: &str = "M1_youtube_as_evidence";
    pub const M2_ASR_NAME_MISMATCH: &str = "M2_asr_name_mismatch";
    pub const M3_EXPLANATION_LANGUAGE: &str = "M3_explanation_language";
    pub const M4_IRRELEVANT_SEARCH: &str = "M4_irrelevant_search";
    pub const M5_CIRCULAR_REFERENCE: &str = "M5_circular_reference";

    pub const C1_DUPLICATE_CLAIMS: &str = "C1_duplicate_claims";
    pub const C2_CONTRADICTORY_VERDICTS: &str = "C2_contradictory_verdicts";
    pub const C3_CONFIDENCE_COHERENCE: &str = "C3_confidence_coherence";
    pub const C4_SOURCE_VERDICT_ALIGNMENT: &str = "C4_source_verdict_alignment";
    pub const C5_EXPLANATION_VERDICT_ALIGNMENT: &str = "C5_explanation_verdict_alignment";

    pub const E1_SPEAKER_ACTION_LEAK: &str = "E1_speaker_action_leak";
    pub const E2_METAPHOR_LEAK: &str = "E2_metaphor_leak";
    pub const E3_ATOMIZATION: &str = "E3_atomization";
    pub const E4_UNCHECKABLE_CLAIM: &str = "E4_uncheckable_claim";
    pub const E5_FUTURE_TENSE_LEAK: &str = "E5_future_tense_leak";
}
