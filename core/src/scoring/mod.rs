//! Aggregates findings into per-category scores, an overall score and a grade.
//!
//! A check id that fires many times is one systemic defect: each check id is
//! penalized once, scaled softly by how many claims it touched.

use crate::model::{Category, Severity, Violation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const FIX_DISCOUNT: f64 = 0.5;
const MAX_PREVALENCE: f64 = 2.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    pub category_scores: BTreeMap<Category, f64>,
    pub overall: f64,
    pub grade: Grade,
}

impl Scores {
    fn empty() -> Self {
        Self {
            category_scores: BTreeMap::new(),
            overall: 0.0,
            grade: Grade::F,
        }
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Penalty contributed by one check-id group.
fn group_penalty(group: &[&Violation], total_claims: usize) -> f64 {
    let severity = group
        .iter()
        .map(|v| v.severity)
        .max()
        .unwrap_or(Severity::INFO);
    let prevalence = (1.0 + group.len() as f64 / total_claims as f64).min(MAX_PREVALENCE);
    let discount = if group.iter().all(|v| v.auto_fixable) {
        FIX_DISCOUNT
    } else {
        1.0
    };
    severity.base_penalty() * prevalence * discount
}

pub fn score(total_claims: usize, violations: &[Violation]) -> Scores {
    if total_claims == 0 {
        return Scores::empty();
    }

    let mut by_check: BTreeMap<&str, Vec<&Violation>> = BTreeMap::new();
    for v in violations {
        by_check.entry(v.check_id.as_str()).or_default().push(v);
    }

    let mut penalties: BTreeMap<Category, f64> = BTreeMap::new();
    for (check_id, group) in &by_check {
        *penalties
            .entry(Category::from_check_id(check_id))
            .or_default() += group_penalty(group, total_claims);
    }

    let mut category_scores = BTreeMap::new();
    for (cat, _) in Category::WEIGHTED {
        let penalty = penalties.get(&cat).copied().unwrap_or(0.0);
        category_scores.insert(cat, round1((100.0 - penalty).max(0.0)));
    }
    if let Some(penalty) = penalties.get(&Category::Other) {
        category_scores.insert(Category::Other, round1((100.0 - penalty).max(0.0)));
    }

    let weighted: f64 = Category::WEIGHTED
        .iter()
        .map(|(cat, w)| category_scores.get(cat).copied().unwrap_or(100.0) * w)
        .sum();
    let overall = round1(weighted.clamp(0.0, 100.0));

    Scores {
        category_scores,
        overall,
        grade: Grade::from_score(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(id: &str, sev: Severity) -> Violation {
        Violation::at(id, sev, 0, 0, String::new())
    }

    #[test]
    fn zero_claims_is_zero_and_f() {
        let s = score(0, &[v("S1_explanation_present", Severity::CRITICAL)]);
        assert!(s.category_scores.is_empty());
        assert_eq!(s.overall, 0.0);
        assert_eq!(s.grade, Grade::F);
    }

    #[test]
    fn clean_run_scores_full_marks() {
        let s = score(5, &[]);
        assert_eq!(s.overall, 100.0);
        assert_eq!(s.grade, Grade::A);
        assert_eq!(s.category_scores.len(), 4);
        assert!(!s.category_scores.contains_key(&Category::Other));
    }

    #[test]
    fn systemic_issue_counts_once_with_capped_prevalence() {
        let many: Vec<Violation> = (0..44)
            .map(|_| v("M3_explanation_language", Severity::WARNING))
            .collect();
        let s = score(10, &many);
        // 5 * min(2, 1 + 44/10)
        assert_eq!(s.category_scores[&Category::Semantic], 90.0);
        assert_eq!(s.overall, 97.5);
    }

    #[test]
    fn fixable_groups_are_discounted() {
        let fixable = v("M1_youtube_as_evidence", Severity::CRITICAL).fixable("remove");
        let s = score(2, &[fixable]);
        // 15 * 1.5 * 0.5
        assert_eq!(s.category_scores[&Category::Semantic], 88.8);
    }

    #[test]
    fn mixed_fixability_gets_no_discount_and_max_severity() {
        let group = vec![
            v("C3_confidence_coherence", Severity::WARNING).fixable("x"),
            v("C3_confidence_coherence", Severity::CRITICAL),
        ];
        let s = score(4, &group);
        // 15 * 1.5
        assert_eq!(s.category_scores[&Category::Consistency], 77.5);
    }

    #[test]
    fn unmapped_prefix_lands_in_other_with_no_weight() {
        let s = score(1, &[v("X9_custom", Severity::CRITICAL)]);
        assert_eq!(s.category_scores[&Category::Other], 70.0);
        assert_eq!(s.overall, 100.0);
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(89.9), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.9), Grade::F);
    }

    proptest! {
        #[test]
        fn adding_a_violation_never_raises_the_score(
            claims in 1usize..50,
            picks in proptest::collection::vec((0usize..6, 0usize..3), 0..20),
            extra in (0usize..6, 0usize..3),
        ) {
            const IDS: [&str; 6] = [
                "S1_explanation_present", "M2_asr_name_mismatch", "C1_duplicate_claims",
                "C4_source_verdict_alignment", "E4_uncheckable_claim", "E2_metaphor_leak",
            ];
            const SEV: [Severity; 3] = [Severity::CRITICAL, Severity::WARNING, Severity::INFO];
            let mut vs: Vec<Violation> = picks.iter().map(|&(i, s)| v(IDS[i], SEV[s])).collect();
            let before = score(claims, &vs).overall;
            vs.push(v(IDS[extra.0], SEV[extra.1]));
            let after = score(claims, &vs).overall;
            prop_assert!(after <= before);
            prop_assert!((0.0..=100.0).contains(&after));
        }
    }
}
