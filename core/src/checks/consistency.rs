use crate::checks::CheckContext;
use crate::model::{check_ids, Chunk, Claim, Severity, Verdict, Violation};
use crate::sources::Tier;
use crate::text::{similarity, truncate_chars, verdict_contradicts_explanation};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashMap};

static NUMBER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\d+(?:[.,]\d+)?").ok());

/// Prefix compared by the duplicate check.
const DUPLICATE_WINDOW: usize = 80;
/// Prefix used to group claims for verdict comparison.
const VERDICT_GROUP_WINDOW: usize = 60;
const SHORT_TEXT_CHARS: usize = 50;
const SHORT_TEXT_THRESHOLD: f64 = 0.95;
const LONG_TEXT_THRESHOLD: f64 = 0.85;

/// Numeric substrings, sorted, compared as plain strings ("5" != "5.0").
pub fn extract_numbers(text: &str) -> Vec<String> {
    let mut nums: Vec<String> = match NUMBER.as_ref() {
        Some(re) => re.find_iter(text).map(|m| m.as_str().to_string()).collect(),
        None => Vec::new(),
    };
    nums.sort();
    nums
}

/// Number-aware near-duplicate test used for flagging.
///
/// Under 50 characters the texts must be more than 0.95 similar and carry the
/// same numbers. From 50 characters on, more than 0.85 suffices unless both
/// carry numbers and those differ.
pub fn is_near_duplicate(text: &str, seen: &str) -> (bool, f64) {
    let sim = similarity(text, seen);
    let text_numbers = extract_numbers(text);
    let seen_numbers = extract_numbers(seen);
    let dup = if text.chars().count() < SHORT_TEXT_CHARS {
        sim > SHORT_TEXT_THRESHOLD && text_numbers == seen_numbers
    } else if !text_numbers.is_empty() && !seen_numbers.is_empty() && text_numbers != seen_numbers
    {
        false
    } else {
        sim > LONG_TEXT_THRESHOLD
    };
    (dup, sim)
}

/// C1-C5 over the flattened claim sequence, chunk-major.
pub fn check_run(chunks: &[Chunk], ctx: &CheckContext<'_>) -> Vec<Violation> {
    let claims: Vec<(usize, usize, &Claim)> = chunks
        .iter()
        .enumerate()
        .flat_map(|(chi, chunk)| {
            chunk
                .claims
                .iter()
                .enumerate()
                .map(move |(ci, claim)| (chi, ci, claim))
        })
        .collect();

    let mut out = Vec::new();
    out.extend(duplicate_claims(&claims));
    out.extend(contradictory_verdicts(&claims));
    out.extend(confidence_coherence(&claims));
    out.extend(source_verdict_alignment(&claims, ctx));
    out.extend(explanation_verdict_alignment(&claims));
    tracing::debug!(count = out.len(), "consistency checks done");
    out
}

fn duplicate_claims(claims: &[(usize, usize, &Claim)]) -> Vec<Violation> {
    let mut out = Vec::new();
    // first occurrence wins
    let mut seen: Vec<(&str, usize)> = Vec::new();
    for &(chi, ci, claim) in claims {
        let text = truncate_chars(claim.text(), DUPLICATE_WINDOW);
        let hit = seen.iter().find_map(|&(seen_text, seen_chunk)| {
            let (dup, sim) = is_near_duplicate(text, seen_text);
            dup.then_some((seen_chunk, sim))
        });
        match hit {
            Some((seen_chunk, sim)) => out.push(
                Violation::at(
                    check_ids::C1_DUPLICATE_CLAIMS,
                    Severity::WARNING,
                    chi,
                    ci,
                    format!(
                        "Duplicate of claim in chunk {} (sim={:.2}): \"{}...\"",
                        seen_chunk,
                        sim,
                        truncate_chars(text, 60)
                    ),
                )
                .fixable("Merge into single claim with multiple timestamps"),
            ),
            None => {
                if !seen.iter().any(|(t, _)| *t == text) {
                    seen.push((text, chi));
                }
            }
        }
    }
    out
}

fn contradictory_verdicts(claims: &[(usize, usize, &Claim)]) -> Vec<Violation> {
    // groups kept in first-appearance order
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&str>)> = Vec::new();
    for &(_, _, claim) in claims {
        let key = truncate_chars(claim.text(), VERDICT_GROUP_WINDOW).to_lowercase();
        let verdict = claim.verification.verdict();
        match index.get(&key) {
            Some(&i) => groups[i].1.push(verdict),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![verdict]));
            }
        }
    }

    let mut out = Vec::new();
    for (text, verdicts) in groups {
        let distinct: BTreeSet<&str> = verdicts.iter().copied().collect();
        let compatible = distinct
            .iter()
            .all(|v| Verdict::parse(v).is_some_and(|x| x.is_non_committal()));
        if distinct.len() > 1 && !compatible {
            out.push(
                Violation::run_level(
                    check_ids::C2_CONTRADICTORY_VERDICTS,
                    Severity::CRITICAL,
                    format!(
                        "CONTRADICTORY: \"{}...\" got verdicts: [{}]",
                        text,
                        verdicts.join(", ")
                    ),
                )
                .fix("Deduplicate before verification, or flag as \"disputed\" when verdicts conflict"),
            );
        }
    }
    out
}

fn confidence_coherence(claims: &[(usize, usize, &Claim)]) -> Vec<Violation> {
    let mut out = Vec::new();
    for &(chi, ci, claim) in claims {
        let v = &claim.verification;
        let conf = v.confidence();
        let verdict = v.parsed_verdict();
        if verdict.is_some_and(|x| x.is_definitive()) && conf < 0.3 {
            out.push(
                Violation::at(
                    check_ids::C3_CONFIDENCE_COHERENCE,
                    Severity::WARNING,
                    chi,
                    ci,
                    format!(
                        "{} with confidence {}: verdict is definitive but confidence says uncertain",
                        v.verdict().to_uppercase(),
                        conf
                    ),
                )
                .fix("Recalibrate confidence formula: definitive verdicts with tier-1 sources should score 0.5+"),
            );
        }
        if verdict == Some(Verdict::Unverifiable) && conf > 0.5 {
            out.push(
                Violation::at(
                    check_ids::C3_CONFIDENCE_COHERENCE,
                    Severity::WARNING,
                    chi,
                    ci,
                    format!(
                        "UNVERIFIABLE with confidence {}: if you are this confident, assign a verdict",
                        conf
                    ),
                )
                .fix("High-confidence unverifiable suggests the judge is uncertain about category, not evidence"),
            );
        }
    }
    out
}

fn source_verdict_alignment(
    claims: &[(usize, usize, &Claim)],
    ctx: &CheckContext<'_>,
) -> Vec<Violation> {
    let mut out = Vec::new();
    for &(chi, ci, claim) in claims {
        let v = &claim.verification;
        if v.parsed_verdict() != Some(Verdict::Unverifiable) {
            continue;
        }
        let tier_1: Vec<&str> = v
            .sources()
            .iter()
            .map(|s| s.domain())
            .filter(|d| ctx.registry.classify(d) == Tier::Institutional)
            .collect();
        if !tier_1.is_empty() {
            out.push(
                Violation::at(
                    check_ids::C4_SOURCE_VERDICT_ALIGNMENT,
                    Severity::CRITICAL,
                    chi,
                    ci,
                    format!(
                        "Verdict is UNVERIFIABLE but Tier-1 sources are present: [{}]",
                        tier_1.iter().take(3).copied().collect::<Vec<_>>().join(", ")
                    ),
                )
                .fix("If authoritative sources found evidence, the claim IS verifiable. Re-judge."),
            );
        }
    }
    out
}

fn explanation_verdict_alignment(claims: &[(usize, usize, &Claim)]) -> Vec<Violation> {
    let mut out = Vec::new();
    for &(chi, ci, claim) in claims {
        let v = &claim.verification;
        if verdict_contradicts_explanation(v.explanation(), v.verdict()) {
            out.push(
                Violation::at(
                    check_ids::C5_EXPLANATION_VERDICT_ALIGNMENT,
                    Severity::CRITICAL,
                    chi,
                    ci,
                    format!("Explanation language contradicts verdict \"{}\"", v.verdict()),
                )
                .fix("Judge produced incoherent result: retry verification for this claim"),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;
    use crate::sources::SourceRegistry;
    use serde_json::json;

    fn chunks(v: serde_json::Value) -> Vec<Chunk> {
        serde_json::from_value(v).unwrap()
    }

    fn run(v: serde_json::Value) -> Vec<Violation> {
        let reg = SourceRegistry::defaults();
        let ctx = CheckContext::new(&reg, Language::De);
        check_run(&chunks(v), &ctx)
    }

    fn claim(text: &str, verdict: &str, conf: f64) -> serde_json::Value {
        json!({
            "originalClaim": text,
            "verification": {"verdict": verdict, "confidence": conf, "explanation": "Keine Angaben."}
        })
    }

    fn with_id<'a>(v: &'a [Violation], id: &str) -> Vec<&'a Violation> {
        v.iter().filter(|x| x.check_id == id).collect()
    }

    #[test]
    fn numbers_are_extracted_sorted() {
        assert_eq!(extract_numbers("50% und 5,5 und 12"), vec!["12", "5,5", "50"]);
    }

    #[test]
    fn short_claims_with_different_numbers_are_not_duplicates() {
        assert!(!is_near_duplicate("Inflation is 50%", "Inflation is 5%").0);
    }

    #[test]
    fn five_and_five_point_zero_are_not_duplicates() {
        assert!(!is_near_duplicate("Inflation is 5.0%", "Inflation is 5%").0);
    }

    #[test]
    fn identical_short_claims_are_duplicates() {
        assert!(is_near_duplicate("Inflation is 5%", "Inflation is 5%").0);
    }

    #[test]
    fn long_claims_use_lower_threshold_but_keep_number_guard() {
        let a = "Die Regierung hat im letzten Jahr die Steuern für Unternehmen gesenkt";
        let b = "Die Regierung hat im letzten Jahr die Steuern für Unternehmer gesenkt";
        assert!(is_near_duplicate(b, a).0);
        let c = "Die Regierung hat 2023 die Steuern für alle Unternehmen deutlich gesenkt";
        let d = "Die Regierung hat 2022 die Steuern für alle Unternehmen deutlich gesenkt";
        assert!(!is_near_duplicate(d, c).0);
    }

    #[test]
    fn duplicate_flags_later_occurrence_only() {
        let v = run(json!([
            {"claims": [claim("Die Inflation lag bei 5%.", "true", 0.8)]},
            {"claims": [claim("Die Inflation lag bei 5%.", "true", 0.8)]}
        ]));
        let dups = with_id(&v, "C1_duplicate_claims");
        assert_eq!(dups.len(), 1);
        assert_eq!((dups[0].chunk_index, dups[0].claim_index), (1, 0));
        assert!(dups[0].message.contains("chunk 0"));
        assert!(dups[0].auto_fixable);
    }

    #[test]
    fn contradictory_verdicts_are_run_level_critical() {
        let v = run(json!([
            {"claims": [claim("Die Inflation lag bei 5%.", "true", 0.8)]},
            {"claims": [claim("Die Inflation lag bei 5%.", "false", 0.8)]}
        ]));
        let c2 = with_id(&v, "C2_contradictory_verdicts");
        assert_eq!(c2.len(), 1);
        assert!(c2[0].is_run_level());
        assert!(c2[0].message.contains("[true, false]"));
    }

    #[test]
    fn opinion_and_unverifiable_are_compatible() {
        let v = run(json!([
            {"claims": [claim("Das ist eine Meinung zu Wien.", "opinion", 0.2)]},
            {"claims": [claim("Das ist eine Meinung zu Wien.", "unverifiable", 0.2)]}
        ]));
        assert!(with_id(&v, "C2_contradictory_verdicts").is_empty());
    }

    #[test]
    fn confidence_coherence_both_directions() {
        let v = run(json!([
            {"claims": [
                claim("Wien hat 2 Millionen Einwohner.", "true", 0.1),
                claim("Graz hat viele Parks.", "unverifiable", 0.9)
            ]}
        ]));
        let c3 = with_id(&v, "C3_confidence_coherence");
        assert_eq!(c3.len(), 2);
        assert!(c3[0].message.starts_with("TRUE with confidence 0.1"));
        assert!(c3[1].message.starts_with("UNVERIFIABLE"));
    }

    #[test]
    fn unverifiable_with_tier_one_source_is_critical() {
        let v = run(json!([
            {"claims": [{
                "originalClaim": "Das BIP wuchs um 2%.",
                "verification": {"verdict": "unverifiable", "confidence": 0.4,
                                 "explanation": "Unklar.", "sources": ["statistik.at", "orf.at"]}
            }]}
        ]));
        let c4 = with_id(&v, "C4_source_verdict_alignment");
        assert_eq!(c4.len(), 1);
        assert!(c4[0].message.contains("statistik.at"));
        assert!(!c4[0].message.contains("orf.at"));
    }

    #[test]
    fn contradicting_explanation_is_critical() {
        let v = run(json!([
            {"claims": [{
                "originalClaim": "Die Arbeitslosigkeit sank 2023.",
                "verification": {"verdict": "true", "confidence": 0.9,
                                 "explanation": "Die Behauptung ist falsch."}
            }]}
        ]));
        assert_eq!(with_id(&v, "C5_explanation_verdict_alignment").len(), 1);
    }
}
