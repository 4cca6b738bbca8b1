use crate::checks::CheckContext;
use crate::model::{check_ids, Chunk, Claim, Severity, Verdict, Violation};
use crate::text::patterns::{FUTURE_PATTERNS, METAPHOR_MARKERS, SPEAKER_PATTERNS};
use crate::text::{has_digit, has_named_entity, similarity, truncate_chars};
use once_cell::sync::Lazy;
use regex::Regex;

static SPEAKER: Lazy<Vec<Regex>> = Lazy::new(|| compile(SPEAKER_PATTERNS));
static FUTURE: Lazy<Vec<Regex>> = Lazy::new(|| compile(FUTURE_PATTERNS));

const ATOMIZATION_WINDOW: usize = 60;
const ATOMIZATION_THRESHOLD: f64 = 0.6;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "skipping invalid pattern");
                None
            }
        })
        .collect()
}

/// E1-E5: claims the extraction stage should not have produced.
pub fn check_run(chunks: &[Chunk], _ctx: &CheckContext<'_>) -> Vec<Violation> {
    let mut out = Vec::new();
    for (chi, chunk) in chunks.iter().enumerate() {
        for (ci, claim) in chunk.claims.iter().enumerate() {
            out.extend(check_claim(claim, chi, ci));
        }
        if let Some(v) = atomization(&chunk.claims, chi) {
            out.push(v);
        }
    }
    out
}

fn check_claim(claim: &Claim, chunk_index: usize, claim_index: usize) -> Vec<Violation> {
    let mut out = Vec::new();
    let at = |id: &str, sev: Severity, msg: String| {
        Violation::at(id, sev, chunk_index, claim_index, msg)
    };
    let original = claim.text();
    let lower = original.to_lowercase();
    let shown = truncate_chars(&lower, 80);

    // E1
    if SPEAKER.iter().any(|re| re.is_match(&lower)) {
        out.push(
            at(
                check_ids::E1_SPEAKER_ACTION_LEAK,
                Severity::WARNING,
                format!("Speaker action/emotion leaked through filter: \"{}\"", shown),
            )
            .fixable("Add to extraction SKIP list: speaker actions, emotions, personal anecdotes"),
        );
    }

    // E2: informational only, literal use of a marker is indistinguishable
    if let Some(marker) = METAPHOR_MARKERS.iter().find(|m| lower.contains(*m)) {
        if !has_digit(&lower) && !has_named_entity(original) {
            out.push(
                at(
                    check_ids::E2_METAPHOR_LEAK,
                    Severity::INFO,
                    format!(
                        "Metaphor \"{}\" is the core of this claim, no factual kernel found. \
                         Review manually: may be valid if used literally in context.",
                        marker
                    ),
                )
                .fix(
                    "Extract the underlying factual claim, not the metaphorical framing. \
                     If literal usage is intended, this flag can be ignored.",
                ),
            );
        }
    }

    // E4
    if !has_named_entity(original) {
        out.push(
            at(
                check_ids::E4_UNCHECKABLE_CLAIM,
                Severity::WARNING,
                format!(
                    "No named entity, number, or date found: claim may be uncheckable: \"{}\"",
                    shown
                ),
            )
            .fix("Apply checkability pre-filter: require NE+1, Number+1, Date+1 minimum"),
        );
    }

    // E5
    if FUTURE.iter().any(|re| re.is_match(&lower)) {
        let verdict = claim.verification.verdict();
        let non_committal = Verdict::parse(verdict).is_some_and(|v| v.is_non_committal());
        if !non_committal {
            out.push(
                at(
                    check_ids::E5_FUTURE_TENSE_LEAK,
                    Severity::INFO,
                    format!(
                        "Future-tense claim assigned definitive verdict \"{}\": \"{}\"",
                        verdict, shown
                    ),
                )
                .fix("Future claims should be SKIP or tagged as prediction"),
            );
        }
    }

    out
}

/// E3: one rhetorical list split into several near-identical claims.
/// At most one finding per chunk, on the first claim with two similar siblings.
fn atomization(claims: &[Claim], chunk_index: usize) -> Option<Violation> {
    if claims.len() < 3 {
        return None;
    }
    let texts: Vec<&str> = claims
        .iter()
        .map(|c| truncate_chars(c.text(), ATOMIZATION_WINDOW))
        .collect();
    texts.iter().enumerate().find_map(|(i, a)| {
        let similar = texts
            .iter()
            .enumerate()
            .filter(|&(j, b)| i != j && similarity(a, b) > ATOMIZATION_THRESHOLD)
            .count();
        (similar >= 2).then(|| {
            Violation::at(
                check_ids::E3_ATOMIZATION,
                Severity::WARNING,
                chunk_index,
                i,
                format!(
                    "Rhetorical list atomized into {} similar claims in chunk {}",
                    similar + 1,
                    chunk_index
                ),
            )
            .fix("Extract one unified claim from rhetorical lists, not one per item")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Language;
    use crate::sources::SourceRegistry;
    use serde_json::json;

    fn run(v: serde_json::Value) -> Vec<Violation> {
        let reg = SourceRegistry::defaults();
        let ctx = CheckContext::new(&reg, Language::De);
        let chunks: Vec<Chunk> = serde_json::from_value(v).unwrap();
        check_run(&chunks, &ctx)
    }

    fn one(text: &str, verdict: &str) -> Vec<Violation> {
        run(json!([{"claims": [
            {"originalClaim": text, "verification": {"verdict": verdict}}
        ]}]))
    }

    fn ids(v: &[Violation]) -> Vec<&str> {
        v.iter().map(|x| x.check_id.as_str()).collect()
    }

    #[test]
    fn all_patterns_compile() {
        assert_eq!(SPEAKER.len(), SPEAKER_PATTERNS.len());
        assert_eq!(FUTURE.len(), FUTURE_PATTERNS.len());
    }

    #[test]
    fn speaker_action_is_fixable_warning() {
        let v = one("Der Sprecher war geschockt über Wien.", "opinion");
        assert_eq!(ids(&v), vec!["E1_speaker_action_leak"]);
        assert!(v[0].auto_fixable);
        assert!(v[0].message.contains("der sprecher war geschockt"));
    }

    #[test]
    fn metaphor_without_kernel_is_info_and_uncheckable() {
        let v = one("das land ist im rollatormodus", "opinion");
        assert_eq!(ids(&v), vec!["E2_metaphor_leak", "E4_uncheckable_claim"]);
        assert_eq!(v[0].severity, Severity::INFO);
    }

    #[test]
    fn metaphor_with_number_is_accepted() {
        let v = one("das land fährt seit 3 jahren im schneckentempo", "true");
        assert!(v.is_empty());
    }

    #[test]
    fn future_claim_with_definitive_verdict() {
        let v = one("Die Regierung will 2025 die Steuern senken.", "true");
        assert_eq!(ids(&v), vec!["E5_future_tense_leak"]);
        assert!(one("Die Regierung will 2025 die Steuern senken.", "opinion").is_empty());
    }

    #[test]
    fn atomized_list_flags_once_per_chunk() {
        let v = run(json!([{"claims": [
            {"originalClaim": "Österreich ist Weltmeister im Skifahren", "verification": {"verdict": "opinion"}},
            {"originalClaim": "Österreich ist Weltmeister im Wandern", "verification": {"verdict": "opinion"}},
            {"originalClaim": "Österreich ist Weltmeister im Schwimmen", "verification": {"verdict": "opinion"}}
        ]}]));
        let e3: Vec<&Violation> = v.iter().filter(|x| x.check_id == "E3_atomization").collect();
        assert_eq!(e3.len(), 1);
        assert_eq!(e3[0].claim_index, 0);
        assert!(e3[0].message.contains("into 3 similar claims in chunk 0"));
    }

    #[test]
    fn two_claims_never_atomize() {
        let v = run(json!([{"claims": [
            {"originalClaim": "Österreich ist Weltmeister im Skifahren"},
            {"originalClaim": "Österreich ist Weltmeister im Wandern"}
        ]}]));
        assert!(!ids(&v).contains(&"E3_atomization"));
    }
}
