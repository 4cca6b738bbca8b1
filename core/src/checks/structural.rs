use crate::checks::CheckContext;
use crate::model::{check_ids, Claim, Severity, Verdict, Violation};
use crate::sources::normalize_domain;
use crate::text::patterns::{API_ENDPOINT_DOMAINS, FALLBACK_CONFIDENCES};
use std::collections::BTreeSet;

/// S1-S6: structural integrity of one claim record.
pub fn check_claim(
    claim: &Claim,
    chunk_index: usize,
    claim_index: usize,
    _ctx: &CheckContext<'_>,
) -> Vec<Violation> {
    let mut out = Vec::new();
    let at = |id: &str, sev: Severity, msg: String| {
        Violation::at(id, sev, chunk_index, claim_index, msg)
    };
    let v = &claim.verification;

    // S1
    let exp_len = v.explanation().chars().count();
    if exp_len < 10 {
        out.push(
            at(
                check_ids::S1_EXPLANATION_PRESENT,
                Severity::CRITICAL,
                format!("Explanation missing or too short ({} chars)", exp_len),
            )
            .fix("Verification pipeline must produce explanation for every claim"),
        );
    }

    // S2
    let sources = v.sources();
    let raw = sources.iter().filter(|s| s.is_raw()).count();
    if raw > 0 {
        let msg = if raw == sources.len() {
            format!(
                "Sources are bare strings, not structured objects. Found {} string sources.",
                raw
            )
        } else {
            format!(
                "Sources mix bare strings and structured objects ({} of {} are strings).",
                raw,
                sources.len()
            )
        };
        out.push(
            at(check_ids::S2_SOURCES_TYPED, Severity::WARNING, msg)
                .fixable("Convert source strings to {domain, tier} objects"),
        );
    }

    // S3
    let conf = v.confidence();
    if !(0.0..=1.0).contains(&conf) {
        out.push(
            at(
                check_ids::S3_CONFIDENCE_RANGE,
                Severity::CRITICAL,
                format!("Confidence {} outside valid range [0,1]", conf),
            )
            .fix("Clamp or recompute confidence in the verification stage"),
        );
    }
    if FALLBACK_CONFIDENCES.contains(&conf) {
        out.push(
            at(
                check_ids::S3_CONFIDENCE_FALLBACK,
                Severity::WARNING,
                format!(
                    "Confidence is exactly {}: known hard-coded fallback, not calculated",
                    conf
                ),
            )
            .fix("Apply deterministic confidence formula"),
        );
    }

    // S4
    if !claim.text().is_empty() && claim.cleaned().is_empty() {
        out.push(
            at(
                check_ids::S4_CLEANED_CLAIM_PRESENT,
                Severity::WARNING,
                "cleanedClaim is empty: no ASR/grammar correction applied".to_string(),
            )
            .fix("Extraction stage must populate cleanedClaim"),
        );
    }

    // S5
    if v.parsed_verdict().is_none() {
        let allowed: Vec<&str> = Verdict::ALL.iter().map(|x| x.as_str()).collect();
        out.push(
            at(
                check_ids::S5_VERDICT_VALID,
                Severity::CRITICAL,
                format!(
                    "Invalid verdict: \"{}\". Must be one of: {}",
                    v.verdict_display(),
                    allowed.join(", ")
                ),
            )
            .fix("Verification stage must emit one of the enumerated verdicts"),
        );
    }

    // S6
    if !sources.is_empty() {
        let domains: BTreeSet<String> =
            sources.iter().map(|s| normalize_domain(s.domain())).collect();
        let all_api = domains
            .iter()
            .all(|d| API_ENDPOINT_DOMAINS.contains(&d.as_str()));
        if all_api {
            out.push(
                at(
                    check_ids::S6_SOURCE_API_LEAK,
                    Severity::CRITICAL,
                    format!(
                        "Sources contain API endpoint domain instead of actual source URLs: {}. \
                         All {} sources resolve to a search API wrapper.",
                        join(&domains),
                        sources.len()
                    ),
                )
                .fix(
                    "Extract actual source URLs from the grounding metadata \
                     instead of storing the search wrapper domain",
                ),
            );
        } else if domains.len() == 1 && sources.len() >= 3 {
            out.push(
                at(
                    check_ids::S6_SOURCE_MONOCULTURE,
                    Severity::WARNING,
                    format!(
                        "All {} sources are from a single domain: \"{}\". \
                         Real fact-checks should cite multiple independent sources.",
                        sources.len(),
                        join(&domains)
                    ),
                )
                .fix("Verify source URL extraction is returning actual website domains"),
            );
        }
    }

    out
}

fn join(set: &BTreeSet<String>) -> String {
    set.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
}
