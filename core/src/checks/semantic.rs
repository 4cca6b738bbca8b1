use crate::checks::CheckContext;
use crate::model::{check_ids, Claim, Language, Severity, Violation};
use crate::text::{asr_mismatch, detect_language, irrelevant_entities};

/// M1-M5: semantic quality of one verification result.
pub fn check_claim(
    claim: &Claim,
    chunk_index: usize,
    claim_index: usize,
    ctx: &CheckContext<'_>,
) -> Vec<Violation> {
    let mut out = Vec::new();
    let at = |id: &str, sev: Severity, msg: String| {
        Violation::at(id, sev, chunk_index, claim_index, msg)
    };
    let v = &claim.verification;
    let exp = v.explanation();
    let text = claim.text();

    let banned = first_banned_source(claim, ctx);

    // M1, once per claim
    if let Some(domain) = banned {
        out.push(
            at(
                check_ids::M1_BANNED_SOURCE,
                Severity::CRITICAL,
                format!(
                    "Banned source \"{}\" used as evidence. This is circular when analyzing platform content.",
                    domain
                ),
            )
            .fixable(format!("Remove \"{}\" from sources array", domain)),
        );
    }

    // M2
    if let Some(m) = asr_mismatch(text, exp) {
        let fix = format!(
            "Replace \"{}\" with \"{}\" in claim display text",
            m.wrong, m.right
        );
        out.push(at(check_ids::M2_ASR_NAME_MISMATCH, Severity::CRITICAL, m.message()).fixable(fix));
    }

    // M3
    if exp.chars().count() > 30
        && ctx.transcript_language == Language::De
        && detect_language(exp) == Language::En
    {
        out.push(
            at(
                check_ids::M3_EXPLANATION_LANGUAGE,
                Severity::WARNING,
                "Explanation is in English but transcript is German".to_string(),
            )
            .fix("Add a language instruction to the judging prompt: \"Antworte auf Deutsch\""),
        );
    }

    // M4
    if irrelevant_entities(text, exp) {
        out.push(
            at(
                check_ids::M4_IRRELEVANT_SEARCH,
                Severity::WARNING,
                "Explanation contains multiple entities not present in the claim: likely polluted search results"
                    .to_string(),
            )
            .fix("Improve search query construction to use claim keywords only"),
        );
    }

    // M5: same detection as M1, reported as the circular-reference diagnosis
    if let Some(domain) = banned {
        out.push(
            at(
                check_ids::M5_CIRCULAR_REFERENCE,
                Severity::CRITICAL,
                format!(
                    "Circular reference: analyzing platform content but citing \"{}\" as evidence",
                    domain
                ),
            )
            .fixable(format!("Filter \"{}\" from source pipeline", domain)),
        );
    }

    out
}

fn first_banned_source<'c>(claim: &'c Claim, ctx: &CheckContext<'_>) -> Option<&'c str> {
    claim
        .verification
        .sources()
        .iter()
        .map(|s| s.domain())
        .find(|d| ctx.registry.is_banned(d))
}
