use crate::text::entities::capitalized_tokens;
use crate::text::patterns::ASR_ERROR_PATTERNS;
use crate::text::similarity::similarity;
use once_cell::sync::Lazy;
use regex::Regex;

static MESSAGE_PAIR: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r#"claim says "(.+?)" but verification found "(.+?)""#).ok()
});

/// A speech-recognition error: the claim carries `wrong` where the
/// verification found `right`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsrMismatch {
    pub wrong: String,
    pub right: String,
}

impl AsrMismatch {
    pub fn new(wrong: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            wrong: wrong.into(),
            right: right.into(),
        }
    }

    /// Violation message. `from_message` recovers the pair from it.
    pub fn message(&self) -> String {
        format!(
            "ASR error detected: claim says \"{}\" but verification found \"{}\"",
            self.wrong, self.right
        )
    }

    pub fn from_message(message: &str) -> Option<Self> {
        let caps = MESSAGE_PAIR.as_ref()?.captures(message)?;
        Some(Self::new(caps.get(1)?.as_str(), caps.get(2)?.as_str()))
    }
}

/// Known confusion table first; otherwise pair up capitalized tokens unique
/// to each text and accept a pair only when every guard holds:
/// no substring relation (compounds), no shared stem after suffix stripping
/// (inflections), different initial letter, lengths within 3, similarity > 0.65.
pub fn asr_mismatch(claim: &str, explanation: &str) -> Option<AsrMismatch> {
    let claim_lower = claim.to_lowercase();
    for (wrong, right) in ASR_ERROR_PATTERNS {
        if claim_lower.contains(wrong) {
            return Some(AsrMismatch::new(*wrong, *right));
        }
    }

    let claim_caps = capitalized_tokens(claim);
    let exp_caps = capitalized_tokens(explanation);

    for oc in claim_caps.difference(&exp_caps) {
        for oe in exp_caps.difference(&claim_caps) {
            if is_plausible_swap(oc, oe) {
                return Some(AsrMismatch::new(oc.as_str(), oe.as_str()));
            }
        }
    }
    None
}

fn is_plausible_swap(claim_token: &str, exp_token: &str) -> bool {
    let c = claim_token.to_lowercase();
    let e = exp_token.to_lowercase();

    if c.contains(&e) || e.contains(&c) {
        return false;
    }

    let c_stem = strip_suffixes(&c);
    let e_stem = strip_suffixes(&e);
    if c_stem == e_stem && c_stem.chars().count() > 3 {
        return false;
    }

    if c.chars().next() == e.chars().next() {
        return false;
    }

    let c_len = claim_token.chars().count();
    let e_len = exp_token.chars().count();
    if c_len.abs_diff(e_len) > 3 {
        return false;
    }

    similarity(claim_token, exp_token) > 0.65
}

/// Strips common German inflection endings.
fn strip_suffixes(word: &str) -> &str {
    word.trim_end_matches(['s', 'n', 'e', 'm'])
}
