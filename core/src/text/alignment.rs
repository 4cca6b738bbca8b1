use crate::model::Verdict;
use crate::text::patterns::{NEGATIVE_SIGNALS, POSITIVE_SIGNALS};

/// The explanation argues against its own verdict.
///
/// Only definitive verdicts are judged. A `true` verdict contradicts when the
/// text carries negative signals and no positive ones, and vice versa for
/// `false`. Text without any signal never contradicts.
pub fn verdict_contradicts_explanation(explanation: &str, verdict: &str) -> bool {
    let lower = explanation.to_lowercase();
    let positive = POSITIVE_SIGNALS.iter().any(|s| lower.contains(s));
    let negative = NEGATIVE_SIGNALS.iter().any(|s| lower.contains(s));

    match Verdict::parse(verdict) {
        Some(Verdict::True) => negative && !positive,
        Some(Verdict::False) => positive && !negative,
        _ => false,
    }
}
