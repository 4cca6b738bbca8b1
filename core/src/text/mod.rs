//! Pure text and entity heuristics shared by every check family.

pub mod alignment;
pub mod asr;
pub mod entities;
pub mod language;
pub mod patterns;
pub mod similarity;

pub use alignment::verdict_contradicts_explanation;
pub use asr::{asr_mismatch, AsrMismatch};
pub use entities::{capitalized_tokens, has_digit, has_named_entity, irrelevant_entities};
pub use language::detect_language;
pub use similarity::similarity;

/// First `n` characters (not bytes).
pub fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
