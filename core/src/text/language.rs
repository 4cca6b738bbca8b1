use crate::model::Language;
use crate::text::patterns::{DE_INDICATORS, EN_INDICATORS};

/// Majority vote over indicator words; ties (including no signal) are German.
pub fn detect_language(text: &str) -> Language {
    let lower = text.to_lowercase();
    let mut de = 0usize;
    let mut en = 0usize;
    for word in lower.split_whitespace() {
        if DE_INDICATORS.contains(&word) {
            de += 1;
        }
        if EN_INDICATORS.contains(&word) {
            en += 1;
        }
    }
    if en > de {
        Language::En
    } else {
        Language::De
    }
}
