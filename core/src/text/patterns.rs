//! Static word and pattern tables used by the heuristics and checks.
//!
//! These are data: extend them here without touching check logic.

/// Known phonetic confusions from speech recognition, lowercase (wrong, right).
pub const ASR_ERROR_PATTERNS: &[(&str, &str)] = &[
    ("bios", "pius"),
    ("griechang", "kriechgang"),
    ("griechgang", "kriechgang"),
    ("aust firstst", "austria first"),
    ("lohnstück kosten", "lohnstückkosten"),
];

/// Figurative markers that may carry a claim without any factual kernel.
pub const METAPHOR_MARKERS: &[&str] = &[
    "nebelsuppe",
    "rollatormodus",
    "schneckentempo",
    "raketenstaat",
    "pannenstreifen",
    "beiwagen",
    "abschleppwagen",
    "sonnenstaat",
];

/// Speaker actions and emotions that extraction should have filtered.
/// Matched against lowercased claim text.
pub const SPEAKER_PATTERNS: &[&str] = &[
    r"^der sprecher",
    r"^die sprecherin",
    r"hat sich .* angeschaut",
    r"war neugierig",
    r"war geschockt",
    r"war überrascht",
    r"freut sich",
    r"ist froh",
    r"kritisiert die",
    r"bezeichnet .* als",
];

/// Future-tense markers, matched against lowercased claim text.
pub const FUTURE_PATTERNS: &[&str] = &[
    r"\bwird\b.*\bwerden\b",
    r"\bwill\b",
    r"\bnächstes jahr\b",
    r"\bin zukunft\b",
    r"\bwird eine\b.*\bbilden\b",
];

pub const DE_INDICATORS: &[&str] = &[
    "der", "die", "das", "ist", "und", "ein", "eine", "wird", "dass", "nicht", "auch", "den",
    "dem", "des", "von", "mit", "für", "auf", "sich", "hat", "als", "nach", "bei", "über",
];

pub const EN_INDICATORS: &[&str] = &[
    "the", "is", "and", "that", "this", "has", "was", "are", "not", "with", "from", "which",
    "have", "been", "their", "would", "could", "should", "about", "into",
];

/// Capitalized words that never count as a named entity in first position.
pub const SENTENCE_STARTERS: &[&str] = &[
    "Der", "Die", "Das", "Ein", "Eine", "Es", "Er", "Sie", "Wir", "Ich", "Man", "Wenn", "Dass",
    "Ob", "Wie", "Was", "Wer", "Alle", "Viele", "Einige", "Jeder", "Dieser", "Jene", "Im", "Am",
    "Zum", "Zur", "Vom", "Beim", "Seit", "Durch", "The", "A", "An", "It", "He", "She", "We",
    "They", "This", "That",
];

/// Capitalized words that never count as a named entity after first position.
pub const ARTICLES: &[&str] = &["Der", "Die", "Das", "Ein", "Eine"];

/// Capitalized words ignored when looking for entities foreign to the claim.
pub const COMMON_CAPITALIZED: &[&str] = &[
    "Der", "Die", "Das", "Ein", "Eine", "Und", "Oder", "Aber", "The", "This", "That", "However",
    "While", "According", "Also", "Based", "Evidence", "Claim", "Sources",
];

pub const POSITIVE_SIGNALS: &[&str] = &[
    "confirmed",
    "supported",
    "bestätigt",
    "belegt",
    "korrekt",
    "is true",
    "is correct",
    "stimmt",
    "trifft zu",
];

pub const NEGATIVE_SIGNALS: &[&str] = &[
    "contradicted",
    "false",
    "falsch",
    "widerlegt",
    "not supported",
    "nicht bestätigt",
    "incorrect",
    "not true",
];

/// Search-API wrapper hosts stored instead of the cited page.
pub const API_ENDPOINT_DOMAINS: &[&str] = &[
    "vertexaisearch.cloud.google.com",
    "generativelanguage.googleapis.com",
    "aiplatform.googleapis.com",
];

/// Hard-coded confidence values emitted when the upstream formula did not run.
pub const FALLBACK_CONFIDENCES: &[f64] = &[0.5, 0.28];
