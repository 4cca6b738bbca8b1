//! Auto-fix engine.
//!
//! Works on a copy of the chunks and only acts on check ids that were both
//! reported and flagged auto-fixable. Running it again over its own output
//! applies nothing.

use crate::model::{check_ids, Chunk, Claim, Source, TypedSource, Violation};
use crate::sources::SourceRegistry;
use crate::text::{similarity, truncate_chars, AsrMismatch};
use regex::{NoExpand, RegexBuilder};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Fixable check ids this engine rewrites data for.
pub const IMPLEMENTED_FIXES: &[&str] = &[
    check_ids::M1_BANNED_SOURCE,
    check_ids::M5_CIRCULAR_REFERENCE,
    check_ids::M2_ASR_NAME_MISMATCH,
    check_ids::S2_SOURCES_TYPED,
    check_ids::C1_DUPLICATE_CLAIMS,
];

/// Fixable check ids whose repair lives upstream (filter-list enrichment).
/// They are reported but never rewritten here.
pub const UPSTREAM_ONLY_FIXES: &[&str] = &[check_ids::E1_SPEAKER_ACTION_LEAK];

const DEDUP_WINDOW: usize = 80;
// looser than detection and without the numeric guard
const DEDUP_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, PartialEq)]
pub struct FixOutcome {
    pub chunks: Vec<Chunk>,
    pub fix_count: usize,
    pub applied: BTreeMap<String, usize>,
}

impl FixOutcome {
    fn record(&mut self, check_id: &str, n: usize) {
        if n == 0 {
            return;
        }
        self.fix_count += n;
        *self.applied.entry(check_id.to_string()).or_default() += n;
    }
}

pub fn apply_fixes(
    chunks: &[Chunk],
    violations: &[Violation],
    registry: &SourceRegistry,
) -> FixOutcome {
    let fixable: Vec<&Violation> = violations.iter().filter(|v| v.auto_fixable).collect();
    let present: BTreeSet<&str> = fixable.iter().map(|v| v.check_id.as_str()).collect();

    let mut out = FixOutcome {
        chunks: chunks.to_vec(),
        fix_count: 0,
        applied: BTreeMap::new(),
    };

    let banned_id = [check_ids::M1_BANNED_SOURCE, check_ids::M5_CIRCULAR_REFERENCE]
        .into_iter()
        .find(|id| present.contains(id));
    if let Some(id) = banned_id {
        let n = strip_banned_sources(&mut out.chunks, registry);
        out.record(id, n);
    }

    if present.contains(check_ids::M2_ASR_NAME_MISMATCH) {
        let n = correct_asr_errors(&mut out.chunks, &fixable);
        out.record(check_ids::M2_ASR_NAME_MISMATCH, n);
    }

    if present.contains(check_ids::S2_SOURCES_TYPED) {
        let n = type_raw_sources(&mut out.chunks, registry);
        out.record(check_ids::S2_SOURCES_TYPED, n);
    }

    if present.contains(check_ids::C1_DUPLICATE_CLAIMS) {
        let n = merge_duplicates(&mut out.chunks);
        out.record(check_ids::C1_DUPLICATE_CLAIMS, n);
    }

    for id in &present {
        if UPSTREAM_ONLY_FIXES.contains(id) {
            tracing::debug!(check_id = %id, "fix belongs upstream, left as reported");
        }
    }
    tracing::info!(fix_count = out.fix_count, applied = ?out.applied, "auto-fix done");
    out
}

fn claims_mut(chunks: &mut [Chunk]) -> impl Iterator<Item = &mut Claim> {
    chunks.iter_mut().flat_map(|c| c.claims.iter_mut())
}

/// Drops banned domains; counts claims whose source list shrank.
fn strip_banned_sources(chunks: &mut [Chunk], registry: &SourceRegistry) -> usize {
    let mut n = 0;
    for claim in claims_mut(chunks) {
        let Some(sources) = claim.verification.sources.as_mut() else {
            continue;
        };
        let before = sources.len();
        sources.retain(|s| !registry.is_banned(s.domain()));
        if sources.len() < before {
            n += 1;
        }
    }
    n
}

/// Rewrites `cleanedClaim` for every claim containing a reported wrong token.
/// Distinct pairs are applied in order on top of each other, starting from
/// the raw text; a claim counts once and only if its `cleanedClaim` changed.
fn correct_asr_errors(chunks: &mut [Chunk], fixable: &[&Violation]) -> usize {
    let mut pairs: Vec<AsrMismatch> = Vec::new();
    for v in fixable {
        if v.check_id != check_ids::M2_ASR_NAME_MISMATCH {
            continue;
        }
        match AsrMismatch::from_message(&v.message) {
            Some(pair) if !pairs.contains(&pair) => pairs.push(pair),
            Some(_) => {}
            None => tracing::warn!(message = %v.message, "unparseable ASR finding skipped"),
        }
    }

    let mut n = 0;
    for claim in claims_mut(chunks) {
        let mut current = claim.text().to_string();
        let mut matched = false;
        for pair in &pairs {
            if let Some(fixed) = replace_token(&current, &pair.wrong, &title_case(&pair.right)) {
                current = fixed;
                matched = true;
            }
        }
        if matched && claim.cleaned_claim.as_deref() != Some(current.as_str()) {
            claim.cleaned_claim = Some(current);
            n += 1;
        }
    }
    n
}

/// Case-insensitive literal replacement of `wrong` in `text`; `None` when
/// `wrong` does not occur.
fn replace_token(text: &str, wrong: &str, right: &str) -> Option<String> {
    if !text.to_lowercase().contains(&wrong.to_lowercase()) {
        return None;
    }
    let re = RegexBuilder::new(&regex::escape(wrong))
        .case_insensitive(true)
        .build()
        .ok()?;
    Some(re.replace_all(text, NoExpand(right)).into_owned())
}

/// Uppercase after a non-letter, lowercase otherwise.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Bare-string sources become `{domain, tier}`; typed entries are untouched.
fn type_raw_sources(chunks: &mut [Chunk], registry: &SourceRegistry) -> usize {
    let mut n = 0;
    for claim in claims_mut(chunks) {
        let Some(sources) = claim.verification.sources.as_mut() else {
            continue;
        };
        let mut changed = false;
        for s in sources.iter_mut() {
            if let Source::Raw(raw) = s {
                let domain = std::mem::take(raw);
                let tier = registry.classify(&domain).number();
                *s = Source::Typed(TypedSource {
                    domain,
                    tier: Some(Value::from(tier)),
                    extra: Default::default(),
                });
                changed = true;
            }
        }
        if changed {
            n += 1;
        }
    }
    n
}

/// Keeps the first of each near-duplicate group, moves the later occurrences'
/// time markers onto its `timestamps`, and removes them. Returns removals.
fn merge_duplicates(chunks: &mut [Chunk]) -> usize {
    // (prefix text, chunk index, claim index after removal)
    let mut kept: Vec<(String, usize, usize)> = Vec::new();
    let mut merges: Vec<(usize, usize, Value)> = Vec::new();
    let mut removed = 0;

    for (chi, chunk) in chunks.iter_mut().enumerate() {
        let marker = chunk.time_marker();
        let claims = std::mem::take(&mut chunk.claims);
        for mut claim in claims {
            let text = truncate_chars(claim.text(), DEDUP_WINDOW).to_string();
            let original = kept
                .iter()
                .find(|(seen, _, _)| similarity(&text, seen) > DEDUP_THRESHOLD)
                .map(|&(_, kchi, kci)| (kchi, kci));
            match original {
                Some((kchi, kci)) => {
                    merges.push((kchi, kci, marker.clone()));
                    removed += 1;
                }
                None => {
                    if claim.timestamps.is_none() {
                        claim.timestamps = Some(vec![marker.clone()]);
                    }
                    kept.push((text, chi, chunk.claims.len()));
                    chunk.claims.push(claim);
                }
            }
        }
    }

    for (chi, ci, marker) in merges {
        if let Some(claim) = chunks.get_mut(chi).and_then(|c| c.claims.get_mut(ci)) {
            claim.timestamps.get_or_insert_with(Vec::new).push(marker);
        }
    }
    removed
}
