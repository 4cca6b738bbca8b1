//! Orchestrator: one pass over a decoded chunk list.
//!
//! Language detection, per-claim structural and semantic checks, run-level
//! consistency and extraction checks, scoring, then the optional auto-fix.
//! Nothing here touches the filesystem.

use crate::checks::{consistency, extraction, semantic, structural, CheckContext};
use crate::determinism::{input_fingerprint, run_id_from_fingerprint};
use crate::error::{CoreError, CoreResult};
use crate::fix::{apply_fixes, FixOutcome};
use crate::model::{Chunk, ClaimAudit, Language, RunReport, Violation};
use crate::scoring::score;
use crate::sources::SourceRegistry;
use crate::text::{detect_language, truncate_chars};
use serde_json::Value;

/// Chunks sampled for transcript language detection.
const LANGUAGE_SAMPLE_CHUNKS: usize = 5;
const AUDIT_TEXT_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateOptions {
    pub fix: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateOutcome {
    pub report: RunReport,
    pub fixed: Option<FixOutcome>,
}

/// Decodes the pipeline output. The top level must be an array of chunks.
pub fn parse_chunks(json: &str) -> CoreResult<Vec<Chunk>> {
    let value: Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(CoreError::InvalidInput(
            "expected a JSON array of chunk objects at the top level".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Language of the source video, from the `fullText` of the first chunks;
/// claim texts stand in when no sampled chunk carries a transcript.
pub fn detect_transcript_language(chunks: &[Chunk]) -> Language {
    let sample = &chunks[..chunks.len().min(LANGUAGE_SAMPLE_CHUNKS)];
    let transcripts: Vec<&str> = sample
        .iter()
        .filter_map(|c| c.full_text.as_deref())
        .collect();
    let text = if transcripts.is_empty() {
        sample
            .iter()
            .flat_map(|c| c.claims.iter().map(|cl| cl.text()))
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        transcripts.join(" ")
    };
    detect_language(&text)
}

pub struct QualityGate {
    pub registry: SourceRegistry,
}

impl QualityGate {
    pub fn new(registry: SourceRegistry) -> Self {
        Self { registry }
    }

    pub fn run(&self, input_label: &str, chunks: &[Chunk]) -> CoreResult<RunReport> {
        let transcript_language = detect_transcript_language(chunks);
        let ctx = CheckContext::new(&self.registry, transcript_language);

        let mut claim_audits = Vec::new();
        for (chi, chunk) in chunks.iter().enumerate() {
            for (ci, claim) in chunk.claims.iter().enumerate() {
                let mut violations = structural::check_claim(claim, chi, ci, &ctx);
                violations.extend(semantic::check_claim(claim, chi, ci, &ctx));
                claim_audits.push(ClaimAudit {
                    chunk_index: chi,
                    claim_index: ci,
                    original_claim: truncate_chars(claim.text(), AUDIT_TEXT_CHARS).to_string(),
                    verdict: claim.verification.verdict().to_string(),
                    confidence: claim.verification.confidence(),
                    score: claim_score(&violations),
                    violations,
                });
            }
        }

        let mut run_violations = consistency::check_run(chunks, &ctx);
        run_violations.extend(extraction::check_run(chunks, &ctx));

        let total_claims = claim_audits.len();
        let all: Vec<Violation> = claim_audits
            .iter()
            .flat_map(|a| a.violations.iter().cloned())
            .chain(run_violations.iter().cloned())
            .collect();
        let scores = score(total_claims, &all);

        let fingerprint = input_fingerprint(&chunks)?;
        let run_id = run_id_from_fingerprint(&fingerprint)?;

        tracing::debug!(
            run_id = %run_id,
            language = transcript_language.as_str(),
            chunks = chunks.len(),
            claims = total_claims,
            violations = all.len(),
            "quality gate run complete"
        );

        Ok(RunReport {
            input_label: input_label.to_string(),
            run_id,
            input_fingerprint: fingerprint,
            transcript_language,
            total_chunks: chunks.len(),
            total_claims,
            claim_audits,
            run_violations,
            category_scores: scores.category_scores,
            overall_score: scores.overall,
            grade: scores.grade,
        })
    }

    /// `run`, then the auto-fix engine over the same findings when requested.
    pub fn run_with_options(
        &self,
        input_label: &str,
        chunks: &[Chunk],
        opts: GateOptions,
    ) -> CoreResult<GateOutcome> {
        let report = self.run(input_label, chunks)?;
        let fixed = opts
            .fix
            .then(|| apply_fixes(chunks, &report.owned_violations(), &self.registry));
        Ok(GateOutcome { report, fixed })
    }
}

/// Informational per-claim score: 100 minus the base penalty of each finding.
fn claim_score(violations: &[Violation]) -> f64 {
    let penalty: f64 = violations.iter().map(|v| v.severity.base_penalty()).sum();
    (100.0 - penalty).max(0.0)
}
