//! Renderers over a finished `RunReport`. All return strings; writing them
//! out is the caller's business.

use crate::error::CoreResult;
use crate::model::{RunReport, Severity, Violation};
use crate::text::truncate_chars;
use std::collections::BTreeMap;
use std::fmt::Write as _;

const RULE_WIDTH: usize = 70;
const EXAMPLES_PER_CHECK: usize = 3;
const BAR_WIDTH: usize = 20;

fn bar(score: f64) -> String {
    let filled = ((score / 5.0) as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn location(v: &Violation) -> String {
    if v.is_run_level() {
        "run-level".to_string()
    } else {
        format!("chunk {}", v.chunk_index)
    }
}

/// Human-readable report for the terminal.
pub fn render_text(report: &RunReport) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let all = report.all_violations();
    let mut s = String::new();

    // writes into a String cannot fail
    let _ = writeln!(s, "{heavy}");
    let _ = writeln!(s, "  FACT-CHECK QUALITY GATE REPORT");
    let _ = writeln!(s, "  Input: {}", report.input_label);
    let _ = writeln!(
        s,
        "  Claims: {} across {} chunks",
        report.total_claims, report.total_chunks
    );
    let _ = writeln!(s, "  Run: {}", report.run_id);
    let _ = writeln!(s, "{heavy}");
    let _ = writeln!(s);
    let _ = writeln!(
        s,
        "  OVERALL SCORE: {:.1}/100  [{}]",
        report.overall_score,
        report.grade.as_str()
    );
    let _ = writeln!(s);

    let _ = writeln!(s, "  CATEGORY SCORES:");
    for (cat, score) in &report.category_scores {
        let _ = writeln!(s, "    {:15}: {:5.1}/100  {}", cat.as_str(), score, bar(*score));
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "  VIOLATIONS: {} total", all.len());
    for sev in [Severity::CRITICAL, Severity::WARNING, Severity::INFO] {
        let n = report.count_severity(sev);
        if n > 0 {
            let _ = writeln!(s, "    {}: {}", sev.as_str(), n);
        }
    }
    let _ = writeln!(s);

    let mut by_check: BTreeMap<&str, Vec<&Violation>> = BTreeMap::new();
    for v in all.iter().copied() {
        by_check.entry(v.check_id.as_str()).or_default().push(v);
    }

    let _ = writeln!(s, "{light}");
    let _ = writeln!(s, "  DETAILED FINDINGS");
    let _ = writeln!(s, "{light}");
    for (check_id, items) in &by_check {
        let first = items[0];
        let fixable = if first.auto_fixable { " [AUTO-FIXABLE]" } else { "" };
        let _ = writeln!(s);
        let _ = writeln!(
            s,
            "  [{}] {} ({} occurrences){}",
            first.severity.as_str(),
            check_id,
            items.len(),
            fixable
        );
        if !first.fix_description.is_empty() {
            let _ = writeln!(s, "     Fix: {}", first.fix_description);
        }
        for item in items.iter().take(EXAMPLES_PER_CHECK) {
            let _ = writeln!(
                s,
                "     - [{}] {}",
                location(item),
                truncate_chars(&item.message, 100)
            );
        }
        if items.len() > EXAMPLES_PER_CHECK {
            let _ = writeln!(s, "     ... and {} more", items.len() - EXAMPLES_PER_CHECK);
        }
    }

    let fixable = report.fixable_count();
    if fixable > 0 {
        let _ = writeln!(s);
        let _ = writeln!(s, "{light}");
        let _ = writeln!(
            s,
            "  AUTO-FIXABLE: {}/{} violations can be automatically repaired",
            fixable,
            all.len()
        );
        let _ = writeln!(s, "  Run with --fix to apply corrections");
        let _ = writeln!(s, "{light}");
    }

    let _ = writeln!(s);
    let _ = writeln!(s, "{heavy}");
    let critical = report.count_severity(Severity::CRITICAL);
    if report.production_ready() {
        let _ = writeln!(s, "  PRODUCTION READY");
    } else if critical == 0 {
        let _ = writeln!(s, "  ACCEPTABLE: no critical issues but quality below target");
    } else {
        let _ = writeln!(
            s,
            "  NOT PRODUCTION READY: {} critical issues must be resolved",
            critical
        );
    }
    let _ = write!(s, "{heavy}");
    s
}

/// Compact machine-readable summary for CI.
pub fn render_json_summary(report: &RunReport) -> CoreResult<String> {
    let summary = serde_json::json!({
        "run_id": report.run_id,
        "score": report.overall_score,
        "grade": report.grade,
        "categories": report.category_scores,
        "total_claims": report.total_claims,
        "violations": {
            "critical": report.count_severity(Severity::CRITICAL),
            "warning": report.count_severity(Severity::WARNING),
            "info": report.count_severity(Severity::INFO),
        },
        "production_ready": report.production_ready(),
    });
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// One row per violation in report order, LF line endings.
pub fn render_violations_csv(report: &RunReport) -> CoreResult<String> {
    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record([
        "check_id",
        "severity",
        "category",
        "chunk_index",
        "claim_index",
        "auto_fixable",
        "message",
        "fix_description",
    ])?;
    for v in report.all_violations() {
        wtr.write_record([
            v.check_id.clone(),
            v.severity.as_str().to_string(),
            v.category().as_str().to_string(),
            v.chunk_index.to_string(),
            v.claim_index.to_string(),
            v.auto_fixable.to_string(),
            v.message.clone(),
            v.fix_description.clone(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Language};
    use crate::scoring::Grade;

    fn report(violations: Vec<Violation>, overall: f64) -> RunReport {
        let mut category_scores = BTreeMap::new();
        for (cat, _) in Category::WEIGHTED {
            category_scores.insert(cat, 100.0);
        }
        RunReport {
            input_label: "chunks.json".to_string(),
            run_id: "r_0123456789abcdef0123456789abcdef".to_string(),
            input_fingerprint: "00".repeat(32),
            transcript_language: Language::De,
            total_chunks: 1,
            total_claims: 2,
            claim_audits: Vec::new(),
            run_violations: violations,
            category_scores,
            overall_score: overall,
            grade: Grade::from_score(overall),
        }
    }

    #[test]
    fn text_report_verdicts() {
        let ready = render_text(&report(Vec::new(), 100.0));
        assert!(ready.contains("OVERALL SCORE: 100.0/100  [A]"));
        assert!(ready.contains("  PRODUCTION READY"));

        let crit = Violation::run_level("C2_contradictory_verdicts", Severity::CRITICAL, "x".into());
        let blocked = render_text(&report(vec![crit], 95.5));
        assert!(blocked.contains("NOT PRODUCTION READY: 1 critical issues"));
        assert!(blocked.contains("[run-level] x"));

        let warn = Violation::at("E4_uncheckable_claim", Severity::WARNING, 0, 1, "y".into());
        assert!(render_text(&report(vec![warn], 80.0)).contains("ACCEPTABLE"));
    }

    #[test]
    fn text_report_caps_examples_per_check() {
        let vs: Vec<Violation> = (0..5)
            .map(|i| {
                Violation::at("E4_uncheckable_claim", Severity::WARNING, i, 0, format!("m{i}"))
            })
            .collect();
        let text = render_text(&report(vs, 90.0));
        assert!(text.contains("E4_uncheckable_claim (5 occurrences)"));
        assert!(text.contains("... and 2 more"));
        assert!(!text.contains("m3"));
    }

    #[test]
    fn json_summary_shape() {
        let crit = Violation::run_level("C2_contradictory_verdicts", Severity::CRITICAL, "x".into());
        let out = render_json_summary(&report(vec![crit], 91.0)).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["grade"], "A");
        assert_eq!(v["violations"]["critical"], 1);
        assert_eq!(v["production_ready"], false);
        assert_eq!(v["categories"]["consistency"], 100.0);
        assert_eq!(v["run_id"], "r_0123456789abcdef0123456789abcdef");
    }

    #[test]
    fn csv_has_header_and_lf_rows() {
        let v = Violation::at("M2_asr_name_mismatch", Severity::CRITICAL, 3, 4, "a, \"b\"".into())
            .fixable("swap");
        let csv = render_violations_csv(&report(vec![v], 90.0)).unwrap();
        assert!(!csv.contains('\r'));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("check_id,severity,category"));
        assert_eq!(
            lines[1],
            "M2_asr_name_mismatch,CRITICAL,semantic,3,4,true,\"a, \"\"b\"\"\",swap"
        );
    }
}
