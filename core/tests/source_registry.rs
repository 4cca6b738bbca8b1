use factgate_core::model::Chunk;
use factgate_core::run::QualityGate;
use factgate_core::sources::{RegistryOrigin, SourceRegistry, Tier};
use std::path::PathBuf;

fn write(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
    let p = dir.path().join(name);
    std::fs::write(&p, body).unwrap();
    p
}

#[test]
fn explicit_file_replaces_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let p = write(
        &dir,
        "sources.json",
        r#"{"tier_1": ["Example.GOV."], "tier_2": {"news.example": {"country": "AT"}}, "banned": ["tiktok.com"]}"#,
    );
    let reg = SourceRegistry::load(Some(&p));
    assert_eq!(reg.origin(), &RegistryOrigin::File(p));
    assert_eq!(reg.classify("example.gov"), Tier::Institutional);
    assert_eq!(reg.classify("https://news.example/article/1"), Tier::QualityMedia);
    assert_eq!(reg.classify("youtube.com"), Tier::Unclassified);
    assert!(reg.is_banned("TikTok.com"));
    assert!(reg.warnings().is_empty());
}

#[test]
fn malformed_file_falls_back_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(&dir, "bad.json", "{ not json");
    let reg = SourceRegistry::load_from_candidates(&[bad]);
    assert_eq!(reg.origin(), &RegistryOrigin::Defaults);
    assert_eq!(reg.warnings().len(), 1);
    assert!(reg.warnings()[0].contains("bad.json"));
    assert!(reg.is_banned("youtube.com"));
}

#[test]
fn first_usable_candidate_wins() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    let bad = write(&dir, "bad.json", r#"{"tier_1": 5}"#);
    let good = write(&dir, "good.json", r#"{"banned": ["example.net"]}"#);
    let reg = SourceRegistry::load_from_candidates(&[missing, bad, good.clone()]);
    assert_eq!(reg.origin(), &RegistryOrigin::File(good));
    assert_eq!(reg.warnings().len(), 1);
    assert!(reg.is_banned("example.net"));
}

#[test]
fn overlaps_between_tiers_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let p = write(
        &dir,
        "sources.json",
        r#"{"tier_1": ["a.org", "b.org"], "tier_2": ["a.org", "c.org"], "banned": ["b.org", "c.org"]}"#,
    );
    let reg = SourceRegistry::load_from_candidates(&[p]);
    assert_eq!(reg.warnings().len(), 3);
    assert_eq!(reg.classify("b.org"), Tier::Banned);
}

#[test]
fn custom_banned_list_drives_the_checks() {
    let dir = tempfile::tempdir().unwrap();
    let p = write(&dir, "sources.json", r#"{"banned": ["blog.example"]}"#);
    let gate = QualityGate::new(SourceRegistry::load_from_candidates(&[p]));
    let chunks: Vec<Chunk> = serde_json::from_value(serde_json::json!([{"claims": [{
        "originalClaim": "Wien hat 2 Millionen Einwohner.",
        "verification": {"verdict": "true", "sources": ["blog.example", "youtube.com"]}
    }]}]))
    .unwrap();
    let report = gate.run("c.json", &chunks).unwrap();
    let m1: Vec<_> = report
        .all_violations()
        .into_iter()
        .filter(|v| v.check_id == "M1_youtube_as_evidence")
        .collect();
    assert_eq!(m1.len(), 1);
    assert!(m1[0].message.contains("blog.example"));
}
