use factgate_core::determinism::{input_fingerprint, run_id_from_fingerprint, to_canonical_bytes};
use factgate_core::model::Chunk;
use factgate_core::report::{render_json_summary, render_text, render_violations_csv};
use factgate_core::run::QualityGate;
use factgate_core::sources::SourceRegistry;
use proptest::prelude::*;
use serde_json::json;

const TEXTS: [&str; 6] = [
    "Die Inflation lag bei 5%.",
    "Die Inflation lag bei 50%.",
    "Der Sprecher war geschockt über die Zahlen.",
    "Österreich ist Weltmeister im Skifahren",
    "Österreich ist Weltmeister im Wandern",
    "das land ist im rollatormodus",
];
const VERDICTS: [&str; 6] = ["true", "false", "partially_true", "opinion", "unverifiable", "maybe"];
const SOURCES: [&str; 4] = ["youtube.com", "statistik.at", "orf.at", "vertexaisearch.cloud.google.com"];

fn build(claims: &[Vec<(usize, usize, u8, Vec<usize>)>]) -> Vec<Chunk> {
    let value: Vec<serde_json::Value> = claims
        .iter()
        .map(|chunk| {
            let cs: Vec<serde_json::Value> = chunk
                .iter()
                .map(|(t, v, conf, srcs)| {
                    json!({
                        "originalClaim": TEXTS[*t],
                        "verification": {
                            "verdict": VERDICTS[*v],
                            "confidence": f64::from(*conf) / 100.0,
                            "explanation": "Die Daten sind belegt und korrekt.",
                            "sources": srcs.iter().map(|i| SOURCES[*i]).collect::<Vec<_>>()
                        }
                    })
                })
                .collect();
            json!({"claims": cs})
        })
        .collect();
    serde_json::from_value(json!(value)).unwrap()
}

#[test]
fn canonical_json_is_stable_for_key_order() {
    let a = json!({"b": 1, "a": {"y": 2.5, "x": 3}});
    let b = json!({"a": {"x": 3, "y": 2.5}, "b": 1});
    assert_eq!(to_canonical_bytes(&a).unwrap(), to_canonical_bytes(&b).unwrap());
}

#[test]
fn run_id_follows_input_fingerprint() {
    let chunks = build(&[vec![(0, 0, 80, vec![1])]]);
    let gate = QualityGate::new(SourceRegistry::defaults());
    let report = gate.run("a.json", &chunks).unwrap();
    let fp = input_fingerprint(&chunks).unwrap();
    assert_eq!(report.input_fingerprint, fp);
    assert_eq!(report.run_id, run_id_from_fingerprint(&fp).unwrap());

    let other = build(&[vec![(1, 0, 80, vec![1])]]);
    assert_ne!(gate.run("a.json", &other).unwrap().run_id, report.run_id);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn repeated_runs_are_byte_identical(
        claims in proptest::collection::vec(
            proptest::collection::vec(
                (0usize..6, 0usize..6, 0u8..=120, proptest::collection::vec(0usize..4, 0..4)),
                0..4,
            ),
            0..4,
        )
    ) {
        let chunks = build(&claims);
        let gate = QualityGate::new(SourceRegistry::defaults());
        let a = gate.run("p.json", &chunks).unwrap();
        let b = gate.run("p.json", &chunks.clone()).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(render_text(&a), render_text(&b));
        prop_assert_eq!(render_json_summary(&a).unwrap(), render_json_summary(&b).unwrap());
        prop_assert_eq!(render_violations_csv(&a).unwrap(), render_violations_csv(&b).unwrap());
        prop_assert!((0.0..=100.0).contains(&a.overall_score));
    }
}
