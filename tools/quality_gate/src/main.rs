use factgate_core::report::{render_json_summary, render_text, render_violations_csv};
use factgate_core::run::{parse_chunks, GateOptions, QualityGate};
use factgate_core::sources::SourceRegistry;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: quality_gate <chunks.json> [--fix] [--output PATH] [--strict] [--json] [--csv PATH] [--sources PATH]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: PathBuf,
    fix: bool,
    output: Option<PathBuf>,
    strict: bool,
    json: bool,
    csv: Option<PathBuf>,
    sources: Option<PathBuf>,
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut args = Args::default();
    let mut input = None;
    let mut it = argv.iter();
    while let Some(a) = it.next() {
        let mut value = |flag: &str| {
            it.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("{} needs a path", flag))
        };
        match a.as_str() {
            "--fix" => args.fix = true,
            "--strict" => args.strict = true,
            "--json" => args.json = true,
            "--output" => args.output = Some(value("--output")?),
            "--csv" => args.csv = Some(value("--csv")?),
            "--sources" => args.sources = Some(value("--sources")?),
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
            path if input.is_none() => input = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument: {}", extra)),
        }
    }
    args.input = input.ok_or_else(|| "missing input file".to_string())?;
    Ok(args)
}

/// `x.json` -> `x_corrected.json`; other names get the suffix appended.
fn default_output_path(input: &Path) -> PathBuf {
    let s = input.to_string_lossy();
    match s.strip_suffix(".json") {
        Some(stem) => PathBuf::from(format!("{}_corrected.json", stem)),
        None => PathBuf::from(format!("{}_corrected.json", s)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FACTGATE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("factgate_core=info,quality_gate=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

/// One `warning:` line per overlap the registry found while loading.
fn print_registry_warnings(registry: &SourceRegistry, out: &mut impl Write) -> std::io::Result<()> {
    for w in registry.warnings() {
        writeln!(out, "warning: {}", w)?;
    }
    Ok(())
}

fn write_or_exit(path: &Path, contents: &str) {
    if let Err(e) = std::fs::write(path, contents) {
        eprintln!("cannot write {}: {}", path.display(), e);
        exit(1);
    }
}

fn main() {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(a) => a,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            exit(2);
        }
    };
    init_tracing();

    let raw = match std::fs::read_to_string(&args.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cannot read {}: {}", args.input.display(), e);
            exit(1);
        }
    };
    let chunks = match parse_chunks(&raw) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("invalid input {}: {}", args.input.display(), e);
            exit(1);
        }
    };

    let registry = SourceRegistry::load(args.sources.as_deref());
    tracing::info!(
        origin = ?registry.origin(),
        tier_1 = registry.tier_1().len(),
        tier_2 = registry.tier_2().len(),
        banned = registry.banned().len(),
        "source tiers loaded"
    );
    // stderr is best effort
    let _ = print_registry_warnings(&registry, &mut std::io::stderr());

    let label = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.display().to_string());
    let gate = QualityGate::new(registry);
    let outcome = match gate.run_with_options(&label, &chunks, GateOptions { fix: args.fix }) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("quality gate error: {}", e);
            exit(1);
        }
    };
    let report = &outcome.report;

    if args.json {
        match render_json_summary(report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("cannot render summary: {}", e);
                exit(1);
            }
        }
    } else {
        println!("{}", render_text(report));
    }

    if let Some(path) = &args.csv {
        match render_violations_csv(report) {
            Ok(csv) => write_or_exit(path, &csv),
            Err(e) => {
                eprintln!("cannot render csv: {}", e);
                exit(1);
            }
        }
    }

    if let Some(fixed) = &outcome.fixed {
        let out_path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));
        match serde_json::to_string_pretty(&fixed.chunks) {
            Ok(json) => write_or_exit(&out_path, &json),
            Err(e) => {
                eprintln!("cannot serialize corrected chunks: {}", e);
                exit(1);
            }
        }
        eprintln!(
            "Applied {} auto-fixes -> {}",
            fixed.fix_count,
            out_path.display()
        );
    }

    if args.strict && report.has_critical() {
        exit(1);
    }
}
