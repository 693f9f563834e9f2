//! CLI entrypoint for the cipherkat validation harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cipherkat_core::registry::global_registry;
use cipherkat_core::{CipherConfig, Transformation};
use cipherkat_harness::structured_log::LogEmitter;
use cipherkat_harness::{
    DualModeValidator, FailurePolicy, HarnessConfig, ValidationReport, VectorCorpus,
};

/// Known-answer validation for cipher backends.
#[derive(Debug, Parser)]
#[command(name = "harness")]
#[command(about = "Dual-representation known-answer validation for cipher backends")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run every vector for the selected transformations against each backend.
    Run {
        /// Backend identifier (repeatable). Defaults to `CIPHERKAT_CIPHER_CLASSES`.
        #[arg(long = "backend")]
        backends: Vec<String>,
        /// Transformation name, e.g. `AES/CBC/PKCS5Padding` (repeatable). Defaults to all.
        #[arg(long = "transformation")]
        transformations: Vec<String>,
        /// Directory of extra JSON fixture files.
        #[arg(long)]
        fixtures: Option<PathBuf>,
        /// Keep going after a failed vector and report every outcome.
        #[arg(long)]
        collect_all: bool,
        /// Output report path (markdown).
        #[arg(long)]
        report_md: Option<PathBuf>,
        /// Output report path (JSON).
        #[arg(long)]
        report_json: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// List registered backends and supported transformations.
    List,
    /// Render a hex diff between two byte strings.
    Diff {
        /// Expected bytes (hex).
        #[arg(long)]
        expected: String,
        /// Actual bytes (hex).
        #[arg(long)]
        actual: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cipherkat_backends::register_builtin(&mut global_registry().write());

    match cli.command {
        Command::Run {
            backends,
            transformations,
            fixtures,
            collect_all,
            report_md,
            report_json,
            log,
        } => {
            let selected = transformations
                .iter()
                .map(|name| Transformation::from_name(name))
                .collect::<Result<Vec<_>, _>>()?;
            let mut config = HarnessConfig::from_env()
                .with_transformations(selected)
                .with_fixture_dir(fixtures);
            if collect_all {
                config = config.with_policy(FailurePolicy::CollectAll);
            }

            let mut corpus = VectorCorpus::builtin();
            if let Some(dir) = &config.fixture_dir {
                let loaded = corpus.load_dir(dir)?;
                eprintln!("Loaded {loaded} fixture file(s) from {}", dir.display());
            }

            let targets: Vec<CipherConfig> = if backends.is_empty() {
                vec![config.cipher.clone()]
            } else {
                backends.into_iter().map(CipherConfig::with_backend).collect()
            };

            let registry = global_registry().read();
            // Every backend must resolve and construct before any output.
            for target in &targets {
                if let Err(err) = DualModeValidator::new(&registry, target, &corpus)
                    .prepare(&config.transformations)
                {
                    eprintln!("{err}");
                    let backend = target.backend().unwrap_or("<unset>");
                    return Err(format!("setup failed for backend {backend}").into());
                }
            }

            let run_id = format!("harness-{}", std::process::id());
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, &run_id, "-")?),
                None => None,
            };

            let mut reports = Vec::new();
            for target in &targets {
                let backend = target.backend().unwrap_or("<unset>").to_string();
                eprintln!(
                    "Validating backend {backend} ({}, {} transformation(s))",
                    config.policy.as_str(),
                    config.transformations.len()
                );

                let mut validator = DualModeValidator::new(&registry, target, &corpus)
                    .with_policy(config.policy);
                if let Some(emitter) = emitter.as_mut() {
                    emitter.set_backend(&backend);
                    validator = validator.with_log(emitter);
                }
                let summary = match validator.run(&config.transformations) {
                    Ok(summary) => summary,
                    Err(err) => {
                        eprintln!("{err}");
                        let stage = if err.is_setup() { "setup" } else { "validation" };
                        return Err(format!("{stage} failed for backend {backend}").into());
                    }
                };

                for t in &summary.transformations {
                    let status = if t.failed == 0 { "PASS" } else { "FAIL" };
                    eprintln!(
                        "{status} {} ({}/{} vectors)",
                        t.transformation, t.passed, t.total
                    );
                }
                for failure in summary.failures() {
                    eprintln!("{}", failure.detail.as_deref().unwrap_or(&failure.label));
                }

                reports.push(ValidationReport {
                    title: String::from("cipherkat Validation Report"),
                    backend,
                    timestamp: cipherkat_harness::timestamp_now(),
                    corpus_sha256: corpus.fingerprint(&config.transformations),
                    summary,
                });
            }

            if let Some(path) = report_md {
                let body: Vec<String> = reports.iter().map(ValidationReport::to_markdown).collect();
                std::fs::write(&path, body.join("\n"))?;
                eprintln!("Wrote markdown report to {}", path.display());
            }
            if let Some(path) = report_json {
                std::fs::write(&path, serde_json::to_string_pretty(&reports)?)?;
                eprintln!("Wrote JSON report to {}", path.display());
            }

            let total: usize = reports.iter().map(|r| r.summary.total).sum();
            let failed: usize = reports.iter().map(|r| r.summary.failed).sum();
            eprintln!(
                "Validation complete: total={total}, passed={}, failed={failed}",
                total - failed
            );
            if failed > 0 {
                return Err("Known-answer validation failed".into());
            }
        }
        Command::List => {
            let registry = global_registry().read();
            println!("Backends:");
            for id in registry.identifiers() {
                println!("  {id}");
            }
            println!("Transformations:");
            for t in cipherkat_backends::supported_transformations() {
                println!("  {} (block size {})", t.name(), t.block_size());
            }
        }
        Command::Diff { expected, actual } => {
            let expected = hex::decode(expected.trim())?;
            let actual = hex::decode(actual.trim())?;
            let diff = cipherkat_harness::diff::render_hex_diff(&expected, &actual);
            println!("{}", diff.trim_end());
        }
    }

    Ok(())
}
