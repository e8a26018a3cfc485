//! Generates schema files from an XML record description.
//!
//! Run with:
//! `cargo run --example generate -- <records.xml> [output-dir] [options]`
//!
//! Set `RUST_LOG=debug` to see per-record output.

use clap::Parser;
use pduschema::prelude::*;
use std::path::PathBuf;

/// Generate schema files from PDU record definitions
#[derive(Parser, Debug)]
#[command(name = "generate")]
#[command(version, about, long_about = None)]
struct Args {
    /// XML record description
    records: PathBuf,

    /// Directory receiving the generated files
    #[arg(default_value = "schema")]
    output_dir: PathBuf,

    /// Package namespace, also used as the import path prefix
    #[arg(short, long)]
    namespace: Option<String>,

    /// Added to every pduType to form component ids
    #[arg(short, long, default_value_t = 0)]
    offset: u32,

    /// Type override properties file
    #[arg(long)]
    types: Option<PathBuf>,

    /// Command response properties file
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Alias properties file
    #[arg(long)]
    aliases: Option<PathBuf>,
}

impl Args {
    fn config(&self) -> GeneratorConfig {
        let config = GeneratorConfig::new(&self.output_dir).with_pdu_offset(self.offset);
        match &self.namespace {
            Some(namespace) => config.with_namespace(namespace),
            None => config,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let records = parse_records_file(&args.records)?;
    let overrides = OverrideTables::load(
        args.types.as_deref(),
        args.commands.as_deref(),
        args.aliases.as_deref(),
    )?;

    let report = generate(&records, &overrides, &args.config())?;

    println!(
        "Wrote {} files to {} ({} empty, {} aliased)",
        report.written.len(),
        args.output_dir.display(),
        report.empty.len(),
        report.aliased.len()
    );
    for failure in &report.failures {
        eprintln!("  failed: {}: {}", failure.record, failure.error);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} files could not be written", report.failures.len()).into())
    }
}
