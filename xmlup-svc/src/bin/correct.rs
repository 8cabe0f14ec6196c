//! Command-line corrector
//!
//! Same correction as `POST /api/correct`, from a file on disk to a file
//! on disk.
//!
//! **Usage:**
//! ```bash
//! xmlup-correct article.xml --volume 105 --issue 2 --year 2024 --date 2024-03-20 [--out-dir DIR | --output FILE]
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use xmlup_common::{correct_document, decode_upload, has_xml_extension, CorrectionError, RawFields};

/// Add missing issue metadata to an XML file
#[derive(Parser, Debug)]
#[command(name = "xmlup-correct")]
#[command(about = "Insert issue metadata after the first </lpage> of an XML file")]
#[command(version)]
struct Args {
    /// XML file to correct
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Volume number (digits only)
    #[arg(long)]
    volume: String,

    /// Issue number (digits only)
    #[arg(long)]
    issue: String,

    /// Publication year (digits only)
    #[arg(long)]
    year: String,

    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    date: String,

    /// Directory for the corrected_vol{V}_iss{I}.xml output
    #[arg(long, value_name = "DIR", default_value = ".", conflicts_with = "output")]
    out_dir: PathBuf,

    /// Exact output path, replacing the generated file name
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    run(args)
}

fn run(args: Args) -> Result<()> {
    if !has_xml_extension(&args.input.to_string_lossy()) {
        warn!("{} does not have an .xml extension", args.input.display());
    }

    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let document = decode_upload(bytes)
        .with_context(|| format!("Failed to decode {}", args.input.display()))?;

    let raw = RawFields::new(args.volume, args.issue, args.year, args.date);
    let corrected = match correct_document(&raw, &document) {
        Ok(corrected) => corrected,
        Err(CorrectionError::Validation(errors)) => {
            for message in errors.messages() {
                error!("{}", message);
            }
            bail!("{} field(s) failed validation", errors.len());
        }
        Err(e) => bail!("{}", e),
    };

    let output = args
        .output
        .unwrap_or_else(|| args.out_dir.join(&corrected.file_name));
    std::fs::write(&output, corrected.content.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Success! Missing lines added. Wrote {}", output.display());
    Ok(())
}
