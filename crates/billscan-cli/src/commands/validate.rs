//! Validate command - keyword check without extraction.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;

use billscan_core::{BillIntake, SourceKind};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Input file (txt or pdf)
    #[arg(required = true)]
    input: PathBuf,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let ext = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let kind = SourceKind::from_extension(ext)
        .filter(|kind| matches!(kind, SourceKind::Text | SourceKind::Pdf));
    let Some(kind) = kind else {
        anyhow::bail!("Only text and PDF files can be validated: {}", args.input.display());
    };

    let intake = BillIntake::new(&config);
    intake.check_size(fs::metadata(&args.input)?.len())?;

    let text = match kind {
        SourceKind::Pdf => intake.pdf_text(&fs::read(&args.input)?)?,
        _ => fs::read_to_string(&args.input)?,
    };

    // Same gate the analyze path applies
    let validator = intake.pipeline().validator();
    let matched = validator.matched_keywords(&text);

    if validator.validate(&text) {
        println!(
            "{} Looks like a utility bill ({} keywords: {})",
            style("✓").green(),
            matched.len(),
            matched.join(", ")
        );
        Ok(())
    } else {
        anyhow::bail!(
            "Does not appear to be a utility bill ({} of {} required keywords found)",
            matched.len(),
            config.extraction.min_keyword_hits
        )
    }
}
