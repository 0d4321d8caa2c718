//! Batch command for multiple bill files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use billscan_core::models::config::SessionDefaults;
use billscan_core::{AnalyzedBill, BillIntake, SourceKind};

use super::analyze::{analyze_file, format_analysis, CostOverrides, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Tax rate in percent applied to every bill
    #[arg(long)]
    tax_percent: Option<Decimal>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    bill: Option<AnalyzedBill>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            SourceKind::from_extension(ext).is_some()
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let intake = Arc::new(BillIntake::new(&config));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let overrides = CostOverrides::new(args.tax_percent, None);
    let defaults = config.session;

    let mut tasks = JoinSet::new();
    for path in files {
        let intake = Arc::clone(&intake);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let result =
                tokio::task::spawn_blocking(move || process_file(path, &intake, defaults, overrides))
                    .await?;
            anyhow::Ok(result)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result = joined??;
        pb.inc(1);

        if let Some(message) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), message);
            } else {
                error!("Failed to process {}: {}", result.path.display(), message);
                tasks.abort_all();
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", result.path.display(), message);
            }
        }
        results.push(result);
    }

    pb.finish_and_clear();
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful: Vec<_> = results.iter().filter(|r| r.bill.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(bill) = &result.bill {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("bill");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_analysis(bill, None, None, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_file(
    path: PathBuf,
    intake: &BillIntake,
    defaults: SessionDefaults,
    overrides: CostOverrides,
) -> FileResult {
    let file_start = Instant::now();
    let outcome = analyze_file(&path, intake, defaults, overrides);
    let processing_time_ms = file_start.elapsed().as_millis() as u64;

    match outcome {
        Ok(analysis) => FileResult {
            path,
            bill: Some(analysis.bill),
            error: None,
            processing_time_ms,
        },
        Err(e) => FileResult {
            path,
            bill: None,
            error: Some(e.to_string()),
            processing_time_ms,
        },
    }
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "units",
        "rate",
        "payable",
        "due_date",
        "reference_number",
        "computed_total",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(bill) = &result.bill {
            wtr.write_record([
                filename,
                "success",
                &bill.record.units.to_string(),
                &bill.record.rate.to_string(),
                &bill.record.total.to_string(),
                &bill.record.due_date,
                &bill.record.reference_number,
                &bill.breakdown.total.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
