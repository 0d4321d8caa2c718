//! Config command - inspect and create the bill analysis settings.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;

use billscan_core::bill::rules::format_amount;
use billscan_core::bill::BILL_KEYWORDS;
use billscan_core::BillscanConfig;

use super::{default_config_path, resolve_config, ConfigSource};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show the settings bills are analyzed with
    Show(ShowArgs),

    /// Write a configuration file with default values
    Init(InitArgs),

    /// Show which configuration file is in use
    Path,
}

#[derive(Args)]
struct ShowArgs {
    /// Print the raw JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show(show_args) => show_config(show_args, config_path),
        ConfigCommand::Init(init_args) => init_config(init_args),
        ConfigCommand::Path => show_path(config_path),
    }
}

fn show_config(args: ShowArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let (config, source) = resolve_config(config_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", describe(&config, &source));
    }

    Ok(())
}

/// Human-readable summary of the settings that shape an analysis.
fn describe(config: &BillscanConfig, source: &ConfigSource) -> String {
    let extraction = &config.extraction;
    let session = &config.session;
    let mut lines = vec![format!("Configuration: {}", source), String::new()];

    lines.push(style("Extraction").bold().to_string());
    lines.push(format!(
        "  Units range:       {} - {} kWh",
        extraction.units_range.min.normalize(),
        extraction.units_range.max.normalize()
    ));
    lines.push(format!(
        "  Payable range:     {} - {}",
        format_amount(extraction.amount_range.min),
        format_amount(extraction.amount_range.max)
    ));
    lines.push(format!(
        "  Fallback rate:     {} per unit",
        format_amount(extraction.fallback_rate)
    ));
    lines.push(format!(
        "  Bill keywords:     {} of {} required",
        extraction.min_keyword_hits,
        BILL_KEYWORDS.len()
    ));

    lines.push(style("New analysis").bold().to_string());
    lines.push(format!(
        "  Rate:              {} per unit",
        format_amount(session.rate)
    ));
    lines.push(format!(
        "  Tax rate:          {}%",
        (session.tax_rate * Decimal::ONE_HUNDRED).normalize()
    ));

    lines.push(style("Uploads").bold().to_string());
    lines.push(format!(
        "  Max file size:     {} bytes",
        config.intake.max_upload_bytes
    ));
    lines.push(format!(
        "  PDF text minimum:  {} characters",
        config.pdf.min_text_length
    ));

    lines.join("\n")
}

fn init_config(args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(default_config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    BillscanConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'billscan config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_defaults() {
        let summary = describe(&BillscanConfig::default(), &ConfigSource::Defaults);

        assert!(summary.contains("Configuration: built-in defaults"));
        assert!(summary.contains("Units range:       10 - 10000 kWh"));
        assert!(summary.contains("Payable range:     100.00 - 100,000.00"));
        assert!(summary.contains("Fallback rate:     16.00 per unit"));
        assert!(summary.contains("3 of 16 required"));
        assert!(summary.contains("Tax rate:          5%"));
    }

    #[test]
    fn test_describe_custom_session() {
        let mut config = BillscanConfig::default();
        config.session.rate = Decimal::new(2250, 2);
        config.session.tax_rate = Decimal::new(175, 3);

        let source = ConfigSource::Explicit(PathBuf::from("/tmp/bills.json"));
        let summary = describe(&config, &source);

        assert!(summary.contains("Configuration: /tmp/bills.json"));
        assert!(summary.contains("Rate:              22.50 per unit"));
        assert!(summary.contains("Tax rate:          17.5%"));
    }
}
