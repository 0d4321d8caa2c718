//! Analyze command - extract and break down a single bill file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};

use billscan_core::bill::rules::format_amount;
use billscan_core::models::config::SessionDefaults;
use billscan_core::{
    AnalysisOutcome, AnalyzedBill, BillIntake, BillSession, BillSource, BillUpdate, ExtractedBill,
    SavingsProjection,
};

/// Arguments for the analyze command.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file (txt, pdf, jpg/png/webp, or structured json)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Tax rate in percent (default from config)
    #[arg(long)]
    tax_percent: Option<Decimal>,

    /// Extra charges added to the computed total
    #[arg(long)]
    extra_charges: Option<Decimal>,

    /// Project savings for a usage reduction, in percent
    #[arg(long)]
    savings: Option<Decimal>,

    /// Include per-field extraction diagnostics
    #[arg(long)]
    show_diagnostics: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Cost inputs given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CostOverrides {
    /// Tax rate as a fraction.
    pub tax_rate: Option<Decimal>,
    pub extra_charges: Option<Decimal>,
}

impl CostOverrides {
    pub fn new(tax_percent: Option<Decimal>, extra_charges: Option<Decimal>) -> Self {
        Self {
            tax_rate: tax_percent.map(|pct| pct / Decimal::ONE_HUNDRED),
            extra_charges,
        }
    }
}

/// A finished analysis of one file.
pub struct Analysis {
    pub bill: AnalyzedBill,
    pub extracted: ExtractedBill,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisOutput<'a> {
    #[serde(flatten)]
    bill: &'a AnalyzedBill,
    #[serde(skip_serializing_if = "Option::is_none")]
    savings: Option<&'a SavingsProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a ExtractedBill>,
}

pub async fn run(args: AnalyzeArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Analyzing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading bill...");
    pb.set_position(10);
    let intake = BillIntake::new(&config);

    pb.set_message("Extracting bill data...");
    pb.set_position(40);
    let overrides = CostOverrides::new(args.tax_percent, args.extra_charges);
    let analysis = analyze_file(&args.input, &intake, config.session, overrides);

    pb.finish_and_clear();
    let analysis = analysis?;

    for warning in analysis.extracted.warnings() {
        debug!("Extraction warning: {}", warning);
    }

    let savings = args
        .savings
        .map(|pct| SavingsProjection::project(analysis.bill.breakdown.total, pct));
    let diagnostics = args.show_diagnostics.then_some(&analysis.extracted);

    let output = format_analysis(&analysis.bill, savings.as_ref(), diagnostics, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read, extract and cost one bill file.
pub fn analyze_file(
    path: &Path,
    intake: &BillIntake,
    defaults: SessionDefaults,
    overrides: CostOverrides,
) -> anyhow::Result<Analysis> {
    intake.check_size(fs::metadata(path)?.len())?;
    let bytes = fs::read(path)?;
    let source = BillSource::from_bytes(path, bytes)?;

    let extracted = match intake.process(&source)? {
        AnalysisOutcome::Analyzed(extracted) => extracted,
        outcome => anyhow::bail!("{}", outcome.message().unwrap_or("Bill analysis failed")),
    };

    let mut update = BillUpdate::from_record(extracted.record().clone());
    if let Some(tax_rate) = overrides.tax_rate {
        update = update.with_tax_rate(tax_rate);
    }
    if let Some(extra_charges) = overrides.extra_charges {
        update = update.with_extra_charges(extra_charges);
    }

    let mut session = BillSession::new(defaults);
    let bill = session.update(update)?;

    Ok(Analysis { bill, extracted })
}

/// Render an analysis in the requested format.
pub fn format_analysis(
    bill: &AnalyzedBill,
    savings: Option<&SavingsProjection>,
    diagnostics: Option<&ExtractedBill>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&AnalysisOutput {
            bill,
            savings,
            diagnostics,
        })?),
        OutputFormat::Csv => format_csv(bill),
        OutputFormat::Text => Ok(format_text(bill, savings, diagnostics)),
    }
}

fn percent(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).normalize()
}

fn format_csv(bill: &AnalyzedBill) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let record = &bill.record;

    wtr.write_record([
        "bill_type",
        "units",
        "rate",
        "payable",
        "current_bill",
        "after_due_date",
        "due_date",
        "bill_month",
        "reference_number",
        "base",
        "tax",
        "extras",
        "total",
    ])?;

    wtr.write_record([
        record.bill_type.as_str(),
        &record.units.to_string(),
        &record.rate.to_string(),
        &record.total.to_string(),
        &record.current_bill.to_string(),
        &record.after_due_date.to_string(),
        &record.due_date,
        &record.bill_month,
        &record.reference_number,
        &bill.breakdown.base.to_string(),
        &bill.breakdown.tax.to_string(),
        &bill.breakdown.extras.to_string(),
        &bill.breakdown.total.to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(
    bill: &AnalyzedBill,
    savings: Option<&SavingsProjection>,
    diagnostics: Option<&ExtractedBill>,
) -> String {
    let record = &bill.record;
    let mut output = String::new();

    output.push_str(&format!("Bill type:    {}\n", record.bill_type.as_str()));
    for (label, value) in [
        ("Company", &record.company),
        ("Consumer", &record.consumer_name),
        ("Reference", &record.reference_number),
        ("Meter", &record.meter_number),
        ("Bill month", &record.bill_month),
        ("Due date", &record.due_date),
    ] {
        if !value.is_empty() {
            output.push_str(&format!("{:<13} {}\n", format!("{}:", label), value));
        }
    }
    output.push('\n');

    output.push_str(&format!("Units:        {}\n", record.units));
    output.push_str(&format!("Rate:         {} per unit\n", format_amount(record.rate)));
    if !record.total.is_zero() {
        output.push_str(&format!("Payable:      {}\n", format_amount(record.total)));
    }
    if !record.current_bill.is_zero() {
        output.push_str(&format!("Current bill: {}\n", format_amount(record.current_bill)));
    }
    if !record.after_due_date.is_zero() {
        output.push_str(&format!("After due:    {}\n", format_amount(record.after_due_date)));
    }
    output.push('\n');

    output.push_str(&format!("Breakdown (tax {}%):\n", percent(bill.tax_rate)));
    for (label, value) in bill.breakdown.components() {
        output.push_str(&format!("  {:<14} {:>12}\n", label, format_amount(value)));
    }
    output.push_str(&format!(
        "  {:<14} {:>12}\n",
        "Total",
        format_amount(bill.breakdown.total)
    ));

    if let Some(projection) = savings {
        output.push('\n');
        output.push_str(&format!(
            "Reducing usage by {}% saves {} (new total {})\n",
            projection.reduction_percent.normalize(),
            format_amount(projection.saved),
            format_amount(projection.new_total)
        ));
        output.push_str(&format!("Tip: {}\n", projection.tip));
    }

    if let Some(extracted) = diagnostics {
        if let ExtractedBill::Text(report) = extracted {
            output.push('\n');
            output.push_str("Diagnostics:\n");
            for (field, resolution) in [("units", &report.units), ("total", &report.total)] {
                for candidate in &resolution.accepted {
                    output.push_str(&format!(
                        "  {} <- {} = {} ({})\n",
                        field, candidate.rule, candidate.value, candidate.source
                    ));
                }
                for rejected in &resolution.rejected {
                    output.push_str(&format!(
                        "  {} x  {} = {} ({:?})\n",
                        field,
                        rejected.candidate.rule,
                        rejected.candidate.value,
                        rejected.rejection
                    ));
                }
            }
        }
        for warning in extracted.warnings() {
            output.push_str(&format!("  warning: {}\n", warning));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use billscan_core::{compute, BillRecord};

    fn bill() -> AnalyzedBill {
        let units = Decimal::from(150);
        let rate = Decimal::from(10);
        let tax_rate = Decimal::new(5, 2);
        AnalyzedBill {
            record: BillRecord {
                units,
                rate,
                total: Decimal::from(1775),
                due_date: "15 JAN 24".to_string(),
                ..BillRecord::default()
            },
            tax_rate,
            breakdown: compute(units, rate, Decimal::from(200), tax_rate).unwrap(),
            is_analyzed: true,
        }
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&bill(), None, None);

        assert!(text.contains("Due date:     15 JAN 24"));
        assert!(text.contains("Breakdown (tax 5%)"));
        assert!(text.contains("1,775.00"));
        assert!(text.contains("Extra Charges"));
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&bill()).unwrap();
        let mut lines = csv.lines();

        assert!(lines.next().unwrap().starts_with("bill_type,units,rate"));
        assert!(lines.next().unwrap().starts_with("electricity,150,10,1775"));
    }

    #[test]
    fn test_cost_overrides_percent() {
        let overrides = CostOverrides::new(Some(Decimal::from(17)), None);
        assert_eq!(overrides.tax_rate, Some(Decimal::new(17, 2)));
    }
}
