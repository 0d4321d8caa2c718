//! Manual command - cost breakdown from figures typed in by hand.

use clap::Args;
use rust_decimal::Decimal;

use billscan_core::{BillSession, ManualEntry, SavingsProjection};

use super::analyze::{format_analysis, OutputFormat};

/// Arguments for the manual command.
#[derive(Args)]
pub struct ManualArgs {
    /// Units consumed
    #[arg(short, long)]
    units: Decimal,

    /// Price per unit (default from config)
    #[arg(short, long)]
    rate: Option<Decimal>,

    /// Extra charges
    #[arg(short, long, default_value = "0")]
    extra_charges: Decimal,

    /// Tax rate in percent (default from config)
    #[arg(short, long)]
    tax_percent: Option<Decimal>,

    /// Project savings for a usage reduction, in percent
    #[arg(long)]
    savings: Option<Decimal>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: ManualArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let defaults = config.session;

    let entry = ManualEntry {
        units: args.units,
        rate: args.rate.unwrap_or(defaults.rate),
        extra_charges: args.extra_charges,
        tax_rate_percent: args
            .tax_percent
            .unwrap_or(defaults.tax_rate * Decimal::ONE_HUNDRED),
    };

    let mut session = BillSession::new(defaults);
    let bill = session.apply_manual(entry)?;

    let savings = args
        .savings
        .map(|pct| SavingsProjection::project(bill.breakdown.total, pct));

    println!(
        "{}",
        format_analysis(&bill, savings.as_ref(), None, args.format)?
    );

    Ok(())
}
