//! summarize.rs: approved vs executed spending per year for one department
//! or program, in millions of pesos, optionally adjusted for inflation.
//!
//! usage:
//!   summarize --department "Turismo" --table data_total.csv --cpi assets/IPC.csv
//!   summarize --program vacuna --table data.csv --from-year 2019 --to-year 2022

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use cuentapublica::analysis::{
    abbreviate, executed_change, format_ratio, retain_years, summarize, yearly_pivot, GdpTable,
    InflationIndex, Selector, MILLIONS, NOT_APPLICABLE,
};
use cuentapublica::process::read_rows;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Yearly approved/executed summary from the compiled tables")]
struct Args {
    /// Exact department name (use with the totals table).
    #[arg(long, conflicts_with = "program")]
    department: Option<String>,
    /// Case-insensitive part of a program description (use with the detailed table).
    #[arg(long)]
    program: Option<String>,
    #[arg(long, default_value = "./data_total.csv")]
    table: PathBuf,
    /// First cycle to include.
    #[arg(long)]
    from_year: Option<u16>,
    /// Last cycle to include.
    #[arg(long)]
    to_year: Option<u16>,
    /// Monthly CPI table (`Fecha`, `IPC`) for inflation adjustment.
    #[arg(long)]
    cpi: Option<PathBuf>,
    /// Nominal GDP table (year, millions of pesos) for GDP shares.
    #[arg(long)]
    gdp: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let selector = match (args.department, args.program) {
        (Some(d), None) => Selector::Department(d),
        (None, Some(p)) => Selector::DescriptionContains(p),
        _ => bail!("pass exactly one of --department or --program"),
    };

    let (_, rows) = read_rows(&args.table)
        .with_context(|| format!("reading {}", args.table.display()))?;
    let mut pivot = yearly_pivot(&rows, &selector);
    retain_years(&mut pivot, args.from_year, args.to_year);
    if pivot.is_empty() {
        bail!("no rows match {:?} in {}", selector, args.table.display());
    }
    info!(rows = rows.len(), years = pivot.len(), "aggregated");

    let index = args
        .cpi
        .as_ref()
        .map(|p| InflationIndex::from_csv(p).with_context(|| format!("reading {}", p.display())))
        .transpose()?;
    let gdp = args
        .gdp
        .as_ref()
        .map(|p| GdpTable::from_csv(p).with_context(|| format!("reading {}", p.display())))
        .transpose()?;

    let lines = summarize(&pivot, index.as_ref());
    let change = executed_change(&lines);
    let na = || NOT_APPLICABLE.to_string();

    println!(
        "{:>6} {:>12} {:>12} {:>12} {:>10} {:>10}",
        "CICLO", "Aprobado", "Ejercicio", "Ejer/Aprob", "Var %", "% PIB"
    );
    for line in &lines {
        let approved = line.approved_adjusted.or(line.approved);
        let executed = line.executed_adjusted.or(line.executed);
        let share = gdp
            .as_ref()
            .zip(line.executed)
            .and_then(|(g, e)| g.share(line.cycle, e * MILLIONS));
        println!(
            "{:>6} {:>12} {:>12} {:>12} {:>10} {:>10}",
            line.cycle,
            approved.map(abbreviate).unwrap_or_else(na),
            executed.map(abbreviate).unwrap_or_else(na),
            format_ratio(line.ratio),
            change
                .get(&line.cycle)
                .copied()
                .flatten()
                .map(|c| format!("{:.1}%", c))
                .unwrap_or_else(na),
            share.map(|s| format!("{:.3}%", s)).unwrap_or_else(na),
        );
    }
    Ok(())
}
