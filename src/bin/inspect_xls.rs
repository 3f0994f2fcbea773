//! inspect_xls.rs: print the raw rows of one year's workbook with their
//! sheet indices, to check a layout's row offset and column positions.
//!
//! usage: inspect_xls <YEAR> [--input-dir xls] [--from 0] [--limit 40]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cuentapublica::{load_workbook, PipelineConfig};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Dump raw workbook rows with sheet coordinates")]
struct Args {
    year: u16,
    #[arg(long, default_value = "./xls")]
    input_dir: PathBuf,
    /// First sheet row to print.
    #[arg(long, default_value_t = 0)]
    from: usize,
    #[arg(long, default_value_t = 40)]
    limit: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let config = PipelineConfig {
        input_dir: args.input_dir.clone(),
        ..PipelineConfig::default()
    };
    let path = config.workbook_path(args.year);
    let sheet = load_workbook(args.year, &path)
        .with_context(|| format!("opening {}", path.display()))?;

    let variant = config.variant(args.year);
    let layout = variant.layout();
    info!(
        year = args.year,
        %variant,
        height = sheet.height(),
        width = sheet.width(),
        expected_width = variant.row_width(args.year),
        first_row = layout.first_row,
        "loaded"
    );

    for (idx, row) in sheet.rows.iter().enumerate().skip(args.from).take(args.limit) {
        let marker = if idx == layout.first_row { ">" } else { " " };
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.trim().is_empty())
            .map(|(col, c)| format!("[{}]{}", col, c.trim()))
            .collect();
        println!("{}{:>5} | {}", marker, idx, cells.join(" "));
    }
    Ok(())
}
