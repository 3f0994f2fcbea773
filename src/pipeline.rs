//! Fan-out/fan-in driver: every configured year is converted independently
//! (optionally on the rayon pool), then all intermediate tables are compiled.

use std::{
    collections::BTreeMap,
    path::PathBuf,
    time::Instant,
};

use rayon::prelude::*;
use tracing::{error, info};

use crate::compile::{compile, CompiledTables};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::history::{record_run, RunManifest};
use crate::process::{discover_year_tables, load_workbook, normalize, YearTable};

/// Outcome of converting one workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedYear {
    pub year: u16,
    pub path: PathBuf,
    pub rows: usize,
}

/// Load, normalize and persist one year.
pub fn convert_year(config: &PipelineConfig, year: u16) -> Result<ConvertedYear> {
    let sheet = load_workbook(year, config.workbook_path(year))?;
    let table = normalize(&sheet, config.variant(year))?;
    let path = table.write_csv(&config.intermediate_dir)?;
    info!(year, rows = table.rows.len(), path = %path.display(), "processed");
    Ok(ConvertedYear {
        year,
        path,
        rows: table.rows.len(),
    })
}

/// Convert every configured year. Any failure fails the whole batch; the
/// reported error is the one of the earliest failing year.
pub fn convert_all(config: &PipelineConfig) -> Result<Vec<ConvertedYear>> {
    let years: Vec<u16> = config.years().collect();
    let results: Vec<Result<ConvertedYear>> = if config.parallel {
        years.par_iter().map(|&y| convert_year(config, y)).collect()
    } else {
        years.iter().map(|&y| convert_year(config, y)).collect()
    };

    let mut converted = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(c) => converted.push(c),
            Err(e) => {
                error!(year = ?e.year(), "conversion failed: {}", e);
                return Err(e);
            }
        }
    }
    Ok(converted)
}

/// Load the intermediate tables of the configured years. Every year must be
/// present; compiling from a partial set would silently under-report.
pub fn load_intermediate(config: &PipelineConfig) -> Result<Vec<YearTable>> {
    let found: BTreeMap<u16, PathBuf> = discover_year_tables(&config.intermediate_dir)?
        .into_iter()
        .collect();

    config
        .years()
        .map(|year| {
            let path = found.get(&year).ok_or_else(|| PipelineError::MissingTable {
                year,
                path: config.intermediate_dir.join(format!("{}.csv", year)),
            })?;
            YearTable::read_csv(path)
        })
        .collect()
}

/// Compile `tables` and write both final outputs.
pub fn compile_outputs(config: &PipelineConfig, tables: Vec<YearTable>) -> Result<CompiledTables> {
    let compiled = compile(tables);
    let detailed = compiled.write_detailed(&config.detailed_output)?;
    let totals = compiled.write_totals(&config.totals_output)?;
    info!(
        detailed,
        totals,
        detailed_path = %config.detailed_output.display(),
        totals_path = %config.totals_output.display(),
        "wrote compiled tables"
    );
    Ok(compiled)
}

/// Full run: convert (unless `skip_convert`), compile, record the manifest.
/// The intermediate tables are read back from disk exactly once.
pub fn run(config: &PipelineConfig, skip_convert: bool) -> Result<RunManifest> {
    config.validate()?;
    let start = Instant::now();

    if skip_convert {
        info!(dir = %config.intermediate_dir.display(), "reusing intermediate tables");
    } else {
        convert_all(config)?;
    }
    let tables = load_intermediate(config)?;
    let years: BTreeMap<u16, usize> = tables.iter().map(|t| (t.year, t.rows.len())).collect();

    let compiled = compile_outputs(config, tables)?;
    let manifest = RunManifest::new(years, compiled.detailed.len(), compiled.totals.len());
    record_run(&config.intermediate_dir, &manifest)?;

    info!(elapsed = ?start.elapsed(), "pipeline finished");
    Ok(manifest)
}
