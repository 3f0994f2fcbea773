// src/process/table.rs
use std::{
    fs,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, WriterBuilder};
use glob::glob;
use tracing::{debug, warn};

use super::normalize::YearTable;
use super::utils::year_from_stem;
use crate::error::{PipelineError, Result};
use crate::schema::{Column, NormalizedRow};

/// Write `rows` projected onto `columns` as UTF-8 CSV with a header row.
///
/// The file is written next to `path` first and renamed over it, so an
/// interrupted run never leaves a truncated table behind.
pub fn write_rows<P: AsRef<Path>>(
    path: P,
    columns: &[Column],
    rows: &[NormalizedRow],
) -> Result<usize> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "table.csv".to_string());
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

    {
        let mut wtr = WriterBuilder::new().from_path(&tmp_path)?;
        wtr.write_record(columns.iter().map(|c| c.name()))?;
        for row in rows {
            wtr.write_record(row.project(columns))?;
        }
        wtr.flush()?;
    }
    fs::rename(&tmp_path, path)?;

    debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(rows.len())
}

/// Read a CSV written by [`write_rows`], aligning cells by header name.
/// Returns the file's columns in file order and its rows.
pub fn read_rows<P: AsRef<Path>>(path: P) -> Result<(Vec<Column>, Vec<NormalizedRow>)> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let columns = rdr
        .headers()?
        .iter()
        .map(|h| {
            Column::from_name(h).ok_or_else(|| PipelineError::UnknownColumn {
                path: path.to_path_buf(),
                column: h.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut row = NormalizedRow::new();
        for (col, value) in columns.iter().zip(record.iter()) {
            row.set(*col, value);
        }
        rows.push(row);
    }
    Ok((columns, rows))
}

impl YearTable {
    /// Persist as `<dir>/<year>.csv`.
    pub fn write_csv<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(format!("{}.csv", self.year));
        write_rows(&path, &self.columns, &self.rows)?;
        Ok(path)
    }

    /// Load an intermediate table; the year comes from the file stem and
    /// every row's `CICLO` must agree with it.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let year = year_from_stem(&stem).ok_or_else(|| PipelineError::BadCycle {
            path: path.to_path_buf(),
            value: stem.clone(),
        })?;

        let (columns, rows) = read_rows(path)?;
        if let Some(bad) = rows.iter().find(|r| r.cycle() != Some(year)) {
            return Err(PipelineError::BadCycle {
                path: path.to_path_buf(),
                value: bad.get(Column::Cycle).unwrap_or("").to_string(),
            });
        }
        Ok(Self { year, columns, rows })
    }
}

/// Every `<year>.csv` in `dir`, ascending by year. Other files are ignored.
pub fn discover_year_tables<P: AsRef<Path>>(dir: P) -> Result<Vec<(u16, PathBuf)>> {
    let pattern = format!("{}/*.csv", dir.as_ref().display());
    let entries = glob(&pattern)
        .map_err(|e| PipelineError::Config(format!("bad pattern {pattern}: {e}")))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                warn!("cannot read glob entry: {}", e);
                continue;
            }
        };
        let year = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(year_from_stem);
        match year {
            Some(year) => found.push((year, path)),
            None => debug!(path = %path.display(), "skipping non-year csv"),
        }
    }
    found.sort();
    Ok(found)
}
