use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a conversion or compile run.
///
/// Every per-year variant carries the fiscal year so the run can report
/// exactly which workbook broke.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("year {year}: workbook not found at {}", path.display())]
    MissingWorkbook { year: u16, path: PathBuf },

    #[error("year {year}: intermediate table not found at {}", path.display())]
    MissingTable { year: u16, path: PathBuf },

    #[error("year {year}: cannot read workbook {}: {message}", path.display())]
    Workbook {
        year: u16,
        path: PathBuf,
        message: String,
    },

    #[error("year {year}: sheet has {rows} rows but data is expected from row {first_row}")]
    EmptySheet {
        year: u16,
        rows: usize,
        first_row: usize,
    },

    #[error("year {year}, row {row}: schema mismatch, expected {expected} columns, found {found}")]
    SchemaMismatch {
        year: u16,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{}: unknown column `{column}`", path.display())]
    UnknownColumn { path: PathBuf, column: String },

    #[error("{}: invalid cycle `{value}`", path.display())]
    BadCycle { path: PathBuf, value: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// The fiscal year the error belongs to, when it is a per-year failure.
    pub fn year(&self) -> Option<u16> {
        match self {
            Self::MissingWorkbook { year, .. }
            | Self::MissingTable { year, .. }
            | Self::Workbook { year, .. }
            | Self::EmptySheet { year, .. }
            | Self::SchemaMismatch { year, .. } => Some(*year),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
