//! Normalization and reconciliation of the Cuenta Pública expenditure
//! workbooks (2013–2022) into a detailed per-program table and a
//! per-department totals table.

pub mod analysis;
pub mod compile;
pub mod config;
pub mod error;
pub mod history;
pub mod pipeline;
pub mod process;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use compile::{compile, CompiledTables};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use process::{load_workbook, normalize, HierarchyState, RawSheet, YearTable};
pub use schema::{BudgetKind, Column, NormalizedRow, SchemaVariant};
