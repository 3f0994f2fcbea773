pub mod budget_kind;
pub mod row;
pub mod types;
pub mod variant;

pub use budget_kind::BudgetKind;
pub use row::{NormalizedRow, TOTAL_PROGRAM};
pub use types::{Column, DETAILED_COLUMNS, TOTALS_COLUMNS};
pub use variant::{Layout, SchemaVariant, OLD_FORMAT_LAST_YEAR, PENSIONS_FIRST_YEAR};
