use super::types::Column;
use super::BudgetKind;

/// Program value of department/entity level total rows.
pub const TOTAL_PROGRAM: &str = "TOTAL";

/// One flat row keyed by [`Column`]. Blank cells are stored as `None`, so
/// a column missing from a year and an empty cell look the same downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRow {
    cells: [Option<String>; Column::COUNT],
}

impl NormalizedRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, col: Column) -> Option<&str> {
        self.cells[col.index()].as_deref()
    }

    /// Stores `value`; whitespace-only input clears the cell.
    pub fn set(&mut self, col: Column, value: impl Into<String>) {
        let value = value.into();
        self.cells[col.index()] = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
    }

    pub fn take(&mut self, col: Column) -> Option<String> {
        self.cells[col.index()].take()
    }

    pub fn put(&mut self, col: Column, value: Option<String>) {
        match value {
            Some(v) => self.set(col, v),
            None => self.cells[col.index()] = None,
        }
    }

    pub fn cycle(&self) -> Option<u16> {
        self.get(Column::Cycle).and_then(|c| c.parse().ok())
    }

    pub fn entity(&self) -> Option<&str> {
        self.get(Column::Entity)
    }

    pub fn department(&self) -> Option<&str> {
        self.get(Column::Department)
    }

    pub fn program(&self) -> Option<&str> {
        self.get(Column::Program)
    }

    pub fn description(&self) -> Option<&str> {
        self.get(Column::Description)
    }

    /// Raw `PRESUPUESTO` text: a budget-kind label or a category description.
    pub fn budget_kind_text(&self) -> Option<&str> {
        self.get(Column::BudgetKind)
    }

    pub fn budget_kind(&self) -> Option<BudgetKind> {
        self.budget_kind_text().and_then(BudgetKind::from_label)
    }

    pub fn is_total(&self) -> bool {
        self.program() == Some(TOTAL_PROGRAM)
    }

    /// Numeric value of a figure column, `None` for blanks and text.
    pub fn figure(&self, col: Column) -> Option<f64> {
        self.get(col).and_then(|v| v.trim().parse().ok())
    }

    /// Cell values for `columns`, blanks rendered as empty strings.
    pub fn project<'a>(&'a self, columns: &'a [Column]) -> impl Iterator<Item = &'a str> + 'a {
        columns.iter().map(move |c| self.get(*c).unwrap_or(""))
    }
}
