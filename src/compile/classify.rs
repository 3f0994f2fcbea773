use crate::schema::{BudgetKind, Column, NormalizedRow};

/// One Approved/Modified/Accrued/Executed/percentage group; a description
/// is never carried further than this.
pub const DESCRIPTION_LOOKBACK: usize = 6;

/// Forward-fill of category descriptions with a bounded carry distance.
///
/// A `PRESUPUESTO` cell that is not a budget-kind label is a description
/// candidate. Rows without one take the nearest preceding candidate, as long
/// as it is at most `limit` rows back.
#[derive(Debug, Clone)]
pub struct DescriptionFill {
    last: Option<String>,
    distance: usize,
    limit: usize,
}

impl Default for DescriptionFill {
    fn default() -> Self {
        Self::new(DESCRIPTION_LOOKBACK)
    }
}

impl DescriptionFill {
    pub fn new(limit: usize) -> Self {
        Self {
            last: None,
            distance: 0,
            limit,
        }
    }

    /// Description for the next row given its raw `PRESUPUESTO` text.
    pub fn next(&mut self, budget_kind_text: Option<&str>) -> Option<String> {
        match budget_kind_text.filter(|t| BudgetKind::from_label(t).is_none()) {
            Some(candidate) => {
                self.last = Some(candidate.to_string());
                self.distance = 0;
                self.last.clone()
            }
            None => {
                self.distance = self.distance.saturating_add(1);
                if self.distance <= self.limit {
                    self.last.clone()
                } else {
                    None
                }
            }
        }
    }
}

/// Why a row leaves the compiled tables, or `Keep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowClass {
    Keep,
    /// Blank `PRESUPUESTO` cell; the row cannot be placed in any group.
    NoBudgetKind,
    /// The row is the category header itself: its description is its own
    /// `PRESUPUESTO` text.
    HeaderEcho,
    /// Percentage rows, recomputable from the absolute figures.
    Percentage,
    /// No description within reach; duplicates a parent category total.
    Unlabelled,
}

/// Classify a row whose `DESCRIPCIÓN` has already been derived.
pub fn classify(row: &NormalizedRow) -> RowClass {
    let description = row.description();
    let text = row.budget_kind_text();

    if text.is_none() {
        RowClass::NoBudgetKind
    } else if description.is_some() && description == text {
        RowClass::HeaderEcho
    } else if row.budget_kind().is_some_and(BudgetKind::is_percentage) {
        RowClass::Percentage
    } else if description.is_none() {
        RowClass::Unlabelled
    } else {
        RowClass::Keep
    }
}

/// Derive `DESCRIPCIÓN` for every row, in order.
pub fn fill_descriptions(rows: &mut [NormalizedRow]) {
    let mut fill = DescriptionFill::default();
    for row in rows.iter_mut() {
        let description = fill.next(row.budget_kind_text());
        row.put(Column::Description, description);
    }
}
