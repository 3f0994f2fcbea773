/// Expenditure stage a row of figures refers to, as labelled in the
/// `PRESUPUESTO` column. Any other text in that column is a category
/// description, not a budget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BudgetKind {
    Approved,
    Modified,
    Accrued,
    Executed,
    PctVsApproved,
    PctVsModified,
}

impl BudgetKind {
    pub const ALL: [BudgetKind; 6] = [
        BudgetKind::Approved,
        BudgetKind::Modified,
        BudgetKind::Accrued,
        BudgetKind::Executed,
        BudgetKind::PctVsApproved,
        BudgetKind::PctVsModified,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            BudgetKind::Approved => "Aprobado",
            BudgetKind::Modified => "Modificado",
            BudgetKind::Accrued => "Devengado",
            BudgetKind::Executed => "Ejercicio",
            BudgetKind::PctVsApproved => "Porcentaje Ejer/Aprob",
            BudgetKind::PctVsModified => "Porcentaje Ejer/Modif",
        }
    }

    /// Exact match only; the source labels are stable across years.
    pub fn from_label(label: &str) -> Option<BudgetKind> {
        BudgetKind::ALL.iter().copied().find(|k| k.label() == label)
    }

    pub const fn is_percentage(self) -> bool {
        matches!(self, BudgetKind::PctVsApproved | BudgetKind::PctVsModified)
    }
}

impl std::fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
