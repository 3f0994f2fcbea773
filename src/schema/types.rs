// src/schema/types.rs

/// Every column the pipeline reads or writes, in canonical order.
///
/// The CSV headers are the published Spanish names; files are aligned by
/// header name, never by position, so years with fewer columns load cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Cycle,
    Entity,
    Department,
    SubDepartment,
    Program,
    Description,
    BudgetKind,
    GcPersonalServices,
    GcOperatingExpenses,
    GcSubsidies,
    GcOtherCurrent,
    GcSum,
    GiPensions,
    GiPhysicalInvestment,
    GiSubsidies,
    GiOtherInvestment,
    GiSum,
    Total,
    PctCurrent,
    PctPensions,
    PctInvestment,
}

impl Column {
    pub const COUNT: usize = 21;

    pub const ALL: [Column; Column::COUNT] = [
        Column::Cycle,
        Column::Entity,
        Column::Department,
        Column::SubDepartment,
        Column::Program,
        Column::Description,
        Column::BudgetKind,
        Column::GcPersonalServices,
        Column::GcOperatingExpenses,
        Column::GcSubsidies,
        Column::GcOtherCurrent,
        Column::GcSum,
        Column::GiPensions,
        Column::GiPhysicalInvestment,
        Column::GiSubsidies,
        Column::GiOtherInvestment,
        Column::GiSum,
        Column::Total,
        Column::PctCurrent,
        Column::PctPensions,
        Column::PctInvestment,
    ];

    /// Header text as it appears in every CSV the pipeline produces.
    pub const fn name(self) -> &'static str {
        match self {
            Column::Cycle => "CICLO",
            Column::Entity => "ENTE",
            Column::Department => "RAMO",
            Column::SubDepartment => "SUBRAMO",
            Column::Program => "PROGRAMA",
            Column::Description => "DESCRIPCIÓN",
            Column::BudgetKind => "PRESUPUESTO",
            Column::GcPersonalServices => "GC_SERVICIOS_PERSONALES",
            Column::GcOperatingExpenses => "GC_GASTO_DE_OPERACIÓN",
            Column::GcSubsidies => "GC_SUBSIDIOS",
            Column::GcOtherCurrent => "GC_OTROS_DE_CORRIENTE",
            Column::GcSum => "GC_SUMA",
            Column::GiPensions => "GI_PENSIONES_Y_JUBILACIONES",
            Column::GiPhysicalInvestment => "GI_INVERSIÓN_FÍSICA",
            Column::GiSubsidies => "GI_SUBSIDIOS",
            Column::GiOtherInvestment => "GI_OTROS_DE_INVERSIÓN",
            Column::GiSum => "GI_SUMA",
            Column::Total => "TOTAL",
            Column::PctCurrent => "PORCENTAJE_CORRIENTE",
            Column::PctPensions => "PORCENTAJE_PENSIONES_Y_JUBILACIONES",
            Column::PctInvestment => "PORCENTAJE_INVERSIÓN",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        let name = name.trim();
        Column::ALL.iter().copied().find(|c| c.name() == name)
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Pension/retirement columns, first published in 2016.
    pub const fn is_pension(self) -> bool {
        matches!(self, Column::GiPensions | Column::PctPensions)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Columns of the program-level detailed table.
pub const DETAILED_COLUMNS: &[Column] = &[
    Column::Cycle,
    Column::Entity,
    Column::Department,
    Column::Program,
    Column::Description,
    Column::BudgetKind,
    Column::GcPersonalServices,
    Column::GcOperatingExpenses,
    Column::GcSubsidies,
    Column::GcOtherCurrent,
    Column::GcSum,
    Column::GiPensions,
    Column::GiPhysicalInvestment,
    Column::GiSubsidies,
    Column::GiOtherInvestment,
    Column::GiSum,
    Column::Total,
    Column::PctCurrent,
    Column::PctInvestment,
];

/// Columns of the department totals table.
pub const TOTALS_COLUMNS: &[Column] = &[
    Column::Cycle,
    Column::Entity,
    Column::Department,
    Column::BudgetKind,
    Column::GcPersonalServices,
    Column::GcOperatingExpenses,
    Column::GcSubsidies,
    Column::GcOtherCurrent,
    Column::GcSum,
    Column::GiPensions,
    Column::GiPhysicalInvestment,
    Column::GiSubsidies,
    Column::GiOtherInvestment,
    Column::GiSum,
    Column::Total,
    Column::PctCurrent,
    Column::PctPensions,
    Column::PctInvestment,
];
