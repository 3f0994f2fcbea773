use super::types::Column;

/// First year whose workbook carries the pension/retirement columns.
pub const PENSIONS_FIRST_YEAR: u16 = 2016;

/// Last year published in the old layout, unless configured otherwise.
pub const OLD_FORMAT_LAST_YEAR: u16 = 2014;

/// The two historical workbook layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaVariant {
    /// Up to 2014: no sub-department level, data from row 13.
    OldFormat,
    /// 2015 onwards: adds the sub-department level, data from row 9.
    NewFormat,
}

/// Fixed cell offsets of one layout. All indices are zero-based sheet
/// positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub first_row: usize,
    pub entity: usize,
    pub department: usize,
    pub sub_department: Option<usize>,
    pub program: usize,
    /// First budget-figure column; holds the budget kind or a category
    /// description and doubles as the "row has data" signal.
    pub anchor: usize,
    pub first_figure: usize,
}

const OLD_FIGURES: &[Column] = &[
    Column::GcPersonalServices,
    Column::GcOperatingExpenses,
    Column::GcSubsidies,
    Column::GcOtherCurrent,
    Column::GcSum,
    Column::GiPhysicalInvestment,
    Column::GiSubsidies,
    Column::GiOtherInvestment,
    Column::GiSum,
    Column::Total,
    Column::PctCurrent,
    Column::PctInvestment,
];

const NEW_FIGURES: &[Column] = &[
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

impl SchemaVariant {
    pub fn for_year(year: u16, old_format_last_year: u16) -> Self {
        if year <= old_format_last_year {
            SchemaVariant::OldFormat
        } else {
            SchemaVariant::NewFormat
        }
    }

    pub const fn layout(self) -> Layout {
        match self {
            // col 5 is an empty helper column in the old workbooks
            SchemaVariant::OldFormat => Layout {
                first_row: 13,
                entity: 1,
                department: 2,
                sub_department: None,
                program: 3,
                anchor: 4,
                first_figure: 6,
            },
            SchemaVariant::NewFormat => Layout {
                first_row: 9,
                entity: 2,
                department: 3,
                sub_department: Some(4),
                program: 5,
                anchor: 6,
                first_figure: 7,
            },
        }
    }

    /// Figure columns that follow the anchor, in sheet order.
    pub fn figure_columns(self, year: u16) -> Vec<Column> {
        match self {
            SchemaVariant::OldFormat => OLD_FIGURES.to_vec(),
            SchemaVariant::NewFormat if year < PENSIONS_FIRST_YEAR => NEW_FIGURES
                .iter()
                .copied()
                .filter(|c| !c.is_pension())
                .collect(),
            SchemaVariant::NewFormat => NEW_FIGURES.to_vec(),
        }
    }

    /// Header of the per-year intermediate table.
    pub fn header(self, year: u16) -> Vec<Column> {
        let mut cols = vec![Column::Cycle, Column::Entity, Column::Department];
        if self == SchemaVariant::NewFormat {
            cols.push(Column::SubDepartment);
        }
        cols.push(Column::Program);
        cols.push(Column::BudgetKind);
        cols.extend(self.figure_columns(year));
        cols
    }

    /// Minimum number of cells a data row must have.
    pub fn row_width(self, year: u16) -> usize {
        self.layout().first_figure + self.figure_columns(year).len()
    }
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaVariant::OldFormat => write!(f, "old format"),
            SchemaVariant::NewFormat => write!(f, "new format"),
        }
    }
}
