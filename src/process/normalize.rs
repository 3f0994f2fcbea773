//! Row carry-forward normalizer.
//!
//! The workbooks are exported from a visually merged layout: a hierarchy
//! label (entity, department, sub-department, program) only appears on the
//! first row of its group. Walking the rows in file order and carrying the
//! last non-blank label of every level forward flattens them into one fully
//! populated table per year.

use tracing::{debug, info, instrument};

use super::raw_table::RawSheet;
use super::utils::is_blank;
use crate::error::{PipelineError, Result};
use crate::schema::{Column, Layout, NormalizedRow, SchemaVariant, TOTAL_PROGRAM};

/// Last non-blank label seen at each hierarchy level. A fresh state is used
/// for every workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyState {
    pub entity: String,
    pub department: String,
    pub sub_department: String,
    pub program: String,
}

impl Default for HierarchyState {
    fn default() -> Self {
        Self {
            entity: String::new(),
            department: String::new(),
            sub_department: String::new(),
            program: TOTAL_PROGRAM.to_string(),
        }
    }
}

/// Normalized rows of one fiscal year plus the header they are written with.
#[derive(Debug, Clone, PartialEq)]
pub struct YearTable {
    pub year: u16,
    pub columns: Vec<Column>,
    pub rows: Vec<NormalizedRow>,
}

/// Normalize one year's sheet with a fresh [`HierarchyState`].
///
/// The last sheet row is a footer and is never read.
#[instrument(level = "info", skip(sheet), fields(year = sheet.year, rows = sheet.height()))]
pub fn normalize(sheet: &RawSheet, variant: SchemaVariant) -> Result<YearTable> {
    let year = sheet.year;
    let layout = variant.layout();

    if sheet.height() <= layout.first_row + 1 {
        return Err(PipelineError::EmptySheet {
            year,
            rows: sheet.height(),
            first_row: layout.first_row,
        });
    }

    let end = sheet.height() - 1;
    let mut dropped = 0usize;
    let rows = sheet.rows[layout.first_row..end]
        .iter()
        .enumerate()
        .try_fold(
            (HierarchyState::default(), Vec::new()),
            |(mut state, mut out), (offset, raw)| {
                match normalize_row(&mut state, year, variant, layout.first_row + offset, raw)? {
                    Some(row) => out.push(row),
                    None => dropped += 1,
                }
                Ok::<_, PipelineError>((state, out))
            },
        )?
        .1;

    debug!(year, dropped, "dropped rows without a budget anchor");
    info!(year, %variant, kept = rows.len(), "normalized");

    Ok(YearTable {
        year,
        columns: variant.header(year),
        rows,
    })
}

/// Apply one raw row to `state` and return the flattened row, or `None`
/// when the row has no anchor value (a pure section header).
///
/// `row_index` is the sheet row, used only for error reporting.
pub fn normalize_row(
    state: &mut HierarchyState,
    year: u16,
    variant: SchemaVariant,
    row_index: usize,
    raw: &[String],
) -> Result<Option<NormalizedRow>> {
    let layout = variant.layout();
    let figures = variant.figure_columns(year);
    check_width(year, row_index, layout.first_figure + figures.len(), raw)?;

    let current_entity = raw[layout.entity].trim();
    let current_department = raw[layout.department].trim();
    let current_program = raw[layout.program].trim();
    let anchor = raw[layout.anchor].trim();

    // Entity; a new entity also closes the previous sub-department
    if !current_entity.is_empty() {
        if variant == SchemaVariant::NewFormat {
            state.sub_department.clear();
        }
        state.entity = current_entity.to_string();
    }

    // Department; in the old layout a new department starts at its total rows
    if !current_department.is_empty() {
        if variant == SchemaVariant::OldFormat && current_department != state.department {
            state.program = TOTAL_PROGRAM.to_string();
        }
        state.department = current_department.to_string();
    }

    let entity = state.entity.clone();
    let mut department = state.department.clone();
    let mut sub_department = String::new();

    if let Some(col) = layout.sub_department {
        let current_sub = raw[col].trim();
        if !current_sub.is_empty() {
            state.sub_department = current_sub.to_string();
        }
        sub_department = state.sub_department.clone();

        // the department sometimes lands one column to the right
        if department.is_empty() && !sub_department.is_empty() {
            department = std::mem::take(&mut sub_department);
        }
    }

    let program = if current_program.is_empty() {
        if anchor.is_empty() {
            // section end: following rows belong to a total again
            state.program = TOTAL_PROGRAM.to_string();
            String::new()
        } else {
            state.program.clone()
        }
    } else {
        state.program = current_program.to_string();
        current_program.to_string()
    };

    if anchor.is_empty() {
        return Ok(None);
    }

    Ok(Some(build_row(
        year,
        &layout,
        &figures,
        raw,
        [entity, department, sub_department, program],
        anchor,
        variant,
    )))
}

fn build_row(
    year: u16,
    layout: &Layout,
    figures: &[Column],
    raw: &[String],
    [entity, department, sub_department, program]: [String; 4],
    anchor: &str,
    variant: SchemaVariant,
) -> NormalizedRow {
    let mut row = NormalizedRow::new();
    row.set(Column::Cycle, year.to_string());
    row.set(Column::Entity, entity);
    row.set(Column::Department, department);
    if variant == SchemaVariant::NewFormat {
        row.set(Column::SubDepartment, sub_department);
    }
    row.set(Column::Program, program);
    row.set(Column::BudgetKind, anchor);
    for (i, col) in figures.iter().enumerate() {
        row.set(*col, raw[layout.first_figure + i].trim());
    }
    row
}

/// Rows must reach every column the layout reads, and nothing may sit
/// beyond it.
fn check_width(year: u16, row: usize, expected: usize, raw: &[String]) -> Result<()> {
    if raw.len() < expected {
        return Err(PipelineError::SchemaMismatch {
            year,
            row,
            expected,
            found: raw.len(),
        });
    }
    if let Some(last) = raw.iter().rposition(|c| !is_blank(c)) {
        if last >= expected {
            return Err(PipelineError::SchemaMismatch {
                year,
                row,
                expected,
                found: last + 1,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::init_test_logging;

    fn old_row(
        entity: &str,
        department: &str,
        program: &str,
        anchor: &str,
        total: &str,
    ) -> Vec<String> {
        let mut cells = vec![String::new(); SchemaVariant::OldFormat.row_width(2013)];
        cells[1] = entity.into();
        cells[2] = department.into();
        cells[3] = program.into();
        cells[4] = anchor.into();
        if !total.is_empty() {
            // TOTAL is the 10th figure column
            cells[6 + 9] = total.into();
        }
        cells
    }

    fn new_row(
        year: u16,
        entity: &str,
        department: &str,
        sub_department: &str,
        program: &str,
        anchor: &str,
    ) -> Vec<String> {
        let mut cells = vec![String::new(); SchemaVariant::NewFormat.row_width(year)];
        cells[2] = entity.into();
        cells[3] = department.into();
        cells[4] = sub_department.into();
        cells[5] = program.into();
        cells[6] = anchor.into();
        cells
    }

    fn sheet(year: u16, first_row: usize, body: Vec<Vec<String>>) -> RawSheet {
        let width = body.first().map(Vec::len).unwrap_or(0);
        let mut rows = vec![vec![String::new(); width]; first_row];
        rows.extend(body);
        // footer row, never read
        rows.push(vec!["Fuente: SHCP".to_string(); 1]);
        RawSheet::new(year, rows)
    }

    #[test]
    fn old_format_carries_entity_and_department_forward() -> anyhow::Result<()> {
        init_test_logging();
        let body = vec![
            old_row("Poder Legislativo", "Cámara de Senadores", "", "Aprobado", "100"),
            old_row("", "", "", "Modificado", "110"),
            old_row("", "", "", "Devengado", "105"),
            old_row("", "", "", "Ejercicio", "104"),
            old_row("", "", "Actividades de apoyo", "Aprobado", "50"),
        ];
        let table = normalize(&sheet(2013, 13, body), SchemaVariant::OldFormat)?;

        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.columns, SchemaVariant::OldFormat.header(2013));
        for row in &table.rows[1..4] {
            assert_eq!(row.entity(), Some("Poder Legislativo"));
            assert_eq!(row.department(), Some("Cámara de Senadores"));
            assert_eq!(row.program(), Some(TOTAL_PROGRAM));
            assert_eq!(row.get(Column::SubDepartment), None);
        }
        assert_eq!(table.rows[3].get(Column::Total), Some("104"));
        assert_eq!(table.rows[4].program(), Some("Actividades de apoyo"));
        assert!(table.rows.iter().all(|r| r.cycle() == Some(2013)));
        Ok(())
    }

    #[test]
    fn emitted_rows_always_have_program_and_anchor() -> anyhow::Result<()> {
        init_test_logging();
        let body = vec![
            new_row(2018, "Poder Ejecutivo", "", "", "", ""),
            new_row(2018, "", "Salud", "", "", "Aprobado"),
            new_row(2018, "", "", "", "Vacunación", ""),
            new_row(2018, "", "", "", "", "Aprobado"),
            new_row(2018, "", "", "", "", ""),
            new_row(2018, "", "", "", "", "Ejercicio"),
        ];
        let table = normalize(&sheet(2018, 9, body), SchemaVariant::NewFormat)?;

        assert_eq!(table.rows.len(), 3);
        for row in &table.rows {
            assert!(row.program().is_some());
            assert!(row.budget_kind_text().is_some());
        }
        assert_eq!(table.rows[1].program(), Some("Vacunación"));
        assert_eq!(table.rows[2].program(), Some(TOTAL_PROGRAM));
        Ok(())
    }

    #[test]
    fn blank_program_and_anchor_resets_program_to_total() -> Result<()> {
        let mut state = HierarchyState {
            program: "Subsidios".into(),
            ..HierarchyState::default()
        };
        let raw = new_row(2019, "", "", "", "", "");
        let out = normalize_row(&mut state, 2019, SchemaVariant::NewFormat, 20, &raw)?;
        assert!(out.is_none());
        assert_eq!(state.program, TOTAL_PROGRAM);
        Ok(())
    }

    #[test]
    fn department_shifted_into_sub_department_is_moved_back() -> Result<()> {
        let mut state = HierarchyState::default();
        let row = normalize_row(
            &mut state,
            2017,
            SchemaVariant::NewFormat,
            9,
            &new_row(2017, "Ramos Autónomos", "", "Instituto Nacional Electoral", "", "Aprobado"),
        )?
        .expect("row has an anchor");
        assert_eq!(row.department(), Some("Instituto Nacional Electoral"));
        assert_eq!(row.get(Column::SubDepartment), None);
        // carried state is left as read
        assert_eq!(state.department, "");
        assert_eq!(state.sub_department, "Instituto Nacional Electoral");
        Ok(())
    }

    #[test]
    fn continuation_row_inherits_prior_state() -> Result<()> {
        let mut state = HierarchyState {
            entity: "Poder Ejecutivo".into(),
            department: "SEP".into(),
            ..HierarchyState::default()
        };
        let mut raw = new_row(2020, "", "SEP", "", "Subsidios", "");
        raw[6] = "1000".into();
        let row = normalize_row(&mut state, 2020, SchemaVariant::NewFormat, 30, &raw)?
            .expect("row has an anchor");
        assert_eq!(row.entity(), Some("Poder Ejecutivo"));
        assert_eq!(row.department(), Some("SEP"));
        assert_eq!(row.program(), Some("Subsidios"));
        assert_eq!(state.program, "Subsidios");
        Ok(())
    }

    #[test]
    fn new_entity_clears_sub_department() -> Result<()> {
        let mut state = HierarchyState {
            entity: "Poder Ejecutivo".into(),
            department: "Salud".into(),
            sub_department: "Hospitales".into(),
            ..HierarchyState::default()
        };
        let row = normalize_row(
            &mut state,
            2021,
            SchemaVariant::NewFormat,
            40,
            &new_row(2021, "Entidades de Control Directo", "", "", "", "Aprobado"),
        )?
        .expect("row has an anchor");
        assert_eq!(row.get(Column::SubDepartment), None);
        assert_eq!(row.department(), Some("Salud"));
        Ok(())
    }

    #[test]
    fn old_format_new_department_resets_program() -> Result<()> {
        let mut state = HierarchyState {
            entity: "Poder Ejecutivo".into(),
            department: "Turismo".into(),
            program: "Promoción".into(),
            ..HierarchyState::default()
        };
        let row = normalize_row(
            &mut state,
            2014,
            SchemaVariant::OldFormat,
            14,
            &old_row("", "Economía", "", "Aprobado", "9"),
        )?
        .expect("row has an anchor");
        assert_eq!(row.program(), Some(TOTAL_PROGRAM));
        assert_eq!(row.department(), Some("Economía"));
        Ok(())
    }

    #[test]
    fn narrow_rows_are_a_schema_mismatch() {
        let mut state = HierarchyState::default();
        let raw = vec![String::new(); 10];
        let err = normalize_row(&mut state, 2016, SchemaVariant::NewFormat, 11, &raw).unwrap_err();
        match err {
            PipelineError::SchemaMismatch { year, row, expected, found } => {
                assert_eq!((year, row, expected, found), (2016, 11, 21, 10));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn values_beyond_the_layout_are_a_schema_mismatch() {
        let mut state = HierarchyState::default();
        // a 2016-wide row read as 2015 spills two cells
        let mut raw = new_row(2016, "Poder Ejecutivo", "Salud", "", "", "Aprobado");
        raw[20] = "1".into();
        let err = normalize_row(&mut state, 2015, SchemaVariant::NewFormat, 9, &raw).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { year: 2015, found: 21, .. }));
    }

    #[test]
    fn sheet_shorter_than_layout_is_rejected() {
        init_test_logging();
        let sheet = RawSheet::new(2013, vec![vec![String::new(); 18]; 5]);
        let err = normalize(&sheet, SchemaVariant::OldFormat).unwrap_err();
        assert_eq!(err.year(), Some(2013));
        assert!(matches!(err, PipelineError::EmptySheet { rows: 5, first_row: 13, .. }));
    }
}
