//! Table compiler: concatenates every year, reconciles renamed categories,
//! drops echo/percentage/unlabelled rows and splits the result into the
//! program-level detailed table and the department totals table.

use std::{collections::HashMap, path::Path};

use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::process::{write_rows, YearTable};
use crate::schema::{NormalizedRow, DETAILED_COLUMNS, TOTALS_COLUMNS};

pub mod classify;
pub mod rename;

pub use classify::{classify, fill_descriptions, DescriptionFill, RowClass, DESCRIPTION_LOOKBACK};
pub use rename::{relocate_executive_branch, rename, rename_department, EXECUTIVE_BRANCH};

/// Both final datasets. Rows keep every column; the writers project them
/// onto [`DETAILED_COLUMNS`] and [`TOTALS_COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledTables {
    pub detailed: Vec<NormalizedRow>,
    pub totals: Vec<NormalizedRow>,
}

/// Concatenate, rename, classify and split. Tables are taken in ascending
/// year order regardless of input order; zero tables compile to two empty
/// tables.
#[instrument(level = "info", skip_all, fields(years = tables.len()))]
pub fn compile(mut tables: Vec<YearTable>) -> CompiledTables {
    tables.sort_by_key(|t| t.year);

    let mut rows: Vec<NormalizedRow> = tables.into_iter().flat_map(|t| t.rows).collect();
    let total_in = rows.len();

    let mut relocated = 0usize;
    let mut renamed = 0usize;
    for row in rows.iter_mut() {
        relocated += relocate_executive_branch(row) as usize;
        renamed += rename_department(row) as usize;
    }
    debug!(relocated, renamed, "reconciled departments");

    fill_descriptions(&mut rows);

    let mut dropped: HashMap<RowClass, usize> = HashMap::new();
    rows.retain(|row| match classify(row) {
        RowClass::Keep => true,
        RowClass::NoBudgetKind => {
            warn!(
                cycle = ?row.cycle(),
                entity = ?row.entity(),
                department = ?row.department(),
                "dropping row without a budget kind"
            );
            *dropped.entry(RowClass::NoBudgetKind).or_default() += 1;
            false
        }
        class => {
            *dropped.entry(class).or_default() += 1;
            false
        }
    });
    debug!(?dropped, kept = rows.len(), "classified rows");

    let (totals, detailed): (Vec<_>, Vec<_>) = rows.into_iter().partition(NormalizedRow::is_total);
    let totals: Vec<_> = totals.into_iter().filter(|r| r.department().is_some()).collect();

    info!(
        rows = total_in,
        detailed = detailed.len(),
        totals = totals.len(),
        "compiled"
    );
    CompiledTables { detailed, totals }
}

impl CompiledTables {
    pub fn write_detailed<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        write_rows(path, DETAILED_COLUMNS, &self.detailed)
    }

    pub fn write_totals<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        write_rows(path, TOTALS_COLUMNS, &self.totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, SchemaVariant, TOTAL_PROGRAM};
    use crate::test_util::init_test_logging;

    const INE: (&str, &str) = ("Ramos Autónomos", "Instituto Nacional Electoral");

    fn row(
        year: u16,
        (entity, department): (&str, &str),
        program: &str,
        budget: &str,
        total: &str,
    ) -> NormalizedRow {
        let mut row = NormalizedRow::new();
        row.set(Column::Cycle, year.to_string());
        row.set(Column::Entity, entity);
        row.set(Column::Department, department);
        row.set(Column::Program, program);
        row.set(Column::BudgetKind, budget);
        row.set(Column::Total, total);
        row
    }

    fn year(year: u16, rows: Vec<NormalizedRow>) -> YearTable {
        YearTable {
            year,
            columns: SchemaVariant::for_year(year, 2014).header(year),
            rows,
        }
    }

    #[test]
    fn zero_years_compile_to_empty_tables() {
        init_test_logging();
        assert_eq!(compile(Vec::new()), CompiledTables::default());
    }

    #[test]
    fn splits_program_rows_from_department_totals() {
        init_test_logging();
        let electoral = "Organización electoral";
        let rows = vec![
            row(2019, INE, TOTAL_PROGRAM, "Gasto total", ""),
            row(2019, INE, TOTAL_PROGRAM, "Aprobado", "100"),
            row(2019, INE, TOTAL_PROGRAM, "Ejercicio", "90"),
            row(2019, INE, TOTAL_PROGRAM, "Porcentaje Ejer/Aprob", "90"),
            row(2019, INE, electoral, electoral, ""),
            row(2019, INE, electoral, "Aprobado", "40"),
            row(2019, INE, electoral, "Ejercicio", "35"),
        ];
        let out = compile(vec![year(2019, rows)]);

        assert_eq!(out.totals.len(), 2);
        assert!(out.totals.iter().all(|r| r.program() == Some(TOTAL_PROGRAM)));
        assert_eq!(out.totals[0].description(), Some("Gasto total"));

        assert_eq!(out.detailed.len(), 2);
        assert!(out.detailed.iter().all(|r| r.description() == Some(electoral)));
        assert_eq!(out.detailed[1].get(Column::Total), Some("35"));
    }

    #[test]
    fn years_are_concatenated_in_order_and_renamed() {
        init_test_logging();
        let social = ("Poder Ejecutivo", "Desarrollo Social");
        let y2013 = vec![
            row(2013, social, TOTAL_PROGRAM, "Gasto total", ""),
            row(2013, social, TOTAL_PROGRAM, "Aprobado", "10"),
        ];
        let admin = ("Poder Ejecutivo", "Ramos Administrativos");
        let mut exec = row(2020, admin, TOTAL_PROGRAM, "Gasto total", "");
        exec.set(Column::SubDepartment, "Comunicaciones y Transportes");
        let mut exec_approved = exec.clone();
        exec_approved.set(Column::BudgetKind, "Aprobado");
        exec_approved.set(Column::Total, "20");
        let y2020 = vec![exec, exec_approved];

        let out = compile(vec![year(2020, y2020), year(2013, y2013)]);

        // 2013's executive rows have no sub-department, so lose their department
        assert_eq!(out.totals.len(), 1);
        let t = &out.totals[0];
        assert_eq!(t.cycle(), Some(2020));
        assert_eq!(t.entity(), Some("Ramos Administrativos"));
        assert_eq!(
            t.department(),
            Some("Infraestructura, Comunicaciones y Transportes")
        );
    }

    #[test]
    fn descriptions_do_not_cross_more_than_one_group() {
        init_test_logging();
        let judicial = ("Poder Judicial", "Consejo");
        let mut rows = vec![row(2016, judicial, "P1", "Becas", "")];
        let kinds = [
            "Aprobado",
            "Modificado",
            "Devengado",
            "Ejercicio",
            "Aprobado",
            "Modificado",
            "Devengado",
        ];
        for kind in kinds {
            rows.push(row(2016, judicial, "P1", kind, "1"));
        }
        let out = compile(vec![year(2016, rows)]);
        // six rows within reach, the seventh is unlabelled
        assert_eq!(out.detailed.len(), 6);
        assert!(out.totals.is_empty());
    }

    #[test]
    fn rows_without_budget_kind_are_dropped() {
        init_test_logging();
        let rows = vec![
            row(2021, INE, "Becas", "Becas", ""),
            row(2021, INE, "Becas", "", "7"),
            row(2021, INE, "Becas", "Aprobado", "5"),
        ];
        let out = compile(vec![year(2021, rows)]);

        assert_eq!(out.detailed.len(), 1);
        assert_eq!(out.detailed[0].budget_kind(), Some(crate::BudgetKind::Approved));
        assert_eq!(out.detailed[0].description(), Some("Becas"));
        assert!(out.detailed.iter().all(|r| r.budget_kind_text().is_some()));
    }
}
