// src/process/mod.rs
use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use tracing::{debug, instrument};

use crate::error::{PipelineError, Result};

pub mod normalize;
pub mod raw_table;
pub mod table;
pub mod utils;

pub use normalize::{normalize, normalize_row, HierarchyState, YearTable};
pub use raw_table::RawSheet;
pub use table::{discover_year_tables, read_rows, write_rows};

/// Open `path` and read its first worksheet into a dense [`RawSheet`].
///
/// Sheet coordinates are kept absolute: calamine's used range may start
/// below/right of A1, and the layouts address cells by sheet position.
#[instrument(level = "info", skip(path), fields(path = %path.as_ref().display()))]
pub fn load_workbook<P: AsRef<Path>>(year: u16, path: P) -> Result<RawSheet> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(PipelineError::MissingWorkbook {
            year,
            path: path.to_path_buf(),
        });
    }

    let workbook_err = |message: String| PipelineError::Workbook {
        year,
        path: path.to_path_buf(),
        message,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_err(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| workbook_err("workbook has no sheets".to_string()))?
        .map_err(|e| workbook_err(e.to_string()))?;

    let Some((end_row, end_col)) = range.end() else {
        debug!(year, "first sheet is empty");
        return Ok(RawSheet::new(year, Vec::new()));
    };
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let height = end_row as usize + 1;
    let width = end_col as usize + 1;

    let mut rows = vec![vec![String::new(); width]; height];
    for (row_idx, row) in range.rows().enumerate() {
        let target = &mut rows[start_row as usize + row_idx];
        for (col_idx, cell) in row.iter().enumerate() {
            target[start_col as usize + col_idx] = utils::cell_to_string(cell);
        }
    }

    debug!(year, height, width, "loaded first sheet");
    Ok(RawSheet::new(year, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::init_test_logging;
    use tempfile::tempdir;

    #[test]
    fn missing_workbook_names_the_year() -> anyhow::Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let err = load_workbook(2019, dir.path().join("2019.xls")).unwrap_err();
        assert_eq!(err.year(), Some(2019));
        assert!(err.to_string().contains("2019.xls"));
        Ok(())
    }

    #[test]
    fn unreadable_workbook_is_a_workbook_error() -> anyhow::Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = dir.path().join("2020.xls");
        std::fs::write(&path, b"this is not a spreadsheet")?;
        let err = load_workbook(2020, &path).unwrap_err();
        assert!(matches!(err, PipelineError::Workbook { year: 2020, .. }));
        Ok(())
    }
}
