/// First worksheet of one fiscal year's workbook, densified so that
/// `rows[i][j]` is sheet cell (i, j) regardless of where the used range starts.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    /// Fiscal year the workbook belongs to.
    pub year: u16,
    /// Each sheet row as text, padded to the sheet width. Blank cells are "".
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(year: u16, rows: Vec<Vec<String>>) -> Self {
        Self { year, rows }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}
