//! Selecting arrest rows out of the tables extracted from one document.

use policelog_core::RawRow;

use crate::case_number::CaseNumberFilter;

/// One extracted table: rows of string cells.
pub type Table = Vec<RawRow>;

/// Trim a cell and blank out the `nan` placeholder some extractors emit.
pub fn clean_cell(cell: &str) -> String {
    let trimmed = cell.trim();
    if trimmed.eq_ignore_ascii_case("nan") {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Every row whose first cell is a qualifying case number, in document
/// order, with cells cleaned. Header rows, page footers and tables from
/// other sections of the document are dropped.
pub fn select_arrest_rows(tables: &[Table], filter: &CaseNumberFilter) -> Vec<RawRow> {
    tables
        .iter()
        .flat_map(|table| table.iter())
        .filter(|row| filter.matches(row.cell(0)))
        .map(|row| row.cells().iter().map(|c| clean_cell(c)).collect())
        .collect()
}
