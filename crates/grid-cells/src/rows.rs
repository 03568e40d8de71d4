use std::fmt::Write as _;

use crate::model::{Cell, Row};

/// Orders cells top-to-bottom, then left-to-right.
pub fn sort_cells(cells: &mut [Cell]) {
    cells.sort_by_key(|cell| (cell.position.y, cell.position.x));
}

/// Splits sorted cells into rows, starting a new row whenever the `y / band`
/// bucket differs from the previous cell's.
#[must_use]
pub fn group_rows(cells: &[Cell], band: u32) -> Vec<Row<'_>> {
    let band = band.max(1);
    cells
        .chunk_by(|left, right| left.position.row_band(band) == right.position.row_band(band))
        .map(|chunk| Row {
            band: chunk[0].position.row_band(band),
            cells: chunk,
        })
        .collect()
}

#[must_use]
pub fn render_rows(cells: &[Cell], band: u32) -> String {
    let mut out = String::new();
    for (index, row) in group_rows(cells, band).iter().enumerate() {
        let _ = write!(out, "Row {}:", index + 1);
        for cell in row.cells {
            let _ = write!(out, " '{}'", cell.text);
        }
        out.push('\n');
    }
    out
}
