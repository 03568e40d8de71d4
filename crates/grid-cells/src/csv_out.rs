use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::error::ExtractError;
use crate::model::Cell;
use crate::rows::group_rows;

const HEADERS: [&str; 6] = ["row", "x", "y", "width", "height", "text"];

fn write_records<W: Write>(
    writer: &mut Writer<W>,
    cells: &[Cell],
    band: u32,
) -> Result<(), ExtractError> {
    writer.write_record(HEADERS)?;
    for (index, row) in group_rows(cells, band).iter().enumerate() {
        let row_number = (index + 1).to_string();
        for cell in row.cells {
            let position = cell.position;
            writer.write_record([
                row_number.clone(),
                position.x.to_string(),
                position.y.to_string(),
                position.width.to_string(),
                position.height.to_string(),
                cell.text.clone(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Writes one record per cell, numbering rows by their band grouping.
pub fn write_cells_csv(
    path: &Path,
    cells: &[Cell],
    band: u32,
    delimiter: u8,
) -> Result<(), ExtractError> {
    let mut writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_records(&mut writer, cells, band)
}

pub fn write_cells_csv_to_string(
    cells: &[Cell],
    band: u32,
    delimiter: u8,
) -> Result<String, ExtractError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    write_records(&mut writer, cells, band)?;

    let bytes = writer
        .into_inner()
        .map_err(|error| ExtractError::Csv(error.into_error().into()))?;
    String::from_utf8(bytes)
        .map_err(|error| ExtractError::InvalidOption(format!("invalid utf-8 csv output: {error}")))
}
