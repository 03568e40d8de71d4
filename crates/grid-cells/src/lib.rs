pub mod binarize;
mod csv_out;
mod error;
pub mod grid_detect;
mod model;
pub mod morphology;
mod options;
mod recognize;
pub mod regions;
pub mod rows;
mod warning;

use std::path::Path;

use image::DynamicImage;

use crate::grid_detect::detect_grid;
use crate::rows::sort_cells;
use crate::warning::WarningCode;

pub use csv_out::{write_cells_csv, write_cells_csv_to_string};
pub use error::ExtractError;
pub use model::{BoundingBox, Cell, Row};
pub use options::{ExtractOptions, OcrOptions, PageSegMode, RegionMode};
pub use recognize::{RecognizeError, TesseractRecognizer, TextRecognizer};
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Recognised cells ordered by `(y, x)`.
    pub cells: Vec<Cell>,
    pub regions_found: usize,
    pub regions_too_small: usize,
    pub regions_without_text: usize,
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractionReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn write_debug_mask(grid: &image::GrayImage, path: &Path) -> Result<(), ExtractError> {
    grid.save(path).map_err(|source| ExtractError::ImageWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote grid mask");
    Ok(())
}

pub fn extract_table_cells<R>(
    input: &Path,
    options: &ExtractOptions,
    recognizer: &R,
) -> Result<ExtractionReport, ExtractError>
where
    R: TextRecognizer + ?Sized,
{
    options.validate()?;
    let image = image::open(input).map_err(|source| ExtractError::ImageLoad {
        path: input.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %input.display(),
        width = image.width(),
        height = image.height(),
        "processing image for table detection"
    );
    extract_table_cells_from_image(&image, options, recognizer)
}

pub fn extract_table_cells_from_image<R>(
    image: &DynamicImage,
    options: &ExtractOptions,
    recognizer: &R,
) -> Result<ExtractionReport, ExtractError>
where
    R: TextRecognizer + ?Sized,
{
    options.validate()?;
    let detection = detect_grid(image, options)?;
    if let Some(path) = &options.debug_mask {
        write_debug_mask(&detection.grid, path)?;
    }

    let mut report = ExtractionReport {
        cells: Vec::new(),
        regions_found: detection.regions_found,
        regions_too_small: detection.regions_found - detection.regions.len(),
        regions_without_text: 0,
        warnings: Vec::new(),
    };

    if !detection.regions.is_empty() {
        recognizer.probe().map_err(|error| match error {
            RecognizeError::Unavailable(message) | RecognizeError::Failed(message) => {
                ExtractError::OcrUnavailable(message)
            }
        })?;
    }

    for rect in detection.regions {
        let region = image.crop_imm(rect.x, rect.y, rect.width, rect.height);
        let text = match recognizer.recognize(&region) {
            Ok(text) => text,
            Err(RecognizeError::Unavailable(message)) => {
                return Err(ExtractError::OcrUnavailable(message));
            }
            Err(error) => {
                tracing::warn!(?rect, %error, "skipping region");
                report.warnings.push(
                    ExtractWarning::new(WarningCode::RegionRecognitionFailed, error.to_string())
                        .with_position(rect),
                );
                continue;
            }
        };

        let text = text.trim();
        if text.is_empty() {
            report.regions_without_text += 1;
            continue;
        }
        report.cells.push(Cell {
            position: rect,
            text: text.to_string(),
        });
    }

    sort_cells(&mut report.cells);
    if report.cells.is_empty() {
        report.warnings.push(ExtractWarning::new(
            WarningCode::NoTableDetected,
            "no table cells with text were detected",
        ));
    }
    tracing::info!(
        cells = report.cells.len(),
        regions = report.regions_found,
        "table extraction completed"
    );

    Ok(report)
}
