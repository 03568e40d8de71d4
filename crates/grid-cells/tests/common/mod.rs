use std::path::Path;

use grid_cells::{RecognizeError, TextRecognizer};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

const INK: Rgb<u8> = Rgb([20, 20, 20]);
const PAPER: Rgb<u8> = Rgb([245, 245, 245]);

/// Draws one-pixel ruling lines at the given x and y coordinates, each
/// spanning from the first to the last line of the other axis.
pub fn ruled_grid(width: u32, height: u32, columns: &[u32], rows: &[u32]) -> RgbImage {
    let mut page = RgbImage::from_pixel(width, height, PAPER);
    let (left, right) = (columns[0], columns[columns.len() - 1]);
    let (top, bottom) = (rows[0], rows[rows.len() - 1]);

    for &x in columns {
        for y in top..=bottom {
            page.put_pixel(x, y, INK);
        }
    }
    for &y in rows {
        for x in left..=right {
            page.put_pixel(x, y, INK);
        }
    }
    page
}

/// Adds small glyph-like blobs that must never be mistaken for ruling lines.
pub fn scribble(page: &mut RgbImage, at: &[(i32, i32)]) {
    for &(x, y) in at {
        draw_filled_rect_mut(page, Rect::at(x, y).of_size(6, 10), INK);
        draw_filled_rect_mut(page, Rect::at(x + 9, y).of_size(3, 10), INK);
    }
}

pub fn save_png(page: &RgbImage, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    DynamicImage::ImageRgb8(page.clone()).save(path)?;
    Ok(())
}

/// Reports each region as `WIDTHxHEIGHT`, which identifies cells in assertions.
pub struct SizeRecognizer;

impl TextRecognizer for SizeRecognizer {
    fn probe(&self) -> Result<(), RecognizeError> {
        Ok(())
    }

    fn recognize(&self, region: &DynamicImage) -> Result<String, RecognizeError> {
        Ok(format!(" {}x{}\n", region.width(), region.height()))
    }
}

/// Always answers with the same text.
pub struct FixedRecognizer(pub &'static str);

impl TextRecognizer for FixedRecognizer {
    fn probe(&self) -> Result<(), RecognizeError> {
        Ok(())
    }

    fn recognize(&self, _region: &DynamicImage) -> Result<String, RecognizeError> {
        Ok(self.0.to_string())
    }
}
