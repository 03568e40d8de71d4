use image::{DynamicImage, GrayImage};

use crate::binarize::{otsu_inverted, to_grayscale};
use crate::error::ExtractError;
use crate::model::BoundingBox;
use crate::morphology::{LineKernel, open, saturating_add};
use crate::options::ExtractOptions;
use crate::regions::{filter_small, find_regions};

#[derive(Debug, Clone)]
pub struct GridDetection {
    /// Horizontal and vertical ruling lines combined into one mask.
    pub grid: GrayImage,
    /// Contours found before size filtering.
    pub regions_found: usize,
    pub regions: Vec<BoundingBox>,
}

/// Keeps only straight ruling lines at least `line_kernel_len` pixels long.
pub fn build_grid_mask(binary: &GrayImage, options: &ExtractOptions) -> Result<GrayImage, ExtractError> {
    let len = options.line_kernel_len;
    let horizontal = open(binary, LineKernel::Horizontal(len), options.open_iterations);
    let vertical = open(binary, LineKernel::Vertical(len), options.open_iterations);
    saturating_add(&horizontal, &vertical)
}

pub fn detect_grid(image: &DynamicImage, options: &ExtractOptions) -> Result<GridDetection, ExtractError> {
    let gray = to_grayscale(image);
    let binary = otsu_inverted(&gray);
    let grid = build_grid_mask(&binary, options)?;

    let candidates = find_regions(&grid, options.region_mode);
    let regions_found = candidates.len();
    let regions = filter_small(candidates, options.min_cell_size);
    tracing::debug!(
        regions_found,
        kept = regions.len(),
        "grid regions detected"
    );

    Ok(GridDetection {
        grid,
        regions_found,
        regions,
    })
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Luma, Rgb, RgbImage};
    use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
    use imageproc::rect::Rect;

    use super::detect_grid;
    use crate::model::BoundingBox;
    use crate::options::{ExtractOptions, RegionMode};

    fn ruled_page() -> DynamicImage {
        let mut page = RgbImage::from_pixel(300, 200, Rgb([255, 255, 255]));
        let ink = Rgb([0, 0, 0]);
        draw_hollow_rect_mut(&mut page, Rect::at(20, 30).of_size(201, 101), ink);
        draw_hollow_rect_mut(&mut page, Rect::at(21, 31).of_size(199, 99), ink);
        for x in [120, 121] {
            for y in 30..131 {
                page.put_pixel(x, y, ink);
            }
        }
        // Glyph-sized blob that the line filters must drop.
        draw_filled_rect_mut(&mut page, Rect::at(50, 60).of_size(8, 12), ink);
        DynamicImage::ImageRgb8(page)
    }

    #[test]
    fn grid_mask_drops_glyphs_and_keeps_lines() {
        let detection = detect_grid(&ruled_page(), &ExtractOptions::default())
            .expect("detection should succeed");
        assert_eq!(detection.grid.get_pixel(100, 30), &Luma([255]));
        assert_eq!(detection.grid.get_pixel(120, 80), &Luma([255]));
        assert_eq!(detection.grid.get_pixel(53, 65), &Luma([0]));
    }

    #[test]
    fn external_mode_finds_table_frame() {
        let detection = detect_grid(&ruled_page(), &ExtractOptions::default())
            .expect("detection should succeed");
        assert_eq!(detection.regions, vec![BoundingBox::new(20, 30, 201, 101)]);
    }

    #[test]
    fn enclosed_mode_finds_each_cell() {
        let options = ExtractOptions {
            region_mode: RegionMode::Enclosed,
            ..ExtractOptions::default()
        };
        let mut regions = detect_grid(&ruled_page(), &options)
            .expect("detection should succeed")
            .regions;
        regions.sort_by_key(|rect| (rect.y, rect.x));
        assert_eq!(
            regions,
            vec![
                BoundingBox::new(22, 32, 98, 97),
                BoundingBox::new(122, 32, 97, 97),
            ]
        );
    }

    #[test]
    fn blank_page_has_no_regions() {
        let page = DynamicImage::ImageRgb8(RgbImage::from_pixel(120, 80, Rgb([250, 250, 250])));
        let detection = detect_grid(&page, &ExtractOptions::default()).expect("detection should succeed");
        assert_eq!(detection.regions_found, 0);
        assert!(detection.regions.is_empty());
    }
}
