use image::GrayImage;
use imageproc::contours::{BorderType, Contour, find_contours};

use crate::model::BoundingBox;
use crate::options::RegionMode;

fn bounding_rect(contour: &Contour<u32>) -> Option<BoundingBox> {
    let first = contour.points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in &contour.points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Some(BoundingBox::new(
        min_x,
        min_y,
        max_x - min_x + 1,
        max_y - min_y + 1,
    ))
}

/// Bounding rectangles of the outer borders of every top-level foreground component.
#[must_use]
pub fn external_boxes(mask: &GrayImage) -> Vec<BoundingBox> {
    find_contours::<u32>(mask)
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer && contour.parent.is_none())
        .filter_map(bounding_rect)
        .collect()
}

/// Bounding rectangles of the background holes enclosed by grid lines.
///
/// A hole border is traced along the foreground pixels around it, so the
/// rectangle is shrunk by one pixel per side to cover only the enclosed area.
#[must_use]
pub fn enclosed_boxes(mask: &GrayImage) -> Vec<BoundingBox> {
    find_contours::<u32>(mask)
        .iter()
        .filter(|contour| contour.border_type == BorderType::Hole)
        .filter_map(bounding_rect)
        .filter(|rect| rect.width > 2 && rect.height > 2)
        .map(|rect| BoundingBox::new(rect.x + 1, rect.y + 1, rect.width - 2, rect.height - 2))
        .collect()
}

#[must_use]
pub fn find_regions(mask: &GrayImage, mode: RegionMode) -> Vec<BoundingBox> {
    match mode {
        RegionMode::External => external_boxes(mask),
        RegionMode::Enclosed => enclosed_boxes(mask),
    }
}

/// Keeps boxes strictly wider and taller than `min_size`.
#[must_use]
pub fn filter_small(boxes: Vec<BoundingBox>, min_size: u32) -> Vec<BoundingBox> {
    boxes
        .into_iter()
        .filter(|rect| rect.width > min_size && rect.height > min_size)
        .collect()
}
