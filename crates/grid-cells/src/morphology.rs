//! Binary morphology with line-shaped rectangular structuring elements.
//!
//! Elements are anchored at their centre. Pixels outside the image are
//! ignored, so borders never erode a line that touches the image edge.

use image::{GrayImage, Luma};
use imageproc::morphology::{Mask, grayscale_dilate, grayscale_erode};

use crate::error::ExtractError;

/// Longest line element a [`Mask`] can hold.
pub const MAX_KERNEL_LEN: u32 = 511;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKernel {
    /// `len` pixels wide, one pixel tall.
    Horizontal(u32),
    /// One pixel wide, `len` pixels tall.
    Vertical(u32),
}

impl LineKernel {
    /// Structuring element anchored at `len / 2`. `len` is clamped to
    /// `1..=MAX_KERNEL_LEN`.
    #[must_use]
    pub fn mask(self) -> Mask {
        let (Self::Horizontal(len) | Self::Vertical(len)) = self;
        let len = len.clamp(1, MAX_KERNEL_LEN);
        let anchor = u8::try_from(len / 2).unwrap_or(u8::MAX);
        match self {
            Self::Horizontal(_) => {
                Mask::from_image(&GrayImage::from_pixel(len, 1, Luma([255])), anchor, 0)
            }
            Self::Vertical(_) => {
                Mask::from_image(&GrayImage::from_pixel(1, len, Luma([255])), 0, anchor)
            }
        }
    }
}

#[must_use]
pub fn erode(image: &GrayImage, kernel: LineKernel) -> GrayImage {
    grayscale_erode(image, &kernel.mask())
}

#[must_use]
pub fn dilate(image: &GrayImage, kernel: LineKernel) -> GrayImage {
    grayscale_dilate(image, &kernel.mask())
}

/// Opening repeated `iterations` times: all erosions first, then all dilations.
#[must_use]
pub fn open(image: &GrayImage, kernel: LineKernel, iterations: u32) -> GrayImage {
    let mask = kernel.mask();
    let mut out = image.clone();
    for _ in 0..iterations {
        out = grayscale_erode(&out, &mask);
    }
    for _ in 0..iterations {
        out = grayscale_dilate(&out, &mask);
    }
    out
}

pub fn saturating_add(left: &GrayImage, right: &GrayImage) -> Result<GrayImage, ExtractError> {
    if left.dimensions() != right.dimensions() {
        return Err(ExtractError::DimensionMismatch {
            left: left.dimensions(),
            right: right.dimensions(),
        });
    }

    let (width, height) = left.dimensions();
    Ok(GrayImage::from_fn(width, height, |x, y| {
        Luma([left.get_pixel(x, y)[0].saturating_add(right.get_pixel(x, y)[0])])
    }))
}
