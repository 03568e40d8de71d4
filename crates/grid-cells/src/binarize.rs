use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Rec.601 luma in 14-bit fixed point, the weighting scanners and OpenCV use.
const LUMA_WEIGHTS: [u32; 3] = [4899, 9617, 1868];
const LUMA_SHIFT: u32 = 14;

#[must_use]
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = u32::from(r) * LUMA_WEIGHTS[0]
            + u32::from(g) * LUMA_WEIGHTS[1]
            + u32::from(b) * LUMA_WEIGHTS[2];
        let luma = (weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT;
        Luma([u8::try_from(luma).unwrap_or(u8::MAX)])
    })
}

/// Inverted binary threshold at the Otsu level: dark ink becomes foreground.
#[must_use]
pub fn otsu_inverted(gray: &GrayImage) -> GrayImage {
    // A flat image has no foreground to split off.
    let mut values = gray.pixels().map(|pixel| pixel[0]);
    if let Some(first) = values.next()
        && values.all(|value| value == first)
    {
        return GrayImage::new(gray.width(), gray.height());
    }

    let level = otsu_level(gray);
    tracing::debug!(level, "selected otsu threshold");
    threshold_inverted(gray, level)
}

#[must_use]
pub fn threshold_inverted(gray: &GrayImage, level: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > level {
            Luma([BACKGROUND])
        } else {
            Luma([FOREGROUND])
        }
    })
}
