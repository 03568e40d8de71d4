use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ExtractError;
use crate::morphology::MAX_KERNEL_LEN;

/// Tesseract page segmentation mode, stored as the numeric value passed via `--psm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSegMode(u8);

impl PageSegMode {
    pub const AUTO: Self = Self(3);
    pub const SINGLE_BLOCK: Self = Self(6);
    pub const SINGLE_LINE: Self = Self(7);
    pub const SPARSE: Self = Self(11);

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl Default for PageSegMode {
    fn default() -> Self {
        Self::SINGLE_BLOCK
    }
}

impl FromStr for PageSegMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        match value.to_ascii_lowercase().as_str() {
            "auto" => return Ok(Self::AUTO),
            "single-block" | "block" => return Ok(Self::SINGLE_BLOCK),
            "single-line" | "line" => return Ok(Self::SINGLE_LINE),
            "sparse" => return Ok(Self::SPARSE),
            _ => {}
        }

        let mode: u8 = value
            .parse()
            .map_err(|_| format!("invalid page segmentation mode: '{value}'"))?;
        if mode > 13 {
            return Err(format!(
                "page segmentation mode {mode} is out of range 0..=13"
            ));
        }
        Ok(Self(mode))
    }
}

/// Which contours of the grid mask become OCR regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionMode {
    /// Outer boundary of each connected grid, one region per table frame.
    #[default]
    External,
    /// Every background area enclosed by ruling lines, one region per cell.
    Enclosed,
}

impl FromStr for RegionMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "external" | "outer" => Ok(Self::External),
            "enclosed" | "cells" => Ok(Self::Enclosed),
            other => Err(format!(
                "invalid region mode '{other}', expected external or enclosed"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrOptions {
    pub lang: String,
    pub psm: PageSegMode,
    pub dpi: Option<u32>,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            lang: "eng".to_string(),
            psm: PageSegMode::default(),
            dpi: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Height in pixels of the band used to group cells into display rows.
    pub row_band_height: u32,
    /// Regions must be strictly wider and taller than this to count as cells.
    pub min_cell_size: u32,
    /// Length of the line structuring elements used to isolate ruling lines.
    pub line_kernel_len: u32,
    pub open_iterations: u32,
    pub region_mode: RegionMode,
    /// Where to write the reconstructed grid mask, overwriting any existing file.
    pub debug_mask: Option<PathBuf>,
    pub ocr: OcrOptions,
}

impl ExtractOptions {
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.row_band_height == 0 {
            return Err(ExtractError::InvalidOption(
                "row_band_height must be at least 1".to_string(),
            ));
        }
        if self.line_kernel_len == 0 || self.line_kernel_len > MAX_KERNEL_LEN {
            return Err(ExtractError::InvalidOption(format!(
                "line_kernel_len must be between 1 and {MAX_KERNEL_LEN}"
            )));
        }
        if self.open_iterations == 0 {
            return Err(ExtractError::InvalidOption(
                "open_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            row_band_height: 20,
            min_cell_size: 20,
            line_kernel_len: 25,
            open_iterations: 2,
            region_mode: RegionMode::External,
            debug_mask: None,
            ocr: OcrOptions::default(),
        }
    }
}
