use std::collections::HashMap;

use image::DynamicImage;
use rusty_tesseract::{Args, Image};
use thiserror::Error;

use crate::options::OcrOptions;

#[derive(Debug, Error)]
pub enum RecognizeError {
    #[error("text recognition engine is not available: {0}")]
    Unavailable(String),

    #[error("text recognition failed: {0}")]
    Failed(String),
}

/// Turns a cropped region of the source image into text.
pub trait TextRecognizer {
    /// Confirms the engine can run before any region is processed.
    fn probe(&self) -> Result<(), RecognizeError>;

    fn recognize(&self, region: &DynamicImage) -> Result<String, RecognizeError>;
}

/// Runs the system `tesseract` binary through rusty-tesseract.
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    options: OcrOptions,
}

impl TesseractRecognizer {
    #[must_use]
    pub fn new(options: OcrOptions) -> Self {
        Self { options }
    }

    fn args(&self) -> Args {
        Args {
            lang: self.options.lang.clone(),
            config_variables: HashMap::new(),
            dpi: self
                .options
                .dpi
                .and_then(|dpi| i32::try_from(dpi).ok()),
            psm: Some(i32::from(self.options.psm.value())),
            oem: Some(3),
        }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn probe(&self) -> Result<(), RecognizeError> {
        let version = rusty_tesseract::get_tesseract_version()
            .map_err(|error| RecognizeError::Unavailable(error.to_string()))?;
        tracing::debug!(version = %version.trim(), "tesseract available");
        Ok(())
    }

    fn recognize(&self, region: &DynamicImage) -> Result<String, RecognizeError> {
        let image = Image::from_dynamic_image(region)
            .map_err(|error| RecognizeError::Failed(error.to_string()))?;
        rusty_tesseract::image_to_string(&image, &self.args())
            .map_err(|error| RecognizeError::Failed(error.to_string()))
    }
}
