use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::Utc;
use grid_cells::{ExtractOptions, ExtractionReport, TextRecognizer, extract_table_cells, rows::render_rows};
use ureq::Agent;

use crate::error::HarvestError;
use crate::image_crawler;
use crate::models::{CellRecord, CrawlOutcome, DEFAULT_DEBUG_MASK, DEFAULT_SAVE_FOLDER, HarvestResult};

#[derive(Debug, Clone)]
pub struct HarvestRequest {
    pub image_path: Option<PathBuf>,
    pub url: Option<String>,
    pub save_folder: PathBuf,
    pub extract: ExtractOptions,
}

impl Default for HarvestRequest {
    fn default() -> Self {
        Self {
            image_path: None,
            url: None,
            save_folder: PathBuf::from(DEFAULT_SAVE_FOLDER),
            extract: ExtractOptions {
                debug_mask: Some(PathBuf::from(DEFAULT_DEBUG_MASK)),
                ..ExtractOptions::default()
            },
        }
    }
}

/// What each branch produced; a branch that was not requested stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestOutcome {
    pub table: Option<ExtractionReport>,
    pub crawl: Option<CrawlOutcome>,
}

impl HarvestOutcome {
    pub fn result(&self) -> HarvestResult {
        HarvestResult {
            table_data: self
                .table
                .as_ref()
                .map(|report| report.cells.iter().map(CellRecord::from).collect()),
            image_urls: self.crawl.as_ref().map(|crawl| crawl.image_urls.clone()),
            finished_at: Utc::now(),
        }
    }
}

pub fn process_image_and_webpage<R>(
    request: &HarvestRequest,
    recognizer: &R,
    agent: &Agent,
) -> Result<HarvestOutcome, HarvestError>
where
    R: TextRecognizer + ?Sized,
{
    if request.image_path.is_none() && request.url.is_none() {
        return Err(HarvestError::BadRequest(
            "either an image path or a URL is required".to_string(),
        ));
    }

    let mut outcome = HarvestOutcome::default();

    if let Some(image_path) = &request.image_path {
        tracing::info!(path = %image_path.display(), "processing image for table detection");
        outcome.table = Some(extract_table_cells(image_path, &request.extract, recognizer)?);
    }

    if let Some(url) = &request.url {
        tracing::info!(url, "crawling page for images");
        outcome.crawl = Some(image_crawler::crawl_images(
            agent,
            url,
            &request.save_folder,
        )?);
    }

    Ok(outcome)
}

/// Human-readable report of both branches.
pub fn render_summary(outcome: &HarvestOutcome, row_band_height: u32) -> String {
    let mut out = String::new();

    if let Some(report) = &outcome.table {
        if report.is_empty() {
            out.push_str("No table data detected in the image.\n");
        } else {
            out.push_str("Detected table values:\n");
            out.push_str(&render_rows(&report.cells, row_band_height));
        }
    }

    if let Some(crawl) = &outcome.crawl {
        if !out.is_empty() {
            out.push('\n');
        }
        for download in &crawl.downloads {
            let _ = writeln!(out, "Downloaded: {}", download.path.display());
        }
        for failure in &crawl.failures {
            let _ = writeln!(out, "Failed to download {}: {}", failure.url, failure.reason);
        }
        if crawl.image_urls.is_empty() {
            out.push_str("No image URLs found.\n");
        } else {
            out.push_str("Extracted image URLs:\n");
            for url in &crawl.image_urls {
                let _ = writeln!(out, "{url}");
            }
        }
    }

    out
}
