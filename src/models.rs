use std::path::PathBuf;

use chrono::{DateTime, Utc};
use grid_cells::Cell;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAVE_FOLDER: &str = "naver_images";
pub const DEFAULT_DEBUG_MASK: &str = "table_detected.jpg";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// An `<img>` source found on a page; `index` counts every tag in document order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageSource {
    pub index: usize,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageDownload {
    pub index: usize,
    pub url: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadFailure {
    pub index: usize,
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub image_urls: Vec<String>,
    pub downloads: Vec<ImageDownload>,
    pub failures: Vec<DownloadFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellRecord {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub text: String,
}

impl From<&Cell> for CellRecord {
    fn from(cell: &Cell) -> Self {
        Self {
            x: cell.position.x,
            y: cell.position.y,
            width: cell.position.width,
            height: cell.position.height,
            text: cell.text.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HarvestResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_data: Option<Vec<CellRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    pub finished_at: DateTime<Utc>,
}
