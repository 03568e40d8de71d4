use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use grid_cells::{OcrOptions, PageSegMode, RegionMode, TesseractRecognizer};
use scan_harvest::error::HarvestError;
use scan_harvest::fetch::build_agent;
use scan_harvest::models::{DEFAULT_DEBUG_MASK, DEFAULT_SAVE_FOLDER, DEFAULT_TIMEOUT_SECONDS};
use scan_harvest::pipeline::{HarvestRequest, process_image_and_webpage, render_summary};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "scan-harvest",
    version,
    about = "Read ruled tables from a scanned image and download a page's images"
)]
#[command(group(ArgGroup::new("source").required(true).multiple(true).args(["image", "url"])))]
struct Cli {
    /// Scanned image to search for a ruled table.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Web page whose <img> sources should be downloaded.
    #[arg(long)]
    url: Option<String>,

    /// Folder receiving downloaded images.
    #[arg(long, default_value = DEFAULT_SAVE_FOLDER)]
    save_folder: PathBuf,

    /// Where to write the detected grid mask.
    #[arg(long, default_value = DEFAULT_DEBUG_MASK)]
    debug_mask: PathBuf,

    /// Skip writing the grid mask.
    #[arg(long)]
    no_debug_mask: bool,

    /// Pixel height of the bands used to group cells into rows.
    #[arg(long, default_value_t = 20)]
    row_band: u32,

    /// Region discovery: external (whole table frames) or enclosed (each cell).
    #[arg(long, default_value = "external")]
    regions: RegionMode,

    /// Tesseract language(s).
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode.
    #[arg(long, default_value = "6")]
    psm: PageSegMode,

    /// Write the aggregated result record as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Timeout in seconds for each HTTP request.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    timeout: u64,
}

impl Cli {
    fn request(&self) -> HarvestRequest {
        let mut request = HarvestRequest {
            image_path: self.image.clone(),
            url: self.url.clone(),
            save_folder: self.save_folder.clone(),
            ..HarvestRequest::default()
        };
        request.extract.row_band_height = self.row_band;
        request.extract.region_mode = self.regions;
        request.extract.debug_mask = (!self.no_debug_mask).then(|| self.debug_mask.clone());
        request.extract.ocr = OcrOptions {
            lang: self.lang.clone(),
            psm: self.psm,
            dpi: None,
        };
        request
    }
}

fn run(cli: &Cli) -> Result<()> {
    let request = cli.request();
    let recognizer = TesseractRecognizer::new(request.extract.ocr.clone());
    let agent = build_agent(Duration::from_secs(cli.timeout));

    let outcome = process_image_and_webpage(&request, &recognizer, &agent)?;
    print!("{}", render_summary(&outcome, request.extract.row_band_height));

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&outcome.result()).map_err(HarvestError::from)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scan_harvest=info,grid_cells=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            let code = error
                .downcast_ref::<HarvestError>()
                .map_or(1, HarvestError::exit_code);
            ExitCode::from(code)
        }
    }
}
