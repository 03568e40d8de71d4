use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use grid_cells::{
    ExtractOptions, ExtractionReport, OcrOptions, PageSegMode, RegionMode, TesseractRecognizer,
    extract_table_cells, rows::render_rows, write_cells_csv,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "grid2csv",
    version,
    about = "Detect ruled table cells in a scanned image and OCR them"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Detect table cells, print them by row and optionally write CSV.
    Extract(ExtractArgs),
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input image path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output CSV path.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the detected grid mask.
    #[arg(long, default_value = "table_detected.jpg")]
    debug_mask: PathBuf,

    /// Skip writing the grid mask.
    #[arg(long)]
    no_debug_mask: bool,

    /// Pixel height of the bands used to group cells into rows.
    #[arg(long, default_value_t = 20)]
    row_band: u32,

    /// Regions must be wider and taller than this many pixels.
    #[arg(long, default_value_t = 20)]
    min_cell: u32,

    /// Minimum length of a ruling line, in pixels.
    #[arg(long, default_value_t = 25)]
    kernel: u32,

    /// Erosion/dilation iterations of the line filters.
    #[arg(long, default_value_t = 2)]
    iterations: u32,

    /// Region discovery: external (whole table frames) or enclosed (each cell).
    #[arg(long, default_value = "external")]
    regions: RegionMode,

    /// Tesseract language(s), e.g. eng or kor+eng.
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode (number or single-block, single-line, sparse, auto).
    #[arg(long, default_value = "6")]
    psm: PageSegMode,

    /// DPI hint passed to tesseract.
    #[arg(long)]
    dpi: Option<u32>,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ExtractOptions {
        row_band_height: args.row_band,
        min_cell_size: args.min_cell,
        line_kernel_len: args.kernel,
        open_iterations: args.iterations,
        region_mode: args.regions,
        debug_mask: (!args.no_debug_mask).then(|| args.debug_mask.clone()),
        ocr: OcrOptions {
            lang: args.lang.clone(),
            psm: args.psm,
            dpi: args.dpi,
        },
    })
}

fn log_report(report: &ExtractionReport, verbose: bool) {
    if report.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", report.warnings.len());
    if verbose {
        for warning in &report.warnings {
            eprintln!(
                "  - {:?} position={:?}: {}",
                warning.code, warning.position, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionReport> {
    let options = parse_options(args)?;
    let recognizer = TesseractRecognizer::new(options.ocr.clone());
    let report = extract_table_cells(&args.input, &options, &recognizer)
        .with_context(|| format!("failed to extract table from '{}'", args.input.display()))?;

    if report.is_empty() {
        println!("No table data detected in the image.");
    } else {
        println!("Detected table values:");
        print!("{}", render_rows(&report.cells, options.row_band_height));
    }

    if let Some(output) = &args.output {
        write_cells_csv(
            output,
            &report.cells,
            options.row_band_height,
            args.delimiter as u8,
        )
        .with_context(|| format!("failed to write '{}'", output.display()))?;
    }

    Ok(report)
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_cells=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(report) => {
                log_report(&report, args.verbose);
                if report.is_empty() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
