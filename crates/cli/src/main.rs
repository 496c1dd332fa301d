//! rastats CLI - per-folder statistics for TIFF image datasets

mod report;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use rastats_algorithms::dataset::{
    DEFAULT_GROUND_TRUTH, DEFAULT_SPLITS, DatasetConfig, DatasetWalker, FolderOptions,
    FolderReporter, analyze_folder,
};
use rastats_algorithms::statistics::{
    AnalysisMode, DEFAULT_BINS, FolderStatistics, FolderStatsParams,
};
use rastats_core::io::{probe_sample_type, read_raster};
use rastats_core::{Algorithm, RasterElement, SampleType};

use report::{ConsoleReporter, format_shape};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "rastats")]
#[command(author, version, about = "Per-folder statistics for TIFF image datasets", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every category folder of a dataset
    Dataset {
        /// Dataset root containing the split directories
        root: PathBuf,
        /// Split directory to analyze (repeatable; default: train_val_set, test_set)
        #[arg(long = "split")]
        splits: Vec<String>,
        /// Category analyzed as ground-truth masks (repeatable; default: train_gt)
        #[arg(long = "ground-truth")]
        ground_truth: Vec<String>,
        #[command(flatten)]
        folder: FolderArgs,
    },
    /// Analyze a single folder of .tif images
    Folder {
        /// Folder containing .tif images
        path: PathBuf,
        /// Analysis mode: plain, zero-density
        #[arg(short, long, default_value = "plain")]
        mode: String,
        #[command(flatten)]
        folder: FolderArgs,
    },
    /// Show information and statistics for one TIFF file
    Info {
        /// Input TIFF file
        input: PathBuf,
        /// Analysis mode: plain, zero-density
        #[arg(short, long, default_value = "plain")]
        mode: String,
    },
}

#[derive(Args)]
struct FolderArgs {
    /// Number of histogram bins
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,
    /// Warn and skip files that cannot be decoded instead of aborting
    #[arg(long)]
    skip_unreadable: bool,
}

impl FolderArgs {
    fn options(&self) -> FolderOptions {
        FolderOptions {
            bins: self.bins,
            skip_unreadable: self.skip_unreadable,
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default tracing subscriber")
}

fn parse_mode(s: &str) -> Result<AnalysisMode> {
    match s.to_lowercase().as_str() {
        "plain" | "values" => Ok(AnalysisMode::Plain),
        "zero-density" | "zero_density" | "gt" | "mask" => Ok(AnalysisMode::ZeroDensity),
        _ => anyhow::bail!("Unknown mode: {}. Use plain or zero-density.", s),
    }
}

fn console_reporter() -> ConsoleReporter<io::Stdout> {
    ConsoleReporter::new(io::stdout()).with_progress(io::stderr().is_terminal())
}

fn run_info<T: RasterElement>(
    input: &Path,
    sample_type: SampleType,
    mode: AnalysisMode,
) -> Result<()> {
    let raster = read_raster::<T, _>(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Sample type: {}", sample_type);
    println!("Shape: {} ({} samples)", format_shape(raster.shape()), raster.len());
    println!(
        "Dimensions: {} x {}, {} band(s)",
        raster.cols(),
        raster.rows(),
        raster.bands()
    );
    println!();

    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    let stats = FolderStatistics::<T>::new()
        .execute(vec![raster], FolderStatsParams::with_mode(mode))
        .context("Failed to compute statistics")?;

    let mut reporter = ConsoleReporter::new(io::stdout());
    reporter.folder_stats(&name, &stats)?;
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Dataset {
            root,
            splits,
            ground_truth,
            folder,
        } => {
            let splits = if splits.is_empty() {
                DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect()
            } else {
                splits
            };
            let ground_truth = if ground_truth.is_empty() {
                vec![DEFAULT_GROUND_TRUTH.to_string()]
            } else {
                ground_truth
            };

            let config = DatasetConfig::new(&root)
                .with_splits(splits)
                .with_ground_truth(ground_truth)
                .with_options(folder.options());

            let start = Instant::now();
            let mut reporter = console_reporter();
            let summary = DatasetWalker::new(config)
                .run(&mut reporter)
                .with_context(|| format!("Failed to analyze dataset {}", root.display()))?;

            info!(
                "{} folders analyzed, {} empty, {} files skipped in {:.2?}",
                summary.folders_analyzed,
                summary.folders_empty,
                summary.files_skipped,
                start.elapsed()
            );
        }

        Commands::Folder { path, mode, folder } => {
            let mode = parse_mode(&mode)?;
            let start = Instant::now();
            let mut reporter = console_reporter();
            let outcome = analyze_folder(&path, mode, &folder.options(), &mut reporter)
                .with_context(|| format!("Failed to analyze folder {}", path.display()))?;

            if outcome.files_skipped > 0 {
                info!("{} files skipped", outcome.files_skipped);
            }
            info!("Done in {:.2?}", start.elapsed());
        }

        Commands::Info { input, mode } => {
            let mode = parse_mode(&mode)?;
            let sample_type = probe_sample_type(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;

            match sample_type {
                SampleType::U8 => run_info::<u8>(&input, sample_type, mode)?,
                SampleType::U16 => run_info::<u16>(&input, sample_type, mode)?,
                SampleType::U32 => run_info::<u32>(&input, sample_type, mode)?,
                SampleType::U64 => run_info::<u64>(&input, sample_type, mode)?,
                SampleType::I8 => run_info::<i8>(&input, sample_type, mode)?,
                SampleType::I16 => run_info::<i16>(&input, sample_type, mode)?,
                SampleType::I32 => run_info::<i32>(&input, sample_type, mode)?,
                SampleType::I64 => run_info::<i64>(&input, sample_type, mode)?,
                SampleType::F32 => run_info::<f32>(&input, sample_type, mode)?,
                SampleType::F64 => run_info::<f64>(&input, sample_type, mode)?,
            }
        }
    }

    Ok(())
}
