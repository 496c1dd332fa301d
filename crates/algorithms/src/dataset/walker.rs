//! Walk dataset splits and analyze each category folder

use std::path::{Path, PathBuf};

use rastats_core::io::{list_subdirectories, list_tif_files, probe_sample_type, read_raster_as};
use rastats_core::raster::{RasterElement, SampleType};
use rastats_core::{Error, Result};
use tracing::{debug, info, warn};

use super::config::{DatasetConfig, FolderOptions};
use crate::statistics::{AnalysisMode, FolderStats, FolderStatsAggregator, FolderStatsParams};

/// Receives folder results as the walk progresses.
pub trait FolderReporter {
    /// A split directory is about to be walked
    fn begin_split(&mut self, _name: &str, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// A non-empty folder is about to be loaded
    fn begin_folder(&mut self, _name: &str, _file_count: usize) -> Result<()> {
        Ok(())
    }

    fn file_loaded(&mut self, _path: &Path) {}

    fn file_skipped(&mut self, _path: &Path, _error: &Error) {}

    /// The folder holds no usable `.tif` file
    fn empty_folder(&mut self, name: &str) -> Result<()>;

    fn folder_stats<T: RasterElement>(&mut self, name: &str, stats: &FolderStats<T>) -> Result<()>;
}

/// What happened to a single folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FolderOutcome {
    pub analyzed: bool,
    pub files_skipped: usize,
}

/// Totals over a whole walk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub folders_analyzed: usize,
    pub folders_empty: usize,
    pub files_skipped: usize,
}

impl WalkSummary {
    fn add(&mut self, outcome: FolderOutcome) {
        if outcome.analyzed {
            self.folders_analyzed += 1;
        } else {
            self.folders_empty += 1;
        }
        self.files_skipped += outcome.files_skipped;
    }
}

/// Runs folder statistics over every category folder of every split.
#[derive(Debug, Clone)]
pub struct DatasetWalker {
    config: DatasetConfig,
}

impl DatasetWalker {
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    pub fn run<R: FolderReporter>(&self, reporter: &mut R) -> Result<WalkSummary> {
        let mut summary = WalkSummary::default();

        for split in &self.config.splits {
            let split_path = self.config.root.join(split);
            info!("Analyzing {}", split_path.display());
            reporter.begin_split(split, &split_path)?;

            let folders = list_subdirectories(&split_path).map_err(|e| {
                Error::Other(format!("Cannot read split {}: {}", split_path.display(), e))
            })?;

            for folder in folders {
                let mode = self.config.mode_for(&folder_name(&folder));
                let outcome = analyze_folder(&folder, mode, &self.config.options, reporter)?;
                summary.add(outcome);
            }
        }

        Ok(summary)
    }
}

/// Analyze one folder of `.tif` images and hand the result to `reporter`.
///
/// Every file's sample type is probed first and the folder is aggregated in
/// the promoted type of all of them (u8 + u16 as u16, u8 + f32 as f32,
/// i32 + f32 as f64), so mixed folders are reported as a whole. Decode
/// failures abort unless `options.skip_unreadable` is set.
pub fn analyze_folder<R: FolderReporter>(
    path: &Path,
    mode: AnalysisMode,
    options: &FolderOptions,
    reporter: &mut R,
) -> Result<FolderOutcome> {
    let name = folder_name(path);
    let files = list_tif_files(path)?;

    if files.is_empty() {
        debug!("{}: no .tif files", path.display());
        reporter.empty_folder(&name)?;
        return Ok(FolderOutcome {
            analyzed: false,
            files_skipped: 0,
        });
    }

    reporter.begin_folder(&name, files.len())?;

    let mut readable = Vec::with_capacity(files.len());
    let mut sample_type: Option<SampleType> = None;
    let mut files_skipped = 0;
    for file in files {
        match probe_sample_type(&file) {
            Ok(t) => {
                if let Some(current) = sample_type
                    && current != t
                {
                    debug!("{}: {} mixed with {}", name, current, t);
                }
                sample_type = Some(sample_type.map_or(t, |current| current.promote(t)));
                readable.push(file);
            }
            Err(e) if options.skip_unreadable => {
                warn!("Skipping {}: {}", file.display(), e);
                reporter.file_skipped(&file, &e);
                files_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    let Some(sample_type) = sample_type else {
        reporter.empty_folder(&name)?;
        return Ok(FolderOutcome {
            analyzed: false,
            files_skipped,
        });
    };

    debug!("{}: {} files as {}", name, readable.len(), sample_type);
    let params = options.params(mode);
    let ctx = FolderContext {
        name: &name,
        files: &readable,
        skip_unreadable: options.skip_unreadable,
        files_skipped,
    };

    match sample_type {
        SampleType::U8 => ctx.run::<u8, R>(params, reporter),
        SampleType::U16 => ctx.run::<u16, R>(params, reporter),
        SampleType::U32 => ctx.run::<u32, R>(params, reporter),
        SampleType::U64 => ctx.run::<u64, R>(params, reporter),
        SampleType::I8 => ctx.run::<i8, R>(params, reporter),
        SampleType::I16 => ctx.run::<i16, R>(params, reporter),
        SampleType::I32 => ctx.run::<i32, R>(params, reporter),
        SampleType::I64 => ctx.run::<i64, R>(params, reporter),
        SampleType::F32 => ctx.run::<f32, R>(params, reporter),
        SampleType::F64 => ctx.run::<f64, R>(params, reporter),
    }
}

struct FolderContext<'a> {
    name: &'a str,
    files: &'a [PathBuf],
    skip_unreadable: bool,
    /// Files already dropped while probing
    files_skipped: usize,
}

impl FolderContext<'_> {
    fn run<T: RasterElement, R: FolderReporter>(
        &self,
        params: FolderStatsParams,
        reporter: &mut R,
    ) -> Result<FolderOutcome> {
        let mut aggregator = FolderStatsAggregator::<T>::new(params)?;
        let mut files_skipped = self.files_skipped;

        for file in self.files {
            let image = match read_raster_as::<T, _>(file) {
                Ok(image) => image,
                Err(e) if self.skip_unreadable => {
                    warn!("Skipping {}: {}", file.display(), e);
                    reporter.file_skipped(file, &e);
                    files_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };
            aggregator.push(&file.display().to_string(), &image)?;
            reporter.file_loaded(file);
        }
        debug!(
            "{}: {} of {} files loaded",
            self.name,
            aggregator.file_count(),
            self.files.len()
        );

        match aggregator.finish() {
            Ok(stats) => {
                if !stats.has_uniform_shape() {
                    warn!("{}: images have inconsistent dimensions", self.name);
                }
                reporter.folder_stats(self.name, &stats)?;
                Ok(FolderOutcome {
                    analyzed: true,
                    files_skipped,
                })
            }
            Err(Error::EmptyFolder) => {
                reporter.empty_folder(self.name)?;
                Ok(FolderOutcome {
                    analyzed: false,
                    files_skipped,
                })
            }
            Err(e) => Err(e),
        }
    }
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
