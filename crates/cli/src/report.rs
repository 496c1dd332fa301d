//! Console report for folder statistics

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rastats_algorithms::dataset::FolderReporter;
use rastats_algorithms::statistics::{AnomalyKind, FolderStats, RANGE_BUCKETS};
use rastats_core::raster::RasterElement;
use rastats_core::{Error, Result};

/// Writes one text block per folder to `out`.
pub struct ConsoleReporter<W: Write> {
    out: W,
    show_progress: bool,
    progress: Option<ProgressBar>,
    splits_seen: usize,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_progress: false,
            progress: None,
            splits_seen: 0,
        }
    }

    /// Draw a progress bar on stderr while a folder loads
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    fn clear_progress(&mut self) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }

    fn write_stats<T: RasterElement>(&mut self, name: &str, stats: &FolderStats<T>) -> Result<()> {
        let out = &mut self.out;
        writeln!(out, "Folder: {}", name)?;
        writeln!(out, " - Files: {}", stats.file_count)?;
        writeln!(out, " - Dimensions: {}", format_shapes(&stats.shapes))?;
        writeln!(out, " - Samples: {}", stats.sample_count)?;
        if stats.nan_count > 0 {
            writeln!(out, " - NaN samples: {}", stats.nan_count)?;
        }

        match &stats.values {
            Some(values) => {
                writeln!(out, " - Min val: {}", values.min)?;
                writeln!(out, " - Max val: {}", values.max)?;
                writeln!(out, " - Mean val: {:.2}", values.mean)?;
                writeln!(out, " - Median val: {}", values.median)?;
                writeln!(out, " - Histogram (Percentage of pixels in value ranges):")?;
                for bin in values.histogram.bins() {
                    writeln!(
                        out,
                        "    {:.2} - {:.2}: {:.2}%",
                        bin.start, bin.end, bin.percentage
                    )?;
                }
            }
            None => writeln!(out, " - No finite samples.")?,
        }

        if let Some(gt) = &stats.ground_truth {
            writeln!(out, " - Unique pixel values: {}", format_values(&gt.unique_values))?;
            writeln!(out, " - Percentage of files with pixel value 0 in different ranges:")?;
            for (i, count) in gt.zero_density.range_counts().iter().enumerate() {
                writeln!(
                    out,
                    " - {}% to {}%: {} files",
                    i * 100 / RANGE_BUCKETS,
                    (i + 1) * 100 / RANGE_BUCKETS,
                    count
                )?;
            }
            writeln!(out, " - Exactly 100%: {} files", gt.zero_density.fully_zero())?;
            for anomaly in &gt.anomalies {
                let what = match anomaly.kind {
                    AnomalyKind::NanValues => "NaN",
                    AnomalyKind::NegativeValues => "Negative",
                };
                writeln!(out, " - {} values found in {}", what, anomaly.image)?;
            }
        }

        Ok(())
    }
}

impl<W: Write> Drop for ConsoleReporter<W> {
    // A folder that fails mid-load never reaches `folder_stats`
    fn drop(&mut self) {
        self.clear_progress();
    }
}

impl<W: Write> FolderReporter for ConsoleReporter<W> {
    fn begin_split(&mut self, name: &str, _path: &Path) -> Result<()> {
        if self.splits_seen > 0 {
            writeln!(self.out)?;
        }
        self.splits_seen += 1;
        writeln!(self.out, "Analyzing {}...", name)?;
        Ok(())
    }

    fn begin_folder(&mut self, name: &str, file_count: usize) -> Result<()> {
        self.clear_progress();
        if self.show_progress {
            let pb = ProgressBar::new(file_count as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} {msg} [{bar:30}] {pos}/{len}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            pb.set_message(name.to_string());
            self.progress = Some(pb);
        }
        Ok(())
    }

    fn file_loaded(&mut self, _path: &Path) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    fn file_skipped(&mut self, _path: &Path, _error: &Error) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    fn empty_folder(&mut self, name: &str) -> Result<()> {
        self.clear_progress();
        writeln!(self.out, "Folder: {}", name)?;
        writeln!(self.out, " - No .TIF files found.")?;
        Ok(())
    }

    fn folder_stats<T: RasterElement>(&mut self, name: &str, stats: &FolderStats<T>) -> Result<()> {
        self.clear_progress();
        self.write_stats(name, stats)
    }
}

/// `(rows, cols)` or `(rows, cols, bands)`
pub fn format_shape(shape: &[usize]) -> String {
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    format!("({})", dims.join(", "))
}

/// A single shape when uniform, otherwise the whole set in braces
pub fn format_shapes(shapes: &BTreeSet<Vec<usize>>) -> String {
    let mut formatted: Vec<String> = shapes.iter().map(|s| format_shape(s)).collect();
    if formatted.len() == 1 {
        return formatted.remove(0);
    }
    format!("{{{}}}", formatted.join(", "))
}

pub fn format_values<T: RasterElement>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}
