//! Folder statistics
//!
//! Aggregates every sample of every image in a folder into one record:
//! shapes seen, extrema, mean, median and an equal-width histogram. In
//! zero-density mode (ground-truth masks) it also tracks per-image zero
//! density, NaN / negative anomalies and the set of distinct label values.
//!
//! Images are pushed one at a time and may be dropped right after
//! `push` returns; only the concatenated samples are kept.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::marker::PhantomData;

use rastats_core::raster::{Raster, RasterElement};
use rastats_core::{Algorithm, Error, Result};
use tracing::{debug, warn};

use super::histogram::{DEFAULT_BINS, Histogram};
use super::zero_density::{ZeroCount, ZeroDensityBuckets};

/// Kind of analysis applied to a folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Value statistics only
    #[default]
    Plain,
    /// Value statistics plus ground-truth mask checks
    ZeroDensity,
}

/// Parameters for folder statistics
#[derive(Debug, Clone)]
pub struct FolderStatsParams {
    /// Analysis mode
    pub mode: AnalysisMode,
    /// Number of histogram bins (default: 10)
    pub bins: usize,
}

impl Default for FolderStatsParams {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Plain,
            bins: DEFAULT_BINS,
        }
    }
}

impl FolderStatsParams {
    pub fn with_mode(mode: AnalysisMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

/// Data-quality problem found in a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    NanValues,
    NegativeValues,
}

/// An anomaly together with the image it was found in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAnomaly {
    pub image: String,
    pub kind: AnomalyKind,
}

/// Value statistics over the non-NaN samples of a folder
#[derive(Debug, Clone)]
pub struct ValueSummary<T> {
    pub min: T,
    pub max: T,
    pub mean: f64,
    pub median: f64,
    pub histogram: Histogram,
}

/// Extra statistics gathered for ground-truth folders
#[derive(Debug, Clone)]
pub struct GroundTruthSummary<T> {
    /// Distinct non-NaN sample values, ascending
    pub unique_values: Vec<T>,
    pub zero_density: ZeroDensityBuckets,
    pub anomalies: Vec<ImageAnomaly>,
}

/// Statistics for one folder of images
#[derive(Debug, Clone)]
pub struct FolderStats<T> {
    pub mode: AnalysisMode,
    pub file_count: usize,
    /// Distinct image shapes; more than one means inconsistent dimensions
    pub shapes: BTreeSet<Vec<usize>>,
    /// Samples fed into the statistics, NaN included
    pub sample_count: usize,
    pub nan_count: usize,
    /// `None` when every sample was NaN
    pub values: Option<ValueSummary<T>>,
    /// Present in zero-density mode only
    pub ground_truth: Option<GroundTruthSummary<T>>,
}

impl<T> FolderStats<T> {
    pub fn has_uniform_shape(&self) -> bool {
        self.shapes.len() == 1
    }
}

/// Streaming accumulator behind [`FolderStats`].
#[derive(Debug)]
pub struct FolderStatsAggregator<T: RasterElement> {
    params: FolderStatsParams,
    file_count: usize,
    shapes: BTreeSet<Vec<usize>>,
    samples: Vec<T>,
    zero_density: ZeroDensityBuckets,
    anomalies: Vec<ImageAnomaly>,
}

impl<T: RasterElement> FolderStatsAggregator<T> {
    pub fn new(params: FolderStatsParams) -> Result<Self> {
        if params.bins == 0 {
            return Err(Error::InvalidParameter {
                name: "bins",
                value: params.bins.to_string(),
                reason: "histogram needs at least one bin".into(),
            });
        }

        Ok(Self {
            params,
            file_count: 0,
            shapes: BTreeSet::new(),
            samples: Vec::new(),
            zero_density: ZeroDensityBuckets::new(),
            anomalies: Vec::new(),
        })
    }

    /// Analyze a whole sequence of images in one call.
    ///
    /// Fails with [`Error::EmptyFolder`] when `images` is empty.
    pub fn analyze<'a, I>(images: I, mode: AnalysisMode) -> Result<FolderStats<T>>
    where
        I: IntoIterator<Item = &'a Raster<T>>,
    {
        Self::analyze_with(images, FolderStatsParams::with_mode(mode))
    }

    /// Same as [`analyze`](Self::analyze) with explicit parameters.
    pub fn analyze_with<'a, I>(images: I, params: FolderStatsParams) -> Result<FolderStats<T>>
    where
        I: IntoIterator<Item = &'a Raster<T>>,
    {
        let mut aggregator = Self::new(params)?;
        for (i, image) in images.into_iter().enumerate() {
            aggregator.push(&format!("image {}", i), image)?;
        }
        aggregator.finish()
    }

    /// Images pushed so far
    pub fn file_count(&self) -> usize {
        self.file_count
    }

    /// Add one image. `label` names the image in diagnostics.
    pub fn push(&mut self, label: &str, image: &Raster<T>) -> Result<()> {
        if image.is_empty() {
            return Err(Error::EmptyImage {
                label: label.to_string(),
            });
        }

        if self.params.mode == AnalysisMode::ZeroDensity {
            self.inspect_mask(label, image);
        }

        self.shapes.insert(image.shape().to_vec());
        self.samples.reserve(image.len());
        self.samples.extend(image.iter().copied());
        self.file_count += 1;

        debug!("{}: shape {:?}, {} samples", label, image.shape(), image.len());
        Ok(())
    }

    fn inspect_mask(&mut self, label: &str, image: &Raster<T>) {
        if image.iter().any(|v| v.is_nan()) {
            warn!("NaN values found in {}", label);
            self.anomalies.push(ImageAnomaly {
                image: label.to_string(),
                kind: AnomalyKind::NanValues,
            });
        }
        if image.iter().any(|v| v.is_negative()) {
            warn!("Negative values found in {}", label);
            self.anomalies.push(ImageAnomaly {
                image: label.to_string(),
                kind: AnomalyKind::NegativeValues,
            });
        }

        self.zero_density.record(ZeroCount::of(image.iter()));
    }

    /// Compute the final record.
    ///
    /// Fails with [`Error::EmptyFolder`] when no image was pushed.
    pub fn finish(self) -> Result<FolderStats<T>> {
        if self.file_count == 0 {
            return Err(Error::EmptyFolder);
        }

        let sample_count = self.samples.len();
        let mut samples = self.samples;
        samples.retain(|v| !v.is_nan());
        let nan_count = sample_count - samples.len();

        samples.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let values = summarize(&samples, self.params.bins)?;

        let ground_truth = match self.params.mode {
            AnalysisMode::Plain => None,
            AnalysisMode::ZeroDensity => {
                samples.dedup();
                Some(GroundTruthSummary {
                    unique_values: samples,
                    zero_density: self.zero_density,
                    anomalies: self.anomalies,
                })
            }
        };

        Ok(FolderStats {
            mode: self.params.mode,
            file_count: self.file_count,
            shapes: self.shapes,
            sample_count,
            nan_count,
            values,
            ground_truth,
        })
    }
}

fn as_f64<T: RasterElement>(v: T) -> f64 {
    v.to_f64().unwrap_or(f64::NAN)
}

/// Statistics over sorted, NaN-free samples.
fn summarize<T: RasterElement>(sorted: &[T], bins: usize) -> Result<Option<ValueSummary<T>>> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Ok(None);
    };

    let n = sorted.len();
    let sum: f64 = sorted.iter().map(|&v| as_f64(v)).sum();
    let mean = sum / n as f64;

    let median = if n % 2 == 0 {
        (as_f64(sorted[n / 2 - 1]) + as_f64(sorted[n / 2])) / 2.0
    } else {
        as_f64(sorted[n / 2])
    };

    let histogram = Histogram::equal_width(
        sorted.iter().map(|&v| as_f64(v)),
        as_f64(min),
        as_f64(max),
        bins,
    )?;

    Ok(Some(ValueSummary {
        min,
        max,
        mean,
        median,
        histogram,
    }))
}

/// [`Algorithm`] wrapper running [`FolderStatsAggregator`] over owned images
#[derive(Debug, Clone, Copy)]
pub struct FolderStatistics<T>(PhantomData<T>);

impl<T> FolderStatistics<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> Default for FolderStatistics<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RasterElement> Algorithm for FolderStatistics<T> {
    type Input = Vec<Raster<T>>;
    type Output = FolderStats<T>;
    type Params = FolderStatsParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Folder statistics"
    }

    fn description(&self) -> &'static str {
        "Aggregate value range, central tendency, histogram and mask zero density over a folder of images"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        FolderStatsAggregator::analyze_with(&input, params)
    }
}
