//! Statistical summaries of image folders
//!
//! - **folder**: Per-folder aggregation of value statistics
//! - **histogram**: Equal-width histograms
//! - **zero_density**: Zero-share buckets for ground-truth masks

pub mod folder;
pub mod histogram;
pub mod zero_density;

pub use folder::{
    AnalysisMode, AnomalyKind, FolderStatistics, FolderStats, FolderStatsAggregator,
    FolderStatsParams, GroundTruthSummary, ImageAnomaly, ValueSummary,
};
pub use histogram::{DEFAULT_BINS, Histogram, HistogramBin};
pub use zero_density::{FULLY_ZERO_BUCKET, RANGE_BUCKETS, ZeroCount, ZeroDensityBuckets};
