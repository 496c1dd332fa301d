//! # rastats algorithms
//!
//! Dataset statistics for rastats.
//!
//! ## Modules
//!
//! - **statistics**: Folder aggregation, histograms, zero-density buckets
//! - **dataset**: Split / category traversal and reporting hooks

pub mod dataset;
pub mod statistics;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dataset::{
        DatasetConfig, DatasetWalker, FolderOptions, FolderReporter, WalkSummary, analyze_folder,
    };
    pub use crate::statistics::{
        AnalysisMode, FolderStatistics, FolderStats, FolderStatsAggregator, FolderStatsParams,
        Histogram, ZeroDensityBuckets,
    };
    pub use rastats_core::prelude::*;
}
