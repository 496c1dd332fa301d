//! Dataset traversal
//!
//! A dataset is laid out as `root/<split>/<category>/*.tif`. The walker
//! analyzes every category folder of the configured splits and forwards
//! each result to a [`FolderReporter`].

mod config;
mod walker;

pub use config::{DEFAULT_GROUND_TRUTH, DEFAULT_SPLITS, DatasetConfig, FolderOptions};
pub use walker::{
    DatasetWalker, FolderOutcome, FolderReporter, WalkSummary, analyze_folder,
};
