//! Dataset layout configuration

use std::path::PathBuf;

use crate::statistics::{AnalysisMode, DEFAULT_BINS, FolderStatsParams};

/// Split directories analyzed when none are given
pub const DEFAULT_SPLITS: [&str; 2] = ["train_val_set", "test_set"];

/// Category folder holding ground-truth masks when none is given
pub const DEFAULT_GROUND_TRUTH: &str = "train_gt";

/// Options applied to every folder of a walk
#[derive(Debug, Clone)]
pub struct FolderOptions {
    /// Number of histogram bins (default: 10)
    pub bins: usize,
    /// Log and skip files that fail to decode instead of aborting
    pub skip_unreadable: bool,
}

impl Default for FolderOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            skip_unreadable: false,
        }
    }
}

impl FolderOptions {
    pub fn params(&self, mode: AnalysisMode) -> FolderStatsParams {
        FolderStatsParams {
            mode,
            bins: self.bins,
        }
    }
}

/// Layout of a dataset on disk: `root/<split>/<category>/*.tif`
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub root: PathBuf,
    /// Split directories under `root`, analyzed in this order
    pub splits: Vec<String>,
    /// Category folder names analyzed in zero-density mode
    pub ground_truth: Vec<String>,
    pub options: FolderOptions,
}

impl DatasetConfig {
    /// Configuration with the default split and ground-truth names.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            splits: DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect(),
            ground_truth: vec![DEFAULT_GROUND_TRUTH.to_string()],
            options: FolderOptions::default(),
        }
    }

    pub fn with_splits<I, S>(mut self, splits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.splits = splits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_ground_truth<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ground_truth = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options(mut self, options: FolderOptions) -> Self {
        self.options = options;
        self
    }

    /// Mode selected for a category folder name
    pub fn mode_for(&self, category: &str) -> AnalysisMode {
        if self.ground_truth.iter().any(|gt| gt == category) {
            AnalysisMode::ZeroDensity
        } else {
            AnalysisMode::Plain
        }
    }
}
