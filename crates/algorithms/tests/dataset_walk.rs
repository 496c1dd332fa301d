//! Integration tests for dataset traversal.
//!
//! Each test builds a small `root/<split>/<category>/*.tif` tree in a
//! temporary directory with the `tiff` encoder and walks it.

use std::fs::{self, File};
use std::path::Path;

use approx::assert_relative_eq;
use rastats_algorithms::dataset::{
    DatasetConfig, DatasetWalker, FolderOptions, FolderReporter, WalkSummary, analyze_folder,
};
use rastats_algorithms::statistics::{AnalysisMode, FolderStats};
use rastats_core::raster::{RasterElement, SampleType};
use rastats_core::{Error, Result};
use tiff::encoder::{TiffEncoder, colortype};

// ── Fixture helpers ───────────────────────────────────────────────────

fn write_gray8(path: &Path, width: u32, height: u32, data: &[u8]) {
    let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
    encoder
        .write_image::<colortype::Gray8>(width, height, data)
        .unwrap();
}

fn write_gray16(path: &Path, width: u32, height: u32, data: &[u16]) {
    let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
    encoder
        .write_image::<colortype::Gray16>(width, height, data)
        .unwrap();
}

fn write_gray32f(path: &Path, width: u32, height: u32, data: &[f32]) {
    let mut encoder = TiffEncoder::new(File::create(path).unwrap()).unwrap();
    encoder
        .write_image::<colortype::Gray32Float>(width, height, data)
        .unwrap();
}

/// Flattened view of a `FolderStats<T>` so tests need not care about `T`.
#[derive(Debug, Clone)]
struct Recorded {
    name: String,
    sample_type: SampleType,
    mode: AnalysisMode,
    file_count: usize,
    shapes: Vec<Vec<usize>>,
    sample_count: usize,
    min: f64,
    max: f64,
    mean: f64,
    median: f64,
    percentage_sum: f64,
    unique: Option<Vec<f64>>,
    buckets: Option<[usize; 11]>,
    anomalies: usize,
}

#[derive(Default)]
struct RecordingReporter {
    splits: Vec<String>,
    empty: Vec<String>,
    folders: Vec<Recorded>,
    loaded: usize,
    skipped: Vec<String>,
}

impl RecordingReporter {
    fn folder(&self, name: &str) -> &Recorded {
        self.folders
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no stats recorded for {name}"))
    }
}

fn f(v: impl RasterElement) -> f64 {
    v.to_f64().unwrap()
}

impl FolderReporter for RecordingReporter {
    fn begin_split(&mut self, name: &str, _path: &Path) -> Result<()> {
        self.splits.push(name.to_string());
        Ok(())
    }

    fn file_loaded(&mut self, _path: &Path) {
        self.loaded += 1;
    }

    fn file_skipped(&mut self, path: &Path, _error: &Error) {
        self.skipped
            .push(path.file_name().unwrap().to_string_lossy().into_owned());
    }

    fn empty_folder(&mut self, name: &str) -> Result<()> {
        self.empty.push(name.to_string());
        Ok(())
    }

    fn folder_stats<T: RasterElement>(&mut self, name: &str, stats: &FolderStats<T>) -> Result<()> {
        let values = stats.values.as_ref().expect("finite samples");
        self.folders.push(Recorded {
            name: name.to_string(),
            sample_type: T::SAMPLE_TYPE,
            mode: stats.mode,
            file_count: stats.file_count,
            shapes: stats.shapes.iter().cloned().collect(),
            sample_count: stats.sample_count,
            min: f(values.min),
            max: f(values.max),
            mean: values.mean,
            median: values.median,
            percentage_sum: values.histogram.percentage_sum(),
            unique: stats
                .ground_truth
                .as_ref()
                .map(|gt| gt.unique_values.iter().map(|&v| f(v)).collect()),
            buckets: stats.ground_truth.as_ref().map(|gt| *gt.zero_density.counts()),
            anomalies: stats.ground_truth.as_ref().map_or(0, |gt| gt.anomalies.len()),
        });
        Ok(())
    }
}

/// Standard layout used by most tests.
fn build_dataset(root: &Path) {
    let gt = root.join("train_val_set/train_gt");
    let img = root.join("train_val_set/train_img");
    let empty = root.join("train_val_set/unlabeled");
    let test_img = root.join("test_set/test_img");
    for dir in [&gt, &img, &empty, &test_img] {
        fs::create_dir_all(dir).unwrap();
    }

    write_gray8(&gt.join("mask_a.tif"), 2, 2, &[0, 0, 0, 1]);
    write_gray8(&gt.join("mask_b.TIF"), 2, 2, &[0, 0, 0, 0]);
    write_gray8(&gt.join("mask_c.tif"), 2, 2, &[1, 1, 1, 1]);
    fs::write(gt.join("README.md"), b"masks").unwrap();

    write_gray16(&img.join("img_0.tif"), 3, 2, &[100, 200, 300, 400, 500, 600]);
    write_gray16(&img.join("img_1.tif"), 3, 2, &[600, 500, 400, 300, 200, 100]);

    fs::write(empty.join("notes.txt"), b"nothing here").unwrap();
    fs::write(root.join("train_val_set/stray.tif"), b"not a folder").unwrap();

    write_gray32f(&test_img.join("scan.tif"), 2, 1, &[0.25, 0.75]);
}

// ---------------------------------------------------------------------------
// Full walks
// ---------------------------------------------------------------------------

#[test]
fn walk_default_layout() {
    let dir = tempfile::tempdir().unwrap();
    build_dataset(dir.path());

    let walker = DatasetWalker::new(DatasetConfig::new(dir.path()));
    let mut reporter = RecordingReporter::default();
    let summary = walker.run(&mut reporter).unwrap();

    assert_eq!(
        summary,
        WalkSummary {
            folders_analyzed: 3,
            folders_empty: 1,
            files_skipped: 0,
        }
    );
    assert_eq!(reporter.splits, vec!["train_val_set", "test_set"]);
    assert_eq!(reporter.empty, vec!["unlabeled"]);
    assert_eq!(reporter.loaded, 6);

    let gt = reporter.folder("train_gt");
    assert_eq!(gt.mode, AnalysisMode::ZeroDensity);
    assert_eq!(gt.file_count, 3);
    assert_eq!(gt.sample_count, 12);
    assert_eq!(gt.min, 0.0);
    assert_eq!(gt.max, 1.0);
    assert_relative_eq!(gt.mean, 5.0 / 12.0);
    assert_eq!(gt.median, 0.0);
    assert_eq!(gt.unique.as_deref(), Some(&[0.0, 1.0][..]));
    let buckets = gt.buckets.unwrap();
    assert_eq!(buckets, [1, 0, 0, 0, 0, 0, 0, 1, 0, 1, 1]);
    assert_eq!(buckets[..10].iter().sum::<usize>(), gt.file_count);
    assert_eq!(gt.anomalies, 0);

    let img = reporter.folder("train_img");
    assert_eq!(img.mode, AnalysisMode::Plain);
    assert!(img.unique.is_none());
    assert_eq!(img.shapes, vec![vec![2, 3]]);
    assert_eq!(img.min, 100.0);
    assert_eq!(img.max, 600.0);
    assert_relative_eq!(img.mean, 350.0);
    assert_relative_eq!(img.median, 350.0);
    assert_relative_eq!(img.percentage_sum, 100.0, epsilon = 1e-9);

    let scan = reporter.folder("test_img");
    assert_eq!(scan.file_count, 1);
    assert_relative_eq!(scan.mean, 0.5);
}

#[test]
fn walk_custom_splits_and_ground_truth() {
    let dir = tempfile::tempdir().unwrap();
    build_dataset(dir.path());

    let config = DatasetConfig::new(dir.path())
        .with_splits(["train_val_set"])
        .with_ground_truth(["train_img"]);
    let mut reporter = RecordingReporter::default();
    DatasetWalker::new(config).run(&mut reporter).unwrap();

    assert_eq!(reporter.splits, vec!["train_val_set"]);
    assert_eq!(reporter.folder("train_gt").mode, AnalysisMode::Plain);

    let img = reporter.folder("train_img");
    assert_eq!(img.mode, AnalysisMode::ZeroDensity);
    // No zeros at all: both images land in bucket 0
    assert_eq!(img.buckets.unwrap()[0], 2);
    assert_eq!(img.unique.as_ref().unwrap().len(), 6);
}

#[test]
fn walk_missing_split_fails() {
    let dir = tempfile::tempdir().unwrap();
    build_dataset(dir.path());

    let config = DatasetConfig::new(dir.path()).with_splits(["train_val_set", "holdout"]);
    let mut reporter = RecordingReporter::default();
    let err = DatasetWalker::new(config).run(&mut reporter).unwrap_err();
    assert!(err.to_string().contains("holdout"));
}

// ---------------------------------------------------------------------------
// Single folders
// ---------------------------------------------------------------------------

#[test]
fn corrupt_file_is_fatal_by_default() {
    let dir = tempfile::tempdir().unwrap();
    write_gray8(&dir.path().join("a.tif"), 2, 2, &[1, 2, 3, 4]);
    fs::write(dir.path().join("b.tif"), b"definitely not a tiff").unwrap();

    let mut reporter = RecordingReporter::default();
    let err = analyze_folder(
        dir.path(),
        AnalysisMode::Plain,
        &FolderOptions::default(),
        &mut reporter,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Decode { ref path, .. } if path.ends_with("b.tif")));
    assert!(reporter.folders.is_empty());
}

#[test]
fn corrupt_file_skipped_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.tif"), b"definitely not a tiff").unwrap();
    write_gray8(&dir.path().join("b.tif"), 2, 2, &[1, 2, 3, 4]);

    let options = FolderOptions {
        skip_unreadable: true,
        ..FolderOptions::default()
    };
    let mut reporter = RecordingReporter::default();
    let outcome = analyze_folder(dir.path(), AnalysisMode::Plain, &options, &mut reporter).unwrap();

    assert!(outcome.analyzed);
    assert_eq!(outcome.files_skipped, 1);
    assert_eq!(reporter.skipped, vec!["a.tif"]);
    let name = dir.path().file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(reporter.folder(&name).file_count, 1);
}

#[test]
fn all_files_unreadable_reports_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.tif"), b"junk").unwrap();
    fs::write(dir.path().join("b.tif"), b"junk").unwrap();

    let options = FolderOptions {
        skip_unreadable: true,
        ..FolderOptions::default()
    };
    let mut reporter = RecordingReporter::default();
    let outcome = analyze_folder(dir.path(), AnalysisMode::Plain, &options, &mut reporter).unwrap();

    assert!(!outcome.analyzed);
    assert_eq!(outcome.files_skipped, 2);
    assert_eq!(reporter.empty.len(), 1);
    assert_eq!(reporter.skipped.len(), 2);
}

#[test]
fn mixed_integer_types_promoted() {
    let dir = tempfile::tempdir().unwrap();
    write_gray8(&dir.path().join("a.tif"), 2, 2, &[0, 0, 0, 255]);
    write_gray16(&dir.path().join("b.tif"), 2, 2, &[0, 0, 1000, 60_000]);

    let mut reporter = RecordingReporter::default();
    let outcome = analyze_folder(
        dir.path(),
        AnalysisMode::ZeroDensity,
        &FolderOptions::default(),
        &mut reporter,
    )
    .unwrap();

    assert!(outcome.analyzed);
    let rec = &reporter.folders[0];
    assert_eq!(rec.sample_type, SampleType::U16);
    assert_eq!(rec.file_count, 2);
    assert_eq!(rec.sample_count, 8);
    assert_eq!(rec.min, 0.0);
    assert_eq!(rec.max, 60_000.0);
    assert_relative_eq!(rec.mean, 61_255.0 / 8.0);
    assert_eq!(rec.unique.as_deref(), Some(&[0.0, 255.0, 1000.0, 60_000.0][..]));
    // 75% zero -> bucket 7, 50% zero -> bucket 5
    let buckets = rec.buckets.unwrap();
    assert_eq!(buckets[7], 1);
    assert_eq!(buckets[5], 1);
}

#[test]
fn integers_mixed_with_floats_promoted() {
    let dir = tempfile::tempdir().unwrap();
    write_gray8(&dir.path().join("a.tif"), 2, 1, &[1, 3]);
    write_gray32f(&dir.path().join("b.tif"), 2, 1, &[0.5, 2.5]);

    let mut reporter = RecordingReporter::default();
    analyze_folder(
        dir.path(),
        AnalysisMode::Plain,
        &FolderOptions::default(),
        &mut reporter,
    )
    .unwrap();

    let rec = &reporter.folders[0];
    assert_eq!(rec.sample_type, SampleType::F32);
    assert_eq!(rec.sample_count, 4);
    assert_eq!(rec.min, 0.5);
    assert_eq!(rec.max, 3.0);
    assert_relative_eq!(rec.median, 1.75);
}

#[test]
fn inconsistent_shapes_reported() {
    let dir = tempfile::tempdir().unwrap();
    write_gray8(&dir.path().join("a.tif"), 2, 2, &[0, 0, 1, 1]);
    write_gray8(&dir.path().join("b.tif"), 3, 1, &[2, 2, 2]);

    let mut reporter = RecordingReporter::default();
    analyze_folder(
        dir.path(),
        AnalysisMode::ZeroDensity,
        &FolderOptions::default(),
        &mut reporter,
    )
    .unwrap();

    let rec = &reporter.folders[0];
    assert_eq!(rec.shapes, vec![vec![1, 3], vec![2, 2]]);
    assert_eq!(rec.sample_count, 7);
    // 50% zero -> bucket 5, 0% zero -> bucket 0
    let buckets = rec.buckets.unwrap();
    assert_eq!(buckets[5], 1);
    assert_eq!(buckets[0], 1);
    assert!(rec.min <= rec.median && rec.median <= rec.max);
}

#[test]
fn custom_bin_count() {
    let dir = tempfile::tempdir().unwrap();
    write_gray8(&dir.path().join("a.tif"), 4, 1, &[0, 10, 20, 30]);

    struct BinCounter(usize);
    impl FolderReporter for BinCounter {
        fn empty_folder(&mut self, _name: &str) -> Result<()> {
            Ok(())
        }
        fn folder_stats<T: RasterElement>(&mut self, _name: &str, stats: &FolderStats<T>) -> Result<()> {
            self.0 = stats.values.as_ref().unwrap().histogram.bins().len();
            Ok(())
        }
    }

    let options = FolderOptions {
        bins: 4,
        ..FolderOptions::default()
    };
    let mut counter = BinCounter(0);
    analyze_folder(dir.path(), AnalysisMode::Plain, &options, &mut counter).unwrap();
    assert_eq!(counter.0, 4);
}
