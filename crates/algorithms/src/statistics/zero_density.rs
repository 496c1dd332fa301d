//! Zero-density buckets for ground-truth masks
//!
//! Each mask contributes the share of its samples equal to zero. Buckets
//! 0..=9 cover `[0%, 10%)` .. `[90%, 100%]` with the index capped at 9;
//! bucket 10 additionally counts masks that are entirely zero, so such a
//! mask is counted in both bucket 9 and bucket 10.

use rastats_core::RasterElement;

/// Number of percentage-range buckets
pub const RANGE_BUCKETS: usize = 10;

/// Index of the "exactly 100%" bucket
pub const FULLY_ZERO_BUCKET: usize = RANGE_BUCKETS;

/// Zero and total sample counts of a single image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroCount {
    pub zeros: usize,
    pub total: usize,
}

impl ZeroCount {
    /// Count zero-valued samples (`-0.0` counts as zero, NaN does not).
    pub fn of<'a, T, I>(samples: I) -> Self
    where
        T: RasterElement,
        I: IntoIterator<Item = &'a T>,
    {
        let zero = T::zero();
        let (zeros, total) = samples
            .into_iter()
            .fold((0usize, 0usize), |(z, n), v| (z + usize::from(*v == zero), n + 1));
        Self { zeros, total }
    }

    /// Percentage of zero samples, 0-100. `None` for an image without samples.
    pub fn percentage(&self) -> Option<f64> {
        (self.total > 0).then(|| self.zeros as f64 * 100.0 / self.total as f64)
    }

    /// `min(floor(percentage / 10), 9)` in exact integer arithmetic.
    pub fn bucket(&self) -> Option<usize> {
        (self.total > 0).then(|| (self.zeros * RANGE_BUCKETS / self.total).min(RANGE_BUCKETS - 1))
    }

    pub fn is_fully_zero(&self) -> bool {
        self.total > 0 && self.zeros == self.total
    }
}

/// Per-folder histogram of mask zero densities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZeroDensityBuckets {
    counts: [usize; RANGE_BUCKETS + 1],
}

impl ZeroDensityBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one image. Images without samples are ignored.
    pub fn record(&mut self, count: ZeroCount) {
        let Some(bucket) = count.bucket() else {
            return;
        };
        self.counts[bucket] += 1;
        if count.is_fully_zero() {
            self.counts[FULLY_ZERO_BUCKET] += 1;
        }
    }

    /// All 11 counts, the last one being the "exactly 100%" bucket
    pub fn counts(&self) -> &[usize; RANGE_BUCKETS + 1] {
        &self.counts
    }

    /// The ten percentage-range buckets
    pub fn range_counts(&self) -> &[usize] {
        &self.counts[..RANGE_BUCKETS]
    }

    pub fn fully_zero(&self) -> usize {
        self.counts[FULLY_ZERO_BUCKET]
    }

    /// Images recorded; each lands in exactly one range bucket
    pub fn images(&self) -> usize {
        self.range_counts().iter().sum()
    }
}
