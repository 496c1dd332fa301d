//! Equal-width histograms over a known value range

use rastats_core::{Error, Result};

/// Number of bins used for folder reports
pub const DEFAULT_BINS: usize = 10;

/// One histogram bin: `[start, end)`, the last bin closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Share of all counted values, 0-100
    pub percentage: f64,
}

/// Equal-width histogram spanning `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
    total: usize,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins over `[min, max]`.
    ///
    /// Values are expected to lie inside the range (they are clamped to the
    /// first or last bin otherwise). When `min == max` every bin has zero
    /// width with both edges at `min`, and bin 0 holds every value.
    pub fn equal_width<I>(values: I, min: f64, max: f64, bins: usize) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        if bins == 0 {
            return Err(Error::InvalidParameter {
                name: "bins",
                value: bins.to_string(),
                reason: "histogram needs at least one bin".into(),
            });
        }
        if min.is_nan() || max.is_nan() || min > max {
            return Err(Error::InvalidParameter {
                name: "range",
                value: format!("{}..{}", min, max),
                reason: "range bounds must be ordered numbers".into(),
            });
        }

        let span = max - min;
        let width = span / bins as f64;
        // Reported edges; binning is checked against these so a value on an
        // inner edge always lands in the bin that starts there
        let edge = |i: usize| if i == bins { max } else { min + i as f64 * width };

        let mut counts = vec![0usize; bins];
        let mut total = 0usize;

        for v in values {
            let mut idx = 0;
            if span > 0.0 {
                let pos = (v - min) / span * bins as f64;
                if pos > 0.0 {
                    idx = (pos as usize).min(bins - 1);
                }
                while idx > 0 && v < edge(idx) {
                    idx -= 1;
                }
                while idx + 1 < bins && v >= edge(idx + 1) {
                    idx += 1;
                }
            }
            counts[idx] += 1;
            total += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let start = edge(i);
                let end = edge(i + 1);
                let percentage = if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                };
                HistogramBin {
                    start,
                    end,
                    count,
                    percentage,
                }
            })
            .collect();

        Ok(Self { bins, total })
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Number of values that were binned
    pub fn total(&self) -> usize {
        self.total
    }

    /// Sum of all bin percentages (100 unless nothing was binned)
    pub fn percentage_sum(&self) -> f64 {
        self.bins.iter().map(|b| b.percentage).sum()
    }
}
