//! Per-dimension bin edges and digitization

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Ordered bin boundaries for one observation dimension.
///
/// Holds `n_bins + 1` strictly increasing edges spanning `[low, high]`.
/// Digitizing a value yields an index in `0..=n_bins + 1`: `0` below the
/// first edge, `n_bins + 1` at or above the last edge, and `i` in
/// `1..=n_bins` when `edges[i - 1] <= value < edges[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    /// Build `n_bins + 1` linearly spaced edges between `low` and `high` inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `n_bins` is zero, a bound is
    /// not finite, `low >= high`, or the range is too narrow to produce
    /// strictly increasing edges.
    pub fn linspace(low: f64, high: f64, n_bins: usize) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::InvalidConfiguration {
                message: "n_bins must be positive".to_string(),
            });
        }
        if !low.is_finite() || !high.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "bin range [{low}, {high}] is not finite; supply explicit bounds"
                ),
            });
        }
        if low >= high {
            return Err(Error::InvalidConfiguration {
                message: format!("bin range [{low}, {high}] is empty"),
            });
        }

        let step = (high - low) / n_bins as f64;
        let edges: Vec<f64> = (0..=n_bins)
            .map(|i| {
                if i == n_bins {
                    high
                } else {
                    low + step * i as f64
                }
            })
            .collect();

        if edges.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidConfiguration {
                message: format!("bin range [{low}, {high}] is too narrow for {n_bins} bins"),
            });
        }

        Ok(Self { edges })
    }

    /// Index of the first edge strictly greater than `value`.
    ///
    /// NaN sorts after every edge and lands in the upper outlier bin.
    pub fn digitize(&self, value: f64) -> usize {
        if value.is_nan() {
            return self.edges.len();
        }
        self.edges.partition_point(|&edge| edge <= value)
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn low(&self) -> f64 {
        self.edges[0]
    }

    pub fn high(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }
}
