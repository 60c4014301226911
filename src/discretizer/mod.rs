//! Discretization of continuous observations
//!
//! Tabular learners need a finite state set. This module lays a regular grid
//! over a continuous observation box and numbers its cells:
//!
//! - [`BinEdges`]: `n_bins + 1` linearly spaced edges per dimension
//! - [`MixedRadix`]: packs per-dimension bin indices into one integer
//! - [`Discretizer`]: wraps a [`ContinuousEnvironment`](crate::ports::ContinuousEnvironment)
//!   so it looks like a [`DiscreteEnvironment`](crate::ports::DiscreteEnvironment)
//!
//! ## Layout
//!
//! | Bin index | Meaning |
//! |-----------|---------|
//! | `0` | below the first edge (lower outlier) |
//! | `1..=n_bins` | between `edges[i - 1]` and `edges[i]` |
//! | `n_bins + 1` | at or above the last edge (upper outlier) |
//!
//! With `d` dimensions the state index is `sum(d_i * (n_bins + 2)^i)`.

pub mod bins;
pub mod encoding;
pub mod wrapper;

pub use bins::BinEdges;
pub use encoding::MixedRadix;
pub use wrapper::Discretizer;
