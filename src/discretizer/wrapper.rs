//! Discretizing wrapper around a continuous environment

use tracing::debug;

use super::{bins::BinEdges, encoding::MixedRadix};
use crate::{
    Error, Result,
    ports::{ContinuousEnvironment, DiscreteEnvironment, Environment},
    types::{Action, StateIndex, Step},
};

/// Wraps a continuous environment and exposes integer states.
///
/// Each dimension gets `n_bins` interior bins plus one outlier bin on either
/// side, so the discrete space has `(n_bins + 2)^d` states and every
/// observation, however extreme, maps to a valid state.
///
/// # Examples
///
/// ```
/// use polebalance::{discretizer::Discretizer, envs::CartPole};
///
/// let env = CartPole::new().with_seed(7);
/// let discretizer = Discretizer::with_bounds(
///     env,
///     8,
///     Some(vec![-2.4, -2.0, -0.42, -3.5]),
///     Some(vec![2.4, 2.0, 0.42, 3.5]),
/// )?;
/// assert_eq!(discretizer.state_count(), 10_000);
/// assert_eq!(discretizer.observation(&[0.0, 0.0, 0.0, 0.0])?, 5555);
/// # Ok::<(), polebalance::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Discretizer<E> {
    env: E,
    bins: Vec<BinEdges>,
    radix: MixedRadix,
}

impl<E: ContinuousEnvironment> Discretizer<E> {
    /// Discretize using the bounds the environment reports.
    ///
    /// # Errors
    ///
    /// Fails if any reported bound is infinite (pass explicit bounds through
    /// [`Discretizer::with_bounds`] instead) or `n_bins` is zero.
    pub fn new(env: E, n_bins: usize) -> Result<Self> {
        Self::with_bounds(env, n_bins, None, None)
    }

    /// Discretize with optional `low` / `high` vectors overriding the
    /// environment's reported bounds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundsMismatch`] if the bound vectors disagree in
    /// length with each other or with the observation space, and
    /// [`Error::InvalidConfiguration`] for zero bins, non-finite or empty
    /// ranges, or a state space too large to index.
    pub fn with_bounds(
        env: E,
        n_bins: usize,
        low: Option<Vec<f64>>,
        high: Option<Vec<f64>>,
    ) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::InvalidConfiguration {
                message: "n_bins must be positive".to_string(),
            });
        }

        let space = env.observation_space();
        let dims = space.dimensions();
        let low = low.unwrap_or_else(|| space.low.clone());
        let high = high.unwrap_or_else(|| space.high.clone());
        if low.len() != high.len() || low.len() != dims || space.high.len() != dims {
            return Err(Error::BoundsMismatch {
                low: low.len(),
                high: high.len(),
                dims,
            });
        }

        let bins = low
            .iter()
            .zip(&high)
            .enumerate()
            .map(|(dim, (&lo, &hi))| {
                BinEdges::linspace(lo, hi, n_bins).map_err(|err| match err {
                    Error::InvalidConfiguration { message } => Error::InvalidConfiguration {
                        message: format!("dimension {dim}: {message}"),
                    },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let radix = MixedRadix::new(n_bins + 2, dims)?;

        debug!(
            dims,
            n_bins,
            states = radix.capacity(),
            "built observation discretizer"
        );

        Ok(Self { env, bins, radix })
    }

    /// Map a raw observation vector to its discrete state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObservationShape`] if `raw` does not have one value
    /// per dimension. Values themselves never fail: out-of-range values fall
    /// into the outlier bins.
    pub fn observation(&self, raw: &[f64]) -> Result<StateIndex> {
        let digits = self.digitize(raw)?;
        Ok(self.radix.encode(&digits))
    }

    /// Per-dimension bin indices of a raw observation, each in `0..=n_bins + 1`.
    pub fn digitize(&self, raw: &[f64]) -> Result<Vec<usize>> {
        if raw.len() != self.bins.len() {
            return Err(Error::ObservationShape {
                expected: self.bins.len(),
                got: raw.len(),
            });
        }
        Ok(self
            .bins
            .iter()
            .zip(raw)
            .map(|(bins, &value)| bins.digitize(value))
            .collect())
    }
}

impl<E> Discretizer<E> {
    /// Recover the per-dimension bin indices encoded in `state`.
    pub fn decode(&self, state: StateIndex) -> Result<Vec<usize>> {
        self.radix.decode(state)
    }

    pub fn n_bins(&self) -> usize {
        self.radix.base() - 2
    }

    pub fn dimensions(&self) -> usize {
        self.bins.len()
    }

    /// Number of discrete states, `(n_bins + 2)^d`.
    pub fn state_count(&self) -> usize {
        self.radix.capacity()
    }

    pub fn bin_edges(&self) -> &[BinEdges] {
        &self.bins
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }
}

impl<E: ContinuousEnvironment> Environment for Discretizer<E> {
    type Observation = StateIndex;

    fn reset(&mut self) -> Result<StateIndex> {
        let raw = self.env.reset()?;
        self.observation(&raw)
    }

    fn step(&mut self, action: Action) -> Result<Step<StateIndex>> {
        let step = self.env.step(action)?;
        let state = self.observation(&step.observation)?;
        Ok(Step::new(state, step.reward, step.done))
    }

    fn action_count(&self) -> usize {
        self.env.action_count()
    }
}

impl<E: ContinuousEnvironment> DiscreteEnvironment for Discretizer<E> {
    fn state_count(&self) -> usize {
        self.radix.capacity()
    }
}
