//! Environment port - abstraction over episodic simulators
//!
//! An environment is reset to a start state and stepped with discrete
//! actions until it reports termination. Continuous environments also report
//! the box their observations live in, which the discretizer uses to lay out
//! bins.

use crate::{
    Result,
    types::{Action, BoxSpace, StateIndex, Step},
};

/// Episodic environment with a discrete action space.
///
/// # Examples
///
/// ```
/// use polebalance::{Result, ports::Environment, types::Step};
///
/// /// Walk right until position 3; each step costs one point.
/// struct Walk(usize);
///
/// impl Environment for Walk {
///     type Observation = usize;
///
///     fn reset(&mut self) -> Result<usize> {
///         self.0 = 0;
///         Ok(0)
///     }
///
///     fn step(&mut self, action: usize) -> Result<Step<usize>> {
///         if action == 1 {
///             self.0 += 1;
///         }
///         Ok(Step::new(self.0, -1.0, self.0 == 3))
///     }
///
///     fn action_count(&self) -> usize {
///         2
///     }
/// }
/// ```
pub trait Environment {
    type Observation;

    /// Start a new episode and return the initial observation.
    ///
    /// # Errors
    ///
    /// Returns an error if the simulator cannot be reset.
    fn reset(&mut self) -> Result<Self::Observation>;

    /// Apply `action` and return the resulting observation, reward and
    /// termination flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the action is rejected or the simulator produces
    /// a malformed observation. Rollouts are not idempotent, so callers abort
    /// the episode instead of retrying.
    fn step(&mut self, action: Action) -> Result<Step<Self::Observation>>;

    /// Number of discrete actions `A`; valid actions are `0..A`.
    fn action_count(&self) -> usize;
}

/// Environment whose observations are real-valued vectors inside a box.
pub trait ContinuousEnvironment: Environment<Observation = Vec<f64>> {
    /// Per-dimension bounds as reported by the simulator (possibly infinite).
    fn observation_space(&self) -> &BoxSpace;
}

/// Environment whose observations are integer state indices in `0..S`.
pub trait DiscreteEnvironment: Environment<Observation = StateIndex> {
    /// Number of discrete states `S`.
    fn state_count(&self) -> usize;
}
