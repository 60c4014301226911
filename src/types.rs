//! Shared value types passed between environments, discretizer and learners.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a discrete state (row of the value table).
pub type StateIndex = usize;

/// Index of a discrete action (column of the value table).
pub type Action = usize;

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f64,
    pub done: bool,
}

impl<O> Step<O> {
    pub fn new(observation: O, reward: f64, done: bool) -> Self {
        Self {
            observation,
            reward,
            done,
        }
    }

    /// Replace the observation while keeping reward and termination.
    pub fn map<P>(self, f: impl FnOnce(O) -> P) -> Step<P> {
        Step {
            observation: f(self.observation),
            reward: self.reward,
            done: self.done,
        }
    }
}

/// One experienced transition `(s, a, s', r, done)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: StateIndex,
    pub action: Action,
    pub next_state: StateIndex,
    pub reward: f64,
    pub done: bool,
}

impl Transition {
    pub fn new(
        state: StateIndex,
        action: Action,
        next_state: StateIndex,
        reward: f64,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            next_state,
            reward,
            done,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(state={}, action={}, next_state={}, reward={}, done={})",
            self.state, self.action, self.next_state, self.reward, self.done
        )
    }
}

/// Axis-aligned box of continuous observations, one `[low, high]` pair per dimension.
///
/// Bounds may be infinite; environments report what they know and callers
/// override unbounded dimensions when discretizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl BoxSpace {
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Self {
        Self { low, high }
    }

    pub fn dimensions(&self) -> usize {
        self.low.len()
    }

    pub fn contains(&self, observation: &[f64]) -> bool {
        observation.len() == self.dimensions()
            && observation
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(x, (lo, hi))| lo <= x && x <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_display_lists_all_fields() {
        let t = Transition::new(3, 1, 7, -1.5, true);
        assert_eq!(
            t.to_string(),
            "(state=3, action=1, next_state=7, reward=-1.5, done=true)"
        );
    }

    #[test]
    fn step_map_keeps_reward_and_done() {
        let step = Step::new(vec![0.5], 1.0, false).map(|obs| obs.len());
        assert_eq!(step, Step::new(1, 1.0, false));
    }

    #[test]
    fn box_space_contains_checks_shape_and_bounds() {
        let space = BoxSpace::new(vec![-1.0, f64::NEG_INFINITY], vec![1.0, f64::INFINITY]);
        assert!(space.contains(&[0.0, 1e9]));
        assert!(!space.contains(&[2.0, 0.0]));
        assert!(!space.contains(&[0.0]));
    }
}
