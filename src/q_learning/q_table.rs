//! Dense value table for tabular Q-learning

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, StateIndex, Transition},
};

/// Q-table holding one value per (state, action) pair
///
/// Stored row-major as a flat `n_states * n_actions` vector. The shape is
/// fixed at construction; values start at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    values: Vec<f64>,
    n_states: usize,
    n_actions: usize,
}

impl QTable {
    /// Create a zero-initialised table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either dimension is zero or
    /// the table would not fit in memory addressing.
    pub fn new(n_states: usize, n_actions: usize) -> Result<Self> {
        let len = Self::checked_len(n_states, n_actions)?;
        Ok(Self {
            values: vec![0.0; len],
            n_states,
            n_actions,
        })
    }

    /// Rebuild a table from row-major values.
    pub fn from_values(n_states: usize, n_actions: usize, values: Vec<f64>) -> Result<Self> {
        let len = Self::checked_len(n_states, n_actions)?;
        if values.len() != len {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "value table expects {n_states}x{n_actions} = {len} entries, got {}",
                    values.len()
                ),
            });
        }
        Ok(Self {
            values,
            n_states,
            n_actions,
        })
    }

    fn checked_len(n_states: usize, n_actions: usize) -> Result<usize> {
        if n_states == 0 || n_actions == 0 {
            return Err(Error::InvalidConfiguration {
                message: format!("value table shape {n_states}x{n_actions} has no cells"),
            });
        }
        n_states
            .checked_mul(n_actions)
            .ok_or_else(|| Error::InvalidConfiguration {
                message: format!("value table shape {n_states}x{n_actions} is too large"),
            })
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }

    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Row-major values, `n_states * n_actions` long.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// All action values for `state`.
    pub fn row(&self, state: StateIndex) -> Result<&[f64]> {
        self.check_state(state)?;
        let start = state * self.n_actions;
        Ok(&self.values[start..start + self.n_actions])
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: StateIndex, action: Action) -> Result<f64> {
        self.check_action(action)?;
        Ok(self.row(state)?[action])
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: StateIndex, action: Action, value: f64) -> Result<()> {
        self.check_state(state)?;
        self.check_action(action)?;
        self.values[state * self.n_actions + action] = value;
        Ok(())
    }

    /// Get maximum Q-value over all actions in a state
    pub fn max_q(&self, state: StateIndex) -> Result<f64> {
        Ok(self
            .row(state)?
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max))
    }

    /// Actions whose value equals the row maximum exactly.
    ///
    /// If no value compares equal (a row of NaNs), every action is returned
    /// so callers always have something to choose from.
    pub fn greedy_actions(&self, state: StateIndex) -> Result<Vec<Action>> {
        let row = self.row(state)?;
        let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let ties: Vec<Action> = row
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == max)
            .map(|(action, _)| action)
            .collect();
        if ties.is_empty() {
            Ok((0..self.n_actions).collect())
        } else {
            Ok(ties)
        }
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// For terminal transitions the bootstrap term is dropped:
    /// Q(s,a) ← Q(s,a) + α[r - Q(s,a)]
    ///
    /// Returns the TD error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransitionOutOfRange`] carrying the transition if any
    /// index falls outside the table. The table is left untouched.
    pub fn q_learning_update(
        &mut self,
        transition: &Transition,
        alpha: f64,
        gamma: f64,
    ) -> Result<f64> {
        let reject = |reason: String| Error::TransitionOutOfRange {
            transition: *transition,
            reason,
        };
        if transition.state >= self.n_states {
            return Err(reject(format!("state must be < {}", self.n_states)));
        }
        if transition.next_state >= self.n_states {
            return Err(reject(format!("next_state must be < {}", self.n_states)));
        }
        if transition.action >= self.n_actions {
            return Err(reject(format!("action must be < {}", self.n_actions)));
        }

        let index = transition.state * self.n_actions + transition.action;
        let current_q = self.values[index];
        let td_target = if transition.done {
            transition.reward
        } else {
            transition.reward + gamma * self.max_q(transition.next_state)?
        };
        let td_error = td_target - current_q;
        self.values[index] += alpha * td_error;
        Ok(td_error)
    }

    /// Reset all Q-values to zero
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|value| *value = 0.0);
    }

    fn check_state(&self, state: StateIndex) -> Result<()> {
        if state < self.n_states {
            Ok(())
        } else {
            Err(Error::StateOutOfRange {
                state,
                n_states: self.n_states,
            })
        }
    }

    fn check_action(&self, action: Action) -> Result<()> {
        if action < self.n_actions {
            Ok(())
        } else {
            Err(Error::ActionOutOfRange {
                action,
                n_actions: self.n_actions,
            })
        }
    }
}
