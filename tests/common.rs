//! Common test utilities for the polebalance test suite.
//!
//! Provides small deterministic environments whose optimal behavior is
//! known in advance.

#![allow(dead_code)]

use polebalance::{
    Error, Result,
    ports::{ContinuousEnvironment, DiscreteEnvironment, Environment},
    types::{Action, BoxSpace, StateIndex, Step},
};

/// Start position of the corridor
pub const CORRIDOR_START: f64 = 0.125;

/// Cell width moved per step
pub const CORRIDOR_STRIDE: f64 = 0.25;

/// One-dimensional corridor on `[0, 1]`.
///
/// Action 0 moves left (clamped at 0), action 1 moves right. Reaching 1.0
/// ends the episode with reward 1; every other step pays nothing. Episodes
/// also end after `max_steps` steps. The optimal policy always moves right
/// and collects reward 1 in four steps.
pub struct Corridor {
    space: BoxSpace,
    position: f64,
    steps: usize,
    max_steps: usize,
}

impl Corridor {
    pub fn new(max_steps: usize) -> Self {
        Self {
            space: BoxSpace::new(vec![0.0], vec![1.0]),
            position: CORRIDOR_START,
            steps: 0,
            max_steps,
        }
    }

    pub fn position(&self) -> f64 {
        self.position
    }
}

impl Environment for Corridor {
    type Observation = Vec<f64>;

    fn reset(&mut self) -> Result<Vec<f64>> {
        self.position = CORRIDOR_START;
        self.steps = 0;
        Ok(vec![self.position])
    }

    fn step(&mut self, action: Action) -> Result<Step<Vec<f64>>> {
        self.position = match action {
            0 => (self.position - CORRIDOR_STRIDE).max(0.0),
            1 => self.position + CORRIDOR_STRIDE,
            other => {
                return Err(Error::ActionOutOfRange {
                    action: other,
                    n_actions: 2,
                });
            }
        };
        self.steps += 1;

        let reached = self.position >= 1.0;
        let reward = if reached { 1.0 } else { 0.0 };
        Ok(Step::new(
            vec![self.position],
            reward,
            reached || self.steps >= self.max_steps,
        ))
    }

    fn action_count(&self) -> usize {
        2
    }
}

impl ContinuousEnvironment for Corridor {
    fn observation_space(&self) -> &BoxSpace {
        &self.space
    }
}

/// Discrete environment that claims `state_count` states but jumps to
/// `bad_state` on its first step.
pub struct Misreporting {
    pub state_count: usize,
    pub bad_state: StateIndex,
}

impl Environment for Misreporting {
    type Observation = StateIndex;

    fn reset(&mut self) -> Result<StateIndex> {
        Ok(0)
    }

    fn step(&mut self, _action: Action) -> Result<Step<StateIndex>> {
        Ok(Step::new(self.bad_state, 1.0, false))
    }

    fn action_count(&self) -> usize {
        2
    }
}

impl DiscreteEnvironment for Misreporting {
    fn state_count(&self) -> usize {
        self.state_count
    }
}
