//! Classic cart-pole balancing task
//!
//! A pole is hinged to a cart on a frictionless track. The agent pushes the
//! cart left (action 0) or right (action 1) with a fixed force and earns one
//! point per step until the pole tips past 12 degrees, the cart leaves the
//! track, or the step limit is reached.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Error, Result,
    ports::{ContinuousEnvironment, Environment},
    types::{Action, BoxSpace, Step},
};

const GRAVITY: f64 = 9.8;
const CART_MASS: f64 = 1.0;
const POLE_MASS: f64 = 0.1;
const TOTAL_MASS: f64 = CART_MASS + POLE_MASS;
/// Half the pole's length
const POLE_HALF_LENGTH: f64 = 0.5;
const POLE_MASS_LENGTH: f64 = POLE_MASS * POLE_HALF_LENGTH;
const FORCE_MAGNITUDE: f64 = 10.0;
/// Seconds between state updates
const TAU: f64 = 0.02;

/// Cart position beyond which the episode fails
pub const X_THRESHOLD: f64 = 2.4;
/// Pole angle (radians) beyond which the episode fails
pub const THETA_THRESHOLD: f64 = 12.0 * 2.0 * PI / 360.0;
/// Step limit of the classic task
pub const DEFAULT_MAX_STEPS: usize = 200;

/// Bounds commonly used to discretize cart-pole observations; the reported
/// observation space leaves both velocities unbounded.
pub const DISCRETIZATION_LOW: [f64; 4] = [-2.4, -2.0, -0.42, -3.5];
pub const DISCRETIZATION_HIGH: [f64; 4] = [2.4, 2.0, 0.42, 3.5];

/// Physical state `[x, x_dot, theta, theta_dot]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartPoleState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl CartPoleState {
    pub fn to_vec(self) -> Vec<f64> {
        vec![self.x, self.x_dot, self.theta, self.theta_dot]
    }

    fn is_failed(&self) -> bool {
        self.x.abs() > X_THRESHOLD || self.theta.abs() > THETA_THRESHOLD
    }
}

/// Cart-pole simulator with Euler integration
///
/// # Examples
///
/// ```
/// use polebalance::{envs::CartPole, ports::Environment};
///
/// let mut env = CartPole::new().with_seed(3);
/// let observation = env.reset()?;
/// assert_eq!(observation.len(), 4);
/// assert!(observation.iter().all(|v| v.abs() <= 0.05));
///
/// let step = env.step(1)?;
/// assert_eq!(step.reward, 1.0);
/// # Ok::<(), polebalance::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct CartPole {
    state: CartPoleState,
    space: BoxSpace,
    max_steps: usize,
    steps: usize,
    done: bool,
    rng: StdRng,
}

impl CartPole {
    pub fn new() -> Self {
        let high = vec![
            X_THRESHOLD * 2.0,
            f64::INFINITY,
            THETA_THRESHOLD * 2.0,
            f64::INFINITY,
        ];
        let low = high.iter().map(|h| -h).collect();
        Self {
            state: CartPoleState::default(),
            space: BoxSpace::new(low, high),
            max_steps: DEFAULT_MAX_STEPS,
            steps: 0,
            // Must reset before the first step
            done: true,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Truncate episodes after `max_steps` steps.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn state(&self) -> CartPoleState {
        self.state
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Steps taken in the current episode
    pub fn steps(&self) -> usize {
        self.steps
    }

    fn integrate(&mut self, force: f64) {
        let CartPoleState {
            x,
            x_dot,
            theta,
            theta_dot,
        } = self.state;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (POLE_HALF_LENGTH * (4.0 / 3.0 - POLE_MASS * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = CartPoleState {
            x: x + TAU * x_dot,
            x_dot: x_dot + TAU * x_acc,
            theta: theta + TAU * theta_dot,
            theta_dot: theta_dot + TAU * theta_acc,
        };
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for CartPole {
    type Observation = Vec<f64>;

    fn reset(&mut self) -> Result<Vec<f64>> {
        let mut sample = || self.rng.random_range(-0.05..=0.05);
        self.state = CartPoleState {
            x: sample(),
            x_dot: sample(),
            theta: sample(),
            theta_dot: sample(),
        };
        self.steps = 0;
        self.done = false;
        Ok(self.state.to_vec())
    }

    /// Push the cart; action 0 pushes left, action 1 pushes right.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionOutOfRange`] for any other action and
    /// [`Error::Environment`] when stepping a finished episode.
    fn step(&mut self, action: Action) -> Result<Step<Vec<f64>>> {
        if action >= 2 {
            return Err(Error::ActionOutOfRange {
                action,
                n_actions: 2,
            });
        }
        if self.done {
            return Err(Error::environment(
                "cart-pole episode has finished; call reset before stepping",
            ));
        }

        let force = if action == 1 {
            FORCE_MAGNITUDE
        } else {
            -FORCE_MAGNITUDE
        };
        self.integrate(force);
        self.steps += 1;
        self.done = self.state.is_failed() || self.steps >= self.max_steps;

        Ok(Step::new(self.state.to_vec(), 1.0, self.done))
    }

    fn action_count(&self) -> usize {
        2
    }
}

impl ContinuousEnvironment for CartPole {
    fn observation_space(&self) -> &BoxSpace {
        &self.space
    }
}

#[cfg(test)]
mod tests {
    use float_eq::assert_float_eq;

    use super::*;

    #[test]
    fn test_reset_samples_small_state() {
        let mut env = CartPole::new().with_seed(11);
        for _ in 0..20 {
            let observation = env.reset().unwrap();
            assert!(observation.iter().all(|v| (-0.05..=0.05).contains(v)));
        }
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut a = CartPole::new().with_seed(4);
        let mut b = CartPole::new().with_seed(4);
        assert_eq!(a.reset().unwrap(), b.reset().unwrap());
        for action in [0, 1, 1, 0, 1] {
            assert_eq!(a.step(action).unwrap(), b.step(action).unwrap());
        }
    }

    #[test]
    fn test_single_step_from_rest() {
        let mut env = CartPole::new();
        env.reset().unwrap();
        env.state = CartPoleState::default();

        let step = env.step(1).unwrap();
        // position lags velocity by one step under Euler integration
        let expected_x_acc = FORCE_MAGNITUDE / TOTAL_MASS
            - POLE_MASS_LENGTH
                * (-(FORCE_MAGNITUDE / TOTAL_MASS)
                    / (POLE_HALF_LENGTH * (4.0 / 3.0 - POLE_MASS / TOTAL_MASS)))
                / TOTAL_MASS;
        assert_eq!(step.observation[0], 0.0);
        assert_float_eq!(step.observation[1], TAU * expected_x_acc, abs <= 1e-12);
        assert_eq!(step.observation[2], 0.0);
        assert!(step.observation[3] < 0.0);
        assert!(!step.done);
    }

    #[test]
    fn test_constant_push_fails_early() {
        let mut env = CartPole::new().with_seed(1);
        env.reset().unwrap();
        let mut steps = 0;
        loop {
            steps += 1;
            if env.step(1).unwrap().done {
                break;
            }
        }
        assert!(steps < DEFAULT_MAX_STEPS);
        assert!(env.state().is_failed());
    }

    #[test]
    fn test_step_limit_ends_episode() {
        let mut env = CartPole::new().with_seed(2).with_max_steps(3);
        env.reset().unwrap();
        assert!(!env.step(0).unwrap().done);
        assert!(!env.step(1).unwrap().done);
        assert!(env.step(0).unwrap().done);
        assert!(matches!(env.step(0), Err(Error::Environment { .. })));
    }

    #[test]
    fn test_invalid_action_and_unreset_step() {
        let mut env = CartPole::new();
        assert!(matches!(env.step(0), Err(Error::Environment { .. })));
        env.reset().unwrap();
        assert!(matches!(
            env.step(2),
            Err(Error::ActionOutOfRange {
                action: 2,
                n_actions: 2
            })
        ));
    }

    #[test]
    fn test_reported_bounds_leave_velocities_unbounded() {
        let env = CartPole::new();
        let space = env.observation_space();
        assert_eq!(space.high[0], 4.8);
        assert!(space.high[1].is_infinite());
        assert_float_eq!(space.high[2], 0.418_879, abs <= 1e-6);
        assert_eq!(space.low[3], f64::NEG_INFINITY);
    }
}
