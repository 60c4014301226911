//! Tabular Q-learning
//!
//! Off-policy temporal difference control over a dense value table. The agent
//! bootstraps every update from the best action in the successor state:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
//! ```
//!
//! with the bootstrap term dropped on terminal transitions.
//!
//! ## Schedules
//!
//! | Parameter | Schedule |
//! |-----------|----------|
//! | α | multiplied by `alpha_decay` after every episode |
//! | ε | falls linearly to `epsilon_final` over the training run |
//!
//! ## Usage Example
//!
//! ```no_run
//! use polebalance::{
//!     discretizer::Discretizer,
//!     envs::CartPole,
//!     q_learning::{Hyperparameters, QLearningAgent},
//! };
//!
//! let mut env = Discretizer::with_bounds(
//!     CartPole::new().with_seed(1),
//!     8,
//!     Some(vec![-2.4, -2.0, -0.42, -3.5]),
//!     Some(vec![2.4, 2.0, 0.42, 3.5]),
//! )?;
//! let mut agent = QLearningAgent::for_environment(&env, Hyperparameters::default())?.with_seed(1);
//! let result = agent.train(&mut env, 500)?;
//! println!("best reward: {}", result.max_reward);
//! # Ok::<(), polebalance::Error>(())
//! ```

pub mod agent;
pub mod hyperparameters;
pub mod q_table;
pub mod serialization;

// Public re-exports
pub use agent::QLearningAgent;
pub use hyperparameters::Hyperparameters;
pub use q_table::QTable;
pub use serialization::AgentSnapshot;
