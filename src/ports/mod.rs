//! Ports (trait boundaries) for external collaborators.
//!
//! The environment simulator, the learning algorithm and training observers
//! all sit behind these traits so the core loop never names a concrete type.

pub mod environment;
pub mod learner;
pub mod observer;

pub use environment::{ContinuousEnvironment, DiscreteEnvironment, Environment};
pub use learner::Learner;
pub use observer::Observer;
