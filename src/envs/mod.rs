//! Built-in environments
//!
//! Simulators implementing the [`Environment`](crate::ports::Environment)
//! port, so training runs need no external process.

pub mod cart_pole;

pub use cart_pole::{CartPole, CartPoleState, DISCRETIZATION_HIGH, DISCRETIZATION_LOW};
