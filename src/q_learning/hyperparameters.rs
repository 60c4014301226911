//! Learning-rate, discount and exploration settings

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Hyperparameters of a Q-learning agent.
///
/// Defaults match the classic cart-pole recipe: γ = 0.99, α = 0.5 decaying by
/// 0.998 per episode, ε falling linearly from 1.0 to 0.05 over the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hyperparameters {
    /// Discount factor γ, in `[0, 1]`
    pub gamma: f64,
    /// Initial learning rate α, in `(0, 1]`
    pub alpha: f64,
    /// Multiplicative per-episode decay of α, in `(0, 1]`
    pub alpha_decay: f64,
    /// Initial exploration rate ε, in `[0, 1]`
    pub epsilon: f64,
    /// Exploration floor, in `[0, epsilon]`
    pub epsilon_final: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            alpha: 0.5,
            alpha_decay: 0.998,
            epsilon: 1.0,
            epsilon_final: 0.05,
        }
    }
}

impl Hyperparameters {
    /// Check every value against its admissible range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] naming the first offending value.
    pub fn validate(&self) -> Result<()> {
        check("gamma", self.gamma, "a finite value in [0, 1]", |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check("alpha", self.alpha, "a finite value in (0, 1]", |v| {
            v > 0.0 && v <= 1.0
        })?;
        check(
            "alpha_decay",
            self.alpha_decay,
            "a finite value in (0, 1]",
            |v| v > 0.0 && v <= 1.0,
        )?;
        check("epsilon", self.epsilon, "a finite value in [0, 1]", |v| {
            (0.0..=1.0).contains(&v)
        })?;
        check(
            "epsilon_final",
            self.epsilon_final,
            "a finite value in [0, epsilon]",
            |v| v >= 0.0 && v <= self.epsilon,
        )?;
        Ok(())
    }
}

fn check(
    name: &'static str,
    value: f64,
    expected: &'static str,
    in_range: impl Fn(f64) -> bool,
) -> Result<()> {
    if value.is_finite() && in_range(value) {
        Ok(())
    } else {
        Err(Error::InvalidHyperparameter {
            name,
            value,
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Hyperparameters::default().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_are_named() {
        let cases = [
            Hyperparameters {
                gamma: 1.5,
                ..Default::default()
            },
            Hyperparameters {
                alpha: 0.0,
                ..Default::default()
            },
            Hyperparameters {
                alpha_decay: 1.01,
                ..Default::default()
            },
            Hyperparameters {
                epsilon: -0.1,
                ..Default::default()
            },
            Hyperparameters {
                epsilon: 0.1,
                epsilon_final: 0.2,
                ..Default::default()
            },
            Hyperparameters {
                gamma: f64::NAN,
                ..Default::default()
            },
        ];
        let names: Vec<&str> = cases
            .iter()
            .map(|params| match params.validate() {
                Err(Error::InvalidHyperparameter { name, .. }) => name,
                other => panic!("expected InvalidHyperparameter, got {other:?}"),
            })
            .collect();
        assert_eq!(
            names,
            ["gamma", "alpha", "alpha_decay", "epsilon", "epsilon_final", "gamma"]
        );
    }

    #[test]
    fn test_boundary_values_accepted() {
        let params = Hyperparameters {
            gamma: 0.0,
            alpha: 1.0,
            alpha_decay: 1.0,
            epsilon: 0.0,
            epsilon_final: 0.0,
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: Hyperparameters = serde_json::from_str(r#"{"alpha": 0.1}"#).unwrap();
        assert_eq!(params.alpha, 0.1);
        assert_eq!(params.gamma, 0.99);
    }
}
