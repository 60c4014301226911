//! Serialization support for Q-learning agents.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Point-in-time copy of an agent's value table and schedule.
///
/// Snapshots are plain data: they can be encoded to MessagePack bytes or any
/// other serde format, but nothing here touches the filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub version: u32,
    pub n_states: usize,
    pub n_actions: usize,
    /// Row-major values, `n_states * n_actions` long
    pub values: Vec<f64>,
    pub gamma: f64,
    pub alpha: f64,
    pub epsilon: f64,
    pub epsilon_final: f64,
}

impl AgentSnapshot {
    pub const VERSION: u32 = 1;

    pub fn check_version(&self) -> Result<()> {
        if self.version != Self::VERSION {
            return Err(Error::SerializationContext {
                operation: "decode agent snapshot".to_string(),
                message: format!(
                    "unsupported snapshot version {}, expected {}",
                    self.version,
                    Self::VERSION
                ),
            });
        }
        Ok(())
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        rmp_serde::to_vec_named(self).map_err(|err| Error::SerializationContext {
            operation: "encode agent snapshot".to_string(),
            message: err.to_string(),
        })
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self> {
        let snapshot: Self =
            rmp_serde::from_slice(bytes).map_err(|err| Error::SerializationContext {
                operation: "decode agent snapshot".to_string(),
                message: err.to_string(),
            })?;
        snapshot.check_version()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        q_learning::{Hyperparameters, QLearningAgent},
        types::Transition,
    };

    #[test]
    fn test_msgpack_roundtrip_restores_agent() {
        let mut agent = QLearningAgent::new(3, 2, Hyperparameters::default())
            .unwrap()
            .with_seed(3);
        agent.update(&Transition::new(0, 1, 2, 4.0, false)).unwrap();
        agent.update(&Transition::new(2, 0, 0, -1.0, true)).unwrap();

        let bytes = agent.snapshot().to_msgpack().unwrap();
        let decoded = AgentSnapshot::from_msgpack(&bytes).unwrap();
        assert_eq!(decoded, agent.snapshot());

        let restored = QLearningAgent::from_snapshot(&decoded, 0.998).unwrap();
        assert_eq!(restored.q_value(0, 1).unwrap(), 2.0);
        assert_eq!(restored.q_value(2, 0).unwrap(), -0.5);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let agent = QLearningAgent::new(1, 1, Hyperparameters::default()).unwrap();
        let mut snapshot = agent.snapshot();
        snapshot.version = 99;
        let bytes = snapshot.to_msgpack().unwrap();
        assert!(matches!(
            AgentSnapshot::from_msgpack(&bytes),
            Err(Error::SerializationContext { .. })
        ));
        assert!(QLearningAgent::from_snapshot(&snapshot, 0.998).is_err());
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(AgentSnapshot::from_msgpack(&[0xc1, 0x00]).is_err());
    }

    #[test]
    fn test_snapshot_with_wrong_value_count_rejected() {
        let agent = QLearningAgent::new(2, 2, Hyperparameters::default()).unwrap();
        let mut snapshot = agent.snapshot();
        snapshot.values.pop();
        assert!(QLearningAgent::from_snapshot(&snapshot, 0.998).is_err());
    }
}
