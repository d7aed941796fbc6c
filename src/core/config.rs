//! Parameters for building a `ColumnNetwork`.
//!
//! Every field has a default, so a config file only needs to name what it changes.

use super::error::{NetworkError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// The number of minicolumns in the network.
    pub num_columns: usize,

    /// The number of neurons in each minicolumn.
    pub neurons_per_column: usize,

    /// The input width of each minicolumn. Each synapse is fed by a different column.
    pub synapses_per_column: usize,

    /// Fraction of synapses that must be on for a neuron to fire.
    pub neuron_threshold: f32,

    /// Input value a synapse must exceed to count as on.
    pub synapse_threshold: f32,

    /// Seed for the wiring generator. The same seed gives the same wiring.
    pub seed: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            num_columns: 16,
            neurons_per_column: 4,
            synapses_per_column: 4,
            neuron_threshold: 0.5,
            synapse_threshold: 0.5,
            seed: 42,
        }
    }
}

impl NetworkConfig {
    /// Checks that a network with these parameters can be built and wired.
    ///
    /// Columns never sample themselves, so each one has `num_columns - 1` candidates.
    pub fn validate(&self) -> Result<()> {
        if self.neurons_per_column == 0 {
            return Err(NetworkError::EmptyColumn);
        }
        if self.num_columns == 0 {
            return Err(NetworkError::InvalidConfig(
                "a network needs at least one column".to_string(),
            ));
        }
        let available = self.num_columns - 1;
        if self.synapses_per_column > available {
            return Err(NetworkError::InsufficientCandidates {
                required: self.synapses_per_column,
                available,
            });
        }
        if !(0.0..=1.0).contains(&self.neuron_threshold) {
            return Err(NetworkError::InvalidConfig(format!(
                "neuron_threshold must lie in [0, 1], got {}",
                self.neuron_threshold
            )));
        }
        Ok(())
    }
}
