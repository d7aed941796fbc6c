//! Spiking minicolumn networks.
//!
//! Minicolumns are groups of neurons sharing one input vector. A column wires itself to a random
//! sample of other columns, one source per synapse slot, and announces changes of its active state
//! as spikes that land directly in the input slots of its subscribers. Layers exchange whole output
//! vectors through input, feedback and inhibition connections.

pub mod core;

pub use crate::core::column::{MiniColumn, SpikeSource};
pub use crate::core::config::NetworkConfig;
pub use crate::core::error::{NetworkError, Result};
pub use crate::core::network::ColumnNetwork;
