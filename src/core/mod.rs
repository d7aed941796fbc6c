pub mod column;
pub mod config;
pub mod error;
pub mod factory;
pub mod layer;
pub mod network;
pub mod sampling;
pub mod signal;
pub mod synapses;
pub mod unit;
