//! This example builds a small population of minicolumns, wires every column to a random sample of
//! the others and lets activity spread from a few stimulated columns.
//!
//! Each tick processes every column once. A column becomes active when enough of the columns it
//! sampled are active, and its spike lands in the input slots of the columns that sampled it.
//!
//! Run: RUST_LOG=debug cargo run --example column_network

use anyhow::Result;
use minicolumns::{ColumnNetwork, NetworkConfig};

const TICKS: usize = 10;

fn main() -> Result<()> {
    env_logger::init();

    let config = NetworkConfig {
        num_columns: 32,
        neurons_per_column: 4,
        synapses_per_column: 3,
        neuron_threshold: 0.3,
        synapse_threshold: 0.5,
        seed: 42,
    };

    println!(
        "Building {} columns with {} synapses each...",
        config.num_columns, config.synapses_per_column
    );
    let mut network = ColumnNetwork::from_config(&config)?;

    let seeds = [0, 5, 11, 17, 23];
    println!("Stimulating columns {:?}", seeds);
    network.stimulate(&seeds)?;

    for tick in 0..TICKS {
        let active = network.tick()?;
        println!(
            "  tick {:>2}: {:>2}/{} active {:?}",
            tick + 1,
            active,
            config.num_columns,
            network.active_columns()
        );
    }

    println!("{}", network.columns[0]);
    Ok(())
}
