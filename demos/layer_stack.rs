//! This example stacks two layers behind a sensor:
//! - the sensor drives the inputs of the lower layer,
//! - the upper layer reads the lower layer and sends feedback down,
//! - the lower layer inhibits itself with its own previous output.
//!
//! The lower layer therefore alternates between firing and being suppressed while the sensor
//! keeps presenting the same pattern.
//!
//! Run: cargo run --example layer_stack

use anyhow::Result;
use minicolumns::core::factory::{Factory, LayerFactory};
use minicolumns::core::layer::{Connection, Sensor, StandardComputation};

fn main() -> Result<()> {
    env_logger::init();

    let width = 8;
    let sensor = Sensor::new(width);
    let mut layers = LayerFactory::new(width, StandardComputation { threshold: 0.5 });
    let mut lower = layers.create();
    let mut upper = layers.create();

    Connection::input(&sensor, &lower)?;
    Connection::input(&lower, &upper)?;
    Connection::feedback(&upper, &lower)?;
    Connection::inhibition(&lower, &lower)?;

    let pattern = [1.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0];

    for step in 0..6 {
        sensor.emit(&pattern)?;
        lower.compute()?;
        upper.compute()?;
        println!(
            "step {}: lower {:?} upper {:?}",
            step,
            lower.outputs(),
            upper.outputs()
        );
    }

    Ok(())
}
