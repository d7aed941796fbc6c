//! The `ColumnNetwork` is a reference scheduler for a population of minicolumns:
//! - Builds the columns from a factory or a `NetworkConfig`.
//! - Wires every column to a random sample of all *other* columns, one source per synapse.
//! - Ticks the population by processing every column once, in index order.
//!
//! Spikes propagate synchronously while a column is processed, so a column processed later in the
//! same tick already sees spikes of columns processed before it.

use super::column::MiniColumn;
use super::config::NetworkConfig;
use super::error::{NetworkError, Result};
use super::factory::{Factory, SimpleMiniColumnFactory};
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use std::fmt;

pub struct ColumnNetwork {
    /// A seeded pseudo-random number generator for reproducible wiring.
    pub rand: StdRng,

    /// The number of ticks performed so far.
    pub iteration_num: u32,

    /// The columns, indexed in processing order.
    pub columns: Vec<MiniColumn>,
}

impl ColumnNetwork {
    /// Wraps already built columns. Nothing is wired yet.
    pub fn new(columns: Vec<MiniColumn>, seed: u64) -> Self {
        Self {
            rand: StdRng::seed_from_u64(seed),
            iteration_num: 0,
            columns,
        }
    }

    /// Builds `count` columns from `factory`.
    pub fn from_factory<F>(factory: &mut F, count: usize, seed: u64) -> Result<Self>
    where
        F: Factory<Result<MiniColumn>>,
    {
        let columns = (0..count)
            .map(|_| factory.create())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(columns, seed))
    }

    /// Validates `config`, builds the columns and wires them.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        config.validate()?;

        let mut factory = SimpleMiniColumnFactory::with_thresholds(
            config.neurons_per_column,
            config.synapses_per_column,
            config.neuron_threshold,
            config.synapse_threshold,
        );
        let mut network = Self::from_factory(&mut factory, config.num_columns, config.seed)?;
        network.connect_all()?;

        info!(
            "built network of {} columns ({} neurons, {} synapses each)",
            config.num_columns, config.neurons_per_column, config.synapses_per_column
        );
        Ok(network)
    }

    /// Wires every column to a sample of all other columns.
    ///
    /// Returns, per column, the index of the source column feeding each synapse slot. Wiring stops
    /// at the first column that cannot be connected; columns before it stay wired.
    pub fn connect_all(&mut self) -> Result<Vec<Vec<usize>>> {
        let mut sources = Vec::with_capacity(self.columns.len());

        for index in 0..self.columns.len() {
            let (before, rest) = self.columns.split_at_mut(index);
            let Some((target, after)) = rest.split_first_mut() else {
                break;
            };
            let pool: Vec<&MiniColumn> = before.iter().chain(after.iter()).collect();
            let assignment = target.connect(&pool, &mut self.rand)?;

            sources.push(
                assignment
                    .into_iter()
                    .map(|candidate| if candidate < index { candidate } else { candidate + 1 })
                    .collect(),
            );
        }

        Ok(sources)
    }

    /// Forces the given columns active, firing their spikes. Used to inject activity.
    pub fn stimulate(&mut self, indices: &[usize]) -> Result<()> {
        let count = self.columns.len();
        for &index in indices {
            self.columns
                .get_mut(index)
                .ok_or(NetworkError::ColumnOutOfRange { index, count })?
                .set_active(true)?;
        }
        Ok(())
    }

    /// Processes every column once and returns how many are active afterwards.
    pub fn tick(&mut self) -> Result<usize> {
        for column in &mut self.columns {
            column.process()?;
        }
        self.iteration_num += 1;

        let active = self.columns.iter().filter(|column| column.active()).count();
        debug!(
            "tick {}: {}/{} columns active",
            self.iteration_num,
            active,
            self.columns.len()
        );
        Ok(active)
    }

    /// Indices of the columns that are currently active.
    pub fn active_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.active())
            .map(|(index, _)| index)
            .collect()
    }
}

impl fmt::Display for ColumnNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ColumnNetwork after {} ticks", self.iteration_num)?;
        for column in &self.columns {
            writeln!(f, "{}", column)?;
        }
        Ok(())
    }
}
