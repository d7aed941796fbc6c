//! Factories that build units, minicolumns and layers.
//!
//! A `Factory<T>` is anything that can be asked for a new `T`. Closures `FnMut() -> T` qualify, and
//! `ConstantFactory` hands out clones of one value. The column factories combine a factory for the
//! neuron count with a factory for the neurons themselves.

use super::column::MiniColumn;
use super::error::Result;
use super::layer::{Computation, Layer};
use super::unit::{ComputationUnit, ThresholdNeuron};

/// Produces a new `T` on every call.
pub trait Factory<T> {
    fn create(&mut self) -> T;
}

impl<T, F> Factory<T> for F
where
    F: FnMut() -> T,
{
    #[inline]
    fn create(&mut self) -> T {
        self()
    }
}

/// Always produces a clone of the same value.
#[derive(Debug, Clone)]
pub struct ConstantFactory<T: Clone>(pub T);

impl<T: Clone> Factory<T> for ConstantFactory<T> {
    #[inline]
    fn create(&mut self) -> T {
        self.0.clone()
    }
}

/// Builds `ThresholdNeuron`s with fixed parameters.
#[derive(Debug, Clone, Copy)]
pub struct SimpleNeuronFactory {
    pub num_synapses: usize,
    pub neuron_threshold: f32,
    pub synapse_threshold: f32,
}

impl Factory<Box<dyn ComputationUnit>> for SimpleNeuronFactory {
    fn create(&mut self) -> Box<dyn ComputationUnit> {
        Box::new(ThresholdNeuron::new(
            self.num_synapses,
            self.neuron_threshold,
            self.synapse_threshold,
        ))
    }
}

/// Builds minicolumns from a neuron-count factory and a per-neuron factory.
pub struct MiniColumnFactory<N, U> {
    num_neurons_factory: N,
    neuron_factory: U,
    created: usize,
}

impl<N, U> MiniColumnFactory<N, U>
where
    N: Factory<usize>,
    U: Factory<Box<dyn ComputationUnit>>,
{
    pub fn new(num_neurons_factory: N, neuron_factory: U) -> Self {
        Self {
            num_neurons_factory,
            neuron_factory,
            created: 0,
        }
    }

    /// Builds the next column. Columns are named `column-0`, `column-1`, ... in creation order.
    pub fn create(&mut self) -> Result<MiniColumn> {
        let num_neurons = self.num_neurons_factory.create();
        let neurons = (0..num_neurons)
            .map(|_| self.neuron_factory.create())
            .collect();
        let column = MiniColumn::new(format!("column-{}", self.created), neurons)?;
        self.created += 1;
        Ok(column)
    }
}

impl<N, U> Factory<Result<MiniColumn>> for MiniColumnFactory<N, U>
where
    N: Factory<usize>,
    U: Factory<Box<dyn ComputationUnit>>,
{
    #[inline]
    fn create(&mut self) -> Result<MiniColumn> {
        MiniColumnFactory::create(self)
    }
}

/// A column factory with a constant neuron count and `ThresholdNeuron` units.
pub type SimpleMiniColumnFactory = MiniColumnFactory<ConstantFactory<usize>, SimpleNeuronFactory>;

impl SimpleMiniColumnFactory {
    /// Uses the default thresholds of `0.5` for both neurons and synapses.
    pub fn simple(num_neurons: usize, num_synapses: usize) -> Self {
        Self::with_thresholds(num_neurons, num_synapses, 0.5, 0.5)
    }

    pub fn with_thresholds(
        num_neurons: usize,
        num_synapses: usize,
        neuron_threshold: f32,
        synapse_threshold: f32,
    ) -> Self {
        MiniColumnFactory::new(
            ConstantFactory(num_neurons),
            SimpleNeuronFactory {
                num_synapses,
                neuron_threshold,
                synapse_threshold,
            },
        )
    }
}

/// Builds layers of a fixed size that share one computation rule.
#[derive(Debug, Clone)]
pub struct LayerFactory<C> {
    pub num_neurons: usize,
    pub computation: C,
    created: usize,
}

impl<C> LayerFactory<C>
where
    C: Computation + Clone + 'static,
{
    pub fn new(num_neurons: usize, computation: C) -> Self {
        Self {
            num_neurons,
            computation,
            created: 0,
        }
    }
}

impl<C> Factory<Layer> for LayerFactory<C>
where
    C: Computation + Clone + 'static,
{
    fn create(&mut self) -> Layer {
        let layer = Layer::new(
            format!("layer-{}", self.created),
            self.num_neurons,
            self.computation.clone(),
        );
        self.created += 1;
        layer
    }
}
