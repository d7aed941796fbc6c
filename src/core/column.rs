//! A `MiniColumn` is a group of computation units ("neurons") that all read the same input vector.
//!
//! Biological inspiration:
//! Cortical minicolumns are vertical groups of neurons that share most of their afferent input.
//! Here every unit of a column sees exactly the same input vector, one slot per synapse, and
//! produces its own output from it.
//!
//! Signalling:
//! A column is "active" when any of its units produced a non-zero output. Whenever that state flips,
//! the column fires its spike signal with `1.0` or `0.0`. Downstream columns that sampled this
//! column during `connect` hold a `SlotWriter` on the signal, so the spike lands in exactly one slot
//! of their input vector and is read on their next `process`.

use super::error::{NetworkError, Result};
use super::sampling::sample_without_replacement;
use super::signal::Signal;
use super::synapses::{Activations, SharedActivations, SlotWriter};
use super::unit::ComputationUnit;
use fxhash::FxHashSet;
use log::{debug, trace};
use rand::Rng;
use std::fmt;

/// Anything that announces activation changes as spikes.
pub trait SpikeSource {
    fn spike(&self) -> &Signal<f32>;
}

/// A group of units sharing one input vector of width `num_synapses`.
pub struct MiniColumn {
    /// A label used in diagnostics.
    name: String,

    /// The units of this column, all with the same input width.
    units: Vec<Box<dyn ComputationUnit>>,

    /// The input width shared by all units.
    num_synapses: usize,

    /// The shared input vector. Slot writers of upstream columns hold weak handles on it.
    inputs: SharedActivations,

    /// One output per unit, recomputed by every `process`.
    outputs: Activations,

    /// Whether any output was non-zero after the last `process`.
    active: bool,

    /// Fired with the new active state whenever it changes.
    spike: Signal<f32>,

    /// Set once `connect` succeeded.
    connected: bool,
}

impl MiniColumn {
    /// Creates a column from its units.
    ///
    /// Fails if there are no units or if the units disagree on their number of synapses.
    pub fn new(name: impl Into<String>, units: Vec<Box<dyn ComputationUnit>>) -> Result<Self> {
        let num_synapses = units
            .first()
            .map(|unit| unit.num_synapses())
            .ok_or(NetworkError::EmptyColumn)?;

        if let Some((unit, found)) = units
            .iter()
            .map(|unit| unit.num_synapses())
            .enumerate()
            .find(|&(_, found)| found != num_synapses)
        {
            return Err(NetworkError::SynapseMismatch {
                unit,
                expected: num_synapses,
                found,
            });
        }

        let num_neurons = units.len();

        Ok(Self {
            name: name.into(),
            units,
            num_synapses,
            inputs: Activations::zeros(num_synapses).shared(),
            outputs: Activations::zeros(num_neurons),
            active: false,
            spike: Signal::new(),
            connected: false,
        })
    }

    /// Computes every unit's output from the current inputs, then updates the active state.
    ///
    /// All units see the same input snapshot. Outputs and the active state are both updated before
    /// the spike signal fires, so subscribers never observe a half-updated column.
    pub fn process(&mut self) -> Result<()> {
        {
            let inputs = self
                .inputs
                .try_borrow()
                .map_err(|_| NetworkError::ReentrantWrite)?;
            let outputs: Vec<f32> = self
                .units
                .iter()
                .map(|unit| unit.compute(inputs.values()))
                .collect();
            self.outputs = Activations::from_values(outputs);
        }

        let active = self.outputs.any_active();
        self.set_active(active)
    }

    /// Wires this column to a random subset of `candidates`, one distinct candidate per synapse.
    ///
    /// Returns the candidate index assigned to each slot, in slot order. Nothing is subscribed when
    /// the call fails: the column must not be wired yet, the pool needs at least `num_synapses`
    /// entries and no source may appear twice.
    pub fn connect<S, R>(&mut self, candidates: &[&S], rng: &mut R) -> Result<Vec<usize>>
    where
        S: SpikeSource + ?Sized,
        R: Rng,
    {
        if self.connected {
            return Err(NetworkError::AlreadyConnected(self.name.clone()));
        }

        let mut seen = FxHashSet::default();
        for (index, candidate) in candidates.iter().enumerate() {
            if !seen.insert(candidate.spike() as *const Signal<f32>) {
                return Err(NetworkError::DuplicateCandidate { index });
            }
        }

        let assignment = sample_without_replacement(rng, candidates.len(), self.num_synapses)?;
        let writers = (0..self.num_synapses)
            .map(|slot| SlotWriter::new(&self.inputs, slot))
            .collect::<Result<Vec<_>>>()?;

        for (writer, &source) in writers.into_iter().zip(&assignment) {
            candidates[source].spike().subscribe(writer);
        }
        self.connected = true;

        debug!(
            "connected '{}': {} synapses sampled from {} candidates, slots -> {:?}",
            self.name,
            self.num_synapses,
            candidates.len(),
            assignment
        );

        Ok(assignment)
    }

    /// Whether any unit produced a non-zero output in the last `process`.
    #[inline]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Sets the active state. A change fires the spike signal with `1.0` or `0.0`.
    /// Setting the current value again does nothing.
    pub fn set_active(&mut self, active: bool) -> Result<()> {
        if self.active == active {
            return Ok(());
        }
        self.active = active;
        trace!("'{}' spikes: active = {}", self.name, active);
        self.spike.fire(&if active { 1.0 } else { 0.0 })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn num_synapses(&self) -> usize {
        self.num_synapses
    }

    #[inline]
    pub fn num_neurons(&self) -> usize {
        self.units.len()
    }

    /// A copy of the current input vector.
    pub fn inputs(&self) -> Activations {
        self.inputs.borrow().clone()
    }

    /// The outputs computed by the last `process`.
    #[inline]
    pub fn outputs(&self) -> &[f32] {
        self.outputs.values()
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl SpikeSource for MiniColumn {
    #[inline]
    fn spike(&self) -> &Signal<f32> {
        &self.spike
    }
}

impl fmt::Display for MiniColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inputs = match self.inputs.try_borrow() {
            Ok(inputs) => format!("{:?}", inputs.truncated()),
            Err(_) => "<being written>".to_string(),
        };
        writeln!(f, "MiniColumn '{}': {{", self.name)?;
        writeln!(f, "    \"inputs\": \"{}\",", inputs)?;
        writeln!(f, "    \"activations\": \"{:?}\"", self.outputs.truncated())?;
        write!(f, "}}")
    }
}

impl fmt::Debug for MiniColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniColumn")
            .field("name", &self.name)
            .field("num_neurons", &self.units.len())
            .field("num_synapses", &self.num_synapses)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("active", &self.active)
            .field("spike", &self.spike)
            .field("connected", &self.connected)
            .finish()
    }
}
