//! The contract for a single computation unit (neuron) inside a minicolumn.
//!
//! A unit reads the column's shared input vector and turns it into one output value. Units are
//! pure: the same inputs always give the same output, and `compute` never mutates anything.

/// A neuron that maps a fixed-width input vector to a single output value.
pub trait ComputationUnit {
    /// The width of the input vector this unit expects.
    fn num_synapses(&self) -> usize;

    /// Computes the output for `inputs`, which always has `num_synapses()` entries.
    fn compute(&self, inputs: &[f32]) -> f32;
}

impl<U: ComputationUnit + ?Sized> ComputationUnit for Box<U> {
    #[inline]
    fn num_synapses(&self) -> usize {
        (**self).num_synapses()
    }

    #[inline]
    fn compute(&self, inputs: &[f32]) -> f32 {
        (**self).compute(inputs)
    }
}

/// A binary neuron with two thresholds.
///
/// A synapse counts as "on" when its input exceeds `synapse_threshold`. The neuron outputs `1.0`
/// when the fraction of "on" synapses exceeds `neuron_threshold`, and `0.0` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdNeuron {
    pub num_synapses: usize,
    pub neuron_threshold: f32,
    pub synapse_threshold: f32,
}

impl ThresholdNeuron {
    pub fn new(num_synapses: usize, neuron_threshold: f32, synapse_threshold: f32) -> Self {
        Self {
            num_synapses,
            neuron_threshold,
            synapse_threshold,
        }
    }
}

impl ComputationUnit for ThresholdNeuron {
    #[inline]
    fn num_synapses(&self) -> usize {
        self.num_synapses
    }

    #[inline]
    fn compute(&self, inputs: &[f32]) -> f32 {
        if inputs.is_empty() {
            return 0.0;
        }
        let on = inputs
            .iter()
            .filter(|&&value| value > self.synapse_threshold)
            .count();
        if on as f32 / inputs.len() as f32 > self.neuron_threshold {
            1.0
        } else {
            0.0
        }
    }
}
