//! Layers, sensors and the whole-vector connections between them.
//!
//! A `Layer` is a group of neurons that computes one output vector from three separately addressable
//! buffers: `inputs` (driving), `feedback` (top-down) and `inhibitions` (suppressing). How the three are
//! combined is up to the layer's `Computation`.
//!
//! A `Connection` subscribes a destination buffer to a source's output signal. Every time the source
//! emits, the whole destination buffer is replaced by the emitted vector. The buffer starts out
//! unbound (empty) and is sized to the source width when the connection is made; a buffer accepts a
//! single connection.

use super::column::SpikeSource;
use super::error::{BufferKind, NetworkError, Result};
use super::signal::Signal;
use super::synapses::{Activations, BufferWriter, SharedActivations};
use log::{debug, trace};
use std::cell::{Cell, Ref, RefCell};
use std::fmt;

/// Anything that publishes whole output vectors of a fixed width.
pub trait VectorSource {
    fn output_signal(&self) -> &Signal<[f32]>;

    fn width(&self) -> usize;
}

/// A source that republishes whatever vector it is given.
///
/// Layers subscribe to the whole vector. Minicolumns can sample a sensor like any other spike
/// source: it spikes with `1.0` when an emitted vector turns it active (any non-zero value) and with
/// `0.0` when it turns inactive again.
#[derive(Debug)]
pub struct Sensor {
    /// The width of every emitted vector.
    width: usize,

    /// Fired with each emitted vector.
    signal: Signal<[f32]>,

    /// Whether the last emitted vector had a non-zero value.
    active: Cell<bool>,

    /// Fired with the new active state whenever it changes.
    spike: Signal<f32>,
}

impl Sensor {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            signal: Signal::new(),
            active: Cell::new(false),
            spike: Signal::new(),
        }
    }

    /// Publishes `values` to every subscriber. `values` must have the sensor's width.
    ///
    /// Vector subscribers run first, then spike subscribers if the active state changed. Both run
    /// even if one of them fails; the first error is returned.
    pub fn emit(&self, values: &[f32]) -> Result<()> {
        if values.len() != self.width {
            return Err(NetworkError::WidthMismatch {
                expected: self.width,
                found: values.len(),
            });
        }
        let emitted = self.signal.fire(values);

        let active = values.iter().any(|&value| value != 0.0);
        let spiked = if self.active.replace(active) != active {
            self.spike.fire(&if active { 1.0 } else { 0.0 })
        } else {
            Ok(())
        };

        emitted.and(spiked)
    }

    /// Whether the last emitted vector had a non-zero value.
    #[inline]
    pub fn active(&self) -> bool {
        self.active.get()
    }
}

impl SpikeSource for Sensor {
    #[inline]
    fn spike(&self) -> &Signal<f32> {
        &self.spike
    }
}

impl VectorSource for Sensor {
    #[inline]
    fn output_signal(&self) -> &Signal<[f32]> {
        &self.signal
    }

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
}

/// Read-only view of a layer's buffers during a computation. Unbound buffers are empty.
#[derive(Debug, Clone, Copy)]
pub struct LayerInputs<'a> {
    pub inputs: &'a [f32],
    pub feedback: &'a [f32],
    pub inhibitions: &'a [f32],
}

/// Combines a layer's buffers into one output per neuron.
pub trait Computation {
    /// Fills `outputs`, which has one zeroed entry per neuron.
    fn compute(&self, inputs: &LayerInputs<'_>, outputs: &mut [f32]);
}

impl<F> Computation for F
where
    F: Fn(&LayerInputs<'_>, &mut [f32]),
{
    #[inline]
    fn compute(&self, inputs: &LayerInputs<'_>, outputs: &mut [f32]) {
        self(inputs, outputs)
    }
}

/// Topographic threshold rule.
///
/// Neuron `i` reads position `i` of each buffer (wrapping around shorter buffers). Its drive is
/// `inputs + feedback - inhibitions`, and it outputs `1.0` when the drive exceeds `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardComputation {
    pub threshold: f32,
}

impl Default for StandardComputation {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl Computation for StandardComputation {
    fn compute(&self, inputs: &LayerInputs<'_>, outputs: &mut [f32]) {
        fn at(buffer: &[f32], index: usize) -> f32 {
            if buffer.is_empty() {
                0.0
            } else {
                buffer[index % buffer.len()]
            }
        }

        for (index, output) in outputs.iter_mut().enumerate() {
            let drive = at(inputs.inputs, index) + at(inputs.feedback, index)
                - at(inputs.inhibitions, index);
            *output = if drive > self.threshold { 1.0 } else { 0.0 };
        }
    }
}

/// A group of neurons with separate input, feedback and inhibition buffers.
pub struct Layer {
    /// A label used in diagnostics.
    name: String,

    /// The number of neurons, which is also the width of the output vector.
    num_neurons: usize,

    /// The rule combining the three buffers into outputs.
    computation: Box<dyn Computation>,

    /// The driving input buffer, written by an input connection.
    inputs: SharedActivations,

    /// The top-down buffer, written by a feedback connection.
    feedback: SharedActivations,

    /// The suppressing buffer, written by an inhibition connection.
    inhibitions: SharedActivations,

    /// Buffers that already have a writer.
    bound: RefCell<Vec<BufferKind>>,

    /// One output per neuron, recomputed by every `compute`.
    outputs: Activations,

    /// Fired with the whole output vector after every `compute`.
    output_signal: Signal<[f32]>,
}

impl Layer {
    pub fn new<C>(name: impl Into<String>, num_neurons: usize, computation: C) -> Self
    where
        C: Computation + 'static,
    {
        Self {
            name: name.into(),
            num_neurons,
            computation: Box::new(computation),
            inputs: Activations::default().shared(),
            feedback: Activations::default().shared(),
            inhibitions: Activations::default().shared(),
            bound: RefCell::new(Vec::new()),
            outputs: Activations::zeros(num_neurons),
            output_signal: Signal::new(),
        }
    }

    /// Runs the computation over the current buffers and emits the new output vector.
    pub fn compute(&mut self) -> Result<()> {
        {
            let inputs = borrow(&self.inputs)?;
            let feedback = borrow(&self.feedback)?;
            let inhibitions = borrow(&self.inhibitions)?;
            let view = LayerInputs {
                inputs: inputs.values(),
                feedback: feedback.values(),
                inhibitions: inhibitions.values(),
            };

            let mut outputs = vec![0.0; self.num_neurons];
            self.computation.compute(&view, &mut outputs);
            self.outputs = Activations::from_values(outputs);
        }

        trace!("layer '{}' emits {:?}", self.name, self.outputs.truncated());
        self.output_signal.fire(self.outputs.values())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    /// The outputs of the last `compute`.
    #[inline]
    pub fn outputs(&self) -> &[f32] {
        self.outputs.values()
    }

    /// Whether any output of the last `compute` was non-zero.
    #[inline]
    pub fn active(&self) -> bool {
        self.outputs.any_active()
    }

    /// A copy of the driving input buffer.
    pub fn inputs(&self) -> Activations {
        self.inputs.borrow().clone()
    }

    /// A copy of the feedback buffer.
    pub fn feedback(&self) -> Activations {
        self.feedback.borrow().clone()
    }

    /// A copy of the inhibition buffer.
    pub fn inhibitions(&self) -> Activations {
        self.inhibitions.borrow().clone()
    }

    /// Whether a connection writes into `kind`.
    pub fn is_bound(&self, kind: BufferKind) -> bool {
        self.bound.borrow().contains(&kind)
    }

    fn buffer(&self, kind: BufferKind) -> &SharedActivations {
        match kind {
            BufferKind::Inputs => &self.inputs,
            BufferKind::Feedback => &self.feedback,
            BufferKind::Inhibitions => &self.inhibitions,
        }
    }

    /// Sizes `kind` to `width` zeros and hands out its only writer.
    fn bind(&self, kind: BufferKind, width: usize) -> Result<BufferWriter> {
        let mut bound = self.bound.borrow_mut();
        if bound.contains(&kind) {
            return Err(NetworkError::BufferAlreadyBound(kind));
        }

        let buffer = self.buffer(kind);
        *buffer
            .try_borrow_mut()
            .map_err(|_| NetworkError::ReentrantWrite)? = Activations::zeros(width);
        bound.push(kind);

        Ok(BufferWriter::new(buffer, kind))
    }
}

fn borrow(buffer: &SharedActivations) -> Result<Ref<'_, Activations>> {
    buffer.try_borrow().map_err(|_| NetworkError::ReentrantWrite)
}

impl VectorSource for Layer {
    #[inline]
    fn output_signal(&self) -> &Signal<[f32]> {
        &self.output_signal
    }

    #[inline]
    fn width(&self) -> usize {
        self.num_neurons
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("name", &self.name)
            .field("num_neurons", &self.num_neurons)
            .field("inputs", &self.inputs)
            .field("feedback", &self.feedback)
            .field("inhibitions", &self.inhibitions)
            .field("outputs", &self.outputs)
            .finish()
    }
}

/// The destination buffer a connection drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionKind {
    Input,
    Feedback,
    Inhibition,
}

impl ConnectionKind {
    #[inline]
    pub fn buffer(self) -> BufferKind {
        match self {
            ConnectionKind::Input => BufferKind::Inputs,
            ConnectionKind::Feedback => BufferKind::Feedback,
            ConnectionKind::Inhibition => BufferKind::Inhibitions,
        }
    }
}

/// A live subscription of a destination buffer to a source's output vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub kind: ConnectionKind,
    pub width: usize,
}

impl Connection {
    /// Binds the buffer `kind` of `destination` to every vector `source` emits.
    ///
    /// The source may be the destination itself (e.g. self-inhibition); its emitted vector then
    /// lands in its own buffer for the next `compute`.
    pub fn new<S>(kind: ConnectionKind, source: &S, destination: &Layer) -> Result<Self>
    where
        S: VectorSource + ?Sized,
    {
        let width = source.width();
        let writer = destination.bind(kind.buffer(), width)?;
        source.output_signal().subscribe(writer);

        debug!(
            "{:?} connection of width {} into layer '{}'",
            kind, width, destination.name
        );

        Ok(Self { kind, width })
    }

    /// Drives `destination.inputs`.
    pub fn input<S>(source: &S, destination: &Layer) -> Result<Self>
    where
        S: VectorSource + ?Sized,
    {
        Self::new(ConnectionKind::Input, source, destination)
    }

    /// Drives `destination.feedback`.
    pub fn feedback<S>(source: &S, destination: &Layer) -> Result<Self>
    where
        S: VectorSource + ?Sized,
    {
        Self::new(ConnectionKind::Feedback, source, destination)
    }

    /// Drives `destination.inhibitions`.
    pub fn inhibition<S>(source: &S, destination: &Layer) -> Result<Self>
    where
        S: VectorSource + ?Sized,
    {
        Self::new(ConnectionKind::Inhibition, source, destination)
    }
}
