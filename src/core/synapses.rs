//! Synapse buffers and the writers bound to them.
//!
//! `Activations` is a fixed-width vector of `f32` values. A minicolumn keeps its shared input vector
//! in one; a layer keeps its `inputs`, `feedback` and `inhibitions` buffers in three of them.
//! A value is considered "active" when it is non-zero.
//!
//! Buffers are only ever written through a writer that a source subscribed on its signal:
//! - a `SlotWriter` owns exactly one slot of a buffer and sets it to every spike it receives,
//! - a `BufferWriter` owns a whole buffer and replaces all of its values on every emitted vector.
//!
//! Writers hold a weak handle on their target. The target's owner keeps the strong handle, so a
//! writer never keeps a dropped column or layer alive.

use super::error::{BufferKind, NetworkError, Result};
use super::signal::Subscriber;
use log::trace;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A buffer shared between its owner and the writers bound to it.
pub type SharedActivations = Rc<RefCell<Activations>>;

/// A fixed-width vector of activation values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Activations {
    values: Vec<f32>,
}

impl Activations {
    /// Creates a buffer of `width` zeros.
    #[inline]
    pub fn zeros(width: usize) -> Self {
        Self {
            values: vec![0.0; width],
        }
    }

    /// Wraps existing values. The width is fixed from here on.
    #[inline]
    pub fn from_values(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Wraps a buffer into a shareable handle.
    #[inline]
    pub fn shared(self) -> SharedActivations {
        Rc::new(RefCell::new(self))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sets one slot.
    #[inline]
    pub fn set(&mut self, slot: usize, value: f32) -> Result<()> {
        let width = self.values.len();
        let entry = self
            .values
            .get_mut(slot)
            .ok_or(NetworkError::SlotOutOfRange { slot, width })?;
        *entry = value;
        Ok(())
    }

    /// Replaces every value. The new values must have the same width.
    #[inline]
    pub fn replace(&mut self, values: &[f32]) -> Result<()> {
        if values.len() != self.values.len() {
            return Err(NetworkError::WidthMismatch {
                expected: self.values.len(),
                found: values.len(),
            });
        }
        self.values.copy_from_slice(values);
        Ok(())
    }

    /// Whether any value is non-zero.
    #[inline]
    pub fn any_active(&self) -> bool {
        self.values.iter().any(|&value| value != 0.0)
    }

    /// The values truncated towards zero, for diagnostics.
    pub fn truncated(&self) -> Vec<i32> {
        self.values.iter().map(|&value| value as i32).collect()
    }
}

/// Writes incoming spikes into one slot of a target buffer.
#[derive(Debug, Clone)]
pub struct SlotWriter {
    target: Weak<RefCell<Activations>>,
    slot: usize,
}

impl SlotWriter {
    /// Binds `slot` of `target`. Fails if the slot does not exist.
    pub fn new(target: &SharedActivations, slot: usize) -> Result<Self> {
        let width = target.borrow().len();
        if slot >= width {
            return Err(NetworkError::SlotOutOfRange { slot, width });
        }
        Ok(Self {
            target: Rc::downgrade(target),
            slot,
        })
    }

    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Sets the bound slot to `value`.
    pub fn write(&self, value: f32) -> Result<()> {
        let target = self.target.upgrade().ok_or(NetworkError::DetachedTarget)?;
        let mut buffer = target
            .try_borrow_mut()
            .map_err(|_| NetworkError::ReentrantWrite)?;
        trace!("slot {} <- {}", self.slot, value);
        buffer.set(self.slot, value)
    }
}

impl Subscriber<f32> for SlotWriter {
    #[inline]
    fn receive(&self, value: &f32) -> Result<()> {
        self.write(*value)
    }
}

/// Replaces a whole target buffer with every vector it receives.
#[derive(Debug, Clone)]
pub struct BufferWriter {
    target: Weak<RefCell<Activations>>,
    kind: BufferKind,
}

impl BufferWriter {
    pub fn new(target: &SharedActivations, kind: BufferKind) -> Self {
        Self {
            target: Rc::downgrade(target),
            kind,
        }
    }

    #[inline]
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Replaces the bound buffer with `values`.
    pub fn write(&self, values: &[f32]) -> Result<()> {
        let target = self.target.upgrade().ok_or(NetworkError::DetachedTarget)?;
        let mut buffer = target
            .try_borrow_mut()
            .map_err(|_| NetworkError::ReentrantWrite)?;
        trace!("{} <- {} values", self.kind, values.len());
        buffer.replace(values)
    }
}

impl Subscriber<[f32]> for BufferWriter {
    #[inline]
    fn receive(&self, value: &[f32]) -> Result<()> {
        self.write(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_are_inactive() {
        let buffer = Activations::zeros(4);
        assert_eq!(buffer.len(), 4);
        assert!(!buffer.any_active());
        assert!(Activations::default().is_empty());
    }

    #[test]
    fn any_nonzero_value_is_active() {
        assert!(Activations::from_values(vec![0.0, -0.25, 0.0]).any_active());
        assert!(Activations::from_values(vec![0.0, f32::NAN]).any_active());
    }

    #[test]
    fn set_rejects_out_of_range_slots() {
        let mut buffer = Activations::zeros(2);
        buffer.set(1, 3.0).unwrap();
        assert_eq!(buffer.values(), &[0.0, 3.0]);
        assert_eq!(
            buffer.set(2, 1.0),
            Err(NetworkError::SlotOutOfRange { slot: 2, width: 2 })
        );
    }

    #[test]
    fn replace_keeps_width_fixed() {
        let mut buffer = Activations::zeros(3);
        buffer.replace(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(buffer.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(
            buffer.replace(&[1.0]),
            Err(NetworkError::WidthMismatch {
                expected: 3,
                found: 1
            })
        );
        assert_eq!(buffer.values(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn truncation_rounds_towards_zero() {
        let buffer = Activations::from_values(vec![1.9, -1.9, 0.4]);
        assert_eq!(buffer.truncated(), vec![1, -1, 0]);
    }

    #[test]
    fn slot_writer_touches_only_its_slot() {
        let target = Activations::zeros(3).shared();
        let writer = SlotWriter::new(&target, 1).unwrap();

        writer.receive(&0.75).unwrap();
        assert_eq!(target.borrow().values(), &[0.0, 0.75, 0.0]);
    }

    #[test]
    fn slot_writer_requires_an_existing_slot() {
        let target = Activations::zeros(2).shared();
        assert!(matches!(
            SlotWriter::new(&target, 5),
            Err(NetworkError::SlotOutOfRange { slot: 5, width: 2 })
        ));
    }

    #[test]
    fn writers_report_dropped_targets() {
        let target = Activations::zeros(2).shared();
        let slot = SlotWriter::new(&target, 0).unwrap();
        let whole = BufferWriter::new(&target, BufferKind::Inputs);
        drop(target);

        assert_eq!(slot.write(1.0), Err(NetworkError::DetachedTarget));
        assert_eq!(whole.write(&[1.0, 1.0]), Err(NetworkError::DetachedTarget));
    }

    #[test]
    fn writers_refuse_to_write_a_borrowed_buffer() {
        let target = Activations::zeros(2).shared();
        let writer = SlotWriter::new(&target, 0).unwrap();

        let _reading = target.borrow();
        assert_eq!(writer.write(1.0), Err(NetworkError::ReentrantWrite));
    }

    #[test]
    fn buffer_writer_replaces_everything() {
        let target = Activations::zeros(3).shared();
        let writer = BufferWriter::new(&target, BufferKind::Feedback);

        writer.receive(&[1.0, 0.0, 1.0][..]).unwrap();
        assert_eq!(target.borrow().values(), &[1.0, 0.0, 1.0]);
        assert_eq!(writer.kind(), BufferKind::Feedback);
    }
}
