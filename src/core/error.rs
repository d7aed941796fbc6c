//! Errors raised while building or running a network.
//!
//! Every failure here points at a misconfigured network or a broken unit contract. Nothing is
//! retried: construction, wiring and ticks abort with the first error they see.

use thiserror::Error;

/// The buffers a whole-vector connection can write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    Inputs,
    Feedback,
    Inhibitions,
}

impl std::fmt::Display for BufferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BufferKind::Inputs => "inputs",
            BufferKind::Feedback => "feedback",
            BufferKind::Inhibitions => "inhibitions",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    /// A minicolumn needs at least one unit.
    #[error("a minicolumn needs at least one computation unit")]
    EmptyColumn,

    /// Units of one minicolumn must share the same input width.
    #[error("unit {unit} has {found} synapses, expected {expected}")]
    SynapseMismatch {
        unit: usize,
        expected: usize,
        found: usize,
    },

    /// Sampling without replacement needs at least one candidate per synapse slot.
    #[error("cannot wire {required} synapses from {available} candidates")]
    InsufficientCandidates { required: usize, available: usize },

    /// The same source appears more than once in a candidate pool.
    #[error("candidate {index} appears more than once in the pool")]
    DuplicateCandidate { index: usize },

    /// Columns are wired exactly once.
    #[error("minicolumn '{0}' is already connected")]
    AlreadyConnected(String),

    /// Each destination buffer accepts a single connection.
    #[error("{0} buffer already has a writer")]
    BufferAlreadyBound(BufferKind),

    #[error("expected a vector of width {expected}, got {found}")]
    WidthMismatch { expected: usize, found: usize },

    /// A network has no column at this index.
    #[error("column {index} does not exist in a network of {count} columns")]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("slot {slot} is out of range for width {width}")]
    SlotOutOfRange { slot: usize, width: usize },

    /// The column or layer a writer points at has been dropped.
    #[error("write target no longer exists")]
    DetachedTarget,

    /// A buffer was written while it was being read in the same call chain.
    #[error("buffer is borrowed by an ongoing computation")]
    ReentrantWrite,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
