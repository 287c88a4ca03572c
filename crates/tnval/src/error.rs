//! Error types for tnval.

use thiserror::Error;

/// Errors that can occur while building, contracting or resolving tensors.
///
/// Every variant except [`TensorError::KernelMismatch`] is a validation
/// failure raised before any numeric work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TensorError {
    /// Shape mismatch between data length and expected size.
    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Wrong number of indices or labels provided.
    #[error("wrong number of indices: expected {expected}, got {actual}")]
    WrongNumberOfIndices { expected: usize, actual: usize },

    /// A shape contains a dimension of size zero.
    #[error("dimension {axis} has size zero in shape {shape:?}")]
    ZeroDimension { axis: usize, shape: Vec<usize> },

    /// A wire or operation references an axis the tensor does not have.
    #[error("axis {axis} is out of range for tensor of rank {rank}")]
    AxisOutOfRange { axis: usize, rank: usize },

    /// An axis is bound by more than one wire of a pairwise contraction.
    #[error("axis {axis} of {side} tensor is bound by more than one wire")]
    DuplicateAxisBinding { side: Side, axis: usize },

    /// Two axes bound by a wire have different sizes.
    #[error("wire ({axis_a}, {axis_b}) binds axes of different sizes {size_a} and {size_b}")]
    DimensionMismatch {
        axis_a: usize,
        axis_b: usize,
        size_a: usize,
        size_b: usize,
    },

    /// Swap requested between an axis and itself.
    #[error("cannot swap axis {axis} with itself")]
    InvalidPermutationAxes { axis: usize },

    /// Embedding subset size is zero or exceeds the tensor rank.
    #[error("cannot embed over {count} axes of a tensor of rank {rank}")]
    InvalidEmbeddingAxisCount { count: usize, rank: usize },

    /// Invalid permutation.
    #[error("invalid permutation {perm:?} for tensor with {ndim} dimensions")]
    InvalidPermutation { perm: Vec<usize>, ndim: usize },

    /// A bond names a tensor position that is not in the network.
    #[error("bond {bond} names tensor {tensor}, but the network holds {count} tensors")]
    TensorIndexOutOfRange {
        bond: usize,
        tensor: usize,
        count: usize,
    },

    /// An axis of a network tensor is referenced by more than one wire.
    #[error("axis {axis} of tensor {tensor} is referenced by more than one wire in the network")]
    CyclicOverbinding { tensor: usize, axis: usize },

    /// A bond order is not a permutation of the network's bonds.
    #[error("bond order {order:?} is not a permutation of 0..{count}")]
    InvalidBondOrder { order: Vec<usize>, count: usize },

    /// The first tensor of a network retains no free axis to anchor a reposition.
    #[error("tensor 0 retains no free axis to reinsert after")]
    NoRetainedAxis,

    /// A structured kernel contraction disagrees with its direct computation.
    #[error("{kernel} contraction does not reproduce the direct result")]
    KernelMismatch { kernel: &'static str },
}

/// Which operand of a pairwise contraction an axis belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::First => f.write_str("first"),
            Side::Second => f.write_str("second"),
        }
    }
}
