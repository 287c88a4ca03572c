//! Wire matching: turning index pairings into shared summation labels.
//!
//! A wire `(i1, i2)` identifies axis `i1` of a first tensor with axis `i2`
//! of a second. Contraction is expressed by giving both axes the same
//! [`Label`]; every other axis gets a label of its own.

use crate::error::{Side, TensorError};

/// An ordered pair of axes, one on each of two tensors, to be summed together.
pub type Wire = (usize, usize);

/// Integer tag naming one summation index.
pub type Label = usize;

/// Hands out fresh, never-repeating labels.
#[derive(Debug, Clone, Default)]
pub struct LabelAllocator {
    next: Label,
}

impl LabelAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a contiguous block of `n` fresh labels.
    pub fn block(&mut self, n: usize) -> Vec<Label> {
        let start = self.next;
        self.next += n;
        (start..self.next).collect()
    }
}

/// Label assignment for a pairwise contraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireMatch {
    /// One label per axis of the first tensor, all distinct.
    pub labels_a: Vec<Label>,
    /// One label per axis of the second tensor; wired axes reuse the first tensor's label.
    pub labels_b: Vec<Label>,
    /// Axes of the first tensor not bound by any wire, ascending.
    pub free_a: Vec<usize>,
    /// Axes of the second tensor not bound by any wire, ascending.
    pub free_b: Vec<usize>,
}

impl WireMatch {
    /// Labels of the result axes: free axes of the first tensor, then of the second.
    pub fn output_labels(&self) -> Vec<Label> {
        self.free_a
            .iter()
            .map(|&i| self.labels_a[i])
            .chain(self.free_b.iter().map(|&j| self.labels_b[j]))
            .collect()
    }

    /// Rank of the contraction result.
    pub fn output_rank(&self) -> usize {
        self.free_a.len() + self.free_b.len()
    }
}

/// Build the shared-label assignment for contracting tensors of shapes
/// `shape_a` and `shape_b` over `wires`.
///
/// # Errors
///
/// - `AxisOutOfRange` if a wire names an axis past either tensor's rank.
/// - `DuplicateAxisBinding` if an axis takes part in more than one wire.
/// - `DimensionMismatch` if a wire binds axes of different sizes.
///
/// # Examples
///
/// ```
/// use tnval::wires::match_wires;
///
/// // "ij,ki->jk": axis 0 of A is summed with axis 1 of B
/// let m = match_wires(&[2, 2], &[2, 2], &[(0, 1)]).unwrap();
/// assert_eq!(m.labels_a, vec![0, 1]);
/// assert_eq!(m.labels_b, vec![2, 0]);
/// assert_eq!(m.output_labels(), vec![1, 2]);
/// ```
pub fn match_wires(
    shape_a: &[usize],
    shape_b: &[usize],
    wires: &[Wire],
) -> Result<WireMatch, TensorError> {
    let (rank_a, rank_b) = (shape_a.len(), shape_b.len());
    let mut bound_a = vec![false; rank_a];
    let mut bound_b = vec![false; rank_b];

    for &(i1, i2) in wires {
        if i1 >= rank_a {
            return Err(TensorError::AxisOutOfRange {
                axis: i1,
                rank: rank_a,
            });
        }
        if i2 >= rank_b {
            return Err(TensorError::AxisOutOfRange {
                axis: i2,
                rank: rank_b,
            });
        }
        if bound_a[i1] {
            return Err(TensorError::DuplicateAxisBinding {
                side: Side::First,
                axis: i1,
            });
        }
        if bound_b[i2] {
            return Err(TensorError::DuplicateAxisBinding {
                side: Side::Second,
                axis: i2,
            });
        }
        check_wire_dims((i1, i2), shape_a[i1], shape_b[i2])?;
        bound_a[i1] = true;
        bound_b[i2] = true;
    }

    let mut alloc = LabelAllocator::new();
    let labels_a = alloc.block(rank_a);
    let mut labels_b = alloc.block(rank_b);
    for &(i1, i2) in wires {
        labels_b[i2] = labels_a[i1];
    }

    Ok(WireMatch {
        labels_a,
        labels_b,
        free_a: unbound(&bound_a),
        free_b: unbound(&bound_b),
    })
}

/// Check that the two axes joined by `wire` have the same size.
pub(crate) fn check_wire_dims(wire: Wire, size_a: usize, size_b: usize) -> Result<(), TensorError> {
    if size_a != size_b {
        return Err(TensorError::DimensionMismatch {
            axis_a: wire.0,
            axis_b: wire.1,
            size_a,
            size_b,
        });
    }
    Ok(())
}

pub(crate) fn unbound(bound: &[bool]) -> Vec<usize> {
    bound
        .iter()
        .enumerate()
        .filter(|&(_, &b)| !b)
        .map(|(i, _)| i)
        .collect()
}
