//! Shape-level analysis of a pairwise contraction.
//!
//! [`ContractionProperties`] answers "what will this contraction produce"
//! from shapes and wires alone, without touching tensor data.

use crate::error::TensorError;
use crate::wires::{Wire, match_wires};

/// Properties of contracting a tensor of shape `shape_a` with one of shape
/// `shape_b` over a wire list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractionProperties {
    /// Contracted index pairs: (axis in A, axis in B), in wire order.
    pub contracted_pairs: Vec<(usize, usize)>,

    /// Axes of A that are not contracted (appear in output), ascending.
    pub uncontracted_a: Vec<usize>,

    /// Axes of B that are not contracted (appear in output), ascending.
    pub uncontracted_b: Vec<usize>,

    /// Shape of the result: A's free sizes, then B's.
    pub output_shape: Vec<usize>,

    /// Product of the contracted dimension sizes.
    pub contracted_size: usize,
}

impl ContractionProperties {
    /// Compute contraction properties from shapes and wires.
    ///
    /// # Errors
    ///
    /// Same validation as [`match_wires`].
    ///
    /// # Example
    ///
    /// ```
    /// use tnval::contract::ContractionProperties;
    ///
    /// // A[i,j,k] B[k,l] -> C[i,j,l]
    /// let props = ContractionProperties::compute(&[2, 3, 4], &[4, 5], &[(2, 0)]).unwrap();
    /// assert_eq!(props.output_shape, vec![2, 3, 5]);
    /// assert_eq!(props.output_rank(), 3);
    /// assert_eq!(props.contracted_size, 4);
    /// ```
    pub fn compute(
        shape_a: &[usize],
        shape_b: &[usize],
        wires: &[Wire],
    ) -> Result<Self, TensorError> {
        let m = match_wires(shape_a, shape_b, wires)?;

        let output_shape = m
            .free_a
            .iter()
            .map(|&i| shape_a[i])
            .chain(m.free_b.iter().map(|&j| shape_b[j]))
            .collect();
        let contracted_size = wires.iter().map(|&(i, _)| shape_a[i]).product();

        Ok(Self {
            contracted_pairs: wires.to_vec(),
            uncontracted_a: m.free_a,
            uncontracted_b: m.free_b,
            output_shape,
            contracted_size,
        })
    }

    /// Rank of the result: `rank(A) + rank(B) - 2 * len(wires)`.
    pub fn output_rank(&self) -> usize {
        self.output_shape.len()
    }
}
