//! Pairwise tensor contraction over wires.
//!
//! A wire `(i1, i2)` sums axis `i1` of the first tensor against axis `i2` of
//! the second. The result keeps the first tensor's free axes, then the
//! second tensor's, each group in its original order.
//!
//! # Example
//!
//! ```
//! use tnval::{Tensor, contract};
//!
//! // "ij,ki->jk"
//! let a: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
//! let b: Tensor<f64> = Tensor::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
//! let c = contract(&a, &b, &[(0, 1)]).unwrap();
//! assert_eq!(c.shape(), &[2, 2]);
//! // c[j,k] = sum_i a[i,j] * b[k,i]; c[0,0] = 1*5 + 3*6
//! assert_eq!(c.get(&[0, 0]), Some(&23.0));
//! ```

mod naive;
mod properties;

pub(crate) use naive::{Operand, contract_labeled};
pub use properties::ContractionProperties;

use crate::error::{Side, TensorError};
use crate::scalar::{Scalar, c64};
use crate::tensor::Tensor;
use crate::wires::{LabelAllocator, Wire, check_wire_dims, match_wires, unbound};

/// Contract `a` with `b` over `wires`.
///
/// Contracting every axis of both tensors yields a rank-0 tensor.
///
/// # Errors
///
/// `AxisOutOfRange`, `DuplicateAxisBinding` or `DimensionMismatch` when the
/// wires are invalid for the two shapes.
pub fn contract<ElT: Scalar>(
    a: &Tensor<ElT>,
    b: &Tensor<ElT>,
    wires: &[Wire],
) -> Result<Tensor<ElT>, TensorError> {
    let m = match_wires(a.shape(), b.shape(), wires)?;
    contract_labeled(
        &[Operand::new(a, &m.labels_a), Operand::new(b, &m.labels_b)],
        &m.output_labels(),
    )
}

/// Contract pairs of axes of a single tensor with each other.
///
/// The result keeps the untouched axes in their original order.
///
/// # Errors
///
/// `AxisOutOfRange` for an axis past the rank, `DuplicateAxisBinding` if an
/// axis appears twice (including a wire joining an axis to itself) and
/// `DimensionMismatch` for pairs of different sizes.
///
/// # Examples
///
/// ```
/// use tnval::{Tensor, contract::trace};
///
/// let m: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
/// let tr = trace(&m, &[(0, 1)]).unwrap();
/// assert_eq!(tr.data(), &[5.0]);
/// ```
pub fn trace<ElT: Scalar>(t: &Tensor<ElT>, wires: &[Wire]) -> Result<Tensor<ElT>, TensorError> {
    let rank = t.ndim();
    let mut bound = vec![false; rank];
    for &(i1, i2) in wires {
        for axis in [i1, i2] {
            if axis >= rank {
                return Err(TensorError::AxisOutOfRange { axis, rank });
            }
            if bound[axis] {
                return Err(TensorError::DuplicateAxisBinding {
                    side: Side::First,
                    axis,
                });
            }
            bound[axis] = true;
        }
        check_wire_dims((i1, i2), t.shape()[i1], t.shape()[i2])?;
    }

    let mut labels = LabelAllocator::new().block(rank);
    for &(i1, i2) in wires {
        labels[i2] = labels[i1];
    }
    let output: Vec<_> = unbound(&bound).into_iter().map(|i| labels[i]).collect();
    contract_labeled(&[Operand::new(t, &labels)], &output)
}

/// A pairwise validation case: two inputs, the wires binding them and the
/// expected output.
#[derive(Debug, Clone, PartialEq)]
pub struct Contraction<ElT: Scalar = c64> {
    t1: Tensor<ElT>,
    t2: Tensor<ElT>,
    t3: Tensor<ElT>,
    wires: Vec<Wire>,
}

impl<ElT: Scalar> Contraction<ElT> {
    /// Contract `t1` with `t2` over `wires` and record the case.
    pub fn new(t1: Tensor<ElT>, t2: Tensor<ElT>, wires: Vec<Wire>) -> Result<Self, TensorError> {
        let t3 = contract(&t1, &t2, &wires)?;
        Ok(Self { t1, t2, t3, wires })
    }

    /// Record a case whose expected output was computed by other means.
    pub(crate) fn from_parts(
        t1: Tensor<ElT>,
        t2: Tensor<ElT>,
        t3: Tensor<ElT>,
        wires: Vec<Wire>,
    ) -> Self {
        Self { t1, t2, t3, wires }
    }

    pub fn t1(&self) -> &Tensor<ElT> {
        &self.t1
    }

    pub fn t2(&self) -> &Tensor<ElT> {
        &self.t2
    }

    /// The expected output.
    pub fn t3(&self) -> &Tensor<ElT> {
        &self.t3
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// The three tensors in emission order.
    pub fn tensors(&self) -> [&Tensor<ElT>; 3] {
        [&self.t1, &self.t2, &self.t3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_einsum_ij_ki_jk() {
        let a: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]).unwrap();
        let b: Tensor<f64> = Tensor::from_vec(vec![5.0, 6.0, 7.0, 8.0], &[2, 2]).unwrap();
        let c = contract(&a, &b, &[(0, 1)]).unwrap();
        for j in 0..2 {
            for k in 0..2 {
                let expected: f64 = (0..2).map(|i| a.get(&[i, j]).unwrap() * b.get(&[k, i]).unwrap()).sum();
                assert_relative_eq!(*c.get(&[j, k]).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_full_contraction_is_scalar() {
        let a: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
        let b: Tensor<f64> = Tensor::from_vec(vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0], &[3, 2]).unwrap();
        let c = contract(&a, &b, &[(0, 1), (1, 0)]).unwrap();
        assert_eq!(c.ndim(), 0);
        assert_eq!(c.len(), 1);
        assert_relative_eq!(*c.get(&[]).unwrap(), 21.0);
    }

    #[test]
    fn test_free_axes_keep_relative_order() {
        // A[p,q,r] B[s,q,t] over q -> C[p,r,s,t]
        let a: Tensor<f64> = Tensor::from_fn(&[2, 3, 4], |ix| (ix[0] * 12 + ix[1] * 4 + ix[2]) as f64).unwrap();
        let b: Tensor<f64> = Tensor::from_fn(&[5, 3, 2], |ix| (ix[0] + ix[1] + ix[2]) as f64).unwrap();
        let c = contract(&a, &b, &[(1, 1)]).unwrap();
        assert_eq!(c.shape(), &[2, 4, 5, 2]);

        let expected: f64 = (0..3).map(|q| a.get(&[1, q, 3]).unwrap() * b.get(&[4, q, 1]).unwrap()).sum();
        assert_relative_eq!(*c.get(&[1, 3, 4, 1]).unwrap(), expected);
    }

    #[test]
    fn test_complex_contraction() {
        let a = Tensor::from_vec(vec![c64::new(0.0, 1.0), c64::new(1.0, 0.0)], &[2]).unwrap();
        let b = Tensor::from_vec(vec![c64::new(0.0, 1.0), c64::new(2.0, -1.0)], &[2]).unwrap();
        let c = contract(&a, &b, &[(0, 0)]).unwrap();
        // i*i + 1*(2-i) = -1 + 2 - i
        assert_eq!(c.data(), &[c64::new(1.0, -1.0)]);
    }

    #[test]
    fn test_dimension_mismatch_is_reported() {
        let a: Tensor<f64> = Tensor::from_vec(vec![0.0; 6], &[2, 3]).unwrap();
        let b: Tensor<f64> = Tensor::from_vec(vec![0.0; 8], &[4, 2]).unwrap();
        assert!(matches!(
            contract(&a, &b, &[(1, 0)]),
            Err(TensorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_trace_partial() {
        // T[i,j,i] -> v[j]
        let t: Tensor<f64> = Tensor::from_fn(&[2, 3, 2], |ix| (ix[0] * 10 + ix[1] + ix[2] * 100) as f64).unwrap();
        let v = trace(&t, &[(0, 2)]).unwrap();
        assert_eq!(v.shape(), &[3]);
        for j in 0..3 {
            let expected = *t.get(&[0, j, 0]).unwrap() + *t.get(&[1, j, 1]).unwrap();
            assert_relative_eq!(*v.get(&[j]).unwrap(), expected);
        }
    }

    #[test]
    fn test_trace_rejects_self_wire() {
        let t: Tensor<f64> = Tensor::from_vec(vec![0.0; 4], &[2, 2]).unwrap();
        assert_eq!(
            trace(&t, &[(1, 1)]).unwrap_err(),
            TensorError::DuplicateAxisBinding {
                side: Side::First,
                axis: 1
            }
        );
    }

    #[test]
    fn test_contraction_record() {
        let a: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let b: Tensor<f64> = Tensor::from_vec(vec![3.0, 4.0], &[2]).unwrap();
        let case = Contraction::new(a.clone(), b.clone(), vec![]).unwrap();
        assert_eq!(case.t1(), &a);
        assert_eq!(case.t2(), &b);
        assert_eq!(case.t3().shape(), &[2, 2]);
        assert_eq!(case.t3().data(), &[3.0, 4.0, 6.0, 8.0]);
        assert!(case.wires().is_empty());
    }
}
