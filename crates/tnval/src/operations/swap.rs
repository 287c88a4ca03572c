//! Axis swaps expressed as contractions with a permutation kernel.

use log::debug;

use crate::contract::{Contraction, contract};
use crate::error::TensorError;
use crate::operations::permutedims::{restore_axes, swap_axes};
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// Build the swap kernel for axis sizes `n1` and `n2`.
///
/// The result has shape `(n1, n2, n2, n1)` and holds 1 exactly where
/// `idx[0] == idx[3]` and `idx[1] == idx[2]`.
///
/// # Examples
///
/// ```
/// use tnval::operations::swap_tensor;
/// use tnval::c64;
///
/// let s = swap_tensor::<c64>(2, 3).unwrap();
/// assert_eq!(s.shape(), &[2, 3, 3, 2]);
/// assert_eq!(s.get(&[1, 2, 2, 1]), Some(&c64::new(1.0, 0.0)));
/// assert_eq!(s.get(&[1, 2, 1, 1]), Some(&c64::new(0.0, 0.0)));
/// ```
pub fn swap_tensor<ElT: Scalar>(n1: usize, n2: usize) -> Result<Tensor<ElT>, TensorError> {
    Tensor::from_fn(&[n1, n2, n2, n1], |ix| {
        if ix[0] == ix[3] && ix[1] == ix[2] {
            ElT::one()
        } else {
            ElT::zero()
        }
    })
}

/// Exchange axes `i1` and `i2` of `t` and record it as a contraction of `t`
/// with the swap kernel over `[(i1, 0), (i2, 1)]`.
///
/// The axes are normalized so that `i1 < i2`. The expected output is the
/// direct transposition; it is checked against the kernel contraction with
/// the kernel's two output axes put back at `i1` and `i2`.
///
/// # Errors
///
/// - `InvalidPermutationAxes` if `i1 == i2`.
/// - `AxisOutOfRange` if either axis is past the rank.
/// - `KernelMismatch` if the kernel contraction disagrees with the
///   transposition.
pub fn swap<ElT: Scalar>(
    t: &Tensor<ElT>,
    i1: usize,
    i2: usize,
) -> Result<Contraction<ElT>, TensorError> {
    if i1 == i2 {
        return Err(TensorError::InvalidPermutationAxes { axis: i1 });
    }
    let (i1, i2) = (i1.min(i2), i1.max(i2));
    let rank = t.ndim();
    if i2 >= rank {
        return Err(TensorError::AxisOutOfRange { axis: i2, rank });
    }

    let t3 = swap_axes(t, i1, i2)?;
    let kernel = swap_tensor(t.shape()[i1], t.shape()[i2])?;
    let wires = vec![(i1, 0), (i2, 1)];

    let via_kernel = restore_axes(&contract(t, &kernel, &wires)?, &[i1, i2])?;
    if via_kernel != t3 {
        return Err(TensorError::KernelMismatch { kernel: "swap" });
    }
    debug!("swap axes {i1} and {i2} of shape {:?}", t.shape());

    Ok(Contraction::from_parts(t.clone(), kernel, t3, wires))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;

    fn sample(shape: &[usize]) -> Tensor<c64> {
        Tensor::from_fn(shape, |ix| {
            let re: usize = ix.iter().enumerate().map(|(k, &i)| (k + 1) * i).sum();
            c64::new(re as f64, -(ix[0] as f64))
        })
        .unwrap()
    }

    #[test]
    fn test_swap_tensor_is_permutation_kernel() {
        let s: Tensor<f64> = swap_tensor(2, 3).unwrap();
        assert_eq!(s.data().iter().filter(|&&x| x == 1.0).count(), 6);
        assert_eq!(s.data().iter().filter(|&&x| x == 0.0).count(), 30);
    }

    #[test]
    fn test_swap_first_and_last() {
        let t = sample(&[2, 3, 4, 2]);
        let case = swap(&t, 0, 3).unwrap();
        assert_eq!(case.t3().shape(), &[2, 3, 4, 2]);
        assert_eq!(case.t3().get(&[1, 2, 3, 0]), t.get(&[0, 2, 3, 1]));
        assert_eq!(case.t2().shape(), &[2, 2, 2, 2]);
        assert_eq!(case.wires(), &[(0, 0), (3, 1)]);
        assert_eq!(case.t1(), &t);
    }

    #[test]
    fn test_swap_normalizes_axis_order() {
        let t = sample(&[2, 3, 4]);
        let ab = swap(&t, 0, 2).unwrap();
        let ba = swap(&t, 2, 0).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.t2().shape(), &[2, 4, 4, 2]);
        assert_eq!(ab.t3().shape(), &[4, 3, 2]);
    }

    #[test]
    fn test_swap_rejects_same_axis() {
        let t = sample(&[2, 2]);
        assert_eq!(
            swap(&t, 1, 1).unwrap_err(),
            TensorError::InvalidPermutationAxes { axis: 1 }
        );
    }

    #[test]
    fn test_swap_rejects_out_of_range() {
        let t = sample(&[2, 2]);
        assert_eq!(
            swap(&t, 0, 2).unwrap_err(),
            TensorError::AxisOutOfRange { axis: 2, rank: 2 }
        );
    }
}
