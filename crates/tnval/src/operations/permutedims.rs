//! Axis reordering for dense tensors.
//!
//! Everything here reduces to one gather loop:
//!
//! ```text
//! permutedims(tensor, perm)     # validate, allocate, fill
//!     → permutedims_into(dest, src, perm)
//! swap_axes / move_axis / restore_axes
//!     → build a permutation → permutedims
//! ```

use crate::error::TensorError;
use crate::scalar::Scalar;
use crate::strides::increment;
use crate::tensor::Tensor;

/// Permute the dimensions of a tensor, returning a new tensor.
///
/// `perm[i]` gives the source dimension for the i-th dimension of the result.
///
/// # Errors
///
/// Returns `InvalidPermutation` if `perm` is not a permutation of `0..ndim`.
///
/// # Examples
///
/// ```
/// use tnval::Tensor;
/// use tnval::operations::permutedims;
///
/// let t: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
/// let t2 = permutedims(&t, &[1, 0]).unwrap();
/// assert_eq!(t2.shape(), &[3, 2]);
/// assert_eq!(t.get(&[1, 0]), t2.get(&[0, 1]));
/// ```
pub fn permutedims<ElT: Scalar>(
    tensor: &Tensor<ElT>,
    perm: &[usize],
) -> Result<Tensor<ElT>, TensorError> {
    validate_permutation(perm, tensor.ndim())?;

    let new_shape: Vec<usize> = perm.iter().map(|&p| tensor.shape()[p]).collect();
    let mut result = Tensor::zeroed(&new_shape);
    permutedims_into(&mut result, tensor, perm);
    Ok(result)
}

/// Fill `dest` with `src` permuted by `perm`.
///
/// # Panics
///
/// Panics if `dest` does not have the permuted shape of `src`.
pub(crate) fn permutedims_into<ElT: Scalar>(dest: &mut Tensor<ElT>, src: &Tensor<ElT>, perm: &[usize]) {
    assert!(
        perm.iter()
            .enumerate()
            .all(|(i, &p)| dest.shape()[i] == src.shape()[p]),
        "destination shape {:?} is not {:?} permuted by {:?}",
        dest.shape(),
        src.shape(),
        perm
    );

    // Walk dest in storage order; the source offset follows the permuted strides.
    let src_strides: Vec<usize> = perm.iter().map(|&p| src.strides()[p]).collect();
    let shape = dest.shape().to_vec();
    let mut index = vec![0usize; shape.len()];
    let data = dest.data_mut();
    let mut linear = 0;
    loop {
        let offset: usize = index.iter().zip(&src_strides).map(|(i, s)| i * s).sum();
        data[linear] = src.data()[offset];
        linear += 1;
        if !increment(&mut index, &shape) {
            break;
        }
    }
}

/// Exchange axes `a` and `b`.
///
/// # Errors
///
/// `AxisOutOfRange` if either axis is past the rank.
pub fn swap_axes<ElT: Scalar>(
    tensor: &Tensor<ElT>,
    a: usize,
    b: usize,
) -> Result<Tensor<ElT>, TensorError> {
    let rank = tensor.ndim();
    check_axis(a, rank)?;
    check_axis(b, rank)?;
    let mut perm: Vec<usize> = (0..rank).collect();
    perm.swap(a, b);
    permutedims(tensor, &perm)
}

/// Remove axis `from` and reinsert it so that it ends up at index `to`.
///
/// # Errors
///
/// `AxisOutOfRange` if either index is past the rank.
///
/// # Examples
///
/// ```
/// use tnval::Tensor;
///
/// let t: Tensor<f64> = Tensor::from_fn(&[2, 3, 4], |_| 0.0).unwrap();
/// assert_eq!(t.move_axis(0, 2).unwrap().shape(), &[3, 4, 2]);
/// assert_eq!(t.move_axis(2, 0).unwrap().shape(), &[4, 2, 3]);
/// ```
pub fn move_axis<ElT: Scalar>(
    tensor: &Tensor<ElT>,
    from: usize,
    to: usize,
) -> Result<Tensor<ElT>, TensorError> {
    let rank = tensor.ndim();
    check_axis(from, rank)?;
    check_axis(to, rank)?;
    let mut perm: Vec<usize> = (0..rank).collect();
    let axis = perm.remove(from);
    perm.insert(to, axis);
    permutedims(tensor, &perm)
}

/// Move the trailing `positions.len()` axes of `tensor` to the given
/// positions, the m-th trailing axis landing at `positions[m]`.
///
/// The leading axes keep their relative order and fill the remaining
/// positions. This undoes the reordering a pairwise contraction applies to
/// axes that a kernel tensor maps in place.
///
/// # Errors
///
/// `InvalidPermutation` if a position is past the rank, repeated, or there
/// are more positions than axes.
pub fn restore_axes<ElT: Scalar>(
    tensor: &Tensor<ElT>,
    positions: &[usize],
) -> Result<Tensor<ElT>, TensorError> {
    let rank = tensor.ndim();
    let invalid = || TensorError::InvalidPermutation {
        perm: positions.to_vec(),
        ndim: rank,
    };
    let lead = rank.checked_sub(positions.len()).ok_or_else(invalid)?;

    let mut perm: Vec<Option<usize>> = vec![None; rank];
    for (m, &pos) in positions.iter().enumerate() {
        if pos >= rank || perm[pos].is_some() {
            return Err(invalid());
        }
        perm[pos] = Some(lead + m);
    }
    let mut rest = 0..lead;
    let perm: Vec<usize> = perm
        .into_iter()
        .map(|p| p.or_else(|| rest.next()))
        .collect::<Option<_>>()
        .ok_or_else(invalid)?;
    permutedims(tensor, &perm)
}

fn check_axis(axis: usize, rank: usize) -> Result<(), TensorError> {
    if axis >= rank {
        return Err(TensorError::AxisOutOfRange { axis, rank });
    }
    Ok(())
}

/// Validate that perm is a valid permutation of 0..ndim.
fn validate_permutation(perm: &[usize], ndim: usize) -> Result<(), TensorError> {
    let invalid = || TensorError::InvalidPermutation {
        perm: perm.to_vec(),
        ndim,
    };
    if perm.len() != ndim {
        return Err(invalid());
    }

    let mut seen = vec![false; ndim];
    for &p in perm {
        if p >= ndim || seen[p] {
            return Err(invalid());
        }
        seen[p] = true;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::c64;

    fn counting(shape: &[usize]) -> Tensor<f64> {
        let mut n = 0.0;
        Tensor::from_fn(shape, |_| {
            n += 1.0;
            n
        })
        .unwrap()
    }

    fn test_permutedims_transpose_generic<T: Scalar + From<f64>>() {
        let data: Vec<T> = (1..=6).map(|x| T::from(x as f64)).collect();
        let t: Tensor<T> = Tensor::from_vec(data, &[2, 3]).unwrap();

        let t2 = permutedims(&t, &[1, 0]).unwrap();
        assert_eq!(t2.shape(), &[3, 2]);

        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(t.get(&[i, j]), t2.get(&[j, i]));
            }
        }
    }

    #[test]
    fn test_permutedims_transpose_f64() {
        test_permutedims_transpose_generic::<f64>();
    }

    #[test]
    fn test_permutedims_transpose_c64() {
        test_permutedims_transpose_generic::<c64>();
    }

    #[test]
    fn test_permutedims_3d() {
        let t = counting(&[2, 3, 4]);
        let t2 = permutedims(&t, &[2, 0, 1]).unwrap();
        assert_eq!(t2.shape(), &[4, 2, 3]);
        for i in 0..2 {
            for j in 0..3 {
                for k in 0..4 {
                    assert_eq!(t.get(&[i, j, k]), t2.get(&[k, i, j]));
                }
            }
        }
    }

    #[test]
    fn test_permutedims_invalid() {
        let t: Tensor<f64> = Tensor::zeros(&[2, 3]).unwrap();
        assert!(permutedims(&t, &[0]).is_err());
        assert!(permutedims(&t, &[0, 1, 2]).is_err());
        assert!(permutedims(&t, &[0, 2]).is_err());
        assert!(permutedims(&t, &[0, 0]).is_err());
    }

    #[test]
    fn test_permutedims_scalar() {
        let t = Tensor::scalar(3.0);
        assert_eq!(permutedims(&t, &[]).unwrap(), t);
    }

    #[test]
    fn test_swap_axes() {
        let t = counting(&[2, 3, 4, 2]);
        let s = swap_axes(&t, 0, 3).unwrap();
        assert_eq!(s.shape(), &[2, 3, 4, 2]);
        assert_eq!(s.get(&[1, 2, 3, 0]), t.get(&[0, 2, 3, 1]));
        assert!(matches!(
            swap_axes(&t, 0, 4),
            Err(TensorError::AxisOutOfRange { axis: 4, rank: 4 })
        ));
    }

    #[test]
    fn test_move_axis_round_trip() {
        let t = counting(&[2, 3, 4]);
        let moved = move_axis(&t, 0, 2).unwrap();
        assert_eq!(moved.get(&[2, 3, 1]), t.get(&[1, 2, 3]));
        assert_eq!(move_axis(&moved, 2, 0).unwrap(), t);
        assert_eq!(move_axis(&t, 1, 1).unwrap(), t);
    }

    #[test]
    fn test_restore_axes() {
        // [a, b, c, d] with trailing (c, d) sent to positions 2 and 0
        let t = counting(&[2, 3, 4, 5]);
        let r = restore_axes(&t, &[2, 0]).unwrap();
        assert_eq!(r.shape(), &[5, 2, 4, 3]);
        assert_eq!(r.get(&[4, 1, 3, 2]), t.get(&[1, 2, 3, 4]));

        assert_eq!(restore_axes(&t, &[]).unwrap(), t);
        assert_eq!(restore_axes(&t, &[2, 3]).unwrap(), t);
    }

    #[test]
    fn test_restore_axes_invalid() {
        let t = counting(&[2, 3]);
        assert!(restore_axes(&t, &[0, 0]).is_err());
        assert!(restore_axes(&t, &[2]).is_err());
        assert!(restore_axes(&t, &[0, 1, 2]).is_err());
    }
}
