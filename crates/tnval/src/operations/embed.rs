//! Identity embeddings: contracting a tensor with an identity kernel over a
//! subset of its axes leaves it unchanged.

use log::debug;

use crate::contract::{Contraction, contract};
use crate::error::{Side, TensorError};
use crate::operations::permutedims::restore_axes;
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use crate::wires::Wire;

/// Build the identity kernel over axis sizes `dims`.
///
/// The result has rank `2n` and shape `dims ++ dims`; it holds 1 exactly
/// where `idx[k] == idx[k + n]` for every `k < n`.
///
/// # Examples
///
/// ```
/// use tnval::operations::identity_tensor;
///
/// let id = identity_tensor::<f64>(&[2, 3]).unwrap();
/// assert_eq!(id.shape(), &[2, 3, 2, 3]);
/// assert_eq!(id.get(&[1, 2, 1, 2]), Some(&1.0));
/// assert_eq!(id.get(&[1, 2, 1, 0]), Some(&0.0));
/// ```
pub fn identity_tensor<ElT: Scalar>(dims: &[usize]) -> Result<Tensor<ElT>, TensorError> {
    let n = dims.len();
    let shape: Vec<usize> = dims.iter().chain(dims).copied().collect();
    Tensor::from_fn(&shape, |ix| {
        if ix[..n] == ix[n..] {
            ElT::one()
        } else {
            ElT::zero()
        }
    })
}

/// Embed `t` in an identity over its leading `n` axes.
///
/// # Errors
///
/// `InvalidEmbeddingAxisCount` if `n` is zero or exceeds the rank of `t`.
pub fn embed<ElT: Scalar>(t: &Tensor<ElT>, n: usize) -> Result<Contraction<ElT>, TensorError> {
    if n == 0 || n > t.ndim() {
        return Err(TensorError::InvalidEmbeddingAxisCount {
            count: n,
            rank: t.ndim(),
        });
    }
    let axes: Vec<usize> = (0..n).collect();
    embed_axes(t, &axes)
}

/// Embed `t` in an identity over the given axes.
///
/// The axes are sorted; selected axis `axes[k]` is wired to identity axis
/// `k`. The recorded output is `t` itself.
///
/// # Errors
///
/// - `InvalidEmbeddingAxisCount` if `axes` is empty or longer than the rank.
/// - `AxisOutOfRange` for an axis past the rank.
/// - `DuplicateAxisBinding` if an axis is listed twice.
/// - `KernelMismatch` if the identity contraction does not reproduce `t`.
///
/// # Examples
///
/// ```
/// use tnval::{Tensor, operations::embed_axes};
///
/// let t: Tensor<f64> = Tensor::from_fn(&[2, 3, 4], |ix| ix[2] as f64).unwrap();
/// let case = embed_axes(&t, &[2, 0]).unwrap();
/// assert_eq!(case.wires(), &[(0, 0), (2, 1)]);
/// assert_eq!(case.t2().shape(), &[2, 4, 2, 4]);
/// assert_eq!(case.t3(), &t);
/// ```
pub fn embed_axes<ElT: Scalar>(
    t: &Tensor<ElT>,
    axes: &[usize],
) -> Result<Contraction<ElT>, TensorError> {
    let rank = t.ndim();
    if axes.is_empty() || axes.len() > rank {
        return Err(TensorError::InvalidEmbeddingAxisCount {
            count: axes.len(),
            rank,
        });
    }
    let mut axes = axes.to_vec();
    axes.sort_unstable();
    for pair in axes.windows(2) {
        if pair[0] == pair[1] {
            return Err(TensorError::DuplicateAxisBinding {
                side: Side::First,
                axis: pair[0],
            });
        }
    }
    if let Some(&axis) = axes.last().filter(|&&a| a >= rank) {
        return Err(TensorError::AxisOutOfRange { axis, rank });
    }

    let dims: Vec<usize> = axes.iter().map(|&a| t.shape()[a]).collect();
    let kernel = identity_tensor(&dims)?;
    let wires: Vec<Wire> = axes.iter().enumerate().map(|(k, &a)| (a, k)).collect();

    let via_kernel = restore_axes(&contract(t, &kernel, &wires)?, &axes)?;
    if &via_kernel != t {
        return Err(TensorError::KernelMismatch { kernel: "identity" });
    }
    debug!("identity embedding over axes {axes:?} of shape {:?}", t.shape());

    Ok(Contraction::from_parts(t.clone(), kernel, t.clone(), wires))
}
