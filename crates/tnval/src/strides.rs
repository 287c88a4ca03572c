//! Stride computation utilities.
//!
//! Tensors are stored row-major (C order), the layout the downstream fixture
//! consumer flattens its `tensor_info` element lists in.

/// Compute row-major strides from shape.
///
/// For shape [d0, d1, d2], returns strides [d1*d2, d2, 1].
///
/// # Examples
///
/// ```
/// use tnval::strides::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]), vec![20, 5, 1]);
/// assert_eq!(compute_strides(&[2, 3]), vec![3, 1]);
/// assert_eq!(compute_strides(&[5]), vec![1]);
/// assert_eq!(compute_strides(&[]), vec![]);
/// ```
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;

    for (s, &dim) in strides.iter_mut().zip(shape.iter()).rev() {
        *s = stride;
        stride *= dim;
    }

    strides
}

/// Convert cartesian indices to a linear offset.
#[inline]
pub fn cartesian_to_linear(indices: &[usize], strides: &[usize]) -> usize {
    indices
        .iter()
        .zip(strides.iter())
        .map(|(&idx, &stride)| idx * stride)
        .sum()
}

/// Convert a linear offset to row-major cartesian indices.
pub fn linear_to_cartesian(mut linear: usize, shape: &[usize]) -> Vec<usize> {
    let mut indices = vec![0; shape.len()];

    for (idx, &dim) in indices.iter_mut().zip(shape.iter()).rev() {
        *idx = linear % dim;
        linear /= dim;
    }

    indices
}

/// Advance `indices` to the next row-major position within `shape`.
///
/// Returns `false` once every position has been visited (the indices wrap
/// back to all zeros). A rank-0 shape has exactly one position.
#[inline]
pub fn increment(indices: &mut [usize], shape: &[usize]) -> bool {
    for (idx, &dim) in indices.iter_mut().zip(shape.iter()).rev() {
        *idx += 1;
        if *idx < dim {
            return true;
        }
        *idx = 0;
    }
    false
}
