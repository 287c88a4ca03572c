//! Dense, row-major tensor type.
//!
//! A [`Tensor`] is an immutable value once built: the public API offers
//! constructors and readers, and every operation returns a new tensor.

use crate::error::TensorError;
use crate::scalar::{Scalar, c64};
use crate::strides::{cartesian_to_linear, compute_strides, increment};

/// A dense n-dimensional tensor stored in row-major order.
///
/// Invariant: `data.len() == shape.iter().product()`. Rank 0 (shape `[]`)
/// holds exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor<ElT: Scalar = c64> {
    shape: Vec<usize>,
    strides: Vec<usize>,
    data: Vec<ElT>,
}

impl<ElT: Scalar> Tensor<ElT> {
    /// Zero-initialized tensor.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ZeroDimension` if a dimension is zero.
    pub fn zeros(shape: &[usize]) -> Result<Self, TensorError> {
        validate_shape(shape)?;
        Ok(Self::zeroed(shape))
    }

    /// Callers guarantee a shape of positive sizes.
    pub(crate) fn zeroed(shape: &[usize]) -> Self {
        let len: usize = shape.iter().product();
        Self {
            shape: shape.to_vec(),
            strides: compute_strides(shape),
            data: vec![ElT::zero(); len],
        }
    }

    /// Create a tensor from row-major data and a shape.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::ZeroDimension` if a dimension is zero and
    /// `TensorError::ShapeMismatch` if the data length doesn't match the shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use tnval::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// assert_eq!(t.get(&[0, 1]), Some(&2.0)); // row-major: [0,1] is the second element
    /// assert_eq!(t.get(&[1, 0]), Some(&4.0));
    /// ```
    pub fn from_vec(data: Vec<ElT>, shape: &[usize]) -> Result<Self, TensorError> {
        validate_shape(shape)?;
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(TensorError::ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            shape: shape.to_vec(),
            strides: compute_strides(shape),
            data,
        })
    }

    /// Create a tensor whose element at each multi-index is `f(index)`.
    ///
    /// Elements are produced in row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tnval::Tensor;
    ///
    /// let eye: Tensor<f64> = Tensor::from_fn(&[3, 3], |ix| if ix[0] == ix[1] { 1.0 } else { 0.0 }).unwrap();
    /// assert_eq!(eye.get(&[1, 1]), Some(&1.0));
    /// assert_eq!(eye.get(&[1, 2]), Some(&0.0));
    /// ```
    pub fn from_fn<F>(shape: &[usize], mut f: F) -> Result<Self, TensorError>
    where
        F: FnMut(&[usize]) -> ElT,
    {
        validate_shape(shape)?;
        let len: usize = shape.iter().product();
        let mut data = Vec::with_capacity(len);
        let mut index = vec![0; shape.len()];
        loop {
            data.push(f(&index));
            if !increment(&mut index, shape) {
                break;
            }
        }
        Ok(Self {
            shape: shape.to_vec(),
            strides: compute_strides(shape),
            data,
        })
    }

    /// Create a rank-0 tensor holding a single value.
    pub fn scalar(value: ElT) -> Self {
        Self {
            shape: Vec::new(),
            strides: Vec::new(),
            data: vec![value],
        }
    }

    /// Get the shape of the tensor.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Get the rank (number of dimensions).
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Get total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`: a valid tensor holds at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get strides.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Get the flat row-major data.
    #[inline]
    pub fn data(&self) -> &[ElT] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [ElT] {
        &mut self.data
    }

    /// Get element by linear index.
    #[inline]
    pub fn get_linear(&self, i: usize) -> Option<&ElT> {
        self.data.get(i)
    }

    /// Get element by cartesian indices.
    ///
    /// Returns `None` if indices are out of bounds or wrong number of indices.
    pub fn get(&self, indices: &[usize]) -> Option<&ElT> {
        if indices.len() != self.ndim() {
            return None;
        }
        if indices.iter().zip(self.shape.iter()).any(|(&i, &d)| i >= d) {
            return None;
        }
        self.data.get(cartesian_to_linear(indices, &self.strides))
    }

    /// Permute the dimensions of the tensor.
    ///
    /// `perm[i]` gives the source dimension for the i-th dimension of the result.
    ///
    /// # Examples
    ///
    /// ```
    /// use tnval::Tensor;
    ///
    /// let t: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]).unwrap();
    /// let t2 = t.permutedims(&[1, 0]).unwrap();
    /// assert_eq!(t2.shape(), &[3, 2]);
    /// assert_eq!(t.get(&[0, 2]), t2.get(&[2, 0]));
    /// ```
    pub fn permutedims(&self, perm: &[usize]) -> Result<Self, TensorError> {
        crate::operations::permutedims(self, perm)
    }

    /// Exchange two axes, leaving all others in place.
    pub fn swap_axes(&self, a: usize, b: usize) -> Result<Self, TensorError> {
        crate::operations::swap_axes(self, a, b)
    }

    /// Move axis `from` so that it ends up at position `to`.
    pub fn move_axis(&self, from: usize, to: usize) -> Result<Self, TensorError> {
        crate::operations::move_axis(self, from, to)
    }
}

fn validate_shape(shape: &[usize]) -> Result<(), TensorError> {
    match shape.iter().position(|&d| d == 0) {
        Some(axis) => Err(TensorError::ZeroDimension {
            axis,
            shape: shape.to_vec(),
        }),
        None => Ok(()),
    }
}
