//! Scalar trait for tensor element types.

use faer_traits::ComplexField;
use std::fmt::Debug;
use std::ops::{Add, Mul};

pub use faer::c64;

/// Trait for scalar types a tensor can hold.
///
/// Fixtures are always complex ([`c64`]); `f64` is supported so that
/// hand-checked examples can be written with real numbers.
pub trait Scalar:
    ComplexField + Copy + Debug + Default + PartialEq + Add<Output = Self> + Mul<Output = Self> + 'static
{
    /// Returns the additive identity (zero).
    fn zero() -> Self {
        Self::default()
    }

    /// Returns the multiplicative identity (one).
    fn one() -> Self;
}

impl Scalar for f64 {
    fn one() -> Self {
        1.0
    }
}

impl Scalar for c64 {
    fn one() -> Self {
        c64::new(1.0, 0.0)
    }
}
