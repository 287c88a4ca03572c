//! Tensor operations.
//!
//! ```text
//! permutedims / swap_axes / move_axis / restore_axes   # direct reordering
//! swap(t, i1, i2)        # transposition as a contraction with a swap kernel
//! embed(t, n)            # no-op as a contraction with an identity kernel
//! ```
//!
//! The kernel operations compute their expected output directly and check
//! it against the contraction engine before returning a [`Contraction`].
//!
//! [`Contraction`]: crate::contract::Contraction

mod embed;
mod permutedims;
mod swap;

pub use embed::{embed, embed_axes, identity_tensor};
pub use permutedims::{move_axis, permutedims, restore_axes, swap_axes};
pub use swap::{swap, swap_tensor};
