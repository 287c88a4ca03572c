//! tnval - dense tensor contraction and tensor-network resolution for
//! generating contraction validation fixtures.
//!
//! Every result this crate computes is an *expected value*: a small, fully
//! materialized tensor another contraction library is checked against.
//! Correctness and a fixed axis-ordering convention matter; speed does not.
//!
//! # Architecture
//!
//! ```text
//! wires        → shared-label assignment for a pairwise contraction
//! contract     → labeled loop kernel; contract / trace / Contraction
//! operations   → permutedims; swap and identity kernels checked via contract
//! network      → one-shot and bond-by-bond resolution; Reposition
//! ```
//!
//! # Example
//!
//! ```
//! use tnval::{Bond, Contraction, Tensor, TensorNetwork, c64};
//!
//! let t1: Tensor = Tensor::from_fn(&[2, 3], |ix| c64::new(ix[0] as f64, ix[1] as f64)).unwrap();
//! let t2: Tensor = Tensor::from_fn(&[3, 4], |ix| c64::new(1.0, (ix[0] + ix[1]) as f64)).unwrap();
//!
//! let case = Contraction::new(t1.clone(), t2.clone(), vec![(1, 0)]).unwrap();
//! assert_eq!(case.t3().shape(), &[2, 4]);
//!
//! let tn = TensorNetwork::new(vec![t1, t2], vec![Bond::new(0, 1, vec![(1, 0)])]).unwrap();
//! assert_eq!(&tn.resolve().unwrap(), case.t3());
//! ```

pub mod contract;
pub mod error;
pub mod network;
pub mod operations;
pub mod scalar;
pub mod strides;
pub mod tensor;
pub mod wires;

pub use contract::{Contraction, contract};
pub use error::{Side, TensorError};
pub use network::{Bond, NetworkCase, Reposition, TensorNetwork};
pub use operations::{embed, embed_axes, swap};
pub use scalar::{Scalar, c64};
pub use tensor::Tensor;
pub use wires::Wire;
