//! Tensor networks: many tensors joined by bonds, resolved into one tensor.
//!
//! Resolution gives every tensor a disjoint block of labels, lets each bond
//! wire rebind the second tensor's label to the first tensor's, and runs one
//! labeled contraction over all operands at once. The result axes are the
//! free axes of every tensor in tensor-list, then local, order.
//!
//! Sequential bond-by-bond contraction ([`TensorNetwork::contract_in_order`])
//! is provided as an independent route to the same numbers.

use log::debug;

use crate::contract::{Operand, contract_labeled, trace};
use crate::error::TensorError;
use crate::operations::move_axis;
use crate::scalar::{Scalar, c64};
use crate::tensor::Tensor;
use crate::wires::{Label, LabelAllocator, Wire, check_wire_dims, match_wires, unbound};

/// Wires joining tensor `i1` to tensor `i2` of a network.
///
/// Wire `(w0, w1)` refers to axis `w0` of tensor `i1` and axis `w1` of
/// tensor `i2`. A bond with `i1 == i2` traces two axes of one tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    pub i1: usize,
    pub i2: usize,
    pub wires: Vec<Wire>,
}

impl Bond {
    pub fn new(i1: usize, i2: usize, wires: Vec<Wire>) -> Self {
        Self { i1, i2, wires }
    }

    /// Whether this bond joins the same two tensors as `other`, in either direction.
    fn joins_same_pair(&self, other: &Bond) -> bool {
        (self.i1, self.i2) == (other.i1, other.i2) || (self.i1, self.i2) == (other.i2, other.i1)
    }

    /// Append `other`'s wires, flipping them if `other` runs the other way.
    fn absorb(&mut self, other: Bond) {
        if self.i1 == other.i1 {
            self.wires.extend(other.wires);
        } else {
            self.wires.extend(other.wires.into_iter().map(|(a, b)| (b, a)));
        }
    }

    /// Rewrite references to tensor `from` as references to tensor `to`,
    /// renumbering the axes through `axis_map`.
    fn relocate(
        &mut self,
        from: usize,
        to: usize,
        axis_map: &[Option<usize>],
    ) -> Result<(), TensorError> {
        let remap = |axis: usize| {
            axis_map
                .get(axis)
                .copied()
                .flatten()
                .ok_or(TensorError::CyclicOverbinding { tensor: from, axis })
        };
        let (first, second) = (self.i1 == from, self.i2 == from);
        for wire in &mut self.wires {
            if first {
                wire.0 = remap(wire.0)?;
            }
            if second {
                wire.1 = remap(wire.1)?;
            }
        }
        if first {
            self.i1 = to;
        }
        if second {
            self.i2 = to;
        }
        Ok(())
    }
}

/// Label assignment for a whole network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkLabels {
    /// One label per axis of each tensor; bonded axes share a label.
    pub per_tensor: Vec<Vec<Label>>,
    /// Labels of the result axes.
    pub output: Vec<Label>,
    /// `(tensor, axis)` of every result axis, in result order.
    pub free_axes: Vec<(usize, usize)>,
}

/// An ordered list of tensors plus an ordered list of bonds between them.
///
/// Every bonded axis exists, bonded axes have equal sizes, and no axis takes
/// part in more than one wire. These hold from construction on.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorNetwork<ElT: Scalar = c64> {
    tensors: Vec<Tensor<ElT>>,
    bonds: Vec<Bond>,
}

impl<ElT: Scalar> TensorNetwork<ElT> {
    /// Assemble a network, validating every bond.
    ///
    /// # Errors
    ///
    /// - `TensorIndexOutOfRange` if a bond names a tensor that is not in the list.
    /// - `AxisOutOfRange` if a wire names an axis past its tensor's rank.
    /// - `CyclicOverbinding` if an axis is used by more than one wire.
    /// - `DimensionMismatch` if a wire joins axes of different sizes.
    ///
    /// # Examples
    ///
    /// ```
    /// use tnval::{Bond, Tensor, TensorNetwork};
    ///
    /// let a: Tensor<f64> = Tensor::from_vec(vec![1.0, 2.0], &[2]).unwrap();
    /// let m: Tensor<f64> = Tensor::from_vec(vec![1.0, 0.0, 0.0, 1.0], &[2, 2]).unwrap();
    /// let tn = TensorNetwork::new(vec![a, m], vec![Bond::new(0, 1, vec![(0, 0)])]).unwrap();
    /// assert_eq!(tn.resolve().unwrap().data(), &[1.0, 2.0]);
    /// ```
    pub fn new(tensors: Vec<Tensor<ElT>>, bonds: Vec<Bond>) -> Result<Self, TensorError> {
        let count = tensors.len();
        let mut bound: Vec<Vec<bool>> = tensors.iter().map(|t| vec![false; t.ndim()]).collect();

        for (b, bond) in bonds.iter().enumerate() {
            for tensor in [bond.i1, bond.i2] {
                if tensor >= count {
                    return Err(TensorError::TensorIndexOutOfRange {
                        bond: b,
                        tensor,
                        count,
                    });
                }
            }
            let (shape1, shape2) = (tensors[bond.i1].shape(), tensors[bond.i2].shape());
            for &(w0, w1) in &bond.wires {
                for (tensor, axis) in [(bond.i1, w0), (bond.i2, w1)] {
                    let rank = bound[tensor].len();
                    if axis >= rank {
                        return Err(TensorError::AxisOutOfRange { axis, rank });
                    }
                    if bound[tensor][axis] {
                        return Err(TensorError::CyclicOverbinding { tensor, axis });
                    }
                    bound[tensor][axis] = true;
                }
                check_wire_dims((w0, w1), shape1[w0], shape2[w1])?;
            }
        }

        Ok(Self { tensors, bonds })
    }

    pub fn tensors(&self) -> &[Tensor<ElT>] {
        &self.tensors
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Compute the network-wide label assignment.
    pub fn labels(&self) -> NetworkLabels {
        let mut alloc = LabelAllocator::new();
        let mut per_tensor: Vec<Vec<Label>> =
            self.tensors.iter().map(|t| alloc.block(t.ndim())).collect();
        let mut bound: Vec<Vec<bool>> = self.tensors.iter().map(|t| vec![false; t.ndim()]).collect();

        for bond in &self.bonds {
            for &(w0, w1) in &bond.wires {
                per_tensor[bond.i2][w1] = per_tensor[bond.i1][w0];
                bound[bond.i1][w0] = true;
                bound[bond.i2][w1] = true;
            }
        }

        let free_axes: Vec<(usize, usize)> = bound
            .iter()
            .enumerate()
            .flat_map(|(t, b)| unbound(b).into_iter().map(move |axis| (t, axis)))
            .collect();
        let output = free_axes.iter().map(|&(t, axis)| per_tensor[t][axis]).collect();

        NetworkLabels {
            per_tensor,
            output,
            free_axes,
        }
    }

    /// Shape of the resolved tensor.
    pub fn result_shape(&self) -> Vec<usize> {
        self.labels()
            .free_axes
            .iter()
            .map(|&(t, axis)| self.tensors[t].shape()[axis])
            .collect()
    }

    /// Contract the whole network in one step.
    pub fn resolve(&self) -> Result<Tensor<ElT>, TensorError> {
        let labels = self.labels();
        debug!(
            "resolving network of {} tensors and {} bonds into rank {}",
            self.tensors.len(),
            self.bonds.len(),
            labels.output.len()
        );
        let operands: Vec<Operand<'_, ElT>> = self
            .tensors
            .iter()
            .zip(&labels.per_tensor)
            .map(|(t, l)| Operand::new(t, l))
            .collect();
        contract_labeled(&operands, &labels.output)
    }

    /// Resolve, then move one result axis as `reposition` describes.
    pub fn resolve_with(&self, reposition: &Reposition) -> Result<Tensor<ElT>, TensorError> {
        reposition.apply(&self.resolve()?)
    }

    /// Contract bond by bond in list order. See [`Self::contract_in_order`].
    pub fn contract_bonds(&self) -> Result<Tensor<ElT>, TensorError> {
        let order: Vec<usize> = (0..self.bonds.len()).collect();
        self.contract_in_order(&order)
    }

    /// Contract the network one bond at a time, visiting bonds in `order`.
    ///
    /// Each step contracts the two tensors a bond joins; consecutive bonds
    /// in `order` joining the same pair are contracted together. The merged
    /// tensor takes the place of the bond's first tensor, and the axes of
    /// the bonds still pending are renumbered onto it. A bond whose ends
    /// have been merged into one tensor is contracted as a trace. Tensors
    /// left unconnected at the end are combined by outer product in list
    /// order.
    ///
    /// The numbers agree with [`Self::resolve`]; the axis order agrees when
    /// bonds run left to right along a chain.
    ///
    /// # Errors
    ///
    /// `InvalidBondOrder` if `order` is not a permutation of the bond indices.
    pub fn contract_in_order(&self, order: &[usize]) -> Result<Tensor<ElT>, TensorError> {
        validate_order(order, self.bonds.len())?;

        let mut slots: Vec<Option<Tensor<ElT>>> = self.tensors.iter().cloned().map(Some).collect();
        let mut pending: Vec<Option<Bond>> = self.bonds.iter().cloned().map(Some).collect();
        let count = slots.len();

        let mut p = 0;
        while p < order.len() {
            let b = order[p];
            let mut bond = pending[b].take().ok_or_else(|| TensorError::InvalidBondOrder {
                order: order.to_vec(),
                count: self.bonds.len(),
            })?;
            p += 1;
            while let Some(next) = order.get(p).and_then(|&n| pending[n].as_ref()) {
                if !bond.joins_same_pair(next) {
                    break;
                }
                if let Some(next) = pending[order[p]].take() {
                    bond.absorb(next);
                }
                p += 1;
            }

            let missing = |tensor| TensorError::TensorIndexOutOfRange {
                bond: b,
                tensor,
                count,
            };
            let Bond { i1, i2, wires } = bond;
            debug!("contracting bond {b}: tensors {i1} and {i2} over {} wires", wires.len());

            if i1 == i2 {
                let t = slots[i1].take().ok_or_else(|| missing(i1))?;
                let traced = trace(&t, &wires)?;
                let mut bound = vec![false; t.ndim()];
                for &(x, y) in &wires {
                    bound[x] = true;
                    bound[y] = true;
                }
                let axis_map = positions(&unbound(&bound), t.ndim(), 0);
                slots[i1] = Some(traced);
                for bond in pending.iter_mut().flatten() {
                    bond.relocate(i1, i1, &axis_map)?;
                }
            } else {
                let left = slots[i1].take().ok_or_else(|| missing(i1))?;
                let right = slots[i2].take().ok_or_else(|| missing(i2))?;
                let m = match_wires(left.shape(), right.shape(), &wires)?;
                let merged = contract_labeled(
                    &[Operand::new(&left, &m.labels_a), Operand::new(&right, &m.labels_b)],
                    &m.output_labels(),
                )?;
                let map_a = positions(&m.free_a, left.ndim(), 0);
                let map_b = positions(&m.free_b, right.ndim(), m.free_a.len());
                slots[i1] = Some(merged);
                for bond in pending.iter_mut().flatten() {
                    bond.relocate(i1, i1, &map_a)?;
                    bond.relocate(i2, i1, &map_b)?;
                }
            }
        }

        let mut rest = slots.into_iter().flatten();
        let Some(mut result) = rest.next() else {
            return Ok(Tensor::scalar(ElT::one()));
        };
        for t in rest {
            let m = match_wires(result.shape(), t.shape(), &[])?;
            result = contract_labeled(
                &[Operand::new(&result, &m.labels_a), Operand::new(&t, &m.labels_b)],
                &m.output_labels(),
            )?;
        }
        Ok(result)
    }
}

/// New position of each axis of a rank-`rank` tensor after a contraction
/// that keeps `kept` (ascending) and places them from `offset` on.
fn positions(kept: &[usize], rank: usize, offset: usize) -> Vec<Option<usize>> {
    let mut map = vec![None; rank];
    for (k, &axis) in kept.iter().enumerate() {
        map[axis] = Some(offset + k);
    }
    map
}

fn validate_order(order: &[usize], count: usize) -> Result<(), TensorError> {
    let invalid = || TensorError::InvalidBondOrder {
        order: order.to_vec(),
        count,
    };
    if order.len() != count {
        return Err(invalid());
    }
    let mut seen = vec![false; count];
    for &b in order {
        if b >= count || seen[b] {
            return Err(invalid());
        }
        seen[b] = true;
    }
    Ok(())
}

/// Move result axis `from` so that it sits immediately after result axis
/// `after` (both positions taken before the move).
///
/// This is the positional convention for a distributed axis: an axis that is
/// kept out of the ordinary free-axis order and reinserted next to a chosen
/// anchor.
///
/// # Examples
///
/// ```
/// use tnval::{Reposition, Tensor};
///
/// let t: Tensor<f64> = Tensor::from_fn(&[2, 3, 4, 5], |_| 0.0).unwrap();
/// let moved = Reposition::new(3, 0).apply(&t).unwrap();
/// assert_eq!(moved.shape(), &[2, 5, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reposition {
    pub from: usize,
    pub after: usize,
}

impl Reposition {
    pub fn new(from: usize, after: usize) -> Self {
        Self { from, after }
    }

    /// Reposition result axis `from` after the first free axis of tensor 0.
    ///
    /// # Errors
    ///
    /// - `NoRetainedAxis` if tensor 0 has no free axis.
    /// - `AxisOutOfRange` if `from` is past the result rank.
    pub fn distributed<ElT: Scalar>(
        network: &TensorNetwork<ElT>,
        from: usize,
    ) -> Result<Self, TensorError> {
        let free = network.labels().free_axes;
        let after = free
            .iter()
            .position(|&(t, _)| t == 0)
            .ok_or(TensorError::NoRetainedAxis)?;
        if from >= free.len() {
            return Err(TensorError::AxisOutOfRange {
                axis: from,
                rank: free.len(),
            });
        }
        Ok(Self { from, after })
    }

    /// Index the moved axis ends up at.
    pub fn target(&self) -> usize {
        if self.from <= self.after {
            self.after
        } else {
            self.after + 1
        }
    }

    /// Apply the move to `t`.
    ///
    /// # Errors
    ///
    /// `AxisOutOfRange` if either position is past the rank of `t`.
    pub fn apply<ElT: Scalar>(&self, t: &Tensor<ElT>) -> Result<Tensor<ElT>, TensorError> {
        let rank = t.ndim();
        if self.after >= rank {
            return Err(TensorError::AxisOutOfRange {
                axis: self.after,
                rank,
            });
        }
        move_axis(t, self.from, self.target())
    }
}

/// A network validation case: a network and its resolved result.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkCase<ElT: Scalar = c64> {
    network: TensorNetwork<ElT>,
    result: Tensor<ElT>,
}

impl<ElT: Scalar> NetworkCase<ElT> {
    /// Resolve `network` and record the case.
    pub fn resolve(network: TensorNetwork<ElT>) -> Result<Self, TensorError> {
        let result = network.resolve()?;
        Ok(Self { network, result })
    }

    /// Resolve `network`, apply `reposition` and record the case.
    pub fn resolve_with(
        network: TensorNetwork<ElT>,
        reposition: &Reposition,
    ) -> Result<Self, TensorError> {
        let result = network.resolve_with(reposition)?;
        Ok(Self { network, result })
    }

    pub fn network(&self) -> &TensorNetwork<ElT> {
        &self.network
    }

    pub fn tensors(&self) -> &[Tensor<ElT>] {
        self.network.tensors()
    }

    pub fn bonds(&self) -> &[Bond] {
        self.network.bonds()
    }

    pub fn result(&self) -> &Tensor<ElT> {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::contract;
    use approx::assert_relative_eq;

    fn counting(shape: &[usize], start: f64) -> Tensor<f64> {
        let mut x = start;
        Tensor::from_fn(shape, |_| {
            x += 1.0;
            x
        })
        .unwrap()
    }

    fn assert_close(a: &Tensor<f64>, b: &Tensor<f64>) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.data().iter().zip(b.data()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_new_rejects_missing_tensor() {
        let t = counting(&[2], 0.0);
        assert_eq!(
            TensorNetwork::new(vec![t], vec![Bond::new(0, 1, vec![])]).unwrap_err(),
            TensorError::TensorIndexOutOfRange {
                bond: 0,
                tensor: 1,
                count: 1
            }
        );
    }

    #[test]
    fn test_new_rejects_overbinding() {
        let ts = vec![counting(&[2, 2], 0.0), counting(&[2], 0.0), counting(&[2], 0.0)];
        let bonds = vec![Bond::new(0, 1, vec![(0, 0)]), Bond::new(2, 0, vec![(0, 0)])];
        assert_eq!(
            TensorNetwork::new(ts, bonds).unwrap_err(),
            TensorError::CyclicOverbinding { tensor: 0, axis: 0 }
        );
    }

    #[test]
    fn test_new_rejects_bad_axis_and_size() {
        let ts = vec![counting(&[2, 3], 0.0), counting(&[2], 0.0)];
        assert_eq!(
            TensorNetwork::new(ts.clone(), vec![Bond::new(0, 1, vec![(2, 0)])]).unwrap_err(),
            TensorError::AxisOutOfRange { axis: 2, rank: 2 }
        );
        assert!(matches!(
            TensorNetwork::new(ts, vec![Bond::new(0, 1, vec![(1, 0)])]),
            Err(TensorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_two_tensor_network_matches_pairwise() {
        let a = counting(&[2, 3, 2], 0.0);
        let b = counting(&[2, 2, 3], 10.0);
        let wires = vec![(0, 1), (1, 2)];
        let tn = TensorNetwork::new(vec![a.clone(), b.clone()], vec![Bond::new(0, 1, wires.clone())])
            .unwrap();
        assert_close(&tn.resolve().unwrap(), &contract(&a, &b, &wires).unwrap());
    }

    #[test]
    fn test_labels_follow_tensor_then_local_order() {
        let ts = vec![counting(&[2, 3], 0.0), counting(&[3, 4], 0.0), counting(&[4, 5], 0.0)];
        let bonds = vec![Bond::new(0, 1, vec![(1, 0)]), Bond::new(1, 2, vec![(1, 0)])];
        let tn = TensorNetwork::new(ts, bonds).unwrap();
        let labels = tn.labels();
        assert_eq!(labels.per_tensor, vec![vec![0, 1], vec![1, 3], vec![3, 5]]);
        assert_eq!(labels.free_axes, vec![(0, 0), (2, 1)]);
        assert_eq!(labels.output, vec![0, 5]);
        assert_eq!(tn.result_shape(), vec![2, 5]);
    }

    #[test]
    fn test_self_trace_bond() {
        let t = counting(&[2, 3, 2], 0.0);
        let tn = TensorNetwork::new(vec![t.clone()], vec![Bond::new(0, 0, vec![(0, 2)])]).unwrap();
        let expected = trace(&t, &[(0, 2)]).unwrap();
        assert_close(&tn.resolve().unwrap(), &expected);
        assert_close(&tn.contract_bonds().unwrap(), &expected);
    }

    #[test]
    fn test_sequential_merges_parallel_bonds() {
        let a = counting(&[2, 3, 4], 0.0);
        let b = counting(&[4, 2], 0.0);
        let bonds = vec![Bond::new(0, 1, vec![(0, 1)]), Bond::new(1, 0, vec![(0, 2)])];
        let tn = TensorNetwork::new(vec![a, b], bonds).unwrap();
        let one_shot = tn.resolve().unwrap();
        assert_eq!(one_shot.shape(), &[3]);
        assert_close(&tn.contract_bonds().unwrap(), &one_shot);
    }

    #[test]
    fn test_sequential_cycle_closes_with_trace() {
        let ts = vec![counting(&[2, 3], 0.0), counting(&[3, 2], 0.5), counting(&[2, 2], -1.0)];
        let bonds = vec![
            Bond::new(0, 1, vec![(1, 0)]),
            Bond::new(1, 2, vec![(1, 0)]),
            Bond::new(2, 0, vec![(1, 0)]),
        ];
        let tn = TensorNetwork::new(ts, bonds).unwrap();
        let one_shot = tn.resolve().unwrap();
        assert_eq!(one_shot.ndim(), 0);
        for order in [[0, 1, 2], [2, 0, 1], [1, 2, 0]] {
            assert_close(&tn.contract_in_order(&order).unwrap(), &one_shot);
        }
    }

    #[test]
    fn test_disconnected_tensors_outer_product() {
        let a = counting(&[2], 0.0);
        let b = counting(&[3], 0.0);
        let tn = TensorNetwork::new(vec![a.clone(), b.clone()], vec![]).unwrap();
        let expected = contract(&a, &b, &[]).unwrap();
        assert_close(&tn.resolve().unwrap(), &expected);
        assert_close(&tn.contract_bonds().unwrap(), &expected);
    }

    #[test]
    fn test_invalid_bond_order() {
        let tn = TensorNetwork::new(
            vec![counting(&[2], 0.0), counting(&[2], 0.0)],
            vec![Bond::new(0, 1, vec![(0, 0)])],
        )
        .unwrap();
        assert!(matches!(
            tn.contract_in_order(&[1]),
            Err(TensorError::InvalidBondOrder { .. })
        ));
        assert!(matches!(
            tn.contract_in_order(&[]),
            Err(TensorError::InvalidBondOrder { .. })
        ));
    }

    #[test]
    fn test_reposition_target() {
        assert_eq!(Reposition::new(3, 0).target(), 1);
        assert_eq!(Reposition::new(0, 2).target(), 2);
        assert_eq!(Reposition::new(1, 1).target(), 1);
    }

    #[test]
    fn test_reposition_moves_values() {
        let t = counting(&[2, 3, 4], 0.0);
        let moved = Reposition::new(2, 0).apply(&t).unwrap();
        assert_eq!(moved.shape(), &[2, 4, 3]);
        assert_eq!(moved.get(&[1, 3, 2]), t.get(&[1, 2, 3]));
        assert!(Reposition::new(0, 3).apply(&t).is_err());
    }

    #[test]
    fn test_distributed_anchor() {
        let ts = vec![counting(&[2, 3], 0.0), counting(&[3, 4, 5], 0.0)];
        let tn = TensorNetwork::new(ts, vec![Bond::new(0, 1, vec![(1, 0)])]).unwrap();
        let rep = Reposition::distributed(&tn, 2).unwrap();
        assert_eq!(rep, Reposition::new(2, 0));
        assert_eq!(tn.resolve_with(&rep).unwrap().shape(), &[2, 5, 4]);
        assert!(Reposition::distributed(&tn, 3).is_err());
    }

    #[test]
    fn test_distributed_without_retained_axis() {
        let ts = vec![counting(&[3], 0.0), counting(&[3, 4], 0.0)];
        let tn = TensorNetwork::new(ts, vec![Bond::new(0, 1, vec![(0, 0)])]).unwrap();
        assert_eq!(
            Reposition::distributed(&tn, 0).unwrap_err(),
            TensorError::NoRetainedAxis
        );
    }

    #[test]
    fn test_network_case() {
        let ts = vec![counting(&[2, 2], 0.0), counting(&[2, 2], 4.0)];
        let tn = TensorNetwork::new(ts, vec![Bond::new(0, 1, vec![(0, 1)])]).unwrap();
        let expected = tn.resolve().unwrap();
        let case = NetworkCase::resolve(tn).unwrap();
        assert_eq!(case.result(), &expected);
        assert_eq!(case.tensors().len(), 2);
        assert_eq!(case.bonds()[0].wires, vec![(0, 1)]);
    }
}
