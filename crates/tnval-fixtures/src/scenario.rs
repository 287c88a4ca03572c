//! Seeded scenario builders.
//!
//! Shapes, wires and values are drawn here and handed to the core as plain
//! tensors and wire lists. Every case family draws from one RNG in a fixed
//! order, so a seed fully determines the generated headers.

use log::debug;
use rand::Rng;
use rand::seq::index;
use tnval::{
    Bond, Contraction, NetworkCase, Reposition, Scalar, Tensor, TensorNetwork, Wire, c64,
    embed_axes, swap,
};

use crate::emit::{Group, HeaderFile};
use crate::error::FixtureError;
use crate::plan::Plan;

/// Scalars that can be drawn from a fixed decimal grid.
pub trait RandomDecimal: Scalar {
    /// Sample uniformly from `{-1, -1 + 10^-d, ..., 1 - 10^-d}`.
    fn sample_decimal<R: Rng>(rng: &mut R, decimals: u32) -> Self;
}

impl RandomDecimal for f64 {
    fn sample_decimal<R: Rng>(rng: &mut R, decimals: u32) -> Self {
        let scale = 10i64.pow(decimals);
        (rng.random_range(0..2 * scale) - scale) as f64 / scale as f64
    }
}

impl RandomDecimal for c64 {
    fn sample_decimal<R: Rng>(rng: &mut R, decimals: u32) -> Self {
        c64::new(
            f64::sample_decimal(rng, decimals),
            f64::sample_decimal(rng, decimals),
        )
    }
}

/// A tensor of shape `dims` with elements on the decimal grid.
pub fn random_tensor<ElT: RandomDecimal, R: Rng>(
    rng: &mut R,
    dims: &[usize],
    decimals: u32,
) -> Result<Tensor<ElT>, FixtureError> {
    Ok(Tensor::from_fn(dims, |_| ElT::sample_decimal(rng, decimals))?)
}

/// A shape of rank in `min_rank..max_rank` with sizes drawn from `allowed`.
pub fn random_dims<R: Rng>(
    rng: &mut R,
    min_rank: usize,
    max_rank: usize,
    allowed: &[usize],
) -> Result<Vec<usize>, FixtureError> {
    if min_rank >= max_rank {
        return Err(FixtureError::invalid_plan(format!(
            "no rank in {min_rank}..{max_rank}"
        )));
    }
    if allowed.is_empty() {
        return Err(FixtureError::invalid_plan("no allowed dimension sizes"));
    }
    let rank = rng.random_range(min_rank..max_rank);
    Ok((0..rank)
        .map(|_| allowed[rng.random_range(0..allowed.len())])
        .collect())
}

/// `n` wires between distinct random axes of a rank-`rank1` and a
/// rank-`rank2` tensor.
pub fn random_wires<R: Rng>(
    rng: &mut R,
    rank1: usize,
    rank2: usize,
    n: usize,
) -> Result<Vec<Wire>, FixtureError> {
    if n > rank1 || n > rank2 {
        return Err(FixtureError::invalid_plan(format!(
            "{n} wires between tensors of rank {rank1} and {rank2}"
        )));
    }
    let first = index::sample(rng, rank1, n).into_vec();
    let second = index::sample(rng, rank2, n).into_vec();
    Ok(first.into_iter().zip(second).collect())
}

/// Resize the first shape so that every wire joins equal sizes.
pub fn make_compatible(dims1: &mut [usize], dims2: &[usize], wires: &[Wire]) {
    for &(i1, i2) in wires {
        dims1[i1] = dims2[i2];
    }
}

/// Builds every case family of a [`Plan`] from one RNG.
#[derive(Debug)]
pub struct Scenarios<'a, R> {
    plan: &'a Plan,
    rng: R,
}

impl<'a, R: Rng> Scenarios<'a, R> {
    pub fn new(plan: &'a Plan, rng: R) -> Self {
        Self { plan, rng }
    }

    fn dims(&mut self, min_rank: usize) -> Result<Vec<usize>, FixtureError> {
        let min_rank = min_rank.max(self.plan.min_rank);
        random_dims(&mut self.rng, min_rank, self.plan.max_rank, &self.plan.allowed_dims)
    }

    fn tensor(&mut self, dims: &[usize]) -> Result<Tensor, FixtureError> {
        random_tensor(&mut self.rng, dims, self.plan.decimals)
    }

    /// Two random 2x2 tensors contracted as `einsum("ij,ki->jk")`.
    pub fn einsum_example(&mut self) -> Result<Contraction, FixtureError> {
        let t1 = self.tensor(&[2, 2])?;
        let t2 = self.tensor(&[2, 2])?;
        Ok(Contraction::new(t1, t2, vec![(0, 1)])?)
    }

    /// A random pairwise contraction with a random number of wires.
    pub fn dense(&mut self) -> Result<Contraction, FixtureError> {
        let mut dims1 = self.dims(1)?;
        let dims2 = self.dims(1)?;
        let n = self.rng.random_range(0..=dims1.len().min(dims2.len()));
        let wires = random_wires(&mut self.rng, dims1.len(), dims2.len(), n)?;
        make_compatible(&mut dims1, &dims2, &wires);
        debug!("dense case {dims1:?} x {dims2:?} over {wires:?}");

        let t1 = self.tensor(&dims1)?;
        let t2 = self.tensor(&dims2)?;
        Ok(Contraction::new(t1, t2, wires)?)
    }

    /// A swap of two random axes.
    pub fn swap(&mut self) -> Result<Contraction, FixtureError> {
        let dims = self.dims(2)?;
        let axes = index::sample(&mut self.rng, dims.len(), 2).into_vec();
        let t = self.tensor(&dims)?;
        Ok(swap(&t, axes[0], axes[1])?)
    }

    /// An identity embedding over a random non-empty axis subset.
    pub fn identity(&mut self) -> Result<Contraction, FixtureError> {
        let dims = self.dims(1)?;
        let n = self.rng.random_range(1..=dims.len());
        let axes = index::sample(&mut self.rng, dims.len(), n).into_vec();
        let t = self.tensor(&dims)?;
        Ok(embed_axes(&t, &axes)?)
    }

    /// Two tensors joined by one bond of `nwires` wires.
    pub fn pair_network(&mut self, nwires: usize) -> Result<NetworkCase, FixtureError> {
        let min_rank = (nwires + 1).max(self.plan.min_rank);
        let max_rank = self.plan.max_rank.max(min_rank + 1);
        let allowed = &self.plan.allowed_dims;
        let mut dims1 = random_dims(&mut self.rng, min_rank, max_rank, allowed)?;
        let dims2 = random_dims(&mut self.rng, min_rank, max_rank, allowed)?;
        let wires = random_wires(&mut self.rng, dims1.len(), dims2.len(), nwires)?;
        make_compatible(&mut dims1, &dims2, &wires);

        let tensors = vec![self.tensor(&dims1)?, self.tensor(&dims2)?];
        let network = TensorNetwork::new(tensors, vec![Bond::new(0, 1, wires)])?;
        Ok(NetworkCase::resolve(network)?)
    }

    /// `length` tensors bonded left to right by single wires.
    pub fn chain(&mut self, length: usize) -> Result<NetworkCase, FixtureError> {
        if length < 2 {
            return Err(FixtureError::invalid_plan("a chain needs two tensors"));
        }
        let mut dims = Vec::with_capacity(length);
        let mut ports = Vec::with_capacity(length);
        for k in 0..length {
            let (has_in, has_out) = (k > 0, k + 1 < length);
            let need = usize::from(has_in) + usize::from(has_out);
            let d = self.dims(need)?;
            let mut picked = index::sample(&mut self.rng, d.len(), need).into_vec().into_iter();
            let incoming = if has_in { picked.next() } else { None };
            let outgoing = if has_out { picked.next() } else { None };
            ports.push((incoming, outgoing));
            dims.push(d);
        }

        let bonds = (0..length - 1)
            .map(|k| match (ports[k].1, ports[k + 1].0) {
                (Some(out), Some(inc)) => Ok(Bond::new(k, k + 1, vec![(out, inc)])),
                _ => Err(FixtureError::invalid_plan("chain link without a free axis")),
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.network(dims, bonds)
    }

    /// Four tensors bonded in a ring.
    pub fn cycle(&mut self) -> Result<NetworkCase, FixtureError> {
        const RING: usize = 4;
        let mut dims = Vec::with_capacity(RING);
        let mut ports = Vec::with_capacity(RING);
        for _ in 0..RING {
            let d = self.dims(2)?;
            let picked = index::sample(&mut self.rng, d.len(), 2).into_vec();
            ports.push((picked[0], picked[1]));
            dims.push(d);
        }
        let bonds = (0..RING)
            .map(|k| Bond::new(k, (k + 1) % RING, vec![(ports[k].1, ports[(k + 1) % RING].0)]))
            .collect();
        self.network(dims, bonds)
    }

    /// Two bonded tensors plus a lone vector carrying the distributed axis.
    ///
    /// The vector's axis is the last axis of the plain result. It is moved to
    /// sit right after the first free axis of tensor 0.
    pub fn distributed(&mut self) -> Result<NetworkCase, FixtureError> {
        let dims1 = self.dims(2)?;
        let dims2 = self.dims(1)?;
        let wires = random_wires(&mut self.rng, dims1.len(), dims2.len(), 1)?;
        let spread = random_dims(&mut self.rng, 1, 2, &self.plan.allowed_dims)?;

        let network = self.assemble(vec![dims1, dims2, spread], vec![Bond::new(0, 1, wires)])?;
        let from = network.result_shape().len() - 1;
        let reposition = Reposition::distributed(&network, from)?;
        debug!("distributed axis {from} lands at {}", reposition.target());
        Ok(NetworkCase::resolve_with(network, &reposition)?)
    }

    fn network(
        &mut self,
        dims: Vec<Vec<usize>>,
        bonds: Vec<Bond>,
    ) -> Result<NetworkCase, FixtureError> {
        let network = self.assemble(dims, bonds)?;
        Ok(NetworkCase::resolve(network)?)
    }

    fn assemble(
        &mut self,
        mut dims: Vec<Vec<usize>>,
        bonds: Vec<Bond>,
    ) -> Result<TensorNetwork, FixtureError> {
        for bond in &bonds {
            let other = dims[bond.i2].clone();
            make_compatible(&mut dims[bond.i1], &other, &bond.wires);
        }
        debug!("network {dims:?} with {} bonds", bonds.len());
        let tensors = dims
            .iter()
            .map(|d| self.tensor(d))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TensorNetwork::new(tensors, bonds)?)
    }

    /// The pairwise header: `cvs`, `swap_vals`, `id_vals`.
    pub fn tensor_file(&mut self) -> Result<HeaderFile<Contraction>, FixtureError> {
        let plan = self.plan;
        let section = &plan.tensors;
        let mut file = HeaderFile::new(section.file.clone());

        let mut cvs = vec![self.einsum_example()?];
        for _ in 0..section.dense {
            cvs.push(self.dense()?);
        }
        file.push_group(Group::new("cvs", cvs));

        if section.swaps > 0 {
            let cases: Vec<_> = (0..section.swaps).map(|_| self.swap()).collect::<Result<_, _>>()?;
            file.push_group(Group::new("swap_vals", cases));
        }
        if section.identities > 0 {
            let cases: Vec<_> = (0..section.identities)
                .map(|_| self.identity())
                .collect::<Result<_, _>>()?;
            file.push_group(Group::new("id_vals", cases));
        }
        Ok(file)
    }

    /// The network header: `tn2_vals`, `tn_chain_vals`, `tn_cycle_vals`,
    /// `tn_dist_vals`.
    pub fn network_file(&mut self) -> Result<HeaderFile<NetworkCase>, FixtureError> {
        let plan = self.plan;
        let section = &plan.networks;
        let mut file = HeaderFile::new(section.file.clone());

        if section.pairs > 0 {
            let cases: Vec<_> = (0..section.pairs)
                .map(|i| self.pair_network(i % 4))
                .collect::<Result<_, _>>()?;
            file.push_group(Group::new("tn2_vals", cases));
        }
        if section.chains > 0 {
            let cases: Vec<_> = (0..section.chains)
                .map(|_| self.chain(section.chain_length))
                .collect::<Result<_, _>>()?;
            file.push_group(Group::new("tn_chain_vals", cases));
        }
        if section.cycles > 0 {
            let cases: Vec<_> = (0..section.cycles).map(|_| self.cycle()).collect::<Result<_, _>>()?;
            file.push_group(Group::new("tn_cycle_vals", cases));
        }
        if section.distributed > 0 {
            let cases: Vec<_> = (0..section.distributed)
                .map(|_| self.distributed())
                .collect::<Result<_, _>>()?;
            file.push_group(Group::new("tn_dist_vals", cases));
        }
        Ok(file)
    }
}
