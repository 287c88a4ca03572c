//! Generation plan: which case families to build and with what parameters.
//!
//! Every field has a default, so an empty TOML document is the built-in
//! plan. A plan file only needs the values it changes:
//!
//! ```toml
//! allowed_dims = [2, 3]
//!
//! [tensors]
//! dense = 8
//!
//! [networks]
//! cycles = 0
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::FixtureError;

/// Parameters shared by all case families plus the per-file sections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Plan {
    /// Axis sizes to draw from.
    pub allowed_dims: Vec<usize>,
    /// Decimal places of the random element grid (`1` gives steps of 0.1).
    pub decimals: u32,
    /// Smallest tensor rank drawn, inclusive.
    pub min_rank: usize,
    /// Largest tensor rank drawn, exclusive.
    pub max_rank: usize,
    pub tensors: TensorPlan,
    pub networks: NetworkPlan,
}

/// Pairwise cases, written to one header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TensorPlan {
    pub file: String,
    /// Random pairwise contractions appended to the fixed einsum case.
    pub dense: usize,
    pub swaps: usize,
    pub identities: usize,
}

/// Network cases, written to one header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkPlan {
    pub file: String,
    /// Two-tensor networks; network `i` carries `i % 4` wires.
    pub pairs: usize,
    pub chains: usize,
    /// Tensors per chain.
    pub chain_length: usize,
    /// Four-tensor rings.
    pub cycles: usize,
    /// Networks whose last result axis is distributed behind tensor 0's
    /// first free axis.
    pub distributed: usize,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            allowed_dims: vec![2],
            decimals: 1,
            min_rank: 1,
            max_rank: 5,
            tensors: TensorPlan::default(),
            networks: NetworkPlan::default(),
        }
    }
}

impl Default for TensorPlan {
    fn default() -> Self {
        Self {
            file: "random-tensors.hpp".into(),
            dense: 4,
            swaps: 4,
            identities: 4,
        }
    }
}

impl Default for NetworkPlan {
    fn default() -> Self {
        Self {
            file: "random-tn.hpp".into(),
            pairs: 5,
            chains: 3,
            chain_length: 3,
            cycles: 2,
            distributed: 2,
        }
    }
}

impl Plan {
    /// Parse and validate a plan from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, FixtureError> {
        let plan: Plan = toml::from_str(text)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Read, parse and validate a plan file.
    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject parameters no case family can satisfy.
    ///
    /// # Errors
    ///
    /// `FixtureError::InvalidPlan` naming the offending field.
    pub fn validate(&self) -> Result<(), FixtureError> {
        if self.allowed_dims.is_empty() {
            return Err(FixtureError::invalid_plan("allowed_dims is empty"));
        }
        if self.allowed_dims.contains(&0) {
            return Err(FixtureError::invalid_plan("allowed_dims contains 0"));
        }
        if self.min_rank == 0 || self.min_rank >= self.max_rank {
            return Err(FixtureError::invalid_plan(format!(
                "rank range {}..{} is empty or starts at 0",
                self.min_rank, self.max_rank
            )));
        }
        if self.decimals > 6 {
            return Err(FixtureError::invalid_plan("decimals must be at most 6"));
        }
        let needs_rank_two = self.tensors.swaps > 0
            || self.networks.cycles > 0
            || self.networks.distributed > 0
            || self.networks.chain_length > 2;
        if needs_rank_two && self.max_rank <= 2 {
            return Err(FixtureError::invalid_plan(
                "swaps, cycles, distributed networks and long chains need max_rank above 2",
            ));
        }
        if self.networks.chains > 0 && self.networks.chain_length < 2 {
            return Err(FixtureError::invalid_plan("chain_length must be at least 2"));
        }
        for file in [&self.tensors.file, &self.networks.file] {
            if file.is_empty() || file.contains(['/', '\\']) {
                return Err(FixtureError::invalid_plan(format!(
                    "{file:?} is not a plain file name"
                )));
            }
        }
        Ok(())
    }
}
