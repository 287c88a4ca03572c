//! Seeded fixture generation on top of [`tnval`].
//!
//! A [`Plan`] names the case families to build, a seed fixes every random
//! draw, and [`generate`] returns the two headers the downstream harness
//! includes:
//!
//! ```text
//! random-tensors.hpp   cvs, swap_vals, id_vals
//! random-tn.hpp        tn2_vals, tn_chain_vals, tn_cycle_vals
//! ```
//!
//! # Example
//!
//! ```
//! use tnval_fixtures::{Plan, generate};
//!
//! let fixtures = generate(&Plan::default(), 9457).unwrap();
//! assert_eq!(fixtures.tensors.file_name(), "random-tensors.hpp");
//! assert!(fixtures.networks.to_text().unwrap().contains("tn_cycle_vals"));
//! ```

pub mod emit;
pub mod error;
pub mod format;
pub mod plan;
pub mod scenario;

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tnval::{Contraction, NetworkCase};

pub use emit::{FixtureCase, Group, HeaderFile};
pub use error::FixtureError;
pub use plan::{NetworkPlan, Plan, TensorPlan};
pub use scenario::Scenarios;

/// The generated headers of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixtures {
    pub tensors: HeaderFile<Contraction>,
    pub networks: HeaderFile<NetworkCase>,
}

/// Build every case family of `plan` from a generator seeded with `seed`.
///
/// The pairwise header is drawn first, then the network header, so the same
/// plan and seed always give the same text.
pub fn generate(plan: &Plan, seed: u64) -> Result<Fixtures, FixtureError> {
    plan.validate()?;
    info!("generating fixtures with seed {seed}");
    let mut scenarios = Scenarios::new(plan, StdRng::seed_from_u64(seed));
    let tensors = scenarios.tensor_file()?;
    let networks = scenarios.network_file()?;
    info!(
        "built {} pairwise and {} network cases",
        tensors.case_count(),
        networks.case_count()
    );
    Ok(Fixtures { tensors, networks })
}

impl Fixtures {
    /// Write both headers into `dir` and return their paths.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>, FixtureError> {
        Ok(vec![self.tensors.write_to(dir)?, self.networks.write_to(dir)?])
    }

    /// Render both headers one after the other, each preceded by its file name
    /// as a comment line.
    pub fn render_all<W: Write>(&self, out: &mut W) -> Result<(), FixtureError> {
        writeln!(out, "// {}", self.tensors.file_name())?;
        self.tensors.render(out)?;
        writeln!(out)?;
        writeln!(out, "// {}", self.networks.file_name())?;
        self.networks.render(out)?;
        Ok(())
    }
}
