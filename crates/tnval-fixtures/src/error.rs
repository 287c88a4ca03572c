//! Error types for fixture generation.

use thiserror::Error;
use tnval::TensorError;

/// Errors raised while planning, building or writing fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A case could not be built by the core.
    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The plan file is not valid TOML or does not match the plan layout.
    #[error("cannot parse plan: {0}")]
    Toml(#[from] toml::de::Error),

    /// Scenario parameters that cannot produce a case.
    #[error("invalid plan: {reason}")]
    InvalidPlan { reason: String },
}

impl FixtureError {
    pub(crate) fn invalid_plan(reason: impl Into<String>) -> Self {
        Self::InvalidPlan {
            reason: reason.into(),
        }
    }
}
