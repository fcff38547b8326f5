//! Driver/runtime error type.

use thiserror::Error;

use sim_core::DistributionError;

#[derive(Debug, Error)]
pub enum RunError {
    /// Out-of-range parameter that sanitization could not clamp, or
    /// `iterations == 0`.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A distribution JSON tag inside the config's NGC could not be
    /// resolved.
    #[error(transparent)]
    UnknownDistribution(#[from] DistributionError),
}
