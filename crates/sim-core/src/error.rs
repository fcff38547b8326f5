//! Error types shared across the workspace boundary.

use thiserror::Error;

/// Errors raised while decoding or constructing a [`crate::distribution::Distribution`].
#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    /// The JSON `"type"` tag did not match one of the six known variants.
    #[error("unknown distribution type: {0}")]
    UnknownType(String),

    /// The tag was recognized but `params` did not decode into that variant.
    #[error("malformed distribution params: {0}")]
    Malformed(String),
}
