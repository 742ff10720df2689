//! Validation errors for the core types.

use thiserror::Error;

use crate::role::Role;

/// Errors from constructing core types out of untrusted input.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid actor address: {0}")]
    InvalidAddress(String),

    #[error("percentage for {role} out of range: {bps} bps (maximum 10000)")]
    PercentageOutOfRange { role: Role, bps: u16 },

    #[error("role percentages sum to {sum} bps, expected exactly 10000")]
    PercentageSumMismatch { sum: u32 },
}
