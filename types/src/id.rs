//! Arena-style identifiers for proposals.
//!
//! Identifiers are assigned by the stores as dense `u64` sequences starting at 1.
//! They are opaque handles: nothing is derived from their numeric value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a content proposal in the proposal ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProposalId(pub u64);

impl fmt::Display for ProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of an editor membership proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EditorProposalId(pub u64);

impl fmt::Display for EditorProposalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
