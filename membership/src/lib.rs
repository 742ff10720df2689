//! Editor committee membership for the plenum governance core.
//!
//! Admission to and removal from the committee is itself governed: an
//! approved editor proposes a candidate, the other editors vote, and the
//! proposal resolves the instant strictly more than half of the committee
//! backs it (the creator's vote is implicit). Revocation can never shrink
//! the committee below two editors.

pub mod engine;
pub mod error;
pub mod registry;

pub use engine::{MembershipEngine, VoteEffect, CANDIDATE_INFO_MAX};
pub use error::MembershipError;
pub use registry::MembershipRegistry;
