//! Content proposal ledger for the plenum governance core.
//!
//! Approved editors open proposals with a future voting window and a
//! role-weight distribution; anyone may submit exactly one sealed ballot per
//! proposal while the window is open. Ballots stay opaque until the
//! proposal's beacon reveal round is published, so no running tally can leak
//! before voting closes.

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::{ProposalLedger, ProposalParams, CONTENT_MAX, TITLE_MAX};
