//! Vote counting for the plenum governance core.
//!
//! Once a proposal's window has closed and its beacon round is published, the
//! tally opens every sealed ballot, weighs the revealed choices by per-role
//! power snapshots, and folds them into a final approve/reject split in basis
//! points. The fold is pure integer arithmetic over fixed inputs, so any two
//! parties counting the same proposal arrive at the same bytes.

pub mod engine;
pub mod error;
pub mod power;

pub use engine::{RoleTally, TallyEngine, TallyOutcome};
pub use error::TallyError;
pub use power::PowerOracle;
