//! Event log and read-model projection for the Plenum governance core.
//!
//! Every state change in the engines appends one event to the [`EventLog`].
//! Records form a Blake2b hash chain, so a copied log can be checked for
//! truncation or tampering, and [`replay`] folds a log back into a
//! [`ReadModel`] for indexers. The log is a projection for observers; the
//! stores remain the source of truth.

pub mod event;
pub mod log;
pub mod read_model;

pub use event::{EventRecord, GovernanceEvent};
pub use log::{verify_chain, ChainViolation, EventLog};
pub use read_model::{replay, EditorProposalView, ProposalView, ReadModel, ViewStatus};
