//! Plenum governance node — composes the protocol engines.
//!
//! The node wires one store and one event log under:
//! - the membership registry and engine (editor admission / revocation),
//! - the proposal ledger (windows, sealed ballots, cancellation),
//! - the tally engine (timelock reveal and role-weighted counting).
//!
//! Configuration comes from TOML ([`NodeConfig`]); the clock, voting-power
//! oracle, and beacon round source are injected at construction.

pub mod config;
pub mod error;
pub mod logging;
pub mod node;

pub use config::{BeaconConfig, NodeConfig};
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use node::GovernanceNode;
