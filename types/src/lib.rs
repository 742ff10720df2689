//! Fundamental types for the Plenum governance core.
//!
//! Everything the other workspace crates agree on lives here: addresses,
//! identifiers, timestamps, editor and proposal states, voting roles, and
//! power snapshots.

pub mod address;
pub mod error;
pub mod id;
pub mod power;
pub mod role;
pub mod state;
pub mod time;

pub use address::ActorAddress;
pub use error::TypeError;
pub use id::{EditorProposalId, ProposalId};
pub use power::PowerSnapshot;
pub use role::{Role, RolePercentages, TOTAL_BPS};
pub use state::{EditorAction, EditorStatus, ProposalOutcome, ProposalPhase, TallyResult, VoteOption};
pub use time::{Clock, SystemClock, Timestamp, SECS_PER_DAY};
