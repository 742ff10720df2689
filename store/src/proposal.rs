//! Content proposal storage trait.

use crate::StoreError;
use plenum_types::{
    ActorAddress, ProposalId, ProposalPhase, RolePercentages, TallyResult, Timestamp,
};
use serde::{Deserialize, Serialize};

/// A stored content proposal.
///
/// Everything except `cancelled` and `result` is immutable after creation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub id: ProposalId,
    pub creator: ActorAddress,
    /// Voting window, half-open: ballots are accepted while
    /// `start_time <= now < end_time`.
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub percentages: RolePercentages,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    /// UTC day whose power snapshot the tally reads.
    pub snapshot_day: u64,
    /// Beacon round whose signature unseals the ballots.
    pub reveal_round: u64,
    pub cancelled: bool,
    /// Committed tally, set exactly once after the window closes.
    pub result: Option<TallyResult>,
}

impl ProposalRecord {
    /// Derive the lifecycle phase at `now`.
    ///
    /// Cancellation and a committed result dominate; otherwise the phase is a
    /// pure function of the voting window.
    pub fn phase(&self, now: Timestamp) -> ProposalPhase {
        if self.cancelled {
            return ProposalPhase::Cancelled;
        }
        if let Some(result) = &self.result {
            return ProposalPhase::Completed(result.outcome);
        }
        if now < self.start_time {
            ProposalPhase::Pending
        } else if now < self.end_time {
            ProposalPhase::InProgress
        } else {
            ProposalPhase::VoteCounting
        }
    }
}

/// Creation parameters; the store assigns the id.
#[derive(Clone, Debug)]
pub struct NewProposal {
    pub creator: ActorAddress,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub percentages: RolePercentages,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub snapshot_day: u64,
    pub reveal_round: u64,
}

/// Trait for content proposal storage.
pub trait ProposalStore {
    /// Insert a new proposal, assigning the next id in the arena.
    fn insert_proposal(&self, new: NewProposal) -> Result<ProposalId, StoreError>;

    fn proposal(&self, id: ProposalId) -> Result<ProposalRecord, StoreError>;

    /// Flag a proposal cancelled. Fails with `Duplicate` if already cancelled.
    fn cancel_proposal(&self, id: ProposalId) -> Result<(), StoreError>;

    /// Commit the tally result. Exactly-once: fails with `Duplicate` if a
    /// result is already stored, which makes concurrent tallies race-safe.
    fn commit_result(&self, id: ProposalId, result: TallyResult) -> Result<(), StoreError>;

    /// All proposals, ordered by id.
    fn proposals(&self) -> Result<Vec<ProposalRecord>, StoreError>;

    fn proposal_count(&self) -> Result<u64, StoreError>;
}
