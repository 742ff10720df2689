//! Sealed ballot storage trait.

use crate::StoreError;
use plenum_types::{ActorAddress, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// A stored sealed ballot.
///
/// The payload is opaque to the store; only the tally, holding the matching
/// beacon round signature, can open it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BallotRecord {
    pub proposal: ProposalId,
    pub voter: ActorAddress,
    pub sealed: Vec<u8>,
    pub submitted_at: Timestamp,
}

/// Trait for ballot storage.
pub trait BallotStore {
    /// Insert a ballot. Atomic insert-if-absent: fails with `Duplicate` if
    /// this voter already has a ballot on the proposal.
    fn put_ballot(&self, record: BallotRecord) -> Result<(), StoreError>;

    fn has_ballot(&self, id: ProposalId, voter: &ActorAddress) -> Result<bool, StoreError>;

    /// All ballots for a proposal, ordered by voter address.
    fn ballots_for(&self, id: ProposalId) -> Result<Vec<BallotRecord>, StoreError>;

    fn ballot_count(&self, id: ProposalId) -> Result<u64, StoreError>;
}
