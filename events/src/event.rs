//! Events emitted by the governance engines for subscribers.

use plenum_types::{
    ActorAddress, EditorAction, EditorProposalId, ProposalId, ProposalOutcome, Timestamp,
};
use serde::{Deserialize, Serialize};

/// Governance-level events that observers can subscribe to via the
/// [`EventLog`](crate::EventLog).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    /// The genesis editor was written into an empty registry.
    EditorSeeded {
        address: ActorAddress,
    },
    /// A membership proposal was opened.
    EditorProposalCreated {
        id: EditorProposalId,
        candidate: ActorAddress,
        action: EditorAction,
        creator: ActorAddress,
    },
    /// An editor cast a supporting vote on a membership proposal.
    EditorVoteCast {
        id: EditorProposalId,
        voter: ActorAddress,
        /// Explicit vote count after this vote.
        votes: u32,
    },
    /// A membership proposal passed and the candidate joined the committee.
    EditorApproved {
        id: EditorProposalId,
        candidate: ActorAddress,
    },
    /// A membership proposal passed and the candidate left the committee.
    EditorRevoked {
        id: EditorProposalId,
        candidate: ActorAddress,
    },
    /// A content proposal was opened.
    ProposalCreated {
        id: ProposalId,
        creator: ActorAddress,
        start_time: Timestamp,
        end_time: Timestamp,
        snapshot_day: u64,
        reveal_round: u64,
    },
    /// A sealed ballot was accepted.
    BallotSubmitted {
        id: ProposalId,
        voter: ActorAddress,
    },
    /// A content proposal was withdrawn before its window opened.
    ProposalCancelled {
        id: ProposalId,
    },
    /// A content proposal was tallied and its result committed.
    ProposalCounted {
        id: ProposalId,
        approve_bps: u32,
        reject_bps: u32,
        outcome: ProposalOutcome,
    },
}

/// One entry in the event log.
///
/// `digest` commits to the previous record's digest, the sequence number, and
/// the serialized event, forming a hash chain from the first record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub digest: [u8; 32],
    pub event: GovernanceEvent,
}
