//! Deterministic fold of an event log into queryable state.

use plenum_types::{
    ActorAddress, EditorAction, EditorStatus, TallyResult, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::event::{EventRecord, GovernanceEvent};

/// Indexer view of one membership proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorProposalView {
    pub candidate: ActorAddress,
    pub action: EditorAction,
    pub creator: ActorAddress,
    /// Explicit votes observed so far (creator's implicit vote excluded).
    pub votes: u32,
    pub resolved: bool,
}

/// Indexer view of one content proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalView {
    pub creator: ActorAddress,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub snapshot_day: u64,
    pub reveal_round: u64,
    pub ballots: u64,
    pub status: ViewStatus,
}

/// Where a content proposal stands, as far as the log shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewStatus {
    Open,
    Cancelled,
    Counted(TallyResult),
}

/// State reconstructed by folding governance events in order.
///
/// Replaying the same records always yields the same model; the maps are
/// ordered so serialized output is stable too.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadModel {
    pub editors: BTreeMap<ActorAddress, EditorStatus>,
    pub editor_proposals: BTreeMap<u64, EditorProposalView>,
    pub proposals: BTreeMap<u64, ProposalView>,
}

impl ReadModel {
    /// Fold one event into the model.
    ///
    /// Unknown ids are ignored rather than invented: a log that starts after
    /// genesis simply yields a partial view.
    pub fn apply(&mut self, event: &GovernanceEvent) {
        match event {
            GovernanceEvent::EditorSeeded { address } => {
                self.editors.insert(address.clone(), EditorStatus::Approved);
            }
            GovernanceEvent::EditorProposalCreated {
                id,
                candidate,
                action,
                creator,
            } => {
                let pending = match action {
                    EditorAction::Approve => EditorStatus::Adding,
                    EditorAction::Revoke => EditorStatus::Revoking,
                };
                self.editors.insert(candidate.clone(), pending);
                self.editor_proposals.insert(
                    id.0,
                    EditorProposalView {
                        candidate: candidate.clone(),
                        action: *action,
                        creator: creator.clone(),
                        votes: 0,
                        resolved: false,
                    },
                );
            }
            GovernanceEvent::EditorVoteCast { id, votes, .. } => {
                if let Some(view) = self.editor_proposals.get_mut(&id.0) {
                    view.votes = *votes;
                }
            }
            GovernanceEvent::EditorApproved { id, candidate } => {
                self.editors
                    .insert(candidate.clone(), EditorStatus::Approved);
                if let Some(view) = self.editor_proposals.get_mut(&id.0) {
                    view.resolved = true;
                }
            }
            GovernanceEvent::EditorRevoked { id, candidate } => {
                self.editors
                    .insert(candidate.clone(), EditorStatus::Revoked);
                if let Some(view) = self.editor_proposals.get_mut(&id.0) {
                    view.resolved = true;
                }
            }
            GovernanceEvent::ProposalCreated {
                id,
                creator,
                start_time,
                end_time,
                snapshot_day,
                reveal_round,
            } => {
                self.proposals.insert(
                    id.0,
                    ProposalView {
                        creator: creator.clone(),
                        start_time: *start_time,
                        end_time: *end_time,
                        snapshot_day: *snapshot_day,
                        reveal_round: *reveal_round,
                        ballots: 0,
                        status: ViewStatus::Open,
                    },
                );
            }
            GovernanceEvent::BallotSubmitted { id, .. } => {
                if let Some(view) = self.proposals.get_mut(&id.0) {
                    view.ballots += 1;
                }
            }
            GovernanceEvent::ProposalCancelled { id } => {
                if let Some(view) = self.proposals.get_mut(&id.0) {
                    view.status = ViewStatus::Cancelled;
                }
            }
            GovernanceEvent::ProposalCounted {
                id,
                approve_bps,
                reject_bps,
                outcome,
            } => {
                if let Some(view) = self.proposals.get_mut(&id.0) {
                    view.status = ViewStatus::Counted(TallyResult {
                        approve_bps: *approve_bps,
                        reject_bps: *reject_bps,
                        outcome: *outcome,
                    });
                }
            }
        }
    }
}

/// Fold a full log into a [`ReadModel`].
pub fn replay(records: &[EventRecord]) -> ReadModel {
    let mut model = ReadModel::default();
    for record in records {
        model.apply(&record.event);
    }
    model
}
