//! Membership consensus: proposal lifecycle and quorum resolution.

use std::sync::{Arc, Mutex};

use plenum_events::{EventLog, GovernanceEvent};
use plenum_store::{
    EditorProposalRecord, EditorProposalStore, EditorStore, NewEditorProposal, StoreError,
};
use plenum_types::{ActorAddress, EditorAction, EditorProposalId, EditorStatus, Timestamp};

use crate::error::MembershipError;

/// Upper bound on the free-form candidate description, in bytes.
pub const CANDIDATE_INFO_MAX: usize = 1024;

/// Committee size required to open a revocation.
const MIN_EDITORS_FOR_REVOKE: u64 = 3;

/// Committee size that must remain after a revocation lands.
const MIN_EDITORS_AFTER_REVOKE: u64 = 2;

/// Strictly more than half of the eligible committee, counting the creator's
/// implicit vote. Integer form of `votes + 1 > eligible / 2` that cannot lose
/// the remainder: even splits never pass.
fn quorum_reached(explicit_votes: usize, eligible: u64) -> bool {
    2 * (explicit_votes as u64 + 1) > eligible
}

/// What a successful vote did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteEffect {
    /// The vote was recorded; quorum is not yet reached.
    Recorded {
        /// Explicit vote count after this vote.
        votes: usize,
    },
    /// This vote reached quorum and the proposal resolved.
    Resolved(EditorAction),
}

/// The committee's admission and revocation state machine.
///
/// Every mutation runs under one mutex, so a vote's quorum check and its
/// consequences are a single atomic step: two racing votes can never both
/// trigger resolution, and a failed finalization records nothing.
pub struct MembershipEngine<S> {
    store: Arc<S>,
    events: Arc<EventLog>,
    ops: Mutex<()>,
}

impl<S: EditorStore + EditorProposalStore> MembershipEngine<S> {
    pub fn new(store: Arc<S>, events: Arc<EventLog>) -> Self {
        Self {
            store,
            events,
            ops: Mutex::new(()),
        }
    }

    /// Open a membership proposal for `candidate`.
    ///
    /// Rules:
    /// - only an approved editor may propose, and never for themselves;
    /// - `info` is bounded by [`CANDIDATE_INFO_MAX`];
    /// - one active proposal per candidate;
    /// - approvals require the candidate not to be an editor already,
    ///   revocations require them to be one and the committee to have at
    ///   least three members.
    ///
    /// The candidate's status flips to `Adding`/`Revoking` immediately, which
    /// removes them from the quorum denominator of every open proposal. With
    /// a single approved editor, an approval resolves on creation (the
    /// creator's implicit vote is already a strict majority).
    pub fn create_proposal(
        &self,
        caller: &ActorAddress,
        candidate: &ActorAddress,
        action: EditorAction,
        info: &str,
        now: Timestamp,
    ) -> Result<EditorProposalId, MembershipError> {
        let _guard = self.ops.lock().unwrap();

        if !self.store.editor_status(caller)?.is_approved() {
            return Err(MembershipError::CallerNotEditor(caller.clone()));
        }
        if caller == candidate {
            return Err(MembershipError::CannotProposeSelf);
        }
        if info.len() > CANDIDATE_INFO_MAX {
            return Err(MembershipError::CandidateInfoTooLong {
                max: CANDIDATE_INFO_MAX,
            });
        }
        if self
            .store
            .active_editor_proposal_for(candidate)?
            .is_some()
        {
            return Err(MembershipError::ActiveProposalExists(candidate.clone()));
        }

        let candidate_status = self.store.editor_status(candidate)?;
        match action {
            EditorAction::Approve => {
                if candidate_status.is_approved() {
                    return Err(MembershipError::AlreadyEditor(candidate.clone()));
                }
            }
            EditorAction::Revoke => {
                if !candidate_status.is_approved() {
                    return Err(MembershipError::NotEditor(candidate.clone()));
                }
                let approved = self.store.approved_count()?;
                if approved < MIN_EDITORS_FOR_REVOKE {
                    return Err(MembershipError::InsufficientEditors { approved });
                }
            }
        }

        let pending = match action {
            EditorAction::Approve => EditorStatus::Adding,
            EditorAction::Revoke => EditorStatus::Revoking,
        };
        self.store.set_editor_status(candidate, pending, now)?;

        let id = self.store.insert_editor_proposal(NewEditorProposal {
            candidate: candidate.clone(),
            action,
            creator: caller.clone(),
            info: info.to_string(),
            created_at: now,
        })?;
        self.events.append(GovernanceEvent::EditorProposalCreated {
            id,
            candidate: candidate.clone(),
            action,
            creator: caller.clone(),
        });

        // The creator's implicit vote may already be a strict majority.
        let eligible = self.store.approved_count()?;
        if quorum_reached(0, eligible) {
            let proposal = self.store.editor_proposal(id)?;
            self.finalize(&proposal, eligible, now)?;
        }

        Ok(id)
    }

    /// Cast a supporting vote.
    ///
    /// Rules:
    /// - the proposal must exist and be unresolved;
    /// - the candidate never votes on their own membership;
    /// - the candidate of any other active proposal cannot vote anywhere;
    /// - only approved editors vote, at most once, and the creator's vote is
    ///   already counted.
    ///
    /// The vote that reaches quorum resolves the proposal in the same step.
    pub fn vote(
        &self,
        caller: &ActorAddress,
        id: EditorProposalId,
        now: Timestamp,
    ) -> Result<VoteEffect, MembershipError> {
        let _guard = self.ops.lock().unwrap();

        let proposal = match self.store.editor_proposal(id) {
            Ok(p) => p,
            Err(StoreError::NotFound(_)) => return Err(MembershipError::UnknownProposal(id)),
            Err(e) => return Err(e.into()),
        };
        if proposal.resolved {
            return Err(MembershipError::UnknownProposal(id));
        }
        if caller == &proposal.candidate {
            return Err(MembershipError::CannotVoteOwnCandidacy);
        }
        if self.store.active_editor_proposal_for(caller)?.is_some() {
            return Err(MembershipError::VoterHasActiveProposal);
        }
        if !self.store.editor_status(caller)?.is_approved() {
            return Err(MembershipError::CallerNotEditor(caller.clone()));
        }
        if caller == &proposal.creator || proposal.votes.contains(caller) {
            return Err(MembershipError::AlreadyVoted);
        }

        let eligible = self.store.approved_count()?;

        // A vote that would finalize a revocation below the committee floor
        // is rejected before anything is recorded.
        if proposal.action == EditorAction::Revoke
            && quorum_reached(proposal.votes.len() + 1, eligible)
            && eligible < MIN_EDITORS_AFTER_REVOKE
        {
            return Err(MembershipError::InsufficientEditors { approved: eligible });
        }

        let votes = self.store.record_editor_vote(id, caller)?;
        self.events.append(GovernanceEvent::EditorVoteCast {
            id,
            voter: caller.clone(),
            votes: votes as u32,
        });

        if quorum_reached(votes, eligible) {
            self.finalize(&proposal, eligible, now)?;
            return Ok(VoteEffect::Resolved(proposal.action));
        }
        Ok(VoteEffect::Recorded { votes })
    }

    pub fn proposal(&self, id: EditorProposalId) -> Result<EditorProposalRecord, MembershipError> {
        match self.store.editor_proposal(id) {
            Ok(p) => Ok(p),
            Err(StoreError::NotFound(_)) => Err(MembershipError::UnknownProposal(id)),
            Err(e) => Err(e.into()),
        }
    }

    /// All unresolved proposals, ordered by id.
    pub fn active_proposals(&self) -> Result<Vec<EditorProposalRecord>, MembershipError> {
        Ok(self.store.active_editor_proposals()?)
    }

    /// Apply a resolved proposal. Runs inside the caller's critical section.
    ///
    /// `eligible` already excludes the candidate, so for a revocation it is
    /// the committee size after this one lands; below the floor nothing is
    /// applied.
    fn finalize(
        &self,
        proposal: &EditorProposalRecord,
        eligible: u64,
        now: Timestamp,
    ) -> Result<(), MembershipError> {
        match proposal.action {
            EditorAction::Approve => {
                self.store
                    .set_editor_status(&proposal.candidate, EditorStatus::Approved, now)?;
                self.store.resolve_editor_proposal(proposal.id)?;
                self.events.append(GovernanceEvent::EditorApproved {
                    id: proposal.id,
                    candidate: proposal.candidate.clone(),
                });
            }
            EditorAction::Revoke => {
                if eligible < MIN_EDITORS_AFTER_REVOKE {
                    return Err(MembershipError::InsufficientEditors { approved: eligible });
                }
                self.store
                    .set_editor_status(&proposal.candidate, EditorStatus::Revoked, now)?;
                self.store.resolve_editor_proposal(proposal.id)?;
                self.events.append(GovernanceEvent::EditorRevoked {
                    id: proposal.id,
                    candidate: proposal.candidate.clone(),
                });
            }
        }
        Ok(())
    }
}
