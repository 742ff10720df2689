//! Proposal lifecycle and sealed ballot intake.

use std::sync::Arc;

use plenum_events::{EventLog, GovernanceEvent};
use plenum_store::{
    BallotRecord, BallotStore, EditorStore, NewProposal, ProposalRecord, ProposalStore, StoreError,
};
use plenum_timelock::{BeaconInfo, SealedBallot};
use plenum_types::{ActorAddress, ProposalId, ProposalPhase, RolePercentages, Timestamp};

use crate::error::LedgerError;

/// Upper bound on proposal titles, in bytes.
pub const TITLE_MAX: usize = 200;

/// Upper bound on proposal content, in bytes.
pub const CONTENT_MAX: usize = 10_000;

/// Caller-supplied creation parameters.
///
/// The role distribution is valid by construction ([`RolePercentages::new`]
/// rejects out-of-range fields and sums other than 10 000), so a bad
/// distribution cannot reach the ledger.
#[derive(Clone, Debug)]
pub struct ProposalParams {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub percentages: RolePercentages,
    pub title: String,
    pub content: String,
}

/// Creation, cancellation, and ballot intake for content proposals.
///
/// Proposals are immutable once their window opens; the only mutations ever
/// applied are the one-shot cancel (before the window) and the one-shot tally
/// commit (after it, by the counting engine).
pub struct ProposalLedger<S> {
    store: Arc<S>,
    events: Arc<EventLog>,
    beacon: BeaconInfo,
}

impl<S: ProposalStore + BallotStore + EditorStore> ProposalLedger<S> {
    pub fn new(store: Arc<S>, events: Arc<EventLog>, beacon: BeaconInfo) -> Self {
        Self {
            store,
            events,
            beacon,
        }
    }

    /// Open a proposal with a future voting window.
    ///
    /// Binds two values at creation time: `snapshot_day` (the UTC day whose
    /// power snapshot the tally will read) and `reveal_round` (the first
    /// beacon round at or after `end_time`, which ballots must seal to).
    pub fn create_proposal(
        &self,
        caller: &ActorAddress,
        params: ProposalParams,
        now: Timestamp,
    ) -> Result<ProposalId, LedgerError> {
        if params.end_time <= now {
            return Err(LedgerError::EndTimeInPast);
        }
        if params.start_time >= params.end_time {
            return Err(LedgerError::EmptyWindow);
        }
        if params.start_time < now {
            return Err(LedgerError::StartTimeInPast);
        }
        if params.title.len() > TITLE_MAX {
            return Err(LedgerError::TitleTooLong { max: TITLE_MAX });
        }
        if params.content.len() > CONTENT_MAX {
            return Err(LedgerError::ContentTooLong { max: CONTENT_MAX });
        }
        if !self.store.editor_status(caller)?.is_approved() {
            return Err(LedgerError::CallerNotEditor(caller.clone()));
        }

        let snapshot_day = now.day_index();
        let reveal_round = self.beacon.reveal_round_for(params.end_time);
        let id = self.store.insert_proposal(NewProposal {
            creator: caller.clone(),
            start_time: params.start_time,
            end_time: params.end_time,
            percentages: params.percentages,
            title: params.title,
            content: params.content,
            created_at: now,
            snapshot_day,
            reveal_round,
        })?;
        self.events.append(GovernanceEvent::ProposalCreated {
            id,
            creator: caller.clone(),
            start_time: params.start_time,
            end_time: params.end_time,
            snapshot_day,
            reveal_round,
        });
        Ok(id)
    }

    /// Withdraw a proposal before its window opens. Creator-only, one-shot.
    pub fn cancel(
        &self,
        caller: &ActorAddress,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let proposal = self.fetch(id)?;
        if &proposal.creator != caller {
            return Err(LedgerError::NotCreator);
        }
        match proposal.phase(now) {
            ProposalPhase::Cancelled => Err(LedgerError::AlreadyCancelled),
            ProposalPhase::Pending => match self.store.cancel_proposal(id) {
                Ok(()) => {
                    self.events.append(GovernanceEvent::ProposalCancelled { id });
                    Ok(())
                }
                Err(StoreError::Duplicate(_)) => Err(LedgerError::AlreadyCancelled),
                Err(e) => Err(e.into()),
            },
            _ => Err(LedgerError::CancelWindowClosed),
        }
    }

    /// Accept one sealed ballot per voter while the window is open.
    ///
    /// The window is half-open: a ballot arriving exactly at `end_time` is
    /// rejected. The sealed round must equal the proposal's reveal round, so
    /// every accepted ballot opens with the same signature. Anyone may vote;
    /// an address without power simply weighs nothing at the tally.
    pub fn submit_ballot(
        &self,
        voter: &ActorAddress,
        id: ProposalId,
        sealed: &[u8],
        now: Timestamp,
    ) -> Result<(), LedgerError> {
        let proposal = self.fetch(id)?;
        match proposal.phase(now) {
            ProposalPhase::Cancelled => return Err(LedgerError::ProposalCancelled(id)),
            ProposalPhase::Pending => return Err(LedgerError::VotingNotOpen),
            ProposalPhase::InProgress => {}
            ProposalPhase::VoteCounting | ProposalPhase::Completed(_) => {
                return Err(LedgerError::VotingClosed)
            }
        }
        if self.store.has_ballot(id, voter)? {
            return Err(LedgerError::DuplicateBallot);
        }

        let ballot = SealedBallot::from_bytes(sealed)?;
        if ballot.round() != proposal.reveal_round {
            return Err(LedgerError::RoundMismatch {
                expected: proposal.reveal_round,
                got: ballot.round(),
            });
        }

        // The store insert is insert-if-absent, which closes the race two
        // concurrent submissions could otherwise slip through.
        match self.store.put_ballot(BallotRecord {
            proposal: id,
            voter: voter.clone(),
            sealed: sealed.to_vec(),
            submitted_at: now,
        }) {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => return Err(LedgerError::DuplicateBallot),
            Err(e) => return Err(e.into()),
        }
        self.events.append(GovernanceEvent::BallotSubmitted {
            id,
            voter: voter.clone(),
        });
        Ok(())
    }

    pub fn proposal(&self, id: ProposalId) -> Result<ProposalRecord, LedgerError> {
        self.fetch(id)
    }

    pub fn phase(&self, id: ProposalId, now: Timestamp) -> Result<ProposalPhase, LedgerError> {
        Ok(self.fetch(id)?.phase(now))
    }

    /// All ballots for a proposal, ordered by voter address.
    pub fn ballots(&self, id: ProposalId) -> Result<Vec<BallotRecord>, LedgerError> {
        Ok(self.store.ballots_for(id)?)
    }

    pub fn ballot_count(&self, id: ProposalId) -> Result<u64, LedgerError> {
        Ok(self.store.ballot_count(id)?)
    }

    /// All proposals, ordered by id.
    pub fn proposals(&self) -> Result<Vec<ProposalRecord>, LedgerError> {
        Ok(self.store.proposals()?)
    }

    fn fetch(&self, id: ProposalId) -> Result<ProposalRecord, LedgerError> {
        match self.store.proposal(id) {
            Ok(p) => Ok(p),
            Err(StoreError::NotFound(_)) => Err(LedgerError::UnknownProposal(id)),
            Err(e) => Err(e.into()),
        }
    }
}
