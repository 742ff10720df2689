//! The governance node facade — wires every engine over one store and log.

use std::sync::Arc;

use plenum_events::{EventLog, EventRecord};
use plenum_ledger::{ProposalLedger, ProposalParams};
use plenum_membership::{MembershipEngine, MembershipRegistry, VoteEffect};
use plenum_store::{MemoryStore, ProposalRecord};
use plenum_tally::{PowerOracle, TallyEngine, TallyOutcome};
use plenum_timelock::{RoundOracle, TimelockCipher};
use plenum_types::{
    ActorAddress, Clock, EditorAction, EditorProposalId, EditorStatus, ProposalId, ProposalPhase,
};

use crate::config::NodeConfig;
use crate::error::NodeError;

/// A running governance node.
///
/// One shared [`MemoryStore`] and [`EventLog`] sit under the membership,
/// ledger, and tally engines. The clock, power oracle, and beacon round
/// source are injected, so tests drive the whole pipeline deterministically
/// while production wires the system clock and a relay-backed beacon cache.
pub struct GovernanceNode {
    pub config: NodeConfig,
    pub events: Arc<EventLog>,
    registry: MembershipRegistry<MemoryStore>,
    membership: MembershipEngine<MemoryStore>,
    ledger: ProposalLedger<MemoryStore>,
    tally: TallyEngine<MemoryStore>,
    /// Sealing cipher bound to the configured beacon chain.
    cipher: TimelockCipher,
    clock: Arc<dyn Clock>,
    power: Arc<dyn PowerOracle>,
    rounds: Arc<dyn RoundOracle>,
}

impl GovernanceNode {
    /// Boot a node over a fresh in-memory store, seeding the configured
    /// genesis editor if the registry is empty.
    pub fn new(
        config: NodeConfig,
        clock: Arc<dyn Clock>,
        power: Arc<dyn PowerOracle>,
        rounds: Arc<dyn RoundOracle>,
    ) -> Result<Self, NodeError> {
        let beacon = config.beacon_info()?;
        let genesis = config.genesis_editor()?;

        let store = Arc::new(MemoryStore::new());
        let events = Arc::new(EventLog::new());

        let registry = MembershipRegistry::new(store.clone(), events.clone());
        let membership = MembershipEngine::new(store.clone(), events.clone());
        let ledger = ProposalLedger::new(store.clone(), events.clone(), beacon.clone());
        let tally = TallyEngine::new(store, events.clone(), &beacon)?;
        let cipher = TimelockCipher::from_info(&beacon)?;

        if registry.seed(&genesis, clock.now())? {
            tracing::info!(editor = %genesis, "governance registry seeded");
        }

        Ok(Self {
            config,
            events,
            registry,
            membership,
            ledger,
            tally,
            cipher,
            clock,
            power,
            rounds,
        })
    }

    // ── Membership ─────────────────────────────────────────────────────

    /// Open an editor proposal for `candidate`.
    ///
    /// `action` is the wire encoding: `0` proposes admission, `1` proposes
    /// revocation; anything else is rejected before the engine sees it.
    pub fn create_editor_proposal(
        &self,
        caller: &ActorAddress,
        candidate: &ActorAddress,
        action: u8,
        info: &str,
    ) -> Result<EditorProposalId, NodeError> {
        let action = EditorAction::from_wire(action)
            .ok_or(NodeError::InvalidProposalAction { value: action })?;
        let id = self
            .membership
            .create_proposal(caller, candidate, action, info, self.clock.now())?;
        tracing::info!(%id, candidate = %candidate, %action, "editor proposal created");
        Ok(id)
    }

    /// Cast a supporting vote; the vote that reaches quorum finalizes the
    /// proposal in the same step.
    pub fn vote_editor_proposal(
        &self,
        voter: &ActorAddress,
        id: EditorProposalId,
    ) -> Result<VoteEffect, NodeError> {
        let effect = self.membership.vote(voter, id, self.clock.now())?;
        match &effect {
            VoteEffect::Resolved(action) => {
                tracing::info!(%id, %action, "editor proposal resolved");
            }
            VoteEffect::Recorded { votes } => {
                tracing::debug!(%id, votes = *votes, "editor vote recorded");
            }
        }
        Ok(effect)
    }

    /// Membership status of `address`; unknown addresses read as revoked.
    pub fn editor_status(&self, address: &ActorAddress) -> Result<EditorStatus, NodeError> {
        Ok(self.registry.status_of(address)?)
    }

    /// Number of approved editors.
    pub fn editor_count(&self) -> Result<u64, NodeError> {
        Ok(self.registry.approved_count()?)
    }

    /// Every currently approved editor.
    pub fn approved_editors(&self) -> Result<Vec<ActorAddress>, NodeError> {
        Ok(self.registry.approved_editors()?)
    }

    // ── Proposals and ballots ──────────────────────────────────────────

    /// Create a voting proposal; the caller must be an approved editor.
    pub fn create_proposal(
        &self,
        caller: &ActorAddress,
        params: ProposalParams,
    ) -> Result<ProposalId, NodeError> {
        let id = self.ledger.create_proposal(caller, params, self.clock.now())?;
        tracing::info!(%id, creator = %caller, "proposal created");
        Ok(id)
    }

    /// Cancel a proposal before its voting window opens.
    pub fn cancel_proposal(&self, caller: &ActorAddress, id: ProposalId) -> Result<(), NodeError> {
        self.ledger.cancel(caller, id, self.clock.now())?;
        tracing::info!(%id, "proposal cancelled");
        Ok(())
    }

    /// Accept a sealed ballot inside the proposal's voting window.
    pub fn submit_ballot(
        &self,
        voter: &ActorAddress,
        id: ProposalId,
        sealed: &[u8],
    ) -> Result<(), NodeError> {
        self.ledger.submit_ballot(voter, id, sealed, self.clock.now())?;
        tracing::debug!(%id, voter = %voter, "sealed ballot accepted");
        Ok(())
    }

    /// Open every ballot of a closed proposal and commit the weighted result.
    pub fn count_votes(&self, id: ProposalId) -> Result<TallyOutcome, NodeError> {
        let outcome = self.tally.count_votes(
            id,
            self.power.as_ref(),
            self.rounds.as_ref(),
            self.clock.now(),
        )?;
        if outcome.discarded > 0 {
            tracing::warn!(
                %id,
                discarded = outcome.discarded,
                "ballots failed to open and were not counted"
            );
        }
        tracing::info!(
            %id,
            approve_bps = outcome.result.approve_bps,
            reject_bps = outcome.result.reject_bps,
            outcome = %outcome.result.outcome,
            "proposal counted"
        );
        Ok(outcome)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Stored record of a voting proposal.
    pub fn proposal(&self, id: ProposalId) -> Result<ProposalRecord, NodeError> {
        Ok(self.ledger.proposal(id)?)
    }

    /// Lifecycle phase of a proposal at the node's current time.
    pub fn proposal_phase(&self, id: ProposalId) -> Result<ProposalPhase, NodeError> {
        Ok(self.ledger.phase(id, self.clock.now())?)
    }

    /// Register a synchronous listener invoked for every appended event.
    pub fn subscribe(&self, listener: Box<dyn Fn(&EventRecord) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    /// The sealing cipher bound to the configured beacon.
    ///
    /// Voters seal ballots against a proposal's `reveal_round` with this.
    pub fn cipher(&self) -> &TimelockCipher {
        &self.cipher
    }
}
