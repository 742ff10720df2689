//! Thread-safe in-memory storage backend.

use crate::ballot::{BallotRecord, BallotStore};
use crate::editor::{EditorRecord, EditorStore};
use crate::editor_proposal::{EditorProposalRecord, EditorProposalStore, NewEditorProposal};
use crate::proposal::{NewProposal, ProposalRecord, ProposalStore};
use crate::StoreError;
use plenum_types::{
    ActorAddress, EditorProposalId, EditorStatus, ProposalId, TallyResult, Timestamp,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Arena of records keyed by a dense id sequence starting at 1.
struct Arena<T> {
    next_id: u64,
    items: BTreeMap<u64, T>,
}

impl<T> Arena<T> {
    fn new() -> Self {
        Self {
            next_id: 1,
            items: BTreeMap::new(),
        }
    }

    fn insert_with(&mut self, make: impl FnOnce(u64) -> T) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(id, make(id));
        id
    }
}

/// In-memory implementation of all four storage traits.
///
/// Each table takes its own mutex; cross-table invariants are the engines'
/// responsibility. Thread-safe, so one instance can back every engine.
pub struct MemoryStore {
    editors: Mutex<HashMap<ActorAddress, EditorRecord>>,
    editor_proposals: Mutex<Arena<EditorProposalRecord>>,
    proposals: Mutex<Arena<ProposalRecord>>,
    ballots: Mutex<HashMap<ProposalId, BTreeMap<ActorAddress, BallotRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            editors: Mutex::new(HashMap::new()),
            editor_proposals: Mutex::new(Arena::new()),
            proposals: Mutex::new(Arena::new()),
            ballots: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorStore for MemoryStore {
    fn editor_status(&self, address: &ActorAddress) -> Result<EditorStatus, StoreError> {
        Ok(self
            .editors
            .lock()
            .unwrap()
            .get(address)
            .map(|record| record.status)
            .unwrap_or_default())
    }

    fn set_editor_status(
        &self,
        address: &ActorAddress,
        status: EditorStatus,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        self.editors.lock().unwrap().insert(
            address.clone(),
            EditorRecord {
                address: address.clone(),
                status,
                updated_at: now,
            },
        );
        Ok(())
    }

    fn approved_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .editors
            .lock()
            .unwrap()
            .values()
            .filter(|record| record.status.is_approved())
            .count() as u64)
    }

    fn approved_editors(&self) -> Result<Vec<ActorAddress>, StoreError> {
        let mut editors: Vec<ActorAddress> = self
            .editors
            .lock()
            .unwrap()
            .values()
            .filter(|record| record.status.is_approved())
            .map(|record| record.address.clone())
            .collect();
        editors.sort();
        Ok(editors)
    }
}

impl EditorProposalStore for MemoryStore {
    fn insert_editor_proposal(
        &self,
        new: NewEditorProposal,
    ) -> Result<EditorProposalId, StoreError> {
        let id = self
            .editor_proposals
            .lock()
            .unwrap()
            .insert_with(|id| EditorProposalRecord {
                id: EditorProposalId(id),
                candidate: new.candidate.clone(),
                action: new.action,
                creator: new.creator.clone(),
                info: new.info.clone(),
                votes: HashSet::new(),
                created_at: new.created_at,
                resolved: false,
            });
        Ok(EditorProposalId(id))
    }

    fn editor_proposal(
        &self,
        id: EditorProposalId,
    ) -> Result<EditorProposalRecord, StoreError> {
        self.editor_proposals
            .lock()
            .unwrap()
            .items
            .get(&id.0)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("editor proposal {id}")))
    }

    fn active_editor_proposal_for(
        &self,
        candidate: &ActorAddress,
    ) -> Result<Option<EditorProposalId>, StoreError> {
        Ok(self
            .editor_proposals
            .lock()
            .unwrap()
            .items
            .values()
            .find(|record| !record.resolved && &record.candidate == candidate)
            .map(|record| record.id))
    }

    fn record_editor_vote(
        &self,
        id: EditorProposalId,
        voter: &ActorAddress,
    ) -> Result<usize, StoreError> {
        let mut arena = self.editor_proposals.lock().unwrap();
        let record = arena
            .items
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::NotFound(format!("editor proposal {id}")))?;
        if !record.votes.insert(voter.clone()) {
            return Err(StoreError::Duplicate(format!(
                "vote by {voter} on editor proposal {id}"
            )));
        }
        Ok(record.votes.len())
    }

    fn resolve_editor_proposal(&self, id: EditorProposalId) -> Result<(), StoreError> {
        let mut arena = self.editor_proposals.lock().unwrap();
        let record = arena
            .items
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::NotFound(format!("editor proposal {id}")))?;
        record.resolved = true;
        Ok(())
    }

    fn active_editor_proposals(&self) -> Result<Vec<EditorProposalRecord>, StoreError> {
        Ok(self
            .editor_proposals
            .lock()
            .unwrap()
            .items
            .values()
            .filter(|record| !record.resolved)
            .cloned()
            .collect())
    }
}

impl ProposalStore for MemoryStore {
    fn insert_proposal(&self, new: NewProposal) -> Result<ProposalId, StoreError> {
        let id = self
            .proposals
            .lock()
            .unwrap()
            .insert_with(|id| ProposalRecord {
                id: ProposalId(id),
                creator: new.creator.clone(),
                start_time: new.start_time,
                end_time: new.end_time,
                percentages: new.percentages,
                title: new.title.clone(),
                content: new.content.clone(),
                created_at: new.created_at,
                snapshot_day: new.snapshot_day,
                reveal_round: new.reveal_round,
                cancelled: false,
                result: None,
            });
        Ok(ProposalId(id))
    }

    fn proposal(&self, id: ProposalId) -> Result<ProposalRecord, StoreError> {
        self.proposals
            .lock()
            .unwrap()
            .items
            .get(&id.0)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))
    }

    fn cancel_proposal(&self, id: ProposalId) -> Result<(), StoreError> {
        let mut arena = self.proposals.lock().unwrap();
        let record = arena
            .items
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))?;
        if record.cancelled {
            return Err(StoreError::Duplicate(format!("cancel of proposal {id}")));
        }
        record.cancelled = true;
        Ok(())
    }

    fn commit_result(&self, id: ProposalId, result: TallyResult) -> Result<(), StoreError> {
        let mut arena = self.proposals.lock().unwrap();
        let record = arena
            .items
            .get_mut(&id.0)
            .ok_or_else(|| StoreError::NotFound(format!("proposal {id}")))?;
        if record.result.is_some() {
            return Err(StoreError::Duplicate(format!("result for proposal {id}")));
        }
        record.result = Some(result);
        Ok(())
    }

    fn proposals(&self) -> Result<Vec<ProposalRecord>, StoreError> {
        Ok(self
            .proposals
            .lock()
            .unwrap()
            .items
            .values()
            .cloned()
            .collect())
    }

    fn proposal_count(&self) -> Result<u64, StoreError> {
        Ok(self.proposals.lock().unwrap().items.len() as u64)
    }
}

impl BallotStore for MemoryStore {
    fn put_ballot(&self, record: BallotRecord) -> Result<(), StoreError> {
        let mut ballots = self.ballots.lock().unwrap();
        let by_voter = ballots.entry(record.proposal).or_default();
        if by_voter.contains_key(&record.voter) {
            return Err(StoreError::Duplicate(format!(
                "ballot by {} on proposal {}",
                record.voter, record.proposal
            )));
        }
        by_voter.insert(record.voter.clone(), record);
        Ok(())
    }

    fn has_ballot(&self, id: ProposalId, voter: &ActorAddress) -> Result<bool, StoreError> {
        Ok(self
            .ballots
            .lock()
            .unwrap()
            .get(&id)
            .is_some_and(|by_voter| by_voter.contains_key(voter)))
    }

    fn ballots_for(&self, id: ProposalId) -> Result<Vec<BallotRecord>, StoreError> {
        Ok(self
            .ballots
            .lock()
            .unwrap()
            .get(&id)
            .map(|by_voter| by_voter.values().cloned().collect())
            .unwrap_or_default())
    }

    fn ballot_count(&self, id: ProposalId) -> Result<u64, StoreError> {
        Ok(self
            .ballots
            .lock()
            .unwrap()
            .get(&id)
            .map(|by_voter| by_voter.len() as u64)
            .unwrap_or(0))
    }
}
