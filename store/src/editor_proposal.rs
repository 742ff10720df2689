//! Membership proposal storage trait.

use crate::StoreError;
use plenum_types::{ActorAddress, EditorAction, EditorProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A stored add/remove proposal for an editor address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorProposalRecord {
    pub id: EditorProposalId,
    pub candidate: ActorAddress,
    pub action: EditorAction,
    pub creator: ActorAddress,
    /// Free-form candidate description, length-bounded at creation.
    pub info: String,
    /// Explicit supporting votes. Never contains the creator (their vote is
    /// implicit) nor the candidate.
    pub votes: HashSet<ActorAddress>,
    pub created_at: Timestamp,
    pub resolved: bool,
}

/// Creation parameters; the store assigns the id.
#[derive(Clone, Debug)]
pub struct NewEditorProposal {
    pub candidate: ActorAddress,
    pub action: EditorAction,
    pub creator: ActorAddress,
    pub info: String,
    pub created_at: Timestamp,
}

/// Trait for membership proposal storage.
pub trait EditorProposalStore {
    /// Insert a new proposal, assigning the next id in the arena.
    fn insert_editor_proposal(
        &self,
        new: NewEditorProposal,
    ) -> Result<EditorProposalId, StoreError>;

    fn editor_proposal(&self, id: EditorProposalId)
        -> Result<EditorProposalRecord, StoreError>;

    /// The unresolved proposal targeting `candidate`, if one exists.
    ///
    /// At most one can exist at a time; creation enforces this.
    fn active_editor_proposal_for(
        &self,
        candidate: &ActorAddress,
    ) -> Result<Option<EditorProposalId>, StoreError>;

    /// Record a supporting vote. Returns the explicit vote count after the
    /// insert. Fails with `Duplicate` if the voter is already present.
    fn record_editor_vote(
        &self,
        id: EditorProposalId,
        voter: &ActorAddress,
    ) -> Result<usize, StoreError>;

    /// Mark a proposal resolved. Resolution is one-way.
    fn resolve_editor_proposal(&self, id: EditorProposalId) -> Result<(), StoreError>;

    /// All unresolved proposals, ordered by id.
    fn active_editor_proposals(&self) -> Result<Vec<EditorProposalRecord>, StoreError>;
}
