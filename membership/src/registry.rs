//! Read facade over the editor roster, plus committee bootstrap.

use std::sync::Arc;

use plenum_events::{EventLog, GovernanceEvent};
use plenum_store::EditorStore;
use plenum_types::{ActorAddress, EditorStatus, Timestamp};

use crate::error::MembershipError;

/// Committee roster lookups.
///
/// Status reads are total: an address the committee has never seen reads as
/// [`EditorStatus::Revoked`]. All mutation goes through the consensus engine;
/// the registry only seeds the very first editor.
pub struct MembershipRegistry<S> {
    store: Arc<S>,
    events: Arc<EventLog>,
}

impl<S: EditorStore> MembershipRegistry<S> {
    pub fn new(store: Arc<S>, events: Arc<EventLog>) -> Self {
        Self { store, events }
    }

    /// Approve the genesis editor if the committee is empty.
    ///
    /// Idempotent: once any editor is approved this does nothing, so a node
    /// can seed unconditionally at startup. Returns whether seeding happened.
    pub fn seed(&self, genesis: &ActorAddress, now: Timestamp) -> Result<bool, MembershipError> {
        if self.store.approved_count()? > 0 {
            return Ok(false);
        }
        self.store
            .set_editor_status(genesis, EditorStatus::Approved, now)?;
        self.events.append(GovernanceEvent::EditorSeeded {
            address: genesis.clone(),
        });
        Ok(true)
    }

    pub fn status_of(&self, address: &ActorAddress) -> Result<EditorStatus, MembershipError> {
        Ok(self.store.editor_status(address)?)
    }

    pub fn is_approved(&self, address: &ActorAddress) -> Result<bool, MembershipError> {
        Ok(self.store.editor_status(address)?.is_approved())
    }

    pub fn approved_count(&self) -> Result<u64, MembershipError> {
        Ok(self.store.approved_count()?)
    }

    /// All approved editors, sorted by address.
    pub fn approved_editors(&self) -> Result<Vec<ActorAddress>, MembershipError> {
        Ok(self.store.approved_editors()?)
    }
}
