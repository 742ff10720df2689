//! Editor registry storage trait.

use crate::StoreError;
use plenum_types::{ActorAddress, EditorStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// Stored membership record for one address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EditorRecord {
    pub address: ActorAddress,
    pub status: EditorStatus,
    /// When the status last changed.
    pub updated_at: Timestamp,
}

/// Trait for editor registry storage.
///
/// Status lookups are total: addresses without a record read as
/// [`EditorStatus::Revoked`].
pub trait EditorStore {
    fn editor_status(&self, address: &ActorAddress) -> Result<EditorStatus, StoreError>;

    fn set_editor_status(
        &self,
        address: &ActorAddress,
        status: EditorStatus,
        now: Timestamp,
    ) -> Result<(), StoreError>;

    /// Number of addresses currently in status `Approved`.
    fn approved_count(&self) -> Result<u64, StoreError>;

    /// All addresses currently in status `Approved`, sorted.
    fn approved_editors(&self) -> Result<Vec<ActorAddress>, StoreError>;
}
