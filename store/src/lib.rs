//! Storage traits for the Plenum governance core.
//!
//! Every storage backend implements these traits; the engines depend only on
//! the traits. The crate ships [`MemoryStore`], a thread-safe in-memory
//! backend that is the default for embedding and for tests.

pub mod ballot;
pub mod editor;
pub mod editor_proposal;
pub mod error;
pub mod memory;
pub mod proposal;

pub use ballot::{BallotRecord, BallotStore};
pub use editor::{EditorRecord, EditorStore};
pub use editor_proposal::{EditorProposalRecord, EditorProposalStore, NewEditorProposal};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use proposal::{NewProposal, ProposalRecord, ProposalStore};
