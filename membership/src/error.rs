use plenum_store::StoreError;
use plenum_types::{ActorAddress, EditorProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MembershipError {
    #[error("caller {0} is not an approved editor")]
    CallerNotEditor(ActorAddress),

    #[error("cannot create a membership proposal for yourself")]
    CannotProposeSelf,

    #[error("candidate info exceeds {max} bytes")]
    CandidateInfoTooLong { max: usize },

    #[error("candidate {0} is already an approved editor")]
    AlreadyEditor(ActorAddress),

    #[error("candidate {0} already has an active membership proposal")]
    ActiveProposalExists(ActorAddress),

    #[error("candidate {0} is not an approved editor")]
    NotEditor(ActorAddress),

    #[error("too few approved editors: {approved}")]
    InsufficientEditors { approved: u64 },

    #[error("membership proposal {0} not found or already resolved")]
    UnknownProposal(EditorProposalId),

    #[error("the candidate cannot vote on their own membership")]
    CannotVoteOwnCandidacy,

    #[error("caller has already voted on this proposal")]
    AlreadyVoted,

    #[error("caller is the candidate of another active membership proposal")]
    VoterHasActiveProposal,

    #[error("storage: {0}")]
    Store(#[from] StoreError),
}
