use plenum_store::StoreError;
use plenum_timelock::TimelockError;
use plenum_types::{ActorAddress, ProposalId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("proposal {0} not found")]
    UnknownProposal(ProposalId),

    #[error("voting window must end in the future")]
    EndTimeInPast,

    #[error("voting window must be non-empty")]
    EmptyWindow,

    #[error("voting window must not start in the past")]
    StartTimeInPast,

    #[error("title exceeds {max} bytes")]
    TitleTooLong { max: usize },

    #[error("content exceeds {max} bytes")]
    ContentTooLong { max: usize },

    #[error("caller {0} is not an approved editor")]
    CallerNotEditor(ActorAddress),

    #[error("only the creator can cancel a proposal")]
    NotCreator,

    #[error("proposal is already cancelled")]
    AlreadyCancelled,

    #[error("a proposal can only be cancelled before its window opens")]
    CancelWindowClosed,

    #[error("proposal {0} is cancelled")]
    ProposalCancelled(ProposalId),

    #[error("voting has not opened yet")]
    VotingNotOpen,

    #[error("voting has closed")]
    VotingClosed,

    #[error("voter already has a ballot on this proposal")]
    DuplicateBallot,

    #[error("ballot sealed to round {got}, proposal reveals at round {expected}")]
    RoundMismatch { expected: u64, got: u64 },

    #[error(transparent)]
    MalformedBallot(#[from] TimelockError),

    #[error("storage: {0}")]
    Store(#[from] StoreError),
}
