use plenum_store::StoreError;
use plenum_timelock::TimelockError;
use plenum_types::{ProposalId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TallyError {
    #[error("proposal {0} not found")]
    UnknownProposal(ProposalId),

    #[error("proposal {0} is cancelled and will never be counted")]
    ProposalCancelled(ProposalId),

    #[error("voting is open until {until}")]
    VotingStillOpen { until: Timestamp },

    #[error("power arithmetic overflowed")]
    Overflow,

    #[error(transparent)]
    Timelock(#[from] TimelockError),

    #[error("storage: {0}")]
    Store(#[from] StoreError),
}
