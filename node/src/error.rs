use thiserror::Error;

/// Top-level error for node operations, wrapping each subsystem's error type.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("editor membership: {0}")]
    Membership(#[from] plenum_membership::MembershipError),

    #[error("proposal ledger: {0}")]
    Ledger(#[from] plenum_ledger::LedgerError),

    #[error("vote tally: {0}")]
    Tally(#[from] plenum_tally::TallyError),

    #[error("timelock: {0}")]
    Timelock(#[from] plenum_timelock::TimelockError),

    #[error("storage: {0}")]
    Store(#[from] plenum_store::StoreError),

    #[error("invalid input: {0}")]
    Types(#[from] plenum_types::TypeError),

    #[error("unknown proposal action {value}, expected 0 (approve) or 1 (revoke)")]
    InvalidProposalAction { value: u8 },

    #[error("configuration: {0}")]
    Config(String),
}
