//! State enums for editors, proposals, and ballots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The membership status of an address in the editor registry.
///
/// Unknown addresses are treated as `Revoked`, so status lookups are total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorStatus {
    /// Not an editor. Also the implicit status of never-seen addresses.
    #[default]
    Revoked,
    /// An approval proposal for this address is open.
    Adding,
    /// A full member of the editor committee.
    Approved,
    /// A revocation proposal against this address is open.
    Revoking,
}

impl EditorStatus {
    /// Whether this address counts toward the committee and may vote.
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Whether a membership proposal targeting this address is unresolved.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Adding | Self::Revoking)
    }
}

impl fmt::Display for EditorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Revoked => "revoked",
            Self::Adding => "adding",
            Self::Approved => "approved",
            Self::Revoking => "revoking",
        };
        write!(f, "{s}")
    }
}

/// What a membership proposal does to its candidate when it passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorAction {
    /// Add the candidate to the committee.
    Approve,
    /// Remove the candidate from the committee.
    Revoke,
}

impl EditorAction {
    /// Decode from the wire representation (`0` = approve, `1` = revoke).
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Approve),
            1 => Some(Self::Revoke),
            _ => None,
        }
    }

    pub fn as_wire(&self) -> u8 {
        match self {
            Self::Approve => 0,
            Self::Revoke => 1,
        }
    }
}

impl fmt::Display for EditorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Approve => "approve",
            Self::Revoke => "revoke",
        };
        write!(f, "{s}")
    }
}

/// A revealed ballot choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteOption {
    Approve,
    Reject,
}

impl VoteOption {
    /// Encode as the single plaintext byte sealed inside a ballot.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Approve => 1,
            Self::Reject => 2,
        }
    }

    /// Decode a revealed plaintext byte. Anything else is a malformed ballot.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Approve),
            2 => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for VoteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        };
        write!(f, "{s}")
    }
}

/// Final outcome of a counted content proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalOutcome {
    Passed,
    Rejected,
}

impl fmt::Display for ProposalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Passed => "passed",
            Self::Rejected => "rejected",
        };
        write!(f, "{s}")
    }
}

/// The time-derived lifecycle phase of a content proposal.
///
/// Apart from cancellation and the final count, phase is a pure function of
/// the proposal window and the current time; it is never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalPhase {
    /// Created but the voting window has not opened yet.
    Pending,
    /// The voting window is open and sealed ballots are accepted.
    InProgress,
    /// The window has closed; awaiting the tally.
    VoteCounting,
    /// Tally committed.
    Completed(ProposalOutcome),
    /// Withdrawn by its creator before the window opened.
    Cancelled,
}

impl ProposalPhase {
    /// Whether sealed ballots are accepted in this phase.
    pub fn accepts_ballots(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for ProposalPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in progress"),
            Self::VoteCounting => write!(f, "vote counting"),
            Self::Completed(outcome) => write!(f, "completed ({outcome})"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The committed result of a tally, stored on the proposal record.
///
/// `approve_bps + reject_bps` is at most 10 000; it falls short when some
/// eligible power did not vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub approve_bps: u32,
    pub reject_bps: u32,
    pub outcome: ProposalOutcome,
}
