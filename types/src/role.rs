//! Voting roles and the per-proposal basis-point split across them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TypeError;

/// One hundred percent, expressed in basis points.
pub const TOTAL_BPS: u16 = 10_000;

/// The four independent voting roles an address can hold power in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    StorageProvider,
    Client,
    Developer,
    TokenHolder,
}

impl Role {
    /// All roles, in the canonical tally order.
    pub const ALL: [Role; 4] = [
        Role::StorageProvider,
        Role::Client,
        Role::Developer,
        Role::TokenHolder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StorageProvider => "storage-provider",
            Self::Client => "client",
            Self::Developer => "developer",
            Self::TokenHolder => "token-holder",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much each role's vote weighs in one proposal, in basis points.
///
/// The four weights always sum to exactly [`TOTAL_BPS`]; the constructor
/// enforces this and values are immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePercentages {
    storage_provider: u16,
    client: u16,
    developer: u16,
    token_holder: u16,
}

impl RolePercentages {
    /// An even 25% split across the four roles.
    pub const EVEN: Self = Self {
        storage_provider: 2_500,
        client: 2_500,
        developer: 2_500,
        token_holder: 2_500,
    };

    /// Validate and construct a split. Each weight must be at most
    /// [`TOTAL_BPS`] and the four must sum to exactly [`TOTAL_BPS`].
    pub fn new(
        storage_provider: u16,
        client: u16,
        developer: u16,
        token_holder: u16,
    ) -> Result<Self, TypeError> {
        for (role, bps) in [
            (Role::StorageProvider, storage_provider),
            (Role::Client, client),
            (Role::Developer, developer),
            (Role::TokenHolder, token_holder),
        ] {
            if bps > TOTAL_BPS {
                return Err(TypeError::PercentageOutOfRange { role, bps });
            }
        }
        let sum =
            storage_provider as u32 + client as u32 + developer as u32 + token_holder as u32;
        if sum != TOTAL_BPS as u32 {
            return Err(TypeError::PercentageSumMismatch { sum });
        }
        Ok(Self {
            storage_provider,
            client,
            developer,
            token_holder,
        })
    }

    /// The weight of one role in basis points.
    pub fn bps_for(&self, role: Role) -> u16 {
        match role {
            Role::StorageProvider => self.storage_provider,
            Role::Client => self.client,
            Role::Developer => self.developer,
            Role::TokenHolder => self.token_holder,
        }
    }
}
