//! Per-role voting power measurements.

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// The power an address (or the whole network) holds in each role on one
/// snapshot day.
///
/// Values are raw chain units (bytes of storage power, attoFIL, and so on);
/// the tally only ever compares them as ratios within a role, so the units
/// never mix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerSnapshot {
    pub storage_provider: u128,
    pub client: u128,
    pub developer: u128,
    pub token_holder: u128,
}

impl PowerSnapshot {
    pub const ZERO: Self = Self {
        storage_provider: 0,
        client: 0,
        developer: 0,
        token_holder: 0,
    };

    /// The power held in one role.
    pub fn power_for(&self, role: Role) -> u128 {
        match role {
            Role::StorageProvider => self.storage_provider,
            Role::Client => self.client,
            Role::Developer => self.developer,
            Role::TokenHolder => self.token_holder,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Component-wise sum, saturating on overflow.
    pub fn saturating_add(&self, other: &Self) -> Self {
        Self {
            storage_provider: self.storage_provider.saturating_add(other.storage_provider),
            client: self.client.saturating_add(other.client),
            developer: self.developer.saturating_add(other.developer),
            token_holder: self.token_holder.saturating_add(other.token_holder),
        }
    }

    /// Component-wise sum, `None` if any component overflows.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Some(Self {
            storage_provider: self.storage_provider.checked_add(other.storage_provider)?,
            client: self.client.checked_add(other.client)?,
            developer: self.developer.checked_add(other.developer)?,
            token_holder: self.token_holder.checked_add(other.token_holder)?,
        })
    }
}
