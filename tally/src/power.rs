//! Voting power lookup abstraction.

use plenum_types::{ActorAddress, PowerSnapshot};

/// Read-only source of per-role voting power, keyed by address and UTC day.
///
/// Snapshots are taken outside this system (chain state, an indexer, a test
/// double); the tally only reads them. Implementations must answer
/// identically for the same `(address, day)` every time they are asked, or
/// the tally loses its determinism.
pub trait PowerOracle: Send + Sync {
    /// Power held by one address on `day`. Zero for unknown addresses.
    fn power_of(&self, address: &ActorAddress, day: u64) -> PowerSnapshot;

    /// Whole-network totals per role on `day`.
    fn network_power(&self, day: u64) -> PowerSnapshot;
}
