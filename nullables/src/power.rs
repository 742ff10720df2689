//! Nullable power oracle: programmable voting power snapshots.

use std::collections::HashMap;
use std::sync::Mutex;

use plenum_tally::PowerOracle;
use plenum_types::{ActorAddress, PowerSnapshot};

/// A power oracle that answers from values set by the test.
///
/// Granting power to an address also accumulates it into that day's network
/// totals; power nobody votes with goes in through [`add_network_power`].
///
/// [`add_network_power`]: NullPowerOracle::add_network_power
#[derive(Default)]
pub struct NullPowerOracle {
    by_address: Mutex<HashMap<(ActorAddress, u64), PowerSnapshot>>,
    network: Mutex<HashMap<u64, PowerSnapshot>>,
}

impl NullPowerOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an address's power on one day and add it to the network totals.
    pub fn set_power(&self, address: &ActorAddress, day: u64, snapshot: PowerSnapshot) {
        self.by_address
            .lock()
            .unwrap()
            .insert((address.clone(), day), snapshot);
        self.add_network_power(day, snapshot);
    }

    /// Add power to the network totals without attributing it to anyone.
    pub fn add_network_power(&self, day: u64, snapshot: PowerSnapshot) {
        let mut network = self.network.lock().unwrap();
        let total = network.entry(day).or_insert(PowerSnapshot::ZERO);
        *total = total.saturating_add(&snapshot);
    }
}

impl PowerOracle for NullPowerOracle {
    fn power_of(&self, address: &ActorAddress, day: u64) -> PowerSnapshot {
        self.by_address
            .lock()
            .unwrap()
            .get(&(address.clone(), day))
            .copied()
            .unwrap_or(PowerSnapshot::ZERO)
    }

    fn network_power(&self, day: u64) -> PowerSnapshot {
        self.network
            .lock()
            .unwrap()
            .get(&day)
            .copied()
            .unwrap_or(PowerSnapshot::ZERO)
    }
}
