//! Round signature lookup abstraction.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::TimelockError;

/// Supplies published beacon round signatures.
///
/// The tally depends on this seam instead of wall-clock time: a round either
/// has a signature or it does not, and "not yet" is the
/// [`TimelockError::RoundNotYetPublished`] error. Tests substitute an
/// implementation backed by a local signing key.
pub trait RoundOracle: Send + Sync {
    fn is_published(&self, round: u64) -> bool;

    /// The BLS signature for `round` (compressed G1 point).
    fn signature_for(&self, round: u64) -> Result<Vec<u8>, TimelockError>;
}

/// Thread-safe store of verified round signatures, fed by a
/// [`BeaconClient`](crate::BeaconClient).
pub struct BeaconCache {
    rounds: Mutex<HashMap<u64, Vec<u8>>>,
}

impl BeaconCache {
    pub fn new() -> Self {
        Self {
            rounds: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a signature for a round. The caller is responsible for having
    /// verified it first.
    pub fn insert(&self, round: u64, signature: Vec<u8>) {
        self.rounds.lock().unwrap().insert(round, signature);
    }

    /// The highest round currently cached.
    pub fn latest_round(&self) -> Option<u64> {
        self.rounds.lock().unwrap().keys().max().copied()
    }

    pub fn len(&self) -> usize {
        self.rounds.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.lock().unwrap().is_empty()
    }
}

impl Default for BeaconCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundOracle for BeaconCache {
    fn is_published(&self, round: u64) -> bool {
        self.rounds.lock().unwrap().contains_key(&round)
    }

    fn signature_for(&self, round: u64) -> Result<Vec<u8>, TimelockError> {
        self.rounds
            .lock()
            .unwrap()
            .get(&round)
            .cloned()
            .ok_or(TimelockError::RoundNotYetPublished { round })
    }
}
