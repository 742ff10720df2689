//! Nullable beacon: an in-process randomness network with its own key.

use std::collections::HashMap;
use std::sync::Mutex;

use blst::min_sig::SecretKey;
use plenum_timelock::verify::{round_message, BEACON_DST};
use plenum_timelock::{BeaconInfo, RoundOracle, TimelockError};

/// A drand-style network running on a local BLS key.
///
/// Signatures it produces are real: ballots sealed to this network's public
/// key open with them, so the whole seal/publish/reveal pipeline runs in
/// tests without a relay. Rounds are published on command, never by time.
pub struct NullBeacon {
    secret_key: SecretKey,
    published: Mutex<HashMap<u64, Vec<u8>>>,
}

impl NullBeacon {
    pub fn new(seed: [u8; 32]) -> Self {
        Self {
            secret_key: SecretKey::key_gen(&seed, &[])
                .expect("32-byte seed is enough key material"),
            published: Mutex::new(HashMap::new()),
        }
    }

    /// The network's compressed G2 public key.
    pub fn public_key(&self) -> Vec<u8> {
        self.secret_key.sk_to_pk().to_bytes().to_vec()
    }

    /// Chain metadata for this network under a chosen round schedule.
    pub fn info(&self, period: u64, genesis_time: u64) -> BeaconInfo {
        BeaconInfo::new(self.public_key(), period, genesis_time)
    }

    /// Sign and publish one round.
    pub fn publish_round(&self, round: u64) {
        let signature = self
            .secret_key
            .sign(&round_message(round), BEACON_DST, &[])
            .to_bytes()
            .to_vec();
        self.published.lock().unwrap().insert(round, signature);
    }

    /// Publish every round from 1 through `round`.
    pub fn publish_until(&self, round: u64) {
        for r in 1..=round {
            self.publish_round(r);
        }
    }
}

impl RoundOracle for NullBeacon {
    fn is_published(&self, round: u64) -> bool {
        self.published.lock().unwrap().contains_key(&round)
    }

    fn signature_for(&self, round: u64) -> Result<Vec<u8>, TimelockError> {
        self.published
            .lock()
            .unwrap()
            .get(&round)
            .cloned()
            .ok_or(TimelockError::RoundNotYetPublished { round })
    }
}
