//! Beacon chain metadata and round arithmetic.

use serde::{Deserialize, Serialize};

use plenum_types::Timestamp;

/// Relay endpoint for the public drand network.
pub const DRAND_MAINNET_URL: &str = "https://api.drand.sh";

/// Chain hash of drand's quicknet network.
pub const QUICKNET_CHAIN_HASH: &str =
    "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971";

/// Distributed public key of drand quicknet (compressed G2 point).
///
/// Re-fetchable from `https://api.drand.sh/<chain-hash>/info`; the League of
/// Entropy publishes the same key for cross-checking.
const QUICKNET_PUBKEY_HEX: &str = concat!(
    "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c",
    "8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb",
    "5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a",
);

/// UNIX timestamp of quicknet round 1.
const QUICKNET_GENESIS_TIME: u64 = 1_692_803_367;

/// Seconds between quicknet rounds.
const QUICKNET_PERIOD: u64 = 3;

/// Metadata about a beacon chain: the network key and the round schedule.
///
/// Round `r` is published at `genesis_time + (r - 1) * period`; rounds are
/// 1-based and round 0 never exists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BeaconInfo {
    /// Network's distributed public key (compressed G2 point).
    pub public_key: Vec<u8>,
    /// Seconds between rounds.
    pub period: u64,
    /// When round 1 was (or will be) published, in Unix seconds.
    pub genesis_time: u64,
}

impl BeaconInfo {
    pub fn new(public_key: Vec<u8>, period: u64, genesis_time: u64) -> Self {
        assert!(period > 0, "beacon period must be positive");
        Self {
            public_key,
            period,
            genesis_time,
        }
    }

    /// Chain metadata for drand quicknet.
    pub fn quicknet() -> Self {
        Self::new(
            hex::decode(QUICKNET_PUBKEY_HEX).expect("static quicknet key decodes"),
            QUICKNET_PERIOD,
            QUICKNET_GENESIS_TIME,
        )
    }

    /// When a round's signature becomes available.
    pub fn time_of_round(&self, round: u64) -> u64 {
        self.genesis_time + round.saturating_sub(1) * self.period
    }

    /// The newest round published at `now` (0 before genesis).
    pub fn current_round(&self, now: Timestamp) -> u64 {
        let now = now.as_secs();
        if now < self.genesis_time {
            return 0;
        }
        (now - self.genesis_time) / self.period + 1
    }

    pub fn is_round_available(&self, round: u64, now: Timestamp) -> bool {
        self.time_of_round(round) <= now.as_secs()
    }

    /// The earliest round published at or after `at`.
    ///
    /// Sealing ballots to this round guarantees the decryption key does not
    /// exist before `at`.
    pub fn reveal_round_for(&self, at: Timestamp) -> u64 {
        let at = at.as_secs();
        if at <= self.genesis_time {
            return 1;
        }
        (at - self.genesis_time).div_ceil(self.period) + 1
    }
}
