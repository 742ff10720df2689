//! Timelock ballot encryption against a drand-style randomness beacon.
//!
//! Ballots are sealed to a future beacon round with identity-based encryption
//! on BLS12-381: the round number is the identity, the beacon network's
//! distributed public key is the master key, and the round's BLS signature,
//! once published, is the decryption key. Until the network signs that round,
//! nobody (including this process) can open a sealed ballot.
//!
//! The scheme follows drand's unchained "quicknet" orientation: public key on
//! G2, round signatures on G1, with SHA-256 hash-to-curve.

pub mod cipher;
pub mod client;
pub mod error;
mod ibe;
pub mod oracle;
pub mod round;
pub mod verify;

pub use cipher::{SealedBallot, TimelockCipher};
pub use client::BeaconClient;
pub use error::TimelockError;
pub use oracle::{BeaconCache, RoundOracle};
pub use round::BeaconInfo;
pub use verify::{BeaconVerifier, RoundBeacon};
