//! BLS verification of beacon rounds.

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::TimelockError;

/// Domain separation tag for drand's unchained scheme: BLS signatures on G1
/// with SHA-256 hash-to-curve.
pub const BEACON_DST: &[u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";

/// A beacon round as served by a drand relay.
#[derive(Debug, Clone, Deserialize)]
pub struct RoundBeacon {
    pub round: u64,
    /// Hex-encoded randomness value, `SHA-256(signature)` by drand's
    /// derivation rule.
    pub randomness: String,
    /// Hex-encoded BLS signature on [`round_message`] for this round.
    pub signature: String,
}

/// The message a round signs: SHA-256 of the round number as a big-endian u64.
pub fn round_message(round: u64) -> [u8; 32] {
    let digest = Sha256::digest(round.to_be_bytes());
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// BLS12-381 verifier for unchained beacon rounds.
///
/// Round signatures live on G1 and the network key on G2, which is blst's
/// `min_sig` orientation.
pub struct BeaconVerifier {
    public_key: blst::min_sig::PublicKey,
}

impl BeaconVerifier {
    /// Create a verifier from a compressed G2 public key.
    pub fn new(public_key: &[u8]) -> Result<Self, TimelockError> {
        let public_key = blst::min_sig::PublicKey::from_bytes(public_key).map_err(|e| {
            TimelockError::InvalidPublicKey(format!("G2 point deserialization: {e:?}"))
        })?;
        Ok(Self { public_key })
    }

    /// Verify a round signature against the network key.
    pub fn verify_round(&self, round: u64, signature: &[u8]) -> Result<(), TimelockError> {
        let sig = blst::min_sig::Signature::from_bytes(signature).map_err(|e| {
            TimelockError::InvalidSignature(format!("G1 point deserialization: {e:?}"))
        })?;
        let message = round_message(round);
        let result = sig.verify(true, &message, BEACON_DST, &[], &self.public_key, true);
        if result != blst::BLST_ERROR::BLST_SUCCESS {
            return Err(TimelockError::BeaconVerification { round });
        }
        Ok(())
    }

    /// Verify a relay beacon: the randomness derivation rule first, then the
    /// BLS signature.
    pub fn verify_beacon(&self, beacon: &RoundBeacon) -> Result<(), TimelockError> {
        let signature = hex::decode(&beacon.signature)
            .map_err(|e| TimelockError::InvalidSignature(format!("hex decode: {e}")))?;
        let randomness = hex::decode(&beacon.randomness)
            .map_err(|e| TimelockError::InvalidSignature(format!("randomness hex: {e}")))?;

        let expected = Sha256::digest(&signature);
        if expected.as_slice() != randomness.as_slice() {
            return Err(TimelockError::BeaconVerification {
                round: beacon.round,
            });
        }

        self.verify_round(beacon.round, &signature)
    }
}
