//! Sealing and revealing ballots against beacon rounds.
//!
//! A sealed ballot carries an IBE-wrapped symmetric key plus the vote
//! encrypted under that key with ChaCha20-Poly1305. Until the target round's
//! signature is published nobody, including the sealer, can open it.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use plenum_types::VoteOption;

use crate::error::TimelockError;
use crate::ibe::{self, IbeCiphertext, G2_COMPRESSED};
use crate::oracle::RoundOracle;
use crate::round::BeaconInfo;
use crate::verify::BeaconVerifier;

/// Current sealed ballot wire format.
pub const BALLOT_VERSION: u8 = 1;

const MASK_LEN: usize = 32;
/// One vote byte plus the 16-byte Poly1305 tag.
const VOTE_PAYLOAD_LEN: usize = 17;

const NONCE_TAG: &[u8] = b"PLENUM-V1-NONCE";

/// A vote sealed to a future beacon round.
///
/// Opaque until the round's signature is published; after that anyone holding
/// the signature can open it. Serialized ballots are what voters submit to
/// the proposal ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBallot {
    version: u8,
    round: u64,
    u: Vec<u8>,
    v: Vec<u8>,
    w: Vec<u8>,
    payload: Vec<u8>,
}

impl SealedBallot {
    /// The beacon round whose signature opens this ballot.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("serialize sealed ballot")
    }

    /// Decode and structurally validate a serialized ballot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TimelockError> {
        let ballot: SealedBallot = bincode::deserialize(bytes)
            .map_err(|e| TimelockError::MalformedBallot(e.to_string()))?;
        if ballot.version != BALLOT_VERSION {
            return Err(TimelockError::MalformedBallot(format!(
                "unsupported version {}",
                ballot.version
            )));
        }
        if ballot.u.len() != G2_COMPRESSED
            || ballot.v.len() != MASK_LEN
            || ballot.w.len() != MASK_LEN
        {
            return Err(TimelockError::MalformedBallot(
                "bad point or mask length".into(),
            ));
        }
        if ballot.payload.len() != VOTE_PAYLOAD_LEN {
            return Err(TimelockError::MalformedBallot(format!(
                "payload must be {VOTE_PAYLOAD_LEN} bytes, got {}",
                ballot.payload.len()
            )));
        }
        Ok(ballot)
    }
}

/// The ballot payload nonce is bound to the ephemeral IBE point, which is
/// unique per seal, and the symmetric key is fresh per seal as well.
fn payload_nonce(u: &[u8]) -> [u8; 12] {
    let mut hasher = Sha256::new();
    hasher.update(NONCE_TAG);
    hasher.update(u);
    let digest = hasher.finalize();
    let mut nonce = [0u8; 12];
    nonce.copy_from_slice(&digest[..12]);
    nonce
}

/// Seals votes to beacon rounds and opens them once the round signature
/// exists.
pub struct TimelockCipher {
    network_key: blst::blst_p2_affine,
    verifier: BeaconVerifier,
}

impl TimelockCipher {
    /// Create a cipher from a beacon network's compressed G2 public key.
    pub fn new(public_key: &[u8]) -> Result<Self, TimelockError> {
        let network_key = ibe::parse_public_key(public_key)?;
        let verifier = BeaconVerifier::new(public_key)?;
        Ok(Self {
            network_key,
            verifier,
        })
    }

    pub fn from_info(info: &BeaconInfo) -> Result<Self, TimelockError> {
        Self::new(&info.public_key)
    }

    /// Seal a vote so it can only be opened with `round`'s signature.
    pub fn seal(&self, round: u64, vote: VoteOption) -> Result<SealedBallot, TimelockError> {
        let mut file_key = [0u8; 32];
        getrandom::getrandom(&mut file_key).map_err(|e| TimelockError::Entropy(e.to_string()))?;

        let IbeCiphertext { u, v, w } = ibe::encrypt_key(&self.network_key, round, &file_key)?;

        let aead = ChaCha20Poly1305::new_from_slice(&file_key).expect("valid key length");
        file_key.zeroize();
        let nonce = Nonce::from(payload_nonce(&u));
        let payload = aead
            .encrypt(&nonce, [vote.to_byte()].as_ref())
            .expect("encryption should not fail");

        Ok(SealedBallot {
            version: BALLOT_VERSION,
            round,
            u: u.to_vec(),
            v: v.to_vec(),
            w: w.to_vec(),
            payload,
        })
    }

    /// Open a ballot with the target round's signature.
    ///
    /// The signature is checked against the network key first, so a signature
    /// for the wrong round or from another network is reported as such rather
    /// than surfacing as a garbled ciphertext.
    pub fn reveal(
        &self,
        ballot: &SealedBallot,
        signature: &[u8],
    ) -> Result<VoteOption, TimelockError> {
        self.verifier.verify_round(ballot.round, signature)?;
        let signature = ibe::parse_signature(signature)?;

        let mut u = [0u8; G2_COMPRESSED];
        u.copy_from_slice(&ballot.u);
        let mut v = [0u8; MASK_LEN];
        v.copy_from_slice(&ballot.v);
        let mut w = [0u8; MASK_LEN];
        w.copy_from_slice(&ballot.w);

        let mut file_key = ibe::decrypt_key(&IbeCiphertext { u, v, w }, &signature)?;

        let aead = ChaCha20Poly1305::new_from_slice(&file_key).expect("valid key length");
        file_key.zeroize();
        let nonce = Nonce::from(payload_nonce(&ballot.u));
        let plaintext = aead
            .decrypt(&nonce, ballot.payload.as_ref())
            .map_err(|_| TimelockError::InvalidCiphertext)?;

        if plaintext.len() != 1 {
            return Err(TimelockError::InvalidCiphertext);
        }
        VoteOption::from_byte(plaintext[0]).ok_or(TimelockError::InvalidCiphertext)
    }

    /// Open a ballot through a round oracle, refusing while the round is
    /// still in the future.
    pub fn reveal_with(
        &self,
        ballot: &SealedBallot,
        oracle: &dyn RoundOracle,
    ) -> Result<VoteOption, TimelockError> {
        if !oracle.is_published(ballot.round) {
            return Err(TimelockError::RoundNotYetPublished {
                round: ballot.round,
            });
        }
        let signature = oracle.signature_for(ballot.round)?;
        self.reveal(ballot, &signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::BeaconCache;
    use crate::verify::{round_message, BEACON_DST};
    use blst::min_sig::SecretKey;

    fn test_network() -> (SecretKey, TimelockCipher) {
        let sk = SecretKey::key_gen(&[9u8; 32], &[]).unwrap();
        let cipher = TimelockCipher::new(&sk.sk_to_pk().to_bytes()).unwrap();
        (sk, cipher)
    }

    fn sign_round(sk: &SecretKey, round: u64) -> Vec<u8> {
        sk.sign(&round_message(round), BEACON_DST, &[])
            .to_bytes()
            .to_vec()
    }

    #[test]
    fn seal_then_reveal_roundtrip() {
        let (sk, cipher) = test_network();
        for vote in [VoteOption::Approve, VoteOption::Reject] {
            let ballot = cipher.seal(20, vote).unwrap();
            assert_eq!(ballot.round(), 20);
            let opened = cipher.reveal(&ballot, &sign_round(&sk, 20)).unwrap();
            assert_eq!(opened, vote);
        }
    }

    #[test]
    fn unpublished_round_is_refused() {
        let (_, cipher) = test_network();
        let ballot = cipher.seal(20, VoteOption::Approve).unwrap();
        let cache = BeaconCache::default();
        assert!(matches!(
            cipher.reveal_with(&ballot, &cache),
            Err(TimelockError::RoundNotYetPublished { round: 20 })
        ));
    }

    #[test]
    fn published_round_opens_through_the_oracle() {
        let (sk, cipher) = test_network();
        let ballot = cipher.seal(20, VoteOption::Reject).unwrap();
        let cache = BeaconCache::default();
        cache.insert(20, sign_round(&sk, 20));
        assert_eq!(
            cipher.reveal_with(&ballot, &cache).unwrap(),
            VoteOption::Reject
        );
    }

    #[test]
    fn wrong_round_signature_is_rejected_by_verification() {
        let (sk, cipher) = test_network();
        let ballot = cipher.seal(20, VoteOption::Approve).unwrap();
        assert!(matches!(
            cipher.reveal(&ballot, &sign_round(&sk, 21)),
            Err(TimelockError::BeaconVerification { round: 20 })
        ));
    }

    #[test]
    fn foreign_network_signature_is_rejected_by_verification() {
        let (_, cipher) = test_network();
        let other = SecretKey::key_gen(&[10u8; 32], &[]).unwrap();
        let ballot = cipher.seal(20, VoteOption::Approve).unwrap();
        assert!(matches!(
            cipher.reveal(&ballot, &sign_round(&other, 20)),
            Err(TimelockError::BeaconVerification { round: 20 })
        ));
    }

    #[test]
    fn serialized_ballot_survives_the_wire() {
        let (sk, cipher) = test_network();
        let ballot = cipher.seal(33, VoteOption::Approve).unwrap();
        let decoded = SealedBallot::from_bytes(&ballot.to_bytes()).unwrap();
        assert_eq!(decoded, ballot);
        assert_eq!(
            cipher.reveal(&decoded, &sign_round(&sk, 33)).unwrap(),
            VoteOption::Approve
        );
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        assert!(matches!(
            SealedBallot::from_bytes(&[0x01, 0x02]),
            Err(TimelockError::MalformedBallot(_))
        ));
    }

    #[test]
    fn unknown_version_is_malformed() {
        let (_, cipher) = test_network();
        let mut ballot = cipher.seal(20, VoteOption::Approve).unwrap();
        ballot.version = 2;
        assert!(matches!(
            SealedBallot::from_bytes(&ballot.to_bytes()),
            Err(TimelockError::MalformedBallot(_))
        ));
    }

    #[test]
    fn truncated_point_is_malformed() {
        let (_, cipher) = test_network();
        let mut ballot = cipher.seal(20, VoteOption::Approve).unwrap();
        ballot.u.truncate(48);
        assert!(matches!(
            SealedBallot::from_bytes(&ballot.to_bytes()),
            Err(TimelockError::MalformedBallot(_))
        ));
    }

    #[test]
    fn tampered_payload_fails_authentication() {
        let (sk, cipher) = test_network();
        let mut ballot = cipher.seal(20, VoteOption::Approve).unwrap();
        ballot.payload[0] ^= 0xff;
        assert!(matches!(
            cipher.reveal(&ballot, &sign_round(&sk, 20)),
            Err(TimelockError::InvalidCiphertext)
        ));
    }

    #[test]
    fn swapped_ibe_ciphertext_fails_closed() {
        let (sk, cipher) = test_network();
        let ballot_a = cipher.seal(20, VoteOption::Approve).unwrap();
        let mut ballot_b = cipher.seal(20, VoteOption::Reject).unwrap();
        // Graft A's wrapped key onto B's payload.
        ballot_b.u = ballot_a.u.clone();
        ballot_b.v = ballot_a.v.clone();
        ballot_b.w = ballot_a.w.clone();
        assert!(cipher.reveal(&ballot_b, &sign_round(&sk, 20)).is_err());
    }
}
