//! Identity-based encryption of 32-byte keys to beacon rounds.
//!
//! Boneh-Franklin IBE over BLS12-381 with the Fujisaki-Okamoto transform.
//! The identity is the round message, the beacon network key is the master
//! public key, and a round's BLS signature is exactly the IBE private key for
//! that identity. Uses the raw `blst` bindings; the higher-level `min_sig`
//! API covers signing and verification but not pairing against an arbitrary
//! ephemeral point.

use blst::{
    blst_bendian_from_fp, blst_fp12, blst_hash_to_g1, blst_keygen, blst_miller_loop,
    blst_p1, blst_p1_affine, blst_p1_affine_in_g1, blst_p1_affine_is_inf, blst_p1_mult,
    blst_p1_to_affine, blst_p1_uncompress, blst_p2, blst_p2_affine, blst_p2_affine_compress,
    blst_p2_affine_in_g2, blst_p2_affine_is_inf, blst_p2_generator,
    blst_p2_mult, blst_p2_to_affine, blst_p2_uncompress, blst_scalar, BLST_ERROR,
};
use blst::blst_final_exp;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::error::TimelockError;
use crate::verify::{round_message, BEACON_DST};

pub(crate) const G1_COMPRESSED: usize = 48;
pub(crate) const G2_COMPRESSED: usize = 96;
const GT_BYTES: usize = 576;

/// Scalars are reduced mod the BLS12-381 group order, which fits in 255 bits.
const SCALAR_BITS: usize = 255;

const H2_TAG: &[u8] = b"PLENUM-V1-IBE-H2";
const H3_TAG: &[u8] = b"PLENUM-V1-IBE-H3";
const H4_TAG: &[u8] = b"PLENUM-V1-IBE-H4";

/// IBE ciphertext protecting one 32-byte key.
pub(crate) struct IbeCiphertext {
    /// Ephemeral point `r * G2`, compressed.
    pub u: [u8; G2_COMPRESSED],
    /// Commitment masked by the pairing output.
    pub v: [u8; 32],
    /// Key masked by the commitment.
    pub w: [u8; 32],
}

fn xor32(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = a[i] ^ b[i];
    }
    out
}

fn mask_from_gt(gt: &[u8; GT_BYTES]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(H2_TAG);
    hasher.update(gt);
    hasher.finalize().into()
}

fn mask_from_sigma(sigma: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(H4_TAG);
    hasher.update(sigma);
    hasher.finalize().into()
}

/// Derive the ephemeral scalar from the commitment and the key, so that
/// decryption can recompute and check it.
fn derive_r(sigma: &[u8; 32], file_key: &[u8; 32]) -> blst_scalar {
    let mut ikm = [0u8; 64];
    ikm[..32].copy_from_slice(sigma);
    ikm[32..].copy_from_slice(file_key);
    let mut scalar = blst_scalar::default();
    unsafe {
        blst_keygen(&mut scalar, ikm.as_ptr(), ikm.len(), H3_TAG.as_ptr(), H3_TAG.len());
    }
    ikm.zeroize();
    scalar
}

fn gt_to_bytes(gt: &blst_fp12) -> [u8; GT_BYTES] {
    let mut out = [0u8; GT_BYTES];
    let mut offset = 0;
    for fp6 in &gt.fp6 {
        for fp2 in &fp6.fp2 {
            for fp in &fp2.fp {
                unsafe {
                    blst_bendian_from_fp(out[offset..offset + 48].as_mut_ptr(), fp);
                }
                offset += 48;
            }
        }
    }
    out
}

/// `e(P, Q)` serialized, with the G1 point second as blst orders arguments.
fn pairing(q: &blst_p2_affine, p: &blst_p1_affine) -> [u8; GT_BYTES] {
    let mut miller = blst_fp12::default();
    let mut gt = blst_fp12::default();
    unsafe {
        blst_miller_loop(&mut miller, q, p);
        blst_final_exp(&mut gt, &miller);
    }
    gt_to_bytes(&gt)
}

/// Hash a round's signing message onto G1.
fn round_point(round: u64) -> blst_p1 {
    let message = round_message(round);
    let mut point = blst_p1::default();
    unsafe {
        blst_hash_to_g1(
            &mut point,
            message.as_ptr(),
            message.len(),
            BEACON_DST.as_ptr(),
            BEACON_DST.len(),
            std::ptr::null(),
            0,
        );
    }
    point
}

/// Compressed `scalar * G2`.
fn scalar_times_g2(scalar: &blst_scalar) -> [u8; G2_COMPRESSED] {
    let mut point = blst_p2::default();
    let mut affine = blst_p2_affine::default();
    let mut out = [0u8; G2_COMPRESSED];
    unsafe {
        blst_p2_mult(&mut point, blst_p2_generator(), scalar.b.as_ptr(), SCALAR_BITS);
        blst_p2_to_affine(&mut affine, &point);
        blst_p2_affine_compress(out.as_mut_ptr(), &affine);
    }
    out
}

/// Parse and subgroup-check a compressed G2 network public key.
pub(crate) fn parse_public_key(bytes: &[u8]) -> Result<blst_p2_affine, TimelockError> {
    if bytes.len() != G2_COMPRESSED {
        return Err(TimelockError::InvalidPublicKey(format!(
            "expected {G2_COMPRESSED} bytes, got {}",
            bytes.len()
        )));
    }
    let mut point = blst_p2_affine::default();
    let err = unsafe { blst_p2_uncompress(&mut point, bytes.as_ptr()) };
    if err != BLST_ERROR::BLST_SUCCESS {
        return Err(TimelockError::InvalidPublicKey(format!("{err:?}")));
    }
    if unsafe { blst_p2_affine_is_inf(&point) || !blst_p2_affine_in_g2(&point) } {
        return Err(TimelockError::InvalidPublicKey(
            "point not in the G2 subgroup".into(),
        ));
    }
    Ok(point)
}

/// Parse and subgroup-check a compressed G1 round signature.
pub(crate) fn parse_signature(bytes: &[u8]) -> Result<blst_p1_affine, TimelockError> {
    if bytes.len() != G1_COMPRESSED {
        return Err(TimelockError::InvalidSignature(format!(
            "expected {G1_COMPRESSED} bytes, got {}",
            bytes.len()
        )));
    }
    let mut point = blst_p1_affine::default();
    let err = unsafe { blst_p1_uncompress(&mut point, bytes.as_ptr()) };
    if err != BLST_ERROR::BLST_SUCCESS {
        return Err(TimelockError::InvalidSignature(format!("{err:?}")));
    }
    if unsafe { blst_p1_affine_is_inf(&point) || !blst_p1_affine_in_g1(&point) } {
        return Err(TimelockError::InvalidSignature(
            "point not in the G1 subgroup".into(),
        ));
    }
    Ok(point)
}

/// Encrypt `file_key` so it can only be recovered with `round`'s signature.
pub(crate) fn encrypt_key(
    network_key: &blst_p2_affine,
    round: u64,
    file_key: &[u8; 32],
) -> Result<IbeCiphertext, TimelockError> {
    let mut sigma = [0u8; 32];
    getrandom::getrandom(&mut sigma).map_err(|e| TimelockError::Entropy(e.to_string()))?;

    let r = derive_r(&sigma, file_key);
    let u = scalar_times_g2(&r);

    // gid = e(r * H1(round), pk)
    let mut id_times_r = blst_p1::default();
    let mut id_affine = blst_p1_affine::default();
    unsafe {
        let id_point = round_point(round);
        blst_p1_mult(&mut id_times_r, &id_point, r.b.as_ptr(), SCALAR_BITS);
        blst_p1_to_affine(&mut id_affine, &id_times_r);
    }
    let gid = pairing(network_key, &id_affine);

    let v = xor32(&sigma, &mask_from_gt(&gid));
    let w = xor32(file_key, &mask_from_sigma(&sigma));
    sigma.zeroize();

    Ok(IbeCiphertext { u, v, w })
}

/// Recover the key from a ciphertext using the round's signature.
///
/// The Fujisaki-Okamoto check re-derives the ephemeral point from the
/// recovered values; any mismatch (wrong round, tampered ciphertext) fails
/// closed as [`TimelockError::InvalidCiphertext`].
pub(crate) fn decrypt_key(
    ciphertext: &IbeCiphertext,
    signature: &blst_p1_affine,
) -> Result<[u8; 32], TimelockError> {
    let mut u_affine = blst_p2_affine::default();
    let err = unsafe { blst_p2_uncompress(&mut u_affine, ciphertext.u.as_ptr()) };
    if err != BLST_ERROR::BLST_SUCCESS
        || unsafe { blst_p2_affine_is_inf(&u_affine) || !blst_p2_affine_in_g2(&u_affine) }
    {
        return Err(TimelockError::InvalidCiphertext);
    }

    // e(signature, U) equals the encryptor's e(r * H1(round), pk) exactly
    // when the signature is over this round's message.
    let gid = pairing(&u_affine, signature);

    let mut sigma = xor32(&ciphertext.v, &mask_from_gt(&gid));
    let file_key = xor32(&ciphertext.w, &mask_from_sigma(&sigma));

    let r = derive_r(&sigma, &file_key);
    sigma.zeroize();
    if scalar_times_g2(&r) != ciphertext.u {
        return Err(TimelockError::InvalidCiphertext);
    }

    Ok(file_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A local beacon: master secret, its public key, and per-round signatures.
    struct LocalBeacon {
        sk: blst_scalar,
        pk: blst_p2_affine,
    }

    impl LocalBeacon {
        fn new(seed: &[u8; 32]) -> Self {
            let mut sk = blst_scalar::default();
            unsafe {
                blst_keygen(&mut sk, seed.as_ptr(), seed.len(), std::ptr::null(), 0);
            }
            let pk_bytes = scalar_times_g2(&sk);
            let pk = parse_public_key(&pk_bytes).unwrap();
            Self { sk, pk }
        }

        /// BLS-sign a round's message, matching what a drand node publishes.
        fn sign(&self, round: u64) -> blst_p1_affine {
            let mut s = blst_p1::default();
            let mut affine = blst_p1_affine::default();
            unsafe {
                let id_point = round_point(round);
                blst_p1_mult(&mut s, &id_point, self.sk.b.as_ptr(), SCALAR_BITS);
                blst_p1_to_affine(&mut affine, &s);
            }
            affine
        }
    }

    #[test]
    fn round_signature_recovers_the_key() {
        let beacon = LocalBeacon::new(&[5u8; 32]);
        let file_key = [42u8; 32];
        let ct = encrypt_key(&beacon.pk, 10, &file_key).unwrap();
        let recovered = decrypt_key(&ct, &beacon.sign(10)).unwrap();
        assert_eq!(recovered, file_key);
    }

    #[test]
    fn signature_for_a_different_round_fails_closed() {
        let beacon = LocalBeacon::new(&[5u8; 32]);
        let ct = encrypt_key(&beacon.pk, 10, &[42u8; 32]).unwrap();
        assert!(matches!(
            decrypt_key(&ct, &beacon.sign(11)),
            Err(TimelockError::InvalidCiphertext)
        ));
    }

    #[test]
    fn signature_from_another_network_fails_closed() {
        let beacon = LocalBeacon::new(&[5u8; 32]);
        let other = LocalBeacon::new(&[6u8; 32]);
        let ct = encrypt_key(&beacon.pk, 10, &[42u8; 32]).unwrap();
        assert!(decrypt_key(&ct, &other.sign(10)).is_err());
    }

    #[test]
    fn tampered_commitment_fails_closed() {
        let beacon = LocalBeacon::new(&[5u8; 32]);
        let mut ct = encrypt_key(&beacon.pk, 10, &[42u8; 32]).unwrap();
        ct.v[0] ^= 1;
        assert!(matches!(
            decrypt_key(&ct, &beacon.sign(10)),
            Err(TimelockError::InvalidCiphertext)
        ));
    }

    #[test]
    fn tampered_masked_key_fails_closed() {
        let beacon = LocalBeacon::new(&[5u8; 32]);
        let mut ct = encrypt_key(&beacon.pk, 10, &[42u8; 32]).unwrap();
        ct.w[31] ^= 0x80;
        assert!(matches!(
            decrypt_key(&ct, &beacon.sign(10)),
            Err(TimelockError::InvalidCiphertext)
        ));
    }

    #[test]
    fn each_encryption_is_unique() {
        let beacon = LocalBeacon::new(&[5u8; 32]);
        let a = encrypt_key(&beacon.pk, 10, &[42u8; 32]).unwrap();
        let b = encrypt_key(&beacon.pk, 10, &[42u8; 32]).unwrap();
        assert_ne!(a.u, b.u);
        assert_ne!(a.v, b.v);
    }

    #[test]
    fn truncated_public_key_is_rejected() {
        assert!(matches!(
            parse_public_key(&[0u8; 95]),
            Err(TimelockError::InvalidPublicKey(_))
        ));
    }

    #[test]
    fn infinity_signature_is_rejected() {
        // Compressed infinity: flag bits 0b1100_0000, all else zero.
        let mut inf = [0u8; G1_COMPRESSED];
        inf[0] = 0xc0;
        assert!(matches!(
            parse_signature(&inf),
            Err(TimelockError::InvalidSignature(_))
        ));
    }
}
