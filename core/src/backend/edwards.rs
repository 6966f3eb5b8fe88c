//! Ed25519 plumbing shared by every strategy.
//!
//! Key derivation, signing and verification are the same no matter how the
//! X25519 half is obtained, so they live here once. Only agreement differs
//! between strategies.

use curve25519_dalek::edwards::CompressedEdwardsY;
use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha512};
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::{Zeroize, Zeroizing};

use crate::backend::VerifyMode;
use crate::config::{WirePolicy, COORDINATE_LENGTH, SEED_LENGTH};
use crate::crypto::codec;
use crate::crypto::keys::{KeyPair, PublicKey, Seed, SharedSecret, Signature};
use crate::crypto::validation::{check_message, check_seed, check_signature};
use crate::error::{TwinkeyError, TwinkeyResult};

/// `{0x05 ‖ ed25519_pub(seed), seed}`.
pub(crate) fn create_key_pair(seed: &[u8]) -> TwinkeyResult<KeyPair> {
    let seed = check_seed(seed)?;
    let public = SigningKey::from_bytes(seed).verifying_key().to_bytes();
    Ok(KeyPair::new(
        PublicKey::from_coordinate(&public),
        Seed::from_bytes(*seed),
    ))
}

pub(crate) fn sign(seed: &[u8], message: &[u8]) -> TwinkeyResult<Signature> {
    let seed = check_seed(seed)?;
    let message = check_message(message)?;
    let signature = SigningKey::from_bytes(seed).sign(message);
    Ok(Signature::from_bytes(signature.to_bytes()))
}

pub(crate) fn verify_signature(
    public_wire: &[u8],
    message: &[u8],
    signature: &[u8],
    mode: VerifyMode,
    policy: WirePolicy,
) -> TwinkeyResult<bool> {
    if mode == VerifyMode::TrustedBootstrap {
        tracing::debug!("signature check skipped: trusted bootstrap");
        return Ok(true);
    }

    let message = check_message(message)?;
    let signature = check_signature(signature)?;
    let key = codec::decode_with_policy(public_wire, policy)?;

    let Ok(verifying_key) = VerifyingKey::from_bytes(&key.coordinate) else {
        return Ok(false);
    };
    let signature = DalekSignature::from_bytes(signature);
    Ok(verifying_key.verify(message, &signature).is_ok())
}

/// Decode a wire key and make sure the coordinate decompresses to a point.
///
/// Shape problems are `InvalidKey`; a well-formed encoding that isn't on the
/// curve is the library rejecting it, so `BackendFailure`.
pub(crate) fn decode_curve_point(
    public_wire: &[u8],
    policy: WirePolicy,
) -> TwinkeyResult<[u8; COORDINATE_LENGTH]> {
    let key = codec::decode_with_policy(public_wire, policy)?;
    if CompressedEdwardsY(key.coordinate).decompress().is_none() {
        return Err(TwinkeyError::BackendFailure(
            "public key is not a point on the curve".into(),
        ));
    }
    Ok(key.coordinate)
}

/// X25519 scalar by hand: SHA-512(seed)[..32], clamped.
///
/// Identical to the scalar Ed25519 signs with.
pub(crate) fn clamped_scalar(seed: &[u8; SEED_LENGTH]) -> Zeroizing<[u8; 32]> {
    let mut hash = Sha512::digest(seed);
    let mut scalar = Zeroizing::new([0u8; 32]);
    scalar.copy_from_slice(&hash[..32]);
    hash.as_mut_slice().zeroize();
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
    scalar
}

/// `scalar · u`, rejecting an all-zero result.
pub(crate) fn diffie_hellman(
    scalar: &[u8; 32],
    montgomery_u: [u8; COORDINATE_LENGTH],
) -> TwinkeyResult<SharedSecret> {
    let secret = StaticSecret::from(*scalar);
    let shared = secret.diffie_hellman(&X25519Public::from(montgomery_u));
    if !shared.was_contributory() {
        return Err(TwinkeyError::InvalidKey(
            "low-order public key: agreement is all zeros".into(),
        ));
    }
    Ok(SharedSecret::from_bytes(shared.to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scalar_matches_library() {
        // ed25519-dalek hands out the unclamped hash half; x25519 clamps it
        // on use, so compare after clamping.
        let seed = [0x5Au8; 32];
        let mut library = SigningKey::from_bytes(&seed).to_scalar_bytes();
        library[0] &= 248;
        library[31] &= 127;
        library[31] |= 64;
        assert_eq!(*clamped_scalar(&seed), library);
    }

    #[test]
    fn test_off_curve_key_is_backend_failure() {
        // y = 2 has no x on the curve.
        let mut y = [0u8; 32];
        y[0] = 2;
        let wire = codec::encode(&y);
        assert!(matches!(
            decode_curve_point(&wire, WirePolicy::AcceptLegacy),
            Err(TwinkeyError::BackendFailure(_))
        ));
    }

    #[test]
    fn test_zero_u_is_rejected() {
        let scalar = clamped_scalar(&[1u8; 32]);
        assert!(matches!(
            diffie_hellman(&scalar, [0u8; 32]),
            Err(TwinkeyError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_verify_off_curve_key_is_false_not_error() {
        let mut y = [0u8; 32];
        y[0] = 2;
        let wire = codec::encode(&y);
        let verdict = verify_signature(
            &wire,
            b"msg",
            &[0u8; 64],
            VerifyMode::Cryptographic,
            WirePolicy::AcceptLegacy,
        );
        assert_eq!(verdict, Ok(false));
    }
}
