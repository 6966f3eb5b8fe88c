//! Cross-strategy integration tests.
//!
//! Every test that doesn't pin a strategy runs against both the native and
//! the field backend, and the two must agree byte for byte. The all-zero seed
//! reference values were cross-checked against an independent Ed25519
//! implementation.

use std::sync::Arc;

use proptest::prelude::*;

use twinkey::backend::{Backend, FieldBackend, IsolatedBackend, NativeBackend};
use twinkey::crypto::birational::{FieldConversion, LibraryConversion, MontgomeryConversion};
use twinkey::crypto::codec;
use twinkey::{Engine, EngineConfig, TwinkeyError, VerifyMode, WirePolicy};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const ZERO_SEED_PUBLIC: &str =
    "053b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29";

const ZERO_SEED_SIG_TEST: &str = "9653710561c3169b7a9577a01955169def183fb3ae282e05bec624826e255b0c\
                                  3eede3ecfe054fb5a40efeaef040afaa45220ccd7bf8413ba531f24f3f869209";

fn strategies() -> Vec<Box<dyn Backend>> {
    vec![
        Box::new(NativeBackend::new(WirePolicy::AcceptLegacy)),
        Box::new(FieldBackend::new(WirePolicy::AcceptLegacy)),
    ]
}

// ---------------------------------------------------------------------------
// Known answers
// ---------------------------------------------------------------------------

#[test]
fn zero_seed_public_key() {
    for b in strategies() {
        let kp = b.create_key_pair(&[0u8; 32]).unwrap();
        assert_eq!(kp.public_key().to_hex(), ZERO_SEED_PUBLIC, "{}", b.name());
    }
}

#[test]
fn zero_seed_signature_over_test() {
    for b in strategies() {
        let sig = b.sign(&[0u8; 32], b"test").unwrap();
        assert_eq!(sig.to_hex(), ZERO_SEED_SIG_TEST, "{}", b.name());
        let public = hex::decode(ZERO_SEED_PUBLIC).unwrap();
        assert!(b.verify(&public, b"test", sig.as_bytes()).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Determinism and round-trips
// ---------------------------------------------------------------------------

#[test]
fn create_key_pair_is_deterministic() {
    for b in strategies() {
        let a = b.create_key_pair(&[0x42; 32]).unwrap();
        let c = b.create_key_pair(&[0x42; 32]).unwrap();
        assert_eq!(a, c);
        assert_eq!(a.public_key().as_bytes()[0], 0x05);
        assert_eq!(a.private_key().as_bytes(), &[0x42; 32]);
    }
}

#[test]
fn sign_then_verify() {
    for b in strategies() {
        let kp = b.create_key_pair(&[7u8; 32]).unwrap();
        let msg = b"settle invoice 2231 with carol";
        let sig = b.sign(&[7u8; 32], msg).unwrap();
        assert!(b.verify(kp.public_key().as_bytes(), msg, sig.as_bytes()).unwrap());
    }
}

#[test]
fn wrong_signature_is_false_not_error() {
    for b in strategies() {
        let kp = b.create_key_pair(&[7u8; 32]).unwrap();
        let mut sig = *b.sign(&[7u8; 32], b"hello").unwrap().as_bytes();
        sig[10] ^= 0x01;
        assert_eq!(b.verify(kp.public_key().as_bytes(), b"hello", &sig), Ok(false));

        let other = b.create_key_pair(&[8u8; 32]).unwrap();
        let good = b.sign(&[7u8; 32], b"hello").unwrap();
        assert_eq!(
            b.verify(other.public_key().as_bytes(), b"hello", good.as_bytes()),
            Ok(false)
        );
    }
}

#[test]
fn agreement_is_symmetric_across_strategies() {
    let native = NativeBackend::default();
    let field = FieldBackend::default();
    let alice = native.create_key_pair(&[0xA1; 32]).unwrap();
    let bob = field.create_key_pair(&[0xB0; 32]).unwrap();

    let from_alice = native.agree(bob.public_key().as_bytes(), &[0xA1; 32]).unwrap();
    let from_bob = field.agree(alice.public_key().as_bytes(), &[0xB0; 32]).unwrap();
    assert_eq!(from_alice, from_bob);

    // And each strategy alone computes the same bytes as the other.
    assert_eq!(
        from_alice,
        field.agree(bob.public_key().as_bytes(), &[0xA1; 32]).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Trusted bootstrap
// ---------------------------------------------------------------------------

#[test]
fn trusted_bootstrap_skips_everything() {
    for b in strategies() {
        let kp = b.create_key_pair(&[3u8; 32]).unwrap();
        assert_eq!(
            b.verify_signature(
                kp.public_key().as_bytes(),
                b"anything",
                &[0u8; 64],
                VerifyMode::TrustedBootstrap
            ),
            Ok(true)
        );
        // Not even shapes are looked at.
        assert_eq!(
            b.verify_signature(&[], &[], &[1, 2, 3], VerifyMode::TrustedBootstrap),
            Ok(true)
        );
    }
}

// ---------------------------------------------------------------------------
// Boundaries
// ---------------------------------------------------------------------------

#[test]
fn seed_length_boundaries() {
    for b in strategies() {
        for len in [0usize, 31, 33] {
            assert_eq!(
                b.create_key_pair(&vec![0u8; len]).unwrap_err(),
                TwinkeyError::InvalidSeed { len }
            );
        }
    }
}

#[test]
fn empty_message_is_rejected() {
    for b in strategies() {
        assert_eq!(
            b.sign(&[1u8; 32], b"").unwrap_err(),
            TwinkeyError::InvalidMessage
        );
        let kp = b.create_key_pair(&[1u8; 32]).unwrap();
        assert_eq!(
            b.verify(kp.public_key().as_bytes(), b"", &[0u8; 64]).unwrap_err(),
            TwinkeyError::InvalidMessage
        );
    }
}

#[test]
fn signature_length_boundaries() {
    for b in strategies() {
        let kp = b.create_key_pair(&[1u8; 32]).unwrap();
        for len in [63usize, 65] {
            assert_eq!(
                b.verify(kp.public_key().as_bytes(), b"m", &vec![0u8; len])
                    .unwrap_err(),
                TwinkeyError::InvalidSignature { len }
            );
        }
    }
}

#[test]
fn malformed_wire_keys() {
    for b in strategies() {
        let mut bad_tag = [0u8; 33];
        bad_tag[0] = 0x04;
        for wire in [&[0u8; 0][..], &[0x05u8; 10][..], &bad_tag[..], &[0x05u8; 34][..]] {
            assert!(
                matches!(b.agree(wire, &[1u8; 32]), Err(TwinkeyError::InvalidKey(_))),
                "{} accepted {} bytes",
                b.name(),
                wire.len()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Legacy wire form
// ---------------------------------------------------------------------------

#[test]
fn legacy_key_is_accepted_by_default() {
    for b in strategies() {
        let kp = b.create_key_pair(&[5u8; 32]).unwrap();
        let legacy = kp.public_key().coordinate();
        let sig = b.sign(&[5u8; 32], b"old peer").unwrap();
        assert!(b.verify(&legacy, b"old peer", sig.as_bytes()).unwrap());
        assert_eq!(
            b.agree(&legacy, &[6u8; 32]).unwrap(),
            b.agree(kp.public_key().as_bytes(), &[6u8; 32]).unwrap()
        );
    }
}

#[test]
fn strict_policy_rejects_legacy_key() {
    let strict: Vec<Box<dyn Backend>> = vec![
        Box::new(NativeBackend::new(WirePolicy::Strict)),
        Box::new(FieldBackend::new(WirePolicy::Strict)),
    ];
    for b in strict {
        let kp = b.create_key_pair(&[5u8; 32]).unwrap();
        let sig = b.sign(&[5u8; 32], b"old peer").unwrap();
        let legacy = kp.public_key().coordinate();
        assert!(matches!(
            b.verify(&legacy, b"old peer", sig.as_bytes()),
            Err(TwinkeyError::InvalidKey(_))
        ));
        assert!(b
            .verify(kp.public_key().as_bytes(), b"old peer", sig.as_bytes())
            .unwrap());
    }
}

// ---------------------------------------------------------------------------
// Error parity between strategies
// ---------------------------------------------------------------------------

#[test]
fn strategies_fail_the_same_way() {
    let p_le = twinkey::config::FIELD_PRIME_LE;
    let mut off_curve = [0u8; 32];
    off_curve[0] = 2;
    let mut identity = [0u8; 32];
    identity[0] = 1;

    let cases: Vec<Vec<u8>> = vec![
        codec::encode(&p_le).to_vec(),
        codec::encode(&off_curve).to_vec(),
        codec::encode(&identity).to_vec(),
        vec![0x07; 33],
    ];

    let native = NativeBackend::default();
    let field = FieldBackend::default();
    for wire in cases {
        let n = native.agree(&wire, &[9u8; 32]);
        let f = field.agree(&wire, &[9u8; 32]);
        assert_eq!(
            std::mem::discriminant(&n.unwrap_err()),
            std::mem::discriminant(&f.unwrap_err())
        );
    }
}

// ---------------------------------------------------------------------------
// Engine and free functions
// ---------------------------------------------------------------------------

#[test]
fn free_functions_use_global_engine() {
    let kp = twinkey::create_key_pair(&[0u8; 32]).unwrap();
    assert_eq!(kp.public_key().to_hex(), ZERO_SEED_PUBLIC);

    let sig = twinkey::calculate_signature(&[0u8; 32], b"test").unwrap();
    assert_eq!(sig.to_hex(), ZERO_SEED_SIG_TEST);
    assert!(twinkey::verify_signature(
        kp.public_key().as_bytes(),
        b"test",
        sig.as_bytes(),
        VerifyMode::Cryptographic
    )
    .unwrap());

    let fresh = twinkey::generate_key_pair().unwrap();
    let ab = twinkey::calculate_agreement(fresh.public_key().as_bytes(), &[0u8; 32]).unwrap();
    let ba =
        twinkey::calculate_agreement(kp.public_key().as_bytes(), fresh.private_key().as_bytes())
            .unwrap();
    assert_eq!(ab, ba);

    // Same engine every time.
    assert!(std::ptr::eq(
        Engine::global().unwrap(),
        Engine::global().unwrap()
    ));
}

#[test]
fn free_functions_run_inline_without_a_runtime() {
    // Isolation is opt-in per call site; the variable is not an engine
    // setting, so plain synchronous callers keep working.
    std::env::set_var("TWINKEY_ISOLATED", "1");
    assert!(tokio::runtime::Handle::try_current().is_err());
    let kp = twinkey::create_key_pair(&[0u8; 32]).unwrap();
    assert_eq!(kp.public_key().to_hex(), ZERO_SEED_PUBLIC);
    let sig = twinkey::calculate_signature(&[0u8; 32], b"test").unwrap();
    assert_eq!(sig.to_hex(), ZERO_SEED_SIG_TEST);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn isolated_engine_matches_direct() {
    let engine = Engine::new(EngineConfig::default()).unwrap();
    let isolated = engine.isolated();
    let kp = isolated.create_key_pair(vec![0u8; 32]).await.unwrap();
    assert_eq!(kp, engine.backend().create_key_pair(&[0u8; 32]).unwrap());

    let ok = isolated
        .verify_signature(
            kp.public_key().as_bytes().to_vec(),
            b"test".to_vec(),
            hex::decode(ZERO_SEED_SIG_TEST).unwrap(),
            VerifyMode::Cryptographic,
        )
        .await
        .unwrap();
    assert!(ok);
}

#[tokio::test]
async fn isolated_over_field_backend() {
    let isolated = IsolatedBackend::new(Arc::new(FieldBackend::default()));
    let a = isolated.create_key_pair(vec![1u8; 32]).await.unwrap();
    let b = isolated.create_key_pair(vec![2u8; 32]).await.unwrap();
    let ab = isolated
        .agree(b.public_key().as_bytes().to_vec(), vec![1u8; 32])
        .await
        .unwrap();
    let ba = isolated
        .agree(a.public_key().as_bytes().to_vec(), vec![2u8; 32])
        .await
        .unwrap();
    assert_eq!(ab, ba);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn codec_preserves_coordinate(coordinate in any::<[u8; 32]>()) {
        let wire = codec::encode(&coordinate);
        prop_assert_eq!(wire[0], 0x05);
        let decoded = codec::decode(&wire).unwrap();
        prop_assert_eq!(decoded.coordinate, coordinate);
        prop_assert!(!decoded.is_legacy());
    }

    #[test]
    fn both_strategies_derive_the_same_identity(seed in any::<[u8; 32]>()) {
        let n = NativeBackend::default().create_key_pair(&seed).unwrap();
        let f = FieldBackend::default().create_key_pair(&seed).unwrap();
        prop_assert_eq!(n, f);
    }

    #[test]
    fn conversions_agree_on_real_keys(seed in any::<[u8; 32]>()) {
        let kp = NativeBackend::default().create_key_pair(&seed).unwrap();
        let y = kp.public_key().coordinate();
        prop_assert_eq!(
            FieldConversion.to_montgomery(&y).unwrap(),
            LibraryConversion.to_montgomery(&y).unwrap()
        );
    }

    #[test]
    fn any_message_round_trips(seed in any::<[u8; 32]>(), msg in proptest::collection::vec(any::<u8>(), 1..256)) {
        let b = FieldBackend::default();
        let kp = b.create_key_pair(&seed).unwrap();
        let sig = b.sign(&seed, &msg).unwrap();
        prop_assert!(b.verify(kp.public_key().as_bytes(), &msg, sig.as_bytes()).unwrap());
    }
}
