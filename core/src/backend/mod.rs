//! # Backend Contract
//!
//! One operation set (generate, create, agree, sign, verify) with several
//! interchangeable strategies behind it:
//!
//! - [`NativeBackend`] — the curve library converts Ed25519 keys to X25519
//!   itself ([`Capability::NativeDualCurve`]).
//! - [`FieldBackend`] — the curve library only does Edwards; the X25519
//!   coordinate comes from our own field arithmetic
//!   ([`Capability::EdwardsOnlyWithConversion`]).
//! - [`IsolatedBackend`] — wraps either of the above and runs each call on
//!   tokio's blocking pool, handing back a future.
//!
//! The strategy is picked from [`EngineConfig`](crate::config::EngineConfig)
//! when the [`Engine`] starts. Nothing downstream inspects which concrete
//! type it got.
//!
//! All strategies must produce byte-identical output for the same inputs.
//! The integration tests in `tests/backends.rs` hold them to that.

mod edwards;
pub mod engine;
pub mod field;
pub mod gate;
pub mod isolated;
pub mod native;

use rand::rngs::OsRng;
use rand_core::RngCore;

use crate::config::SEED_LENGTH;
use crate::crypto::keys::{KeyPair, SharedSecret, Signature};
use crate::error::{TwinkeyError, TwinkeyResult};

pub use engine::Engine;
pub use field::FieldBackend;
pub use gate::InitGate;
pub use isolated::IsolatedBackend;
pub use native::NativeBackend;

/// What the underlying curve library can do on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Ed25519 → X25519 conversion is a library primitive.
    NativeDualCurve,
    /// Edwards only. X25519 needs the manual birational map.
    EdwardsOnlyWithConversion,
}

/// How `verify_signature` treats its input.
///
/// Deliberately not a `bool`: skipping verification has to be spelled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyMode {
    /// Decode the key and run Ed25519 verification.
    #[default]
    Cryptographic,
    /// Return `true` without looking at anything.
    ///
    /// Only for a calling protocol that has already authenticated this key
    /// through its own bootstrap step. Nothing is decoded or checked, not
    /// even lengths.
    TrustedBootstrap,
}

/// The operation set every strategy implements.
///
/// All methods are pure functions of their arguments: no caching, no shared
/// mutable state, safe to call from any number of threads at once.
pub trait Backend: Send + Sync {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    fn capability(&self) -> Capability;

    /// Derive `{0x05 ‖ ed25519_pub(seed), seed}`.
    ///
    /// # Errors
    ///
    /// [`TwinkeyError::InvalidSeed`] unless `seed` is exactly 32 bytes.
    fn create_key_pair(&self, seed: &[u8]) -> TwinkeyResult<KeyPair>;

    /// X25519 agreement between our seed and a peer's Ed25519 wire key.
    ///
    /// # Errors
    ///
    /// - [`TwinkeyError::InvalidSeed`] for a bad seed.
    /// - [`TwinkeyError::InvalidKey`] if the wire key doesn't decode, has no
    ///   Montgomery image, or yields an all-zero (low-order) result.
    /// - [`TwinkeyError::BackendFailure`] if the key is not a curve point.
    fn agree(&self, public_wire: &[u8], seed: &[u8]) -> TwinkeyResult<SharedSecret>;

    /// Deterministic Ed25519 signature.
    ///
    /// # Errors
    ///
    /// [`TwinkeyError::InvalidSeed`] / [`TwinkeyError::InvalidMessage`].
    fn sign(&self, seed: &[u8], message: &[u8]) -> TwinkeyResult<Signature>;

    /// Verify a detached signature.
    ///
    /// `Ok(false)` means the signature doesn't check out. That includes a
    /// key that isn't a curve point. Only malformed input is an `Err`.
    ///
    /// # Errors
    ///
    /// [`TwinkeyError::InvalidMessage`], [`TwinkeyError::InvalidSignature`],
    /// [`TwinkeyError::InvalidKey`]. Never in [`VerifyMode::TrustedBootstrap`].
    fn verify_signature(
        &self,
        public_wire: &[u8],
        message: &[u8],
        signature: &[u8],
        mode: VerifyMode,
    ) -> TwinkeyResult<bool>;

    /// The X25519 public coordinate a peer holding this Ed25519 key answers
    /// to. Same conversion path as [`agree`](Self::agree).
    fn montgomery_public(&self, public_wire: &[u8]) -> TwinkeyResult<[u8; 32]>;

    /// [`verify_signature`](Self::verify_signature) in
    /// [`VerifyMode::Cryptographic`].
    fn verify(&self, public_wire: &[u8], message: &[u8], signature: &[u8]) -> TwinkeyResult<bool> {
        self.verify_signature(public_wire, message, signature, VerifyMode::Cryptographic)
    }

    /// Fresh identity from the OS RNG.
    ///
    /// # Errors
    ///
    /// [`TwinkeyError::BackendFailure`] if the RNG can't deliver.
    fn generate_key_pair(&self) -> TwinkeyResult<KeyPair> {
        let mut seed = zeroize::Zeroizing::new([0u8; SEED_LENGTH]);
        OsRng
            .try_fill_bytes(&mut seed[..])
            .map_err(|e| TwinkeyError::BackendFailure(format!("random source failed: {e}")))?;
        self.create_key_pair(&seed[..])
    }
}

/// Build the direct (non-isolated) strategy for a config.
pub fn from_config(config: &crate::config::EngineConfig) -> std::sync::Arc<dyn Backend> {
    use crate::config::BackendKind;
    match config.backend {
        BackendKind::Native => std::sync::Arc::new(NativeBackend::new(config.wire_policy)),
        BackendKind::Field => std::sync::Arc::new(FieldBackend::new(config.wire_policy)),
    }
}
