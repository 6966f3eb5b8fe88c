// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Twinkey — One Seed, Two Curves
//!
//! A single 32-byte seed is both an Ed25519 signing identity and an X25519
//! key-agreement identity. Peers publish one public key (the tagged Edwards
//! y-coordinate) and get both signatures and Diffie-Hellman out of it.
//!
//! ## Layout
//!
//! - **crypto** — value types, the public-key wire codec, input validation,
//!   and the Edwards → Montgomery birational map.
//! - **backend** — the operation contract and its strategies: library-native,
//!   field-arithmetic, and off-thread dispatch, plus the self-testing
//!   [`Engine`] that picks one at startup.
//! - **config** — fixed sizes, wire constants, and engine configuration.
//! - **error** — the one error type everything returns.
//!
//! ## Quick use
//!
//! The free functions below go through the process-wide [`Engine`],
//! configured from `TWINKEY_*` environment variables on first call. For an
//! explicit config, call [`Engine::init_global`] first or build an
//! [`Engine`] of your own.
//!
//! ```
//! let alice = twinkey::create_key_pair(&[1u8; 32]).unwrap();
//! let bob = twinkey::create_key_pair(&[2u8; 32]).unwrap();
//!
//! let ab = twinkey::calculate_agreement(bob.public_key().as_bytes(), &[1u8; 32]).unwrap();
//! let ba = twinkey::calculate_agreement(alice.public_key().as_bytes(), &[2u8; 32]).unwrap();
//! assert_eq!(ab, ba);
//! ```

pub mod backend;
pub mod config;
pub mod crypto;
pub mod error;

pub use backend::{Backend, Capability, Engine, IsolatedBackend, VerifyMode};
pub use config::{BackendKind, EngineConfig, WirePolicy};
pub use crypto::{KeyPair, PublicKey, Seed, SharedSecret, Signature};
pub use error::{TwinkeyError, TwinkeyResult};

/// Fresh key pair from OS randomness.
pub fn generate_key_pair() -> TwinkeyResult<KeyPair> {
    Engine::global()?.backend().generate_key_pair()
}

/// Key pair derived deterministically from a 32-byte seed.
pub fn create_key_pair(seed: &[u8]) -> TwinkeyResult<KeyPair> {
    Engine::global()?.backend().create_key_pair(seed)
}

/// X25519 shared secret between our seed and a peer's wire public key.
pub fn calculate_agreement(public_wire: &[u8], seed: &[u8]) -> TwinkeyResult<SharedSecret> {
    Engine::global()?.backend().agree(public_wire, seed)
}

/// Deterministic Ed25519 signature over `message`.
pub fn calculate_signature(seed: &[u8], message: &[u8]) -> TwinkeyResult<Signature> {
    Engine::global()?.backend().sign(seed, message)
}

/// Check a detached signature. See [`VerifyMode`] for the bootstrap bypass.
pub fn verify_signature(
    public_wire: &[u8],
    message: &[u8],
    signature: &[u8],
    mode: VerifyMode,
) -> TwinkeyResult<bool> {
    Engine::global()?
        .backend()
        .verify_signature(public_wire, message, signature, mode)
}
