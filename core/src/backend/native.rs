//! Native dual-curve strategy.
//!
//! ed25519-dalek already knows how to turn an Ed25519 identity into X25519
//! material: `SigningKey::to_scalar_bytes` for our half and curve25519-dalek's
//! `to_montgomery` for the peer's. This strategy just wires those together.

use ed25519_dalek::SigningKey;
use zeroize::Zeroizing;

use super::{edwards, Backend, Capability, VerifyMode};
use crate::config::WirePolicy;
use crate::crypto::birational::ConversionChain;
use crate::crypto::keys::{KeyPair, SharedSecret, Signature};
use crate::crypto::validation::check_seed;
use crate::error::TwinkeyResult;

/// Library-native Ed25519 + X25519.
#[derive(Debug)]
pub struct NativeBackend {
    policy: WirePolicy,
    conversion: ConversionChain,
}

impl NativeBackend {
    pub fn new(policy: WirePolicy) -> Self {
        Self {
            policy,
            conversion: ConversionChain::for_capability(Capability::NativeDualCurve),
        }
    }
}

impl Default for NativeBackend {
    fn default() -> Self {
        Self::new(WirePolicy::default())
    }
}

impl Backend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn capability(&self) -> Capability {
        Capability::NativeDualCurve
    }

    fn create_key_pair(&self, seed: &[u8]) -> TwinkeyResult<KeyPair> {
        tracing::debug!(backend = self.name(), "create_key_pair");
        edwards::create_key_pair(seed)
    }

    fn agree(&self, public_wire: &[u8], seed: &[u8]) -> TwinkeyResult<SharedSecret> {
        tracing::debug!(backend = self.name(), "agree");
        let seed = check_seed(seed)?;
        let peer_u = self.montgomery_public(public_wire)?;
        // Unclamped hash half; StaticSecret clamps on use.
        let scalar = Zeroizing::new(SigningKey::from_bytes(seed).to_scalar_bytes());
        edwards::diffie_hellman(&scalar, peer_u)
    }

    fn sign(&self, seed: &[u8], message: &[u8]) -> TwinkeyResult<Signature> {
        tracing::debug!(backend = self.name(), "sign");
        edwards::sign(seed, message)
    }

    fn verify_signature(
        &self,
        public_wire: &[u8],
        message: &[u8],
        signature: &[u8],
        mode: VerifyMode,
    ) -> TwinkeyResult<bool> {
        tracing::debug!(backend = self.name(), ?mode, "verify");
        edwards::verify_signature(public_wire, message, signature, mode, self.policy)
    }

    fn montgomery_public(&self, public_wire: &[u8]) -> TwinkeyResult<[u8; 32]> {
        let coordinate = edwards::decode_curve_point(public_wire, self.policy)?;
        self.conversion.convert(&coordinate)
    }
}
