//! Edwards-only strategy with the manual birational map.
//!
//! Pretends the curve library can do Ed25519 and raw X25519 scalar
//! multiplication but has no bridge between them. The bridge is ours: the
//! peer's u-coordinate comes from [`FieldConversion`] and our scalar from
//! hashing and clamping the seed by hand.
//!
//! Output is byte-identical to [`NativeBackend`](super::NativeBackend).
//!
//! [`FieldConversion`]: crate::crypto::birational::FieldConversion

use super::{edwards, Backend, Capability, VerifyMode};
use crate::config::WirePolicy;
use crate::crypto::birational::ConversionChain;
use crate::crypto::keys::{KeyPair, SharedSecret, Signature};
use crate::crypto::validation::check_seed;
use crate::error::TwinkeyResult;

/// Ed25519 library + field-arithmetic Edwards→Montgomery conversion.
#[derive(Debug)]
pub struct FieldBackend {
    policy: WirePolicy,
    conversion: ConversionChain,
}

impl FieldBackend {
    pub fn new(policy: WirePolicy) -> Self {
        Self {
            policy,
            conversion: ConversionChain::for_capability(Capability::EdwardsOnlyWithConversion),
        }
    }
}

impl Default for FieldBackend {
    fn default() -> Self {
        Self::new(WirePolicy::default())
    }
}

impl Backend for FieldBackend {
    fn name(&self) -> &'static str {
        "field"
    }

    fn capability(&self) -> Capability {
        Capability::EdwardsOnlyWithConversion
    }

    fn create_key_pair(&self, seed: &[u8]) -> TwinkeyResult<KeyPair> {
        tracing::debug!(backend = self.name(), "create_key_pair");
        edwards::create_key_pair(seed)
    }

    fn agree(&self, public_wire: &[u8], seed: &[u8]) -> TwinkeyResult<SharedSecret> {
        tracing::debug!(backend = self.name(), "agree");
        let seed = check_seed(seed)?;
        let peer_u = self.montgomery_public(public_wire)?;
        let scalar = edwards::clamped_scalar(seed);
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
