//! # Key Material
//!
//! Value types for the single identity: the 32-byte [`Seed`], the tagged
//! wire [`PublicKey`], the [`KeyPair`] that bundles them, the 64-byte
//! [`Signature`] and the 32-byte [`SharedSecret`].
//!
//! All of these are derived per call and never mutated afterwards. Nothing
//! here does curve math; the backends in [`crate::backend`] produce them.
//!
//! ## Security considerations
//!
//! - `Seed` and `SharedSecret` are zeroized on drop and redact themselves in
//!   `Debug`. Neither implements `Serialize`: exporting a secret is a call to
//!   `to_hex()`, not something that happens because a struct got shoved into
//!   a JSON response.
//! - Key bytes are never logged.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{
    WirePolicy, COORDINATE_LENGTH, SEED_LENGTH, SHARED_SECRET_LENGTH, SIGNATURE_LENGTH,
    WIRE_PUBLIC_KEY_LENGTH,
};
use crate::crypto::{codec, validation};
use crate::error::{TwinkeyError, TwinkeyResult};

fn decode_hex(what: &'static str, s: &str) -> TwinkeyResult<Vec<u8>> {
    hex::decode(s.trim()).map_err(|e| TwinkeyError::InvalidHex {
        what,
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Seed
// ---------------------------------------------------------------------------

/// The 32-byte root of an identity. Doubles as the private key.
///
/// Stored verbatim, never as the library's expanded secret, so a stored
/// private key round-trips through every backend unchanged.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LENGTH]);

impl Seed {
    /// Wrap an already-sized seed.
    pub fn from_bytes(bytes: [u8; SEED_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Validate and copy a seed from an arbitrary byte slice.
    pub fn from_slice(bytes: &[u8]) -> TwinkeyResult<Self> {
        validation::check_seed(bytes).map(|seed| Self(*seed))
    }

    /// Parse a hex-encoded seed.
    pub fn from_hex(s: &str) -> TwinkeyResult<Self> {
        let bytes = decode_hex("seed", s)?;
        Self::from_slice(&bytes)
    }

    /// Raw seed bytes. Handle with care.
    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.0
    }

    /// Hex export. The only way secret bytes leave this type as text.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// A public key in tagged wire form: `0x05 ‖ edwards_y`.
///
/// This type only ever holds the 33-byte tagged encoding. Legacy 32-byte
/// keys are accepted by the operations that take raw wire bytes, but they
/// are never turned into a `PublicKey` behind the caller's back.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; WIRE_PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Tag a raw 32-byte curve coordinate.
    pub fn from_coordinate(coordinate: &[u8; COORDINATE_LENGTH]) -> Self {
        Self(codec::encode(coordinate))
    }

    /// Accept exactly the tagged 33-byte form.
    pub fn from_wire(wire: &[u8]) -> TwinkeyResult<Self> {
        codec::decode_with_policy(wire, WirePolicy::Strict)
            .map(|key| Self::from_coordinate(&key.coordinate))
    }

    /// Full wire bytes, tag included.
    pub fn as_bytes(&self) -> &[u8; WIRE_PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// The Edwards y coordinate without the tag.
    pub fn coordinate(&self) -> [u8; COORDINATE_LENGTH] {
        let mut out = [0u8; COORDINATE_LENGTH];
        out.copy_from_slice(&self.0[1..]);
        out
    }

    /// 66 hex characters, tag first.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex-encoded tagged key.
    pub fn from_hex(s: &str) -> TwinkeyResult<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| TwinkeyError::InvalidKey(format!("bad hex: {e}")))?;
        Self::from_wire(&bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..18])
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// KeyPair
// ---------------------------------------------------------------------------

/// `{public, private}` where private is the seed itself.
///
/// No `Serialize`: exporting the private half should be a deliberate
/// `private_key().to_hex()`.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    public: PublicKey,
    private: Seed,
}

impl KeyPair {
    /// Pair a derived public key with the seed it came from.
    ///
    /// Backends are the only callers; there is no check that the two halves
    /// actually belong together.
    pub fn new(public: PublicKey, private: Seed) -> Self {
        Self { public, private }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    pub fn private_key(&self) -> &Seed {
        &self.private
    }

    pub fn into_parts(self) -> (PublicKey, Seed) {
        (self.public, self.private)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A 64-byte detached Ed25519 signature. Deterministic per (seed, message).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Validate length and copy.
    pub fn from_slice(bytes: &[u8]) -> TwinkeyResult<Self> {
        validation::check_signature(bytes).map(|sig| Self(*sig))
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> TwinkeyResult<Self> {
        let bytes = decode_hex("signature", s)?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}...{})", &hex_str[..8], &hex_str[120..])
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// SharedSecret
// ---------------------------------------------------------------------------

/// Raw X25519 output. Feed it to a KDF before using it as a key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_LENGTH]);

impl SharedSecret {
    pub fn from_bytes(bytes: [u8; SHARED_SECRET_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret([REDACTED])")
    }
}
