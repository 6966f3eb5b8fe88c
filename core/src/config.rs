//! # Constants & Engine Configuration
//!
//! Every magic number in twinkey lives here: key and signature lengths, the
//! wire tag, the field prime. If you're hardcoding a `32` somewhere else,
//! you're doing it wrong.
//!
//! The second half of the file is the runtime configuration for the global
//! [`Engine`](crate::backend::Engine): the backing strategy and how strict
//! the wire decoder is about legacy keys.
//!
//! Off-thread dispatch is not an engine setting. Every engine call runs
//! inline; callers that want a deferred result wrap the backend in
//! [`IsolatedBackend`](crate::backend::IsolatedBackend) themselves (the CLI
//! does this for `--isolated`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Key Material
// ---------------------------------------------------------------------------

/// Seed length in bytes. The seed *is* the private key.
pub const SEED_LENGTH: usize = 32;

/// Length of a raw curve coordinate (Edwards y or Montgomery u).
pub const COORDINATE_LENGTH: usize = 32;

/// Version tag prepended to every public key on the wire.
pub const PUBLIC_KEY_TAG: u8 = 0x05;

/// Tagged wire public key: 1 tag byte + 32-byte coordinate.
pub const WIRE_PUBLIC_KEY_LENGTH: usize = COORDINATE_LENGTH + 1;

/// Legacy untagged wire public key. Still accepted, never produced.
pub const LEGACY_PUBLIC_KEY_LENGTH: usize = COORDINATE_LENGTH;

/// Detached Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// X25519 shared secret length.
pub const SHARED_SECRET_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Field Parameters
// ---------------------------------------------------------------------------

/// p = 2^255 - 19, decimal. Fed to the `ark-ff` field derive in
/// [`crypto::birational`](crate::crypto::birational).
pub const FIELD_PRIME_DECIMAL: &str =
    "57896044618658097711785492504343953926634992332820282019728792003956564819949";

/// p = 2^255 - 19, little-endian bytes.
pub const FIELD_PRIME_LE: [u8; 32] = [
    0xed, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x7f,
];

/// Sign bit of the compressed Edwards encoding (top bit of the last byte).
pub const EDWARDS_SIGN_BIT: u8 = 0x80;

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// Selects the backend strategy. Values: `native`, `field`.
pub const ENV_BACKEND: &str = "TWINKEY_BACKEND";

/// Reject legacy untagged public keys. Values: `1`/`true`.
pub const ENV_STRICT_WIRE: &str = "TWINKEY_STRICT_WIRE";

// ---------------------------------------------------------------------------
// Engine Configuration
// ---------------------------------------------------------------------------

/// Which strategy implements the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Library-native dual-curve support (Ed25519 → X25519 in dalek).
    #[default]
    Native,
    /// Edwards-only library plus the manual field-arithmetic birational map.
    Field,
}

impl BackendKind {
    /// Stable lowercase name, used in logs and the CLI.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Native => "native",
            BackendKind::Field => "field",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(BackendKind::Native),
            "field" => Ok(BackendKind::Field),
            other => Err(format!("unknown backend '{other}' (expected native|field)")),
        }
    }
}

/// How the wire decoder treats untagged 32-byte public keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WirePolicy {
    /// Accept legacy keys, log a warning each time.
    #[default]
    AcceptLegacy,
    /// Reject anything that isn't the tagged 33-byte form.
    Strict,
}

/// Runtime configuration for the global engine.
///
/// Read once, at engine initialization. Changing the environment after the
/// engine is up has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Strategy behind the five operations.
    pub backend: BackendKind,
    /// Legacy key handling.
    pub wire_policy: WirePolicy,
}

impl EngineConfig {
    /// Build a config from `TWINKEY_*` environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// An unparseable `TWINKEY_BACKEND` is an error, never a quiet fallback to
    /// the default strategy.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup(ENV_BACKEND) {
            Some(v) => v.parse()?,
            None => BackendKind::default(),
        };
        let wire_policy = if lookup(ENV_STRICT_WIRE).as_deref().is_some_and(is_truthy) {
            WirePolicy::Strict
        } else {
            WirePolicy::AcceptLegacy
        };
        Ok(Self {
            backend,
            wire_policy,
        })
    }
}

/// `1`, `true`, `yes`, `on`, case-insensitive. Anything else is off.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
