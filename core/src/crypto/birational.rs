//! # Edwards → Montgomery Birational Map
//!
//! Ed25519 and X25519 live on the same curve in two different coordinate
//! systems. A twisted Edwards point with y-coordinate `y` corresponds to the
//! Montgomery point with
//!
//! ```text
//! u = (1 + y) / (1 - y)  mod p,   p = 2^255 - 19
//! ```
//!
//! That single formula is what lets one Ed25519 identity key double as an
//! X25519 agreement key.
//!
//! Two providers implement it behind [`MontgomeryConversion`]:
//!
//! - [`LibraryConversion`] — curve25519-dalek's own `to_montgomery`. Used
//!   whenever the backend has a native dual-curve primitive.
//! - [`FieldConversion`] — the formula above over an `ark-ff` prime field.
//!   Exact multi-limb arithmetic; no fixed-width shortcuts.
//!
//! [`ConversionChain`] holds them in priority order so no backend carries its
//! own copy of the conversion.
//!
//! Both providers agree byte-for-byte on every canonical input: the sign bit
//! is masked off, `y >= p` is rejected, and the identity (`y = 1`) has no
//! Montgomery image.

use ark_ff::fields::{Fp256, MontBackend, MontConfig};
use ark_ff::{BigInt, BigInteger, Field, One, PrimeField, Zero};
use curve25519_dalek::edwards::CompressedEdwardsY;
use curve25519_dalek::traits::IsIdentity;

use crate::backend::Capability;
use crate::config::{COORDINATE_LENGTH, EDWARDS_SIGN_BIT};
use crate::error::{TwinkeyError, TwinkeyResult};

/// GF(2^255 - 19).
#[derive(MontConfig)]
#[modulus = "57896044618658097711785492504343953926634992332820282019728792003956564819949"]
#[generator = "2"]
pub struct FqConfig;

/// An element of GF(2^255 - 19).
pub type Fq = Fp256<MontBackend<FqConfig, 4>>;

/// A provider of the Edwards y → Montgomery u conversion.
pub trait MontgomeryConversion: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Whether this provider can run in the current build. Providers that
    /// report `false` are skipped by [`ConversionChain`].
    fn is_available(&self) -> bool {
        true
    }

    /// Map a 32-byte little-endian Edwards y encoding to a 32-byte
    /// little-endian Montgomery u.
    fn to_montgomery(&self, edwards_y: &[u8; COORDINATE_LENGTH])
        -> TwinkeyResult<[u8; COORDINATE_LENGTH]>;
}

// ---------------------------------------------------------------------------
// Field arithmetic
// ---------------------------------------------------------------------------

/// Parse an Edwards encoding into a canonical field element.
///
/// The top bit is the sign of x and is not part of y.
///
/// # Errors
///
/// [`TwinkeyError::InvalidKey`] if the masked value is `>= p`.
pub fn canonical_y(edwards_y: &[u8; COORDINATE_LENGTH]) -> TwinkeyResult<Fq> {
    let mut bytes = *edwards_y;
    bytes[COORDINATE_LENGTH - 1] &= !EDWARDS_SIGN_BIT;

    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word);
    }

    Fq::from_bigint(BigInt::new(limbs))
        .ok_or_else(|| TwinkeyError::InvalidKey("edwards y is not canonical (y >= p)".into()))
}

/// `u = (1 + y) / (1 - y) mod p`.
///
/// # Errors
///
/// [`TwinkeyError::InvalidKey`] for a non-canonical y or for `y = 1`.
pub fn edwards_y_to_montgomery_u(
    edwards_y: &[u8; COORDINATE_LENGTH],
) -> TwinkeyResult<[u8; COORDINATE_LENGTH]> {
    let y = canonical_y(edwards_y)?;

    let numerator = y + Fq::one();
    // (p - y + 1) mod p, i.e. 1 - y without underflow.
    let denominator = Fq::one() - y;
    if denominator.is_zero() {
        return Err(TwinkeyError::InvalidKey(
            "y = 1 (identity) has no Montgomery image".into(),
        ));
    }
    let inverse = denominator
        .inverse()
        .ok_or_else(|| TwinkeyError::InvalidKey("1 - y is not invertible".into()))?;

    let u = numerator * inverse;

    let le = u.into_bigint().to_bytes_le();
    let mut out = [0u8; COORDINATE_LENGTH];
    out.copy_from_slice(&le[..COORDINATE_LENGTH]);
    Ok(out)
}

/// The manual field-arithmetic provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldConversion;

impl MontgomeryConversion for FieldConversion {
    fn name(&self) -> &'static str {
        "field"
    }

    fn to_montgomery(
        &self,
        edwards_y: &[u8; COORDINATE_LENGTH],
    ) -> TwinkeyResult<[u8; COORDINATE_LENGTH]> {
        edwards_y_to_montgomery_u(edwards_y)
    }
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

/// curve25519-dalek's native conversion.
///
/// Stricter than [`FieldConversion`] in one way: the encoding must
/// decompress to a curve point. Backends check that before converting, so
/// on anything that reaches this provider the two agree.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryConversion;

impl MontgomeryConversion for LibraryConversion {
    fn name(&self) -> &'static str {
        "library"
    }

    fn to_montgomery(
        &self,
        edwards_y: &[u8; COORDINATE_LENGTH],
    ) -> TwinkeyResult<[u8; COORDINATE_LENGTH]> {
        // dalek reduces non-canonical y silently; hold it to the same rule.
        canonical_y(edwards_y)?;

        let point = CompressedEdwardsY(*edwards_y)
            .decompress()
            .ok_or_else(|| TwinkeyError::InvalidKey("not a point on the curve".into()))?;
        if point.is_identity() {
            return Err(TwinkeyError::InvalidKey(
                "y = 1 (identity) has no Montgomery image".into(),
            ));
        }
        Ok(point.to_montgomery().to_bytes())
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Conversion providers in priority order.
///
/// The first *available* provider is authoritative: its error is the answer.
/// Later providers only run when an earlier one reports itself unavailable,
/// never as a retry after a rejection.
pub struct ConversionChain {
    providers: Vec<Box<dyn MontgomeryConversion>>,
}

impl ConversionChain {
    /// Build a chain from an explicit provider list.
    pub fn new(providers: Vec<Box<dyn MontgomeryConversion>>) -> Self {
        Self { providers }
    }

    /// The default chain for a backend capability.
    ///
    /// - `NativeDualCurve` → `[library, field]`
    /// - `EdwardsOnlyWithConversion` → `[field]`
    pub fn for_capability(capability: Capability) -> Self {
        match capability {
            Capability::NativeDualCurve => {
                Self::new(vec![Box::new(LibraryConversion), Box::new(FieldConversion)])
            }
            Capability::EdwardsOnlyWithConversion => Self::new(vec![Box::new(FieldConversion)]),
        }
    }

    /// Names of the providers, in priority order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Convert with the first available provider.
    ///
    /// # Errors
    ///
    /// Whatever that provider returns, or [`TwinkeyError::BackendFailure`] if
    /// no provider is available at all.
    pub fn convert(
        &self,
        edwards_y: &[u8; COORDINATE_LENGTH],
    ) -> TwinkeyResult<[u8; COORDINATE_LENGTH]> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.is_available())
            .ok_or_else(|| {
                TwinkeyError::BackendFailure("no Montgomery conversion provider available".into())
            })?;
        tracing::trace!(provider = provider.name(), "edwards -> montgomery");
        provider.to_montgomery(edwards_y)
    }
}

impl std::fmt::Debug for ConversionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionChain")
            .field("providers", &self.provider_names())
            .finish()
    }
}
