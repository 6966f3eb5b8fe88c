//! # Public-Key Wire Codec
//!
//! Every backend speaks the same public-key encoding:
//!
//! ```text
//! +------+---------------------------------+
//! | 0x05 | edwards y, 32 bytes, little-end |
//! +------+---------------------------------+
//! ```
//!
//! Older peers stored keys without the tag byte. Those 32-byte keys are
//! still accepted (unless the engine runs with [`WirePolicy::Strict`]), but
//! each one is logged and flagged as [`KeyForm::Legacy`] on the way in. We
//! never quietly re-tag them: whoever holds a legacy key should find out.
//!
//! Pure byte shuffling. No curve math happens here.

use crate::config::{
    WirePolicy, COORDINATE_LENGTH, LEGACY_PUBLIC_KEY_LENGTH, PUBLIC_KEY_TAG,
    WIRE_PUBLIC_KEY_LENGTH,
};
use crate::error::{TwinkeyError, TwinkeyResult};

/// Which wire form a decoded key arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyForm {
    /// `0x05 ‖ coordinate`, 33 bytes.
    Tagged,
    /// Bare 32-byte coordinate. Non-conformant, accepted for stored keys.
    Legacy,
}

/// A decoded public key: the raw coordinate plus the form it came in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedKey {
    pub coordinate: [u8; COORDINATE_LENGTH],
    pub form: KeyForm,
}

impl DecodedKey {
    pub fn is_legacy(&self) -> bool {
        self.form == KeyForm::Legacy
    }
}

/// Prepend the version tag to a 32-byte coordinate.
pub fn encode(coordinate: &[u8; COORDINATE_LENGTH]) -> [u8; WIRE_PUBLIC_KEY_LENGTH] {
    let mut wire = [0u8; WIRE_PUBLIC_KEY_LENGTH];
    wire[0] = PUBLIC_KEY_TAG;
    wire[1..].copy_from_slice(coordinate);
    wire
}

/// Decode a wire key, accepting the legacy untagged form.
pub fn decode(wire: &[u8]) -> TwinkeyResult<DecodedKey> {
    decode_with_policy(wire, WirePolicy::AcceptLegacy)
}

/// Decode a wire key under an explicit legacy policy.
///
/// # Errors
///
/// [`TwinkeyError::InvalidKey`] for any length other than 32/33, a 33-byte
/// key whose first byte isn't `0x05`, or a 32-byte key under
/// [`WirePolicy::Strict`].
pub fn decode_with_policy(wire: &[u8], policy: WirePolicy) -> TwinkeyResult<DecodedKey> {
    match wire.len() {
        WIRE_PUBLIC_KEY_LENGTH => {
            if wire[0] != PUBLIC_KEY_TAG {
                return Err(TwinkeyError::InvalidKey(format!(
                    "unknown key tag 0x{:02x}",
                    wire[0]
                )));
            }
            let mut coordinate = [0u8; COORDINATE_LENGTH];
            coordinate.copy_from_slice(&wire[1..]);
            Ok(DecodedKey {
                coordinate,
                form: KeyForm::Tagged,
            })
        }
        LEGACY_PUBLIC_KEY_LENGTH => match policy {
            WirePolicy::Strict => Err(TwinkeyError::InvalidKey(
                "untagged 32-byte key rejected by strict wire policy".into(),
            )),
            WirePolicy::AcceptLegacy => {
                tracing::warn!("accepting untagged 32-byte public key (legacy wire form)");
                let mut coordinate = [0u8; COORDINATE_LENGTH];
                coordinate.copy_from_slice(wire);
                Ok(DecodedKey {
                    coordinate,
                    form: KeyForm::Legacy,
                })
            }
        },
        other => Err(TwinkeyError::InvalidKey(format!(
            "expected {WIRE_PUBLIC_KEY_LENGTH} or {LEGACY_PUBLIC_KEY_LENGTH} bytes, got {other}"
        ))),
    }
}
