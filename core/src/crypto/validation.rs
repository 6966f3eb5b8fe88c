//! Input shape checks. These run before any call into a backend or the
//! birational map, so a malformed input never causes partial crypto work.
//!
//! The checks hand back fixed-size array references on success; everything
//! downstream works with `&[u8; N]` and never re-checks lengths.

use crate::config::{SEED_LENGTH, SIGNATURE_LENGTH};
use crate::error::{TwinkeyError, TwinkeyResult};

/// A seed is exactly 32 bytes. An empty slice stands in for "absent".
pub fn check_seed(seed: &[u8]) -> TwinkeyResult<&[u8; SEED_LENGTH]> {
    seed.try_into()
        .map_err(|_| TwinkeyError::InvalidSeed { len: seed.len() })
}

/// A message is at least one byte.
pub fn check_message(message: &[u8]) -> TwinkeyResult<&[u8]> {
    if message.is_empty() {
        return Err(TwinkeyError::InvalidMessage);
    }
    Ok(message)
}

/// A signature is exactly 64 bytes.
pub fn check_signature(signature: &[u8]) -> TwinkeyResult<&[u8; SIGNATURE_LENGTH]> {
    signature
        .try_into()
        .map_err(|_| TwinkeyError::InvalidSignature {
            len: signature.len(),
        })
}
