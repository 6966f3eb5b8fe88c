//! Error types for twinkey.
//!
//! Every fallible operation returns a [`TwinkeyError`]. The taxonomy is
//! small on purpose: malformed input (seed, key, message, signature), a
//! rejection from the underlying curve library, or a failed engine start.
//!
//! A cryptographically invalid signature is *not* an error; `verify`
//! answers `false` for that.

use thiserror::Error;

/// Errors that can occur in key derivation, agreement, signing and
/// verification.
///
/// `Clone` so the engine's init gate can hand one recorded failure to every
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwinkeyError {
    /// Seed missing or not exactly 32 bytes.
    #[error("invalid seed: expected 32 bytes, got {len}")]
    InvalidSeed {
        /// Length actually supplied.
        len: usize,
    },

    /// Public key failed to decode or convert.
    #[error("invalid public key: {0}")]
    InvalidKey(String),

    /// Message missing or empty.
    #[error("invalid message: must be at least one byte")]
    InvalidMessage,

    /// Signature missing or not exactly 64 bytes.
    #[error("invalid signature: expected 64 bytes, got {len}")]
    InvalidSignature {
        /// Length actually supplied.
        len: usize,
    },

    /// A hex-encoded seed or signature did not decode.
    #[error("invalid {what} hex: {reason}")]
    InvalidHex {
        /// Which input was being parsed.
        what: &'static str,
        /// The decoder's complaint.
        reason: String,
    },

    /// The curve library or the execution harness rejected the operation.
    #[error("backend failure: {0}")]
    BackendFailure(String),

    /// One-time engine initialization failed. Fatal for the process.
    #[error("engine initialization failed: {0}")]
    InitFailed(String),
}

/// Convenience alias used throughout the crate.
pub type TwinkeyResult<T> = Result<T, TwinkeyError>;
