//! # Building Blocks
//!
//! Everything the backends share that isn't the curve library itself:
//!
//! - **codec** — the tagged public-key wire format.
//! - **validation** — length checks that run before any crypto.
//! - **birational** — Edwards y → Montgomery u, the one piece of actual math
//!   in this crate.
//! - **keys** — seed, key pair, public key, signature, shared secret.
//!
//! ## A note on "rolling your own crypto"
//!
//! We don't, except for the birational map, and that's one field division.
//! Scalar multiplication, signing and hashing all come from dalek and sha2.

pub mod birational;
pub mod codec;
pub mod keys;
pub mod validation;

pub use birational::{ConversionChain, FieldConversion, LibraryConversion, MontgomeryConversion};
pub use codec::{decode, decode_with_policy, encode, DecodedKey, KeyForm};
pub use keys::{KeyPair, PublicKey, Seed, SharedSecret, Signature};
pub use validation::{check_message, check_seed, check_signature};
