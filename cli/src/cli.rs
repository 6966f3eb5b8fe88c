//! # CLI Interface
//!
//! Argument structure for `twinkey` using `clap` derive. Every byte string
//! (seeds, keys, signatures) is passed as hex; length checks are left to the
//! library so the CLI reports exactly the errors a library caller would see.

use clap::{Args, Parser, Subcommand};

use twinkey::config::{ENV_BACKEND, ENV_STRICT_WIRE};
use twinkey::{BackendKind, EngineConfig, WirePolicy};

use crate::logging::LogFormat;

/// Dispatch every call onto the blocking thread pool. Read by the CLI only;
/// the library never dispatches on its own.
pub const ENV_ISOLATED: &str = "TWINKEY_ISOLATED";

/// One seed, two curves: Ed25519 signatures and X25519 agreement from a
/// single 32-byte identity.
#[derive(Parser, Debug)]
#[command(name = "twinkey", version, propagate_version = true)]
pub struct TwinkeyCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Backend strategy: `native` or `field`.
    #[arg(long, global = true, env = ENV_BACKEND, default_value = "native")]
    pub backend: BackendKind,

    /// Run crypto on the blocking thread pool instead of inline.
    #[arg(long, global = true, env = ENV_ISOLATED)]
    pub isolated: bool,

    /// Reject legacy 32-byte public keys.
    #[arg(long, global = true, env = ENV_STRICT_WIRE)]
    pub strict_wire: bool,

    /// Log output format. Logs always go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default filter when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

impl GlobalArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            backend: self.backend,
            wire_policy: if self.strict_wire {
                WirePolicy::Strict
            } else {
                WirePolicy::AcceptLegacy
            },
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh key pair from OS randomness.
    Generate,
    /// Derive the key pair for a seed.
    Derive {
        /// 32-byte seed, hex.
        #[arg(long)]
        seed: String,
    },
    /// Compute the X25519 shared secret with a peer.
    Agree {
        /// Peer's wire public key, hex.
        #[arg(long)]
        public: String,
        /// Our 32-byte seed, hex.
        #[arg(long)]
        seed: String,
    },
    /// Sign a message.
    Sign {
        /// 32-byte seed, hex.
        #[arg(long)]
        seed: String,
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Verify a detached signature.
    Verify {
        /// Signer's wire public key, hex.
        #[arg(long)]
        public: String,
        #[command(flatten)]
        message: MessageArgs,
        /// 64-byte signature, hex.
        #[arg(long)]
        signature: String,
        /// Skip the check and answer `true`. Only for keys the caller has
        /// already authenticated out of band.
        #[arg(long)]
        trusted_bootstrap: bool,
    },
    /// Print the X25519 coordinate for an Ed25519 wire public key.
    Convert {
        /// Wire public key, hex.
        #[arg(long)]
        edwards: String,
    },
    /// Run the known-answer self-test against the selected backend.
    Selftest,
}

/// A message given either as UTF-8 text or as hex.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct MessageArgs {
    /// Message as text.
    #[arg(long)]
    pub message: Option<String>,
    /// Message as hex.
    #[arg(long)]
    pub message_hex: Option<String>,
}

impl MessageArgs {
    pub fn bytes(&self) -> anyhow::Result<Vec<u8>> {
        match (&self.message, &self.message_hex) {
            (Some(text), _) => Ok(text.as_bytes().to_vec()),
            (None, Some(h)) => crate::decode_hex("message", h),
            (None, None) => Ok(Vec::new()),
        }
    }
}
