// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # twinkey
//!
//! Entry point for the `twinkey` binary. Parses CLI arguments, initializes
//! logging, starts the self-tested engine, runs one operation, and prints
//! the result as JSON on stdout.
//!
//! - `generate`  — fresh key pair from OS randomness
//! - `derive`    — key pair for a given seed
//! - `agree`     — X25519 shared secret with a peer
//! - `sign`      — Ed25519 signature
//! - `verify`    — check a signature
//! - `convert`   — Ed25519 wire key to X25519 coordinate
//! - `selftest`  — known-answer checks against the selected backend

mod cli;
mod logging;
mod runner;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use twinkey::backend::engine::self_test;
use twinkey::{Engine, KeyPair, PublicKey, Signature, VerifyMode};

use cli::{Commands, TwinkeyCli};
use runner::Runner;

#[derive(Serialize)]
struct KeyPairOutput {
    public_key: PublicKey,
    private_key: String,
}

impl From<&KeyPair> for KeyPairOutput {
    fn from(kp: &KeyPair) -> Self {
        Self {
            public_key: *kp.public_key(),
            private_key: kp.private_key().to_hex(),
        }
    }
}

#[derive(Serialize)]
struct AgreementOutput {
    shared_secret: String,
}

#[derive(Serialize)]
struct SignatureOutput {
    signature: Signature,
}

#[derive(Serialize)]
struct VerifyOutput {
    valid: bool,
    mode: &'static str,
}

#[derive(Serialize)]
struct ConvertOutput {
    montgomery_u: String,
}

#[derive(Serialize)]
struct SelftestOutput {
    backend: &'static str,
    capability: String,
    isolated: bool,
    wire_policy: twinkey::WirePolicy,
    passed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TwinkeyCli::parse();
    logging::init_logging(&cli.global.log_level, cli.global.log_format);

    let config = cli.global.engine_config();
    let engine = Engine::init_global(config).context("failed to start the crypto engine")?;
    let runner = Runner::new(engine, cli.global.isolated);

    match cli.command {
        Commands::Generate => {
            let kp = runner
                .generate_key_pair()
                .await
                .context("failed to generate key pair")?;
            emit(&KeyPairOutput::from(&kp))
        }
        Commands::Derive { seed } => {
            let seed = decode_hex("seed", &seed)?;
            let kp = runner
                .create_key_pair(seed)
                .await
                .context("failed to derive key pair")?;
            emit(&KeyPairOutput::from(&kp))
        }
        Commands::Agree { public, seed } => {
            let public = decode_hex("public key", &public)?;
            let seed = decode_hex("seed", &seed)?;
            let secret = runner
                .agree(public, seed)
                .await
                .context("key agreement failed")?;
            emit(&AgreementOutput {
                shared_secret: secret.to_hex(),
            })
        }
        Commands::Sign { seed, message } => {
            let seed = decode_hex("seed", &seed)?;
            let message = message.bytes()?;
            let signature = runner
                .sign(seed, message)
                .await
                .context("signing failed")?;
            emit(&SignatureOutput { signature })
        }
        Commands::Verify {
            public,
            message,
            signature,
            trusted_bootstrap,
        } => {
            let public = decode_hex("public key", &public)?;
            let message = message.bytes()?;
            let signature = decode_hex("signature", &signature)?;
            let mode = if trusted_bootstrap {
                tracing::warn!("verifying in trusted-bootstrap mode; the signature is not checked");
                VerifyMode::TrustedBootstrap
            } else {
                VerifyMode::Cryptographic
            };
            let valid = runner
                .verify(public, message, signature, mode)
                .await
                .context("verification failed")?;
            emit(&VerifyOutput {
                valid,
                mode: match mode {
                    VerifyMode::Cryptographic => "cryptographic",
                    VerifyMode::TrustedBootstrap => "trusted_bootstrap",
                },
            })
        }
        Commands::Convert { edwards } => {
            let public = decode_hex("public key", &edwards)?;
            let u = runner
                .montgomery_public(public)
                .await
                .context("conversion failed")?;
            emit(&ConvertOutput {
                montgomery_u: hex::encode(u),
            })
        }
        Commands::Selftest => {
            let engine = runner.engine();
            self_test(engine.backend()).context("self-test failed")?;
            emit(&SelftestOutput {
                backend: engine.backend().name(),
                capability: format!("{:?}", engine.backend().capability()),
                isolated: runner.is_isolated(),
                wire_policy: engine.config().wire_policy,
                passed: true,
            })
        }
    }
}

/// Decode a hex argument. Length is the library's call, not ours.
pub(crate) fn decode_hex(what: &str, s: &str) -> Result<Vec<u8>> {
    hex::decode(s.trim()).with_context(|| format!("{what} is not valid hex"))
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{json}");
    Ok(())
}
