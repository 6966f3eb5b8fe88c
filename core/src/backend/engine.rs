//! # Engine
//!
//! The process-wide backend context. Built once, behind an [`InitGate`]:
//!
//! 1. Pick the strategy from [`EngineConfig`].
//! 2. Run a known-answer self-test against it (golden key, sign/verify,
//!    agreement symmetry, base-point conversion).
//! 3. Publish the result, success or failure, to every caller.
//!
//! A failed start is fatal for the process. The engine never swaps in a
//! different strategy to get past a failed self-test.

use std::sync::Arc;

use super::{from_config, Backend, InitGate, IsolatedBackend, VerifyMode};
use crate::config::EngineConfig;
use crate::crypto::codec;
use crate::error::{TwinkeyError, TwinkeyResult};

static GLOBAL: InitGate<Engine> = InitGate::new();

/// Public key for the all-zero seed, tagged.
pub const ZERO_SEED_PUBLIC_KEY: [u8; 33] = [
    0x05, 0x3b, 0x6a, 0x27, 0xbc, 0xce, 0xb6, 0xa4, 0x2d, 0x62, 0xa3, 0xa8, 0xd0, 0x2a, 0x6f, 0x0d,
    0x73, 0x65, 0x32, 0x15, 0x77, 0x1d, 0xe2, 0x43, 0xa6, 0x3a, 0xc0, 0x48, 0xa1, 0x8b, 0x59, 0xda,
    0x29,
];

/// Ed25519 base point y = 4/5, little-endian.
const BASE_POINT_Y: [u8; 32] = [
    0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
    0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
];

/// The configured backend, self-tested and ready.
#[derive(Clone)]
pub struct Engine {
    config: EngineConfig,
    backend: Arc<dyn Backend>,
}

impl Engine {
    /// Build and self-test an engine. Not global; see [`Engine::global`].
    ///
    /// # Errors
    ///
    /// [`TwinkeyError::InitFailed`] if the self-test fails.
    pub fn new(config: EngineConfig) -> TwinkeyResult<Self> {
        Self::with_backend(config, from_config(&config))
    }

    /// Self-test an explicit backend and wrap it.
    pub fn with_backend(config: EngineConfig, backend: Arc<dyn Backend>) -> TwinkeyResult<Self> {
        self_test(backend.as_ref()).map_err(|e| {
            tracing::error!(backend = backend.name(), error = %e, "backend self-test failed");
            TwinkeyError::InitFailed(format!("{} backend self-test: {e}", backend.name()))
        })?;
        tracing::info!(
            backend = backend.name(),
            capability = ?backend.capability(),
            wire_policy = ?config.wire_policy,
            "engine ready"
        );
        Ok(Self { config, backend })
    }

    /// The process-wide engine, configured from the environment on first use.
    pub fn global() -> TwinkeyResult<&'static Engine> {
        GLOBAL.get_or_init(|| Engine::new(load_config(|name| std::env::var(name).ok())?))
    }

    /// Start the process-wide engine with an explicit config.
    ///
    /// First caller wins. If the engine is already settled, its recorded
    /// outcome is returned and `config` is ignored.
    pub fn init_global(config: EngineConfig) -> TwinkeyResult<&'static Engine> {
        let engine = GLOBAL.get_or_init(|| Engine::new(config))?;
        if engine.config != config {
            tracing::warn!(
                requested = ?config,
                active = ?engine.config,
                "engine already initialized; ignoring new config"
            );
        }
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Direct, synchronous access to the strategy.
    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// The same strategy behind off-thread dispatch. Calls through
    /// [`backend`](Self::backend) and the crate-root functions always run
    /// inline; this is the only way to get a deferred result.
    pub fn isolated(&self) -> IsolatedBackend {
        IsolatedBackend::new(Arc::clone(&self.backend))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

/// Engine config from a variable source; a bad value is an init failure.
fn load_config<F>(lookup: F) -> TwinkeyResult<EngineConfig>
where
    F: Fn(&str) -> Option<String>,
{
    EngineConfig::from_lookup(lookup).map_err(TwinkeyError::InitFailed)
}

/// Known-answer checks every strategy must pass before it serves a call.
pub fn self_test(backend: &dyn Backend) -> TwinkeyResult<()> {
    let zero = backend.create_key_pair(&[0u8; 32])?;
    if zero.public_key().as_bytes() != &ZERO_SEED_PUBLIC_KEY {
        return Err(TwinkeyError::BackendFailure(
            "zero-seed public key does not match reference".into(),
        ));
    }

    let sig = backend.sign(&[0u8; 32], b"test")?;
    if !backend.verify(zero.public_key().as_bytes(), b"test", sig.as_bytes())? {
        return Err(TwinkeyError::BackendFailure(
            "sign/verify round-trip failed".into(),
        ));
    }
    if backend.verify_signature(
        zero.public_key().as_bytes(),
        b"tset",
        sig.as_bytes(),
        VerifyMode::Cryptographic,
    )? {
        return Err(TwinkeyError::BackendFailure(
            "verify accepted a signature over a different message".into(),
        ));
    }

    let other = backend.create_key_pair(&[1u8; 32])?;
    let ab = backend.agree(other.public_key().as_bytes(), &[0u8; 32])?;
    let ba = backend.agree(zero.public_key().as_bytes(), &[1u8; 32])?;
    if ab != ba {
        return Err(TwinkeyError::BackendFailure(
            "agreement is not symmetric".into(),
        ));
    }

    let mut nine = [0u8; 32];
    nine[0] = 9;
    if backend.montgomery_public(&codec::encode(&BASE_POINT_Y))? != nine {
        return Err(TwinkeyError::BackendFailure(
            "base point does not map to u = 9".into(),
        ));
    }
    Ok(())
}
