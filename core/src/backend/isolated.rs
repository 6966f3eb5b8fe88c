//! Off-thread dispatch.
//!
//! Runs every backend call on tokio's blocking pool and hands back a future.
//! Calls are independent: no ordering between them, each completes or fails
//! on its own. A panic inside the backend stays on the worker thread and
//! comes back as [`TwinkeyError::BackendFailure`].
//!
//! No cancellation. Dropping the future doesn't stop the blocking task; it
//! runs to completion and its result is discarded.

use std::sync::Arc;

use tokio::runtime::Handle;
use zeroize::Zeroizing;

use super::{Backend, VerifyMode};
use crate::crypto::keys::{KeyPair, SharedSecret, Signature};
use crate::error::{TwinkeyError, TwinkeyResult};

/// A backend whose calls run on the blocking pool.
///
/// Inputs are taken by value because they cross a thread boundary.
#[derive(Clone)]
pub struct IsolatedBackend {
    inner: Arc<dyn Backend>,
}

impl IsolatedBackend {
    pub fn new(inner: Arc<dyn Backend>) -> Self {
        Self { inner }
    }

    /// The strategy doing the actual work.
    pub fn inner(&self) -> &Arc<dyn Backend> {
        &self.inner
    }

    pub async fn generate_key_pair(&self) -> TwinkeyResult<KeyPair> {
        self.dispatch("generate_key_pair", |b| b.generate_key_pair())
            .await
    }

    pub async fn create_key_pair(&self, seed: Vec<u8>) -> TwinkeyResult<KeyPair> {
        let seed = Zeroizing::new(seed);
        self.dispatch("create_key_pair", move |b| b.create_key_pair(&seed))
            .await
    }

    pub async fn agree(&self, public_wire: Vec<u8>, seed: Vec<u8>) -> TwinkeyResult<SharedSecret> {
        let seed = Zeroizing::new(seed);
        self.dispatch("agree", move |b| b.agree(&public_wire, &seed))
            .await
    }

    pub async fn sign(&self, seed: Vec<u8>, message: Vec<u8>) -> TwinkeyResult<Signature> {
        let seed = Zeroizing::new(seed);
        self.dispatch("sign", move |b| b.sign(&seed, &message))
            .await
    }

    pub async fn verify_signature(
        &self,
        public_wire: Vec<u8>,
        message: Vec<u8>,
        signature: Vec<u8>,
        mode: VerifyMode,
    ) -> TwinkeyResult<bool> {
        self.dispatch("verify", move |b| {
            b.verify_signature(&public_wire, &message, &signature, mode)
        })
        .await
    }

    pub async fn montgomery_public(&self, public_wire: Vec<u8>) -> TwinkeyResult<[u8; 32]> {
        self.dispatch("montgomery_public", move |b| b.montgomery_public(&public_wire))
            .await
    }

    async fn dispatch<T, F>(&self, op: &'static str, f: F) -> TwinkeyResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Backend) -> TwinkeyResult<T> + Send + 'static,
    {
        let handle = Handle::try_current().map_err(|_| {
            TwinkeyError::BackendFailure(format!("{op}: no async runtime for isolated dispatch"))
        })?;
        let inner = Arc::clone(&self.inner);
        handle
            .spawn_blocking(move || f(inner.as_ref()))
            .await
            .map_err(|e| {
                tracing::error!(op, error = %e, "isolated backend call did not complete");
                TwinkeyError::BackendFailure(format!("{op}: isolated call failed: {e}"))
            })?
    }
}

impl std::fmt::Debug for IsolatedBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IsolatedBackend")
            .field("inner", &self.inner.name())
            .finish()
    }
}
