//! Routes each operation to the engine's backend, either inline or through
//! the isolated dispatcher, depending on `--isolated`.

use twinkey::{Engine, KeyPair, SharedSecret, Signature, TwinkeyResult, VerifyMode};

pub struct Runner {
    engine: &'static Engine,
    isolated: bool,
}

impl Runner {
    pub fn new(engine: &'static Engine, isolated: bool) -> Self {
        Self { engine, isolated }
    }

    pub fn engine(&self) -> &'static Engine {
        self.engine
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub async fn generate_key_pair(&self) -> TwinkeyResult<KeyPair> {
        if self.isolated {
            self.engine.isolated().generate_key_pair().await
        } else {
            self.engine.backend().generate_key_pair()
        }
    }

    pub async fn create_key_pair(&self, seed: Vec<u8>) -> TwinkeyResult<KeyPair> {
        if self.isolated {
            self.engine.isolated().create_key_pair(seed).await
        } else {
            self.engine.backend().create_key_pair(&seed)
        }
    }

    pub async fn agree(&self, public_wire: Vec<u8>, seed: Vec<u8>) -> TwinkeyResult<SharedSecret> {
        if self.isolated {
            self.engine.isolated().agree(public_wire, seed).await
        } else {
            self.engine.backend().agree(&public_wire, &seed)
        }
    }

    pub async fn sign(&self, seed: Vec<u8>, message: Vec<u8>) -> TwinkeyResult<Signature> {
        if self.isolated {
            self.engine.isolated().sign(seed, message).await
        } else {
            self.engine.backend().sign(&seed, &message)
        }
    }

    pub async fn verify(
        &self,
        public_wire: Vec<u8>,
        message: Vec<u8>,
        signature: Vec<u8>,
        mode: VerifyMode,
    ) -> TwinkeyResult<bool> {
        if self.isolated {
            self.engine
                .isolated()
                .verify_signature(public_wire, message, signature, mode)
                .await
        } else {
            self.engine
                .backend()
                .verify_signature(&public_wire, &message, &signature, mode)
        }
    }

    pub async fn montgomery_public(&self, public_wire: Vec<u8>) -> TwinkeyResult<[u8; 32]> {
        if self.isolated {
            self.engine.isolated().montgomery_public(public_wire).await
        } else {
            self.engine.backend().montgomery_public(&public_wire)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::thread::{self, ThreadId};

    use twinkey::backend::NativeBackend;
    use twinkey::{Backend, Capability, EngineConfig};

    /// Native backend that remembers which thread ran the last key derivation.
    #[derive(Default)]
    struct Recording {
        inner: NativeBackend,
        last: Mutex<Option<ThreadId>>,
    }

    impl Backend for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }
        fn capability(&self) -> Capability {
            self.inner.capability()
        }
        fn create_key_pair(&self, seed: &[u8]) -> TwinkeyResult<KeyPair> {
            *self.last.lock().unwrap() = Some(thread::current().id());
            self.inner.create_key_pair(seed)
        }
        fn agree(&self, public_wire: &[u8], seed: &[u8]) -> TwinkeyResult<SharedSecret> {
            self.inner.agree(public_wire, seed)
        }
        fn sign(&self, seed: &[u8], message: &[u8]) -> TwinkeyResult<Signature> {
            self.inner.sign(seed, message)
        }
        fn verify_signature(
            &self,
            public_wire: &[u8],
            message: &[u8],
            signature: &[u8],
            mode: VerifyMode,
        ) -> TwinkeyResult<bool> {
            self.inner.verify_signature(public_wire, message, signature, mode)
        }
        fn montgomery_public(&self, public_wire: &[u8]) -> TwinkeyResult<[u8; 32]> {
            self.inner.montgomery_public(public_wire)
        }
    }

    fn leaked_engine() -> (&'static Engine, Arc<Recording>) {
        let backend = Arc::new(Recording::default());
        let engine = Engine::with_backend(EngineConfig::default(), backend.clone()).unwrap();
        (Box::leak(Box::new(engine)), backend)
    }

    #[tokio::test]
    async fn isolated_flag_moves_work_off_the_caller_thread() {
        let (engine, backend) = leaked_engine();
        let here = thread::current().id();

        let inline = Runner::new(engine, false);
        let kp = inline.create_key_pair(vec![0u8; 32]).await.unwrap();
        assert_eq!(*backend.last.lock().unwrap(), Some(here));

        let isolated = Runner::new(engine, true);
        let again = isolated.create_key_pair(vec![0u8; 32]).await.unwrap();
        let worker = backend.last.lock().unwrap().unwrap();
        assert_ne!(worker, here);
        assert_eq!(kp, again);
    }
}
