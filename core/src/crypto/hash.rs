//! Streaming and one-shot hashing

use sha2::{Digest, Sha256};

use crate::buffer::ByteBuffer;
use crate::crypto::Context;
use crate::Result;

/// In-progress hash; finalizing consumes it
#[derive(Clone)]
pub struct HashState {
    hasher: Sha256,
}

impl std::fmt::Debug for HashState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashState").finish_non_exhaustive()
    }
}

impl HashState {
    /// Start a hash bound to `context`
    pub fn new(context: &Context) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(context.as_bytes());
        Self { hasher }
    }

    /// Absorb more input
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.hasher.update(data);
        self
    }

    /// Produce the `HASH_BYTES` digest
    pub fn finalize(self) -> Result<ByteBuffer> {
        let digest: [u8; 32] = self.hasher.finalize().into();
        ByteBuffer::from_array(&digest)
    }
}

/// Hash `data` in one call
pub fn hash(context: &Context, data: &[u8]) -> Result<ByteBuffer> {
    let mut state = HashState::new(context);
    state.update(data);
    state.finalize()
}
