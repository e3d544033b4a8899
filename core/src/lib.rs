//! hydrobuf Core - byte buffers and safe cryptographic wrappers for FFI hosts
//!
//! This library carries key, signature and session-key material across a
//! language boundary in owned [`ByteBuffer`]s, and wraps hashing, signing
//! and key exchange primitives behind single-use streaming states.

uniffi::setup_scaffolding!();

pub mod buffer;
pub mod constants;
pub mod crypto;
pub mod ffi;

mod error;

pub use error::{Error, Result};

/// Configuration for buffer allocation and default domain separation
#[derive(Debug, Clone)]
pub struct Config {
    /// Largest single buffer `allocate` will hand out
    pub max_buffer_len: usize,
    /// Context used when the caller does not pick one
    pub context: crypto::Context,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_buffer_len: constants::MAX_BUFFER_LEN,
            context: crypto::Context::default(),
        }
    }
}

impl Config {
    /// Allocate a zeroed buffer within this configuration's ceiling
    pub fn allocate(&self, size: usize) -> Result<ByteBuffer> {
        ByteBuffer::allocate_bounded(size, self.max_buffer_len)
    }
}

// Re-export key types for convenience
pub use buffer::ByteBuffer;
pub use crypto::{
    Context, ExchangeState, HashState, KxKeyPair, Role, SessionKeyPair, SignKeyPair, SignState,
};
