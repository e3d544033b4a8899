//! Domain-separation contexts

use crate::constants::{CONTEXT_BYTES, DEFAULT_CONTEXT};
use crate::{Error, Result};

/// Fixed 8-byte tag that separates hashes and signatures made for different purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Context([u8; CONTEXT_BYTES]);

impl Context {
    /// Build a context from a tag of at most 8 bytes, zero-padded on the right
    pub fn new(tag: &str) -> Result<Self> {
        let bytes = tag.as_bytes();
        if bytes.len() > CONTEXT_BYTES {
            return Err(Error::InvalidContext(format!(
                "{:?} is {} bytes (max {})",
                tag,
                bytes.len(),
                CONTEXT_BYTES
            )));
        }

        let mut padded = [0u8; CONTEXT_BYTES];
        padded[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(padded))
    }

    pub const fn from_bytes(bytes: [u8; CONTEXT_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CONTEXT_BYTES] {
        &self.0
    }
}

impl Default for Context {
    fn default() -> Self {
        let mut padded = [0u8; CONTEXT_BYTES];
        padded.copy_from_slice(DEFAULT_CONTEXT.as_bytes());
        Self(padded)
    }
}

impl std::str::FromStr for Context {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
