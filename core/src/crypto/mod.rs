//! Safe wrappers over the hashing, signing and key exchange primitives
//!
//! - SHA-256 for hashing, bound to an 8-byte context
//! - Ed25519ph for signatures
//! - X25519 for key exchange, with SHA-512 session key derivation

mod context;
mod hash;
mod kx;
mod sign;

pub use context::Context;
pub use hash::{hash, HashState};
pub use kx::{kx_n_1, kx_n_2, ExchangeState, KxKeyPair, Role, SessionKeyPair};
pub use sign::{verify, SignKeyPair, SignState};

use crate::{Error, Result};

/// Borrow a caller-supplied slice as the fixed-size array a primitive expects
pub(crate) fn fixed_param<const N: usize>(bytes: &[u8]) -> Result<&[u8; N]> {
    bytes.try_into().map_err(|_| Error::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}
