//! Centralized byte-length constants
//!
//! Every fixed-size field handed across the boundary has its length defined
//! here, so extraction helpers and FFI callers agree on sizes.

/// Length of a domain-separation context tag
pub const CONTEXT_BYTES: usize = 8;

/// Length of a hash digest
pub const HASH_BYTES: usize = 32;

/// Length of a signing public key
pub const SIGN_PUBLICKEYBYTES: usize = 32;

/// Length of a signing secret key (seed followed by the public key)
pub const SIGN_SECRETKEYBYTES: usize = 64;

/// Length of a signature
pub const SIGN_BYTES: usize = 64;

/// Length of a key exchange public key
pub const KX_PUBLICKEYBYTES: usize = 32;

/// Length of a key exchange secret key
pub const KX_SECRETKEYBYTES: usize = 32;

/// Length of each session key (tx and rx)
pub const KX_SESSIONKEYBYTES: usize = 32;

/// Length of the single packet sent in the N variant
pub const KX_N_PACKET1BYTES: usize = 32;

/// Length of each packet in the interactive exchange
pub const KX_PACKETBYTES: usize = 32;

/// Info string mixed into session key derivation
pub const KX_SESSION_INFO: &[u8] = b"hydrobuf-kx-session";

/// Default ceiling for a single buffer allocation (64 MB)
pub const MAX_BUFFER_LEN: usize = 64 * 1024 * 1024;

/// Context used when the caller does not supply one
pub const DEFAULT_CONTEXT: &str = "hydrobuf";
