use thiserror::Error;

/// hydrobuf error types
#[derive(Error, Debug, uniffi::Error)]
#[uniffi(flat_error)]
pub enum Error {
    #[error("Allocation of {requested} bytes failed")]
    Allocation { requested: usize },

    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid context: {0}")]
    InvalidContext(String),

    #[error("Failed to decode: {0}")]
    Encoding(String),

    #[error("State already finalized")]
    Finalized,
}

pub type Result<T> = std::result::Result<T, Error>;
