//! Signing key pairs and streaming signatures
//!
//! Signatures are Ed25519ph: the message is absorbed into a SHA-512 prehash
//! and signed together with the context. One-shot and streaming signing
//! share that construction, so their outputs are interchangeable.

use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::buffer::ByteBuffer;
use crate::constants::{SIGN_BYTES, SIGN_PUBLICKEYBYTES};
use crate::crypto::{fixed_param, Context};
use crate::{Error, Result};

/// Signing key pair. Only obtainable through [`SignKeyPair::generate`].
pub struct SignKeyPair {
    inner: SigningKey,
}

impl std::fmt::Debug for SignKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignKeyPair")
            .field("public", &hex::encode(self.inner.verifying_key().as_bytes()))
            .finish_non_exhaustive()
    }
}

impl SignKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let inner = SigningKey::generate(&mut OsRng);
        tracing::debug!("generated signing keypair");
        Self { inner }
    }

    /// Copy out the `SIGN_PUBLICKEYBYTES` public key
    pub fn public_key(&self) -> Result<ByteBuffer> {
        ByteBuffer::from_array(self.inner.verifying_key().as_bytes())
    }

    /// Copy out the `SIGN_SECRETKEYBYTES` secret key (seed || public key)
    pub fn secret_key(&self) -> Result<ByteBuffer> {
        let bytes = Zeroizing::new(self.inner.to_keypair_bytes());
        ByteBuffer::from_array(&bytes)
    }

    /// Sign `message` in one call
    pub fn sign(&self, context: &Context, message: &[u8]) -> Result<ByteBuffer> {
        let mut state = SignState::new(context);
        state.update(message);
        state.finalize_create(self)
    }
}

/// Verify a one-shot signature over `message`
pub fn verify(
    context: &Context,
    message: &[u8],
    signature: &[u8],
    public_key: &[u8],
) -> Result<()> {
    let mut state = SignState::new(context);
    state.update(message);
    state.finalize_verify(signature, public_key)
}

/// In-progress signature over a streamed message
pub struct SignState {
    prehash: Sha512,
    context: Context,
}

impl std::fmt::Debug for SignState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignState")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

impl SignState {
    pub fn new(context: &Context) -> Self {
        Self {
            prehash: Sha512::new(),
            context: *context,
        }
    }

    /// Absorb another chunk of the message
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.prehash.update(data);
        self
    }

    /// Sign everything absorbed so far
    pub fn finalize_create(self, keypair: &SignKeyPair) -> Result<ByteBuffer> {
        let Self { prehash, context } = self;
        let signature = keypair
            .inner
            .sign_prehashed(prehash, Some(&context.as_bytes()[..]))
            .map_err(|e| Error::Crypto(e.to_string()))?;
        ByteBuffer::from_array(&signature.to_bytes())
    }

    /// Check `signature` against everything absorbed so far
    pub fn finalize_verify(self, signature: &[u8], public_key: &[u8]) -> Result<()> {
        let sig_bytes = fixed_param::<SIGN_BYTES>(signature)?;
        let pk_bytes = fixed_param::<SIGN_PUBLICKEYBYTES>(public_key)?;

        let verifying_key =
            VerifyingKey::from_bytes(pk_bytes).map_err(|e| Error::Crypto(e.to_string()))?;
        let signature = Signature::from_bytes(sig_bytes);

        let Self { prehash, context } = self;
        verifying_key
            .verify_prehashed(prehash, Some(&context.as_bytes()[..]), &signature)
            .map_err(|e| {
                tracing::debug!("signature verification failed");
                Error::Crypto(e.to_string())
            })
    }
}
