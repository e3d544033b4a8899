//! Host language bindings (UniFFI)
//!
//! Every object is handed to the host behind an `Arc`; the host's last
//! reference releases it. Streaming states sit in a `Mutex<Option<_>>` so a
//! finalize can move the state out, and any later call reports
//! [`Error::Finalized`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::buffer::ByteBuffer;
use crate::constants::*;
use crate::crypto::{
    self, Context, ExchangeState, HashState, KxKeyPair, Role, SessionKeyPair, SignKeyPair,
    SignState,
};
use crate::{Error, Result};

fn lock<T>(slot: &Mutex<Option<T>>) -> MutexGuard<'_, Option<T>> {
    // Updates cannot leave a state half-written, so a poisoned lock is still usable
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn take<T>(slot: &Mutex<Option<T>>) -> Result<T> {
    lock(slot).take().ok_or(Error::Finalized)
}

/// Byte buffer owned by the host
#[derive(uniffi::Object)]
pub struct HydroBuffer {
    inner: ByteBuffer,
}

impl HydroBuffer {
    fn wrap(inner: ByteBuffer) -> Arc<Self> {
        Arc::new(Self { inner })
    }

    pub fn raw_view(&self) -> &[u8] {
        self.inner.raw_view()
    }
}

#[uniffi::export]
impl HydroBuffer {
    /// Zeroed buffer of `size` bytes
    #[uniffi::constructor]
    pub fn allocate(size: u64) -> Result<Arc<Self>> {
        let size = usize::try_from(size).map_err(|_| Error::Allocation {
            requested: usize::MAX,
        })?;
        ByteBuffer::allocate(size).map(Self::wrap)
    }

    #[uniffi::constructor]
    pub fn from_bytes(bytes: Vec<u8>) -> Arc<Self> {
        Self::wrap(ByteBuffer::from(bytes))
    }

    #[uniffi::constructor]
    pub fn from_hex(hex: String) -> Result<Arc<Self>> {
        ByteBuffer::from_hex(&hex).map(Self::wrap)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.inner.to_hex()
    }

    pub fn to_base64(&self) -> String {
        self.inner.to_base64()
    }

    pub fn length(&self) -> u64 {
        self.inner.len() as u64
    }
}

/// Field lengths, so hosts can size their own storage
#[derive(Debug, Clone, uniffi::Record)]
pub struct HydroConstants {
    pub context_bytes: u64,
    pub hash_bytes: u64,
    pub sign_public_key_bytes: u64,
    pub sign_secret_key_bytes: u64,
    pub sign_bytes: u64,
    pub kx_public_key_bytes: u64,
    pub kx_secret_key_bytes: u64,
    pub kx_session_key_bytes: u64,
    pub kx_packet_bytes: u64,
}

#[uniffi::export]
pub fn hydro_constants() -> HydroConstants {
    HydroConstants {
        context_bytes: CONTEXT_BYTES as u64,
        hash_bytes: HASH_BYTES as u64,
        sign_public_key_bytes: SIGN_PUBLICKEYBYTES as u64,
        sign_secret_key_bytes: SIGN_SECRETKEYBYTES as u64,
        sign_bytes: SIGN_BYTES as u64,
        kx_public_key_bytes: KX_PUBLICKEYBYTES as u64,
        kx_secret_key_bytes: KX_SECRETKEYBYTES as u64,
        kx_session_key_bytes: KX_SESSIONKEYBYTES as u64,
        kx_packet_bytes: KX_PACKETBYTES as u64,
    }
}

#[uniffi::export]
pub fn hydro_hash(context: String, data: Vec<u8>) -> Result<Arc<HydroBuffer>> {
    crypto::hash(&Context::new(&context)?, &data).map(HydroBuffer::wrap)
}

#[derive(uniffi::Object)]
pub struct HydroHashState {
    state: Mutex<Option<HashState>>,
}

#[uniffi::export]
impl HydroHashState {
    #[uniffi::constructor]
    pub fn new(context: String) -> Result<Arc<Self>> {
        let state = HashState::new(&Context::new(&context)?);
        Ok(Arc::new(Self {
            state: Mutex::new(Some(state)),
        }))
    }

    pub fn update(&self, data: Vec<u8>) -> Result<()> {
        lock(&self.state)
            .as_mut()
            .ok_or(Error::Finalized)?
            .update(&data);
        Ok(())
    }

    pub fn finalize(&self) -> Result<Arc<HydroBuffer>> {
        take(&self.state)?.finalize().map(HydroBuffer::wrap)
    }
}

#[derive(uniffi::Object)]
pub struct HydroSignKeyPair {
    inner: SignKeyPair,
}

#[uniffi::export]
impl HydroSignKeyPair {
    #[uniffi::constructor]
    pub fn generate() -> Arc<Self> {
        Arc::new(Self {
            inner: SignKeyPair::generate(),
        })
    }

    pub fn public_key(&self) -> Result<Arc<HydroBuffer>> {
        self.inner.public_key().map(HydroBuffer::wrap)
    }

    pub fn secret_key(&self) -> Result<Arc<HydroBuffer>> {
        self.inner.secret_key().map(HydroBuffer::wrap)
    }

    pub fn sign(&self, context: String, message: Vec<u8>) -> Result<Arc<HydroBuffer>> {
        self.inner
            .sign(&Context::new(&context)?, &message)
            .map(HydroBuffer::wrap)
    }
}

#[uniffi::export]
pub fn hydro_sign_verify(
    context: String,
    message: Vec<u8>,
    signature: Arc<HydroBuffer>,
    public_key: Arc<HydroBuffer>,
) -> Result<()> {
    crypto::verify(
        &Context::new(&context)?,
        &message,
        signature.raw_view(),
        public_key.raw_view(),
    )
}

#[derive(uniffi::Object)]
pub struct HydroSignState {
    state: Mutex<Option<SignState>>,
}

#[uniffi::export]
impl HydroSignState {
    #[uniffi::constructor]
    pub fn new(context: String) -> Result<Arc<Self>> {
        let state = SignState::new(&Context::new(&context)?);
        Ok(Arc::new(Self {
            state: Mutex::new(Some(state)),
        }))
    }

    pub fn update(&self, data: Vec<u8>) -> Result<()> {
        lock(&self.state)
            .as_mut()
            .ok_or(Error::Finalized)?
            .update(&data);
        Ok(())
    }

    pub fn finalize_create(&self, keypair: Arc<HydroSignKeyPair>) -> Result<Arc<HydroBuffer>> {
        take(&self.state)?
            .finalize_create(&keypair.inner)
            .map(HydroBuffer::wrap)
    }

    pub fn finalize_verify(
        &self,
        signature: Arc<HydroBuffer>,
        public_key: Arc<HydroBuffer>,
    ) -> Result<()> {
        take(&self.state)?.finalize_verify(signature.raw_view(), public_key.raw_view())
    }
}

#[derive(uniffi::Object)]
pub struct HydroKxKeyPair {
    inner: KxKeyPair,
}

#[uniffi::export]
impl HydroKxKeyPair {
    #[uniffi::constructor]
    pub fn generate() -> Arc<Self> {
        Arc::new(Self {
            inner: KxKeyPair::generate(),
        })
    }

    pub fn public_key(&self) -> Result<Arc<HydroBuffer>> {
        self.inner.public_key().map(HydroBuffer::wrap)
    }

    pub fn secret_key(&self) -> Result<Arc<HydroBuffer>> {
        self.inner.secret_key().map(HydroBuffer::wrap)
    }
}

#[derive(uniffi::Object)]
pub struct HydroSessionKeyPair {
    inner: SessionKeyPair,
}

impl HydroSessionKeyPair {
    fn wrap(inner: SessionKeyPair) -> Arc<Self> {
        Arc::new(Self { inner })
    }
}

#[uniffi::export]
impl HydroSessionKeyPair {
    pub fn tx(&self) -> Result<Arc<HydroBuffer>> {
        self.inner.tx().map(HydroBuffer::wrap)
    }

    pub fn rx(&self) -> Result<Arc<HydroBuffer>> {
        self.inner.rx().map(HydroBuffer::wrap)
    }
}

/// Result of the initiator's half of the N variant
#[derive(uniffi::Record)]
pub struct HydroKxN1 {
    pub session: Arc<HydroSessionKeyPair>,
    pub packet: Arc<HydroBuffer>,
}

#[uniffi::export]
pub fn hydro_kx_n_1(responder_public_key: Arc<HydroBuffer>) -> Result<HydroKxN1> {
    let (session, packet) = crypto::kx_n_1(responder_public_key.raw_view())?;
    Ok(HydroKxN1 {
        session: HydroSessionKeyPair::wrap(session),
        packet: HydroBuffer::wrap(packet),
    })
}

#[uniffi::export]
pub fn hydro_kx_n_2(
    keypair: Arc<HydroKxKeyPair>,
    packet: Arc<HydroBuffer>,
) -> Result<Arc<HydroSessionKeyPair>> {
    crypto::kx_n_2(&keypair.inner, packet.raw_view()).map(HydroSessionKeyPair::wrap)
}

#[derive(uniffi::Object)]
pub struct HydroExchangeState {
    state: Mutex<Option<ExchangeState>>,
}

#[uniffi::export]
impl HydroExchangeState {
    #[uniffi::constructor]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(Some(ExchangeState::new())),
        })
    }

    pub fn packet(&self) -> Result<Arc<HydroBuffer>> {
        lock(&self.state)
            .as_ref()
            .ok_or(Error::Finalized)?
            .packet()
            .map(HydroBuffer::wrap)
    }

    pub fn finish(
        &self,
        role: Role,
        peer_packet: Arc<HydroBuffer>,
    ) -> Result<Arc<HydroSessionKeyPair>> {
        take(&self.state)?
            .finish(role, peer_packet.raw_view())
            .map(HydroSessionKeyPair::wrap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_roundtrip() {
        let buf = HydroBuffer::from_bytes(vec![0xca, 0xfe]);
        assert_eq!(buf.to_bytes(), vec![0xca, 0xfe]);
        assert_eq!(buf.to_hex(), "cafe");
        assert_eq!(buf.length(), 2);

        let parsed = HydroBuffer::from_hex(buf.to_hex()).unwrap();
        assert_eq!(parsed.to_bytes(), buf.to_bytes());
    }

    #[test]
    fn test_allocate_zero() {
        let buf = HydroBuffer::allocate(0).unwrap();
        assert_eq!(buf.length(), 0);
        assert!(buf.to_bytes().is_empty());
    }

    #[test]
    fn test_hash_state_finalize_once() {
        let state = HydroHashState::new("test".to_string()).unwrap();
        state.update(b"abc".to_vec()).unwrap();
        let digest = state.finalize().unwrap();
        assert_eq!(digest.length(), HASH_BYTES as u64);

        assert!(matches!(state.finalize(), Err(Error::Finalized)));
        assert!(matches!(state.update(b"more".to_vec()), Err(Error::Finalized)));
    }

    #[test]
    fn test_streaming_hash_matches_one_shot() {
        let state = HydroHashState::new("test".to_string()).unwrap();
        state.update(b"ab".to_vec()).unwrap();
        state.update(b"c".to_vec()).unwrap();

        let one_shot = hydro_hash("test".to_string(), b"abc".to_vec()).unwrap();
        assert_eq!(state.finalize().unwrap().to_bytes(), one_shot.to_bytes());
    }

    #[test]
    fn test_sign_state_roundtrip() {
        let keypair = HydroSignKeyPair::generate();
        let public_key = keypair.public_key().unwrap();
        assert_eq!(public_key.length(), 32);
        assert_eq!(public_key.to_hex().len(), 64);

        let signer = HydroSignState::new("files".to_string()).unwrap();
        signer.update(b"chunk one, ".to_vec()).unwrap();
        signer.update(b"chunk two".to_vec()).unwrap();
        let signature = signer.finalize_create(keypair.clone()).unwrap();
        assert!(matches!(
            signer.finalize_create(keypair.clone()),
            Err(Error::Finalized)
        ));

        assert!(hydro_sign_verify(
            "files".to_string(),
            b"chunk one, chunk two".to_vec(),
            signature.clone(),
            public_key.clone(),
        )
        .is_ok());

        let verifier = HydroSignState::new("files".to_string()).unwrap();
        verifier.update(b"chunk one, chunk two".to_vec()).unwrap();
        assert!(verifier.finalize_verify(signature, public_key).is_ok());
    }

    #[test]
    fn test_invalid_context() {
        assert!(matches!(
            HydroHashState::new("much-too-long".to_string()),
            Err(Error::InvalidContext(_))
        ));
    }

    #[test]
    fn test_exchange_state() {
        let alice = HydroExchangeState::new();
        let bob = HydroExchangeState::new();
        let alice_packet = alice.packet().unwrap();
        let bob_packet = bob.packet().unwrap();

        let alice_session = alice.finish(Role::Initiator, bob_packet.clone()).unwrap();
        let bob_session = bob.finish(Role::Responder, alice_packet).unwrap();
        assert_eq!(
            alice_session.tx().unwrap().to_bytes(),
            bob_session.rx().unwrap().to_bytes()
        );

        assert!(matches!(alice.packet(), Err(Error::Finalized)));
        assert!(matches!(
            alice.finish(Role::Initiator, bob_packet),
            Err(Error::Finalized)
        ));
    }

    #[test]
    fn test_kx_n() {
        let server = HydroKxKeyPair::generate();
        let n1 = hydro_kx_n_1(server.public_key().unwrap()).unwrap();
        let server_session = hydro_kx_n_2(server, n1.packet).unwrap();

        assert_eq!(
            n1.session.rx().unwrap().to_bytes(),
            server_session.tx().unwrap().to_bytes()
        );
    }

    #[test]
    fn test_constants() {
        let constants = hydro_constants();
        assert_eq!(constants.sign_public_key_bytes, 32);
        assert_eq!(constants.sign_secret_key_bytes, 64);
        assert_eq!(constants.kx_session_key_bytes, 32);
    }
}
