//! Key exchange key pairs, handshakes and session keys

use rand::rngs::OsRng;
use sha2::{Digest, Sha512};
use x25519_dalek::{EphemeralSecret, PublicKey, SharedSecret, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::buffer::ByteBuffer;
use crate::constants::{
    KX_N_PACKET1BYTES, KX_PACKETBYTES, KX_PUBLICKEYBYTES, KX_SESSIONKEYBYTES, KX_SESSION_INFO,
};
use crate::crypto::fixed_param;
use crate::{Error, Result};

/// Which side of an exchange the caller is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Role {
    Initiator,
    Responder,
}

/// Static key exchange key pair. Only obtainable through [`KxKeyPair::generate`].
pub struct KxKeyPair {
    secret: StaticSecret,
    public: PublicKey,
}

impl std::fmt::Debug for KxKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KxKeyPair")
            .field("public", &hex::encode(self.public.as_bytes()))
            .finish_non_exhaustive()
    }
}

impl KxKeyPair {
    pub fn generate() -> Self {
        let secret = StaticSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        tracing::debug!("generated key exchange keypair");
        Self { secret, public }
    }

    /// Copy out the `KX_PUBLICKEYBYTES` public key
    pub fn public_key(&self) -> Result<ByteBuffer> {
        ByteBuffer::from_array(self.public.as_bytes())
    }

    /// Copy out the `KX_SECRETKEYBYTES` secret key
    pub fn secret_key(&self) -> Result<ByteBuffer> {
        let bytes = Zeroizing::new(self.secret.to_bytes());
        ByteBuffer::from_array(&bytes)
    }
}

/// Transmit and receive keys produced by a completed exchange
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SessionKeyPair {
    tx: [u8; KX_SESSIONKEYBYTES],
    rx: [u8; KX_SESSIONKEYBYTES],
}

impl std::fmt::Debug for SessionKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeyPair").finish_non_exhaustive()
    }
}

impl SessionKeyPair {
    /// Copy out the transmit key
    pub fn tx(&self) -> Result<ByteBuffer> {
        ByteBuffer::from_array(&self.tx)
    }

    /// Copy out the receive key
    pub fn rx(&self) -> Result<ByteBuffer> {
        ByteBuffer::from_array(&self.rx)
    }
}

/// Interactive exchange in progress: one ephemeral key per side, one packet each way.
///
/// Finishing consumes the state, so an ephemeral secret is never reused.
pub struct ExchangeState {
    secret: EphemeralSecret,
    public: PublicKey,
}

impl std::fmt::Debug for ExchangeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeState")
            .field("public", &hex::encode(self.public.as_bytes()))
            .finish_non_exhaustive()
    }
}

impl ExchangeState {
    pub fn new() -> Self {
        let secret = EphemeralSecret::random_from_rng(OsRng);
        let public = PublicKey::from(&secret);
        Self { secret, public }
    }

    /// The `KX_PACKETBYTES` packet to send to the peer
    pub fn packet(&self) -> Result<ByteBuffer> {
        ByteBuffer::from_array(self.public.as_bytes())
    }

    /// Complete the exchange with the peer's packet
    pub fn finish(self, role: Role, peer_packet: &[u8]) -> Result<SessionKeyPair> {
        let peer = PublicKey::from(*fixed_param::<KX_PACKETBYTES>(peer_packet)?);
        let Self { secret, public } = self;
        let shared = secret.diffie_hellman(&peer);

        let (initiator, responder) = match role {
            Role::Initiator => (public, peer),
            Role::Responder => (peer, public),
        };
        derive_session(&shared, &initiator, &responder, role)
    }
}

impl Default for ExchangeState {
    fn default() -> Self {
        Self::new()
    }
}

/// N variant, initiator side: derive session keys against a known responder
/// public key and return the single packet to send
pub fn kx_n_1(responder_public_key: &[u8]) -> Result<(SessionKeyPair, ByteBuffer)> {
    let responder = PublicKey::from(*fixed_param::<KX_PUBLICKEYBYTES>(responder_public_key)?);

    let ephemeral = EphemeralSecret::random_from_rng(OsRng);
    let ephemeral_public = PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&responder);

    let session = derive_session(&shared, &ephemeral_public, &responder, Role::Initiator)?;
    let packet = ByteBuffer::from_array(ephemeral_public.as_bytes())?;
    Ok((session, packet))
}

/// N variant, responder side: derive session keys from the initiator's packet
pub fn kx_n_2(keypair: &KxKeyPair, packet1: &[u8]) -> Result<SessionKeyPair> {
    let initiator = PublicKey::from(*fixed_param::<KX_N_PACKET1BYTES>(packet1)?);
    let shared = keypair.secret.diffie_hellman(&initiator);
    derive_session(&shared, &initiator, &keypair.public, Role::Responder)
}

/// SHA512(info || shared || initiator_pk || responder_pk), split into rx/tx
/// for the initiator and tx/rx for the responder
fn derive_session(
    shared: &SharedSecret,
    initiator: &PublicKey,
    responder: &PublicKey,
    role: Role,
) -> Result<SessionKeyPair> {
    if !shared.was_contributory() {
        tracing::warn!(?role, "rejected non-contributory key exchange");
        return Err(Error::Crypto(
            "handshake failed: non-contributory shared secret".to_string(),
        ));
    }

    let mut hasher = Sha512::new();
    hasher.update(KX_SESSION_INFO);
    hasher.update(shared.as_bytes());
    hasher.update(initiator.as_bytes());
    hasher.update(responder.as_bytes());
    let mut okm = hasher.finalize();

    let mut first = [0u8; KX_SESSIONKEYBYTES];
    let mut second = [0u8; KX_SESSIONKEYBYTES];
    first.copy_from_slice(&okm[..KX_SESSIONKEYBYTES]);
    second.copy_from_slice(&okm[KX_SESSIONKEYBYTES..]);
    okm.as_mut_slice().zeroize();

    let session = match role {
        Role::Initiator => SessionKeyPair { rx: first, tx: second },
        Role::Responder => SessionKeyPair { tx: first, rx: second },
    };
    first.zeroize();
    second.zeroize();

    tracing::debug!(?role, "key exchange complete");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::KX_SECRETKEYBYTES;

    #[test]
    fn test_keypair_field_lengths() {
        let kp = KxKeyPair::generate();
        assert_eq!(kp.public_key().unwrap().len(), KX_PUBLICKEYBYTES);
        assert_eq!(kp.secret_key().unwrap().len(), KX_SECRETKEYBYTES);
    }

    #[test]
    fn test_kx_n_agreement() {
        let server = KxKeyPair::generate();
        let server_pk = server.public_key().unwrap();

        let (client, packet) = kx_n_1(server_pk.raw_view()).unwrap();
        assert_eq!(packet.len(), KX_N_PACKET1BYTES);
        let server_session = kx_n_2(&server, packet.raw_view()).unwrap();

        assert_eq!(client.tx().unwrap(), server_session.rx().unwrap());
        assert_eq!(client.rx().unwrap(), server_session.tx().unwrap());
        assert_ne!(client.tx().unwrap(), client.rx().unwrap());
        assert_eq!(client.tx().unwrap().len(), KX_SESSIONKEYBYTES);
    }

    #[test]
    fn test_kx_n_wrong_server_key() {
        let server = KxKeyPair::generate();
        let impostor = KxKeyPair::generate();

        let (client, packet) = kx_n_1(server.public_key().unwrap().raw_view()).unwrap();
        let impostor_session = kx_n_2(&impostor, packet.raw_view()).unwrap();

        assert_ne!(client.tx().unwrap(), impostor_session.rx().unwrap());
    }

    #[test]
    fn test_interactive_agreement() {
        let alice = ExchangeState::new();
        let bob = ExchangeState::new();
        let alice_packet = alice.packet().unwrap();
        let bob_packet = bob.packet().unwrap();
        assert_eq!(alice_packet.len(), KX_PACKETBYTES);

        let alice_session = alice.finish(Role::Initiator, bob_packet.raw_view()).unwrap();
        let bob_session = bob.finish(Role::Responder, alice_packet.raw_view()).unwrap();

        assert_eq!(alice_session.tx().unwrap(), bob_session.rx().unwrap());
        assert_eq!(alice_session.rx().unwrap(), bob_session.tx().unwrap());
    }

    #[test]
    fn test_same_role_disagrees() {
        let alice = ExchangeState::new();
        let bob = ExchangeState::new();
        let alice_packet = alice.packet().unwrap();
        let bob_packet = bob.packet().unwrap();

        let alice_session = alice.finish(Role::Initiator, bob_packet.raw_view()).unwrap();
        let bob_session = bob.finish(Role::Initiator, alice_packet.raw_view()).unwrap();

        assert_ne!(alice_session.tx().unwrap(), bob_session.rx().unwrap());
    }

    #[test]
    fn test_zero_packet_rejected() {
        let state = ExchangeState::new();
        let result = state.finish(Role::Responder, &[0u8; KX_PACKETBYTES]);
        assert!(matches!(result, Err(Error::Crypto(_))));

        let server = KxKeyPair::generate();
        assert!(matches!(
            kx_n_2(&server, &[0u8; KX_N_PACKET1BYTES]),
            Err(Error::Crypto(_))
        ));
        assert!(kx_n_1(&[0u8; KX_PUBLICKEYBYTES]).is_err());
    }

    #[test]
    fn test_bad_packet_length() {
        let state = ExchangeState::new();
        let result = state.finish(Role::Initiator, &[1u8; 16]);
        assert!(matches!(result, Err(Error::InvalidLength { expected: 32, actual: 16 })));
    }
}
