//! Selftest command implementation.

use anyhow::{bail, ensure};
use hydrobuf_core::constants::{SIGN_BYTES, SIGN_PUBLICKEYBYTES};
use hydrobuf_core::crypto::{self, kx_n_1, kx_n_2};
use hydrobuf_core::{Config, ExchangeState, KxKeyPair, Role, SignKeyPair, SignState};

/// Run sign/verify and both key exchange variants, failing on any mismatch.
pub fn selftest(config: &Config) -> anyhow::Result<()> {
    check_signing(config)?;
    pass("sign / verify");

    check_kx_n()?;
    pass("key exchange (N)");

    check_kx_interactive()?;
    pass("key exchange (interactive)");

    Ok(())
}

fn check_signing(config: &Config) -> anyhow::Result<()> {
    let message = b"hydrobuf selftest message";
    let keypair = SignKeyPair::generate();
    let public_key = keypair.public_key()?;
    ensure!(public_key.len() == SIGN_PUBLICKEYBYTES, "unexpected public key length");
    ensure!(public_key.to_hex().len() == 2 * SIGN_PUBLICKEYBYTES, "unexpected hex length");

    let mut state = SignState::new(&config.context);
    state.update(&message[..8]).update(&message[8..]);
    let signature = state.finalize_create(&keypair)?;
    ensure!(signature.len() == SIGN_BYTES, "unexpected signature length");

    crypto::verify(&config.context, message, signature.raw_view(), public_key.raw_view())?;

    if crypto::verify(&config.context, b"tampered", signature.raw_view(), public_key.raw_view()).is_ok() {
        bail!("tampered message verified");
    }
    Ok(())
}

fn check_kx_n() -> anyhow::Result<()> {
    let server = KxKeyPair::generate();
    let (client, packet) = kx_n_1(server.public_key()?.raw_view())?;
    let server_session = kx_n_2(&server, packet.raw_view())?;

    ensure!(client.tx()? == server_session.rx()?, "client tx != server rx");
    ensure!(client.rx()? == server_session.tx()?, "client rx != server tx");
    Ok(())
}

fn check_kx_interactive() -> anyhow::Result<()> {
    let initiator = ExchangeState::new();
    let responder = ExchangeState::new();
    let initiator_packet = initiator.packet()?;
    let responder_packet = responder.packet()?;

    let a = initiator.finish(Role::Initiator, responder_packet.raw_view())?;
    let b = responder.finish(Role::Responder, initiator_packet.raw_view())?;

    ensure!(a.tx()? == b.rx()?, "initiator tx != responder rx");
    ensure!(a.rx()? == b.tx()?, "initiator rx != responder tx");
    Ok(())
}

fn pass(name: &str) {
    println!("\x1b[1;32m✓\x1b[0m {}", name);
}
