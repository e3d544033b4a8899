//! Keygen command implementation.

use hydrobuf_core::{ByteBuffer, KxKeyPair, SignKeyPair};

use crate::KeyKind;

/// Generate a key pair and print its fields as hex.
pub fn keygen(kind: KeyKind, show_secret: bool) -> anyhow::Result<()> {
    let (public_key, secret_key) = match kind {
        KeyKind::Sign => {
            let pair = SignKeyPair::generate();
            (pair.public_key()?, pair.secret_key()?)
        }
        KeyKind::Kx => {
            let pair = KxKeyPair::generate();
            (pair.public_key()?, pair.secret_key()?)
        }
    };

    print_key("Public key", &public_key);
    if show_secret {
        print_key("Secret key", &secret_key);
    } else {
        println!("\x1b[2mSecret key ({} bytes) hidden, pass --show-secret to print it\x1b[0m", secret_key.len());
    }
    Ok(())
}

fn print_key(label: &str, key: &ByteBuffer) {
    println!("\x1b[1m{}\x1b[0m ({} bytes): {}", label, key.len(), key.to_hex());
}
