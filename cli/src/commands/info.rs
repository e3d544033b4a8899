//! Info command implementation.

use hydrobuf_core::constants::*;

use crate::ui::{print_banner, print_field};

/// Display the byte length of every fixed-size field.
pub fn show_info() {
    print_banner();

    print_field("Context", CONTEXT_BYTES);
    print_field("Hash", HASH_BYTES);
    print_field("Sign public key", SIGN_PUBLICKEYBYTES);
    print_field("Sign secret key", SIGN_SECRETKEYBYTES);
    print_field("Signature", SIGN_BYTES);
    print_field("KX public key", KX_PUBLICKEYBYTES);
    print_field("KX secret key", KX_SECRETKEYBYTES);
    print_field("Session key", KX_SESSIONKEYBYTES);
    print_field("KX N packet", KX_N_PACKET1BYTES);
    print_field("KX packet", KX_PACKETBYTES);
    print_field("Max buffer", MAX_BUFFER_LEN);
    println!();
}
