//! CLI command implementations.

mod hash;
mod info;
mod keygen;
mod selftest;

pub use hash::hash_input;
pub use info::show_info;
pub use keygen::keygen;
pub use selftest::selftest;
