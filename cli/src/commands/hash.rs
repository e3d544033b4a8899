//! Hash command implementation.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use hydrobuf_core::{Config, HashState};

const CHUNK_LEN: usize = 64 * 1024;

/// Stream a file (or stdin) through a hash state and print the hex digest.
pub fn hash_input(config: &Config, path: Option<&Path>) -> anyhow::Result<()> {
    let mut reader: Box<dyn Read> = match path {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin().lock()),
    };

    let mut chunk = config.allocate(CHUNK_LEN)?;
    let mut state = HashState::new(&config.context);
    let mut total = 0usize;

    loop {
        let n = reader.read(chunk.raw_view_mut())?;
        if n == 0 {
            break;
        }
        state.update(&chunk.raw_view()[..n]);
        total += n;
    }
    chunk.release();

    tracing::debug!(bytes = total, "hashed input");
    let digest = state.finalize()?;

    match path {
        Some(path) => println!("{}  {}", digest.to_hex(), path.display()),
        None => println!("{}", digest.to_hex()),
    }
    Ok(())
}
