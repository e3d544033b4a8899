//! hydrobuf CLI - inspect and exercise the hydrobuf primitives.

mod commands;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hydrobuf_core::{constants, Config, Context};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hydrobuf")]
#[command(about = "Hashing, signing and key exchange over owned byte buffers", long_about = None)]
struct Cli {
    /// Largest buffer a single allocation may request
    #[arg(long, global = true, default_value_t = constants::MAX_BUFFER_LEN)]
    max_buffer_len: usize,

    /// Context tag (at most 8 bytes) used for hashing and signing
    #[arg(short, long, global = true, default_value = constants::DEFAULT_CONTEXT)]
    context: Context,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show field lengths (default)
    Info,
    /// Hash a file, or stdin when no file is given
    Hash {
        file: Option<PathBuf>,
    },
    /// Generate a key pair and print it as hex
    Keygen {
        #[arg(value_enum, default_value_t = KeyKind::Sign)]
        kind: KeyKind,
        /// Also print the secret key
        #[arg(long)]
        show_secret: bool,
    },
    /// Run signing and key exchange round trips
    Selftest,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KeyKind {
    Sign,
    Kx,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("hydrobuf=info".parse()?)
                .add_directive("hydrobuf_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        max_buffer_len: cli.max_buffer_len,
        context: cli.context,
    };

    match cli.command.unwrap_or(Commands::Info) {
        Commands::Info => commands::show_info(),
        Commands::Hash { file } => commands::hash_input(&config, file.as_deref())?,
        Commands::Keygen { kind, show_secret } => commands::keygen(kind, show_secret)?,
        Commands::Selftest => commands::selftest(&config)?,
    }

    Ok(())
}
