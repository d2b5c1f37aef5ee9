//! kvwire Inspector
//!
//! Shows what a command looks like on the wire and what a captured reply
//! stream decodes to.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use kvwire::protocol::Command;
use kvwire::{Arg, Config, ReplyReader, RespReader};
use tracing_subscriber::{fmt, EnvFilter};

/// kvwire Inspector
#[derive(Parser, Debug)]
#[command(name = "kvwire-inspect")]
#[command(about = "Encode commands and decode RESP replies")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the RESP encoding of a command
    Encode {
        /// Command name
        name: String,

        /// Command arguments
        args: Vec<String>,
    },

    /// Decode every reply in a captured stream
    Decode {
        /// Capture file (stdin when omitted)
        file: Option<PathBuf>,

        /// Largest accepted bulk string in MB
        #[arg(short = 'b', long, default_value = "512")]
        max_bulk_mb: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvwire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let outcome = match args.command {
        Commands::Encode { name, args } => encode(name, args),
        Commands::Decode { file, max_bulk_mb } => decode(file, max_bulk_mb),
    };

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn encode(name: String, args: Vec<String>) -> kvwire::Result<()> {
    let command = Command::new(name, vec![Arg::from(args)])?;
    let wire = kvwire::protocol::encode_command(&command);

    tracing::debug!("Encoded {} tokens, {} bytes", command.len(), wire.len());
    println!("{}", escape(&wire));
    Ok(())
}

fn decode(file: Option<PathBuf>, max_bulk_mb: usize) -> kvwire::Result<()> {
    let mut input = Vec::new();
    match &file {
        Some(path) => {
            File::open(path)?.read_to_end(&mut input)?;
        }
        None => {
            io::stdin().read_to_end(&mut input)?;
        }
    }

    let config = Config::builder()
        .max_bulk_len(bulk_limit(max_bulk_mb))
        .build();
    let total = input.len() as u64;
    let mut rd = RespReader::with_config(Cursor::new(input), &config);

    let mut count = 0usize;
    while rd.get_ref().position() < total {
        let value = rd.read_value()?;
        count += 1;
        println!("{}) {}", count, value);
    }

    tracing::info!("Decoded {} replies", count);
    Ok(())
}

/// Megabytes to bytes, capped at `usize::MAX`
fn bulk_limit(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

/// Render wire bytes with CR/LF and non-printable bytes escaped
fn escape(bytes: &[u8]) -> String {
    bytes.iter().flat_map(|b| std::ascii::escape_default(*b)).map(char::from).collect()
}
