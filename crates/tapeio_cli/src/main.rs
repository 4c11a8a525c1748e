//! tapeio CLI
//!
//! Command-line tools for inspecting and maintaining tapeio files.
//!
//! # Commands
//!
//! - `stat` - Display file length and handle id
//! - `set-len` - Truncate or extend a file
//! - `zero` - Zero-fill a region
//! - `copy` - Relocate a region within a file
//! - `dump` - Hex dump a region
//! - `digest` - SHA-256 of a region

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::OutputFormat;
use error::CliResult;
use std::path::PathBuf;
use std::process::ExitCode;
use tapeio_fileio::{FileIo, FileIoConfig, SyncMode, COPY_BUFFER_SIZE};
use tracing_subscriber::EnvFilter;

/// tapeio command-line file tools.
#[derive(Parser)]
#[command(name = "tapeio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    /// Output format
    #[arg(global = true, short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Sync file data only instead of data and metadata
    #[arg(global = true, long)]
    sync_data: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display file length and handle id
    Stat {
        /// Path to the file
        path: PathBuf,
    },

    /// Truncate or extend a file to an exact length
    SetLen {
        /// Path to the file
        path: PathBuf,

        /// New length in bytes
        length: u64,
    },

    /// Write zeros over a region (length must be a multiple of 4)
    Zero {
        /// Path to the file
        path: PathBuf,

        /// Start of the region
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Number of zero bytes to write
        #[arg(short, long)]
        length: u64,
    },

    /// Copy a region to a non-overlapping offset in the same file
    Copy {
        /// Path to the file
        path: PathBuf,

        /// Source offset
        #[arg(short, long)]
        source: u64,

        /// Destination offset
        #[arg(short, long)]
        destination: u64,

        /// Number of bytes to copy
        #[arg(short, long)]
        length: u64,

        /// Bytes moved per read/write
        #[arg(short, long, default_value_t = COPY_BUFFER_SIZE)]
        chunk_size: usize,
    },

    /// Hex dump a region
    Dump {
        /// Path to the file
        path: PathBuf,

        /// Start of the region
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Region length (defaults to the rest of the file)
        #[arg(short, long)]
        length: Option<u64>,
    },

    /// Print the SHA-256 of a region
    Digest {
        /// Path to the file
        path: PathBuf,

        /// Start of the region
        #[arg(short, long, default_value = "0")]
        offset: u64,

        /// Region length (defaults to the rest of the file)
        #[arg(short, long)]
        length: Option<u64>,
    },

    /// Show version information
    Version,
}

fn run(cli: Cli) -> CliResult<()> {
    let sync_mode = if cli.sync_data {
        SyncMode::Data
    } else {
        SyncMode::Full
    };
    let config = FileIoConfig::new().sync_mode(sync_mode);
    let format = cli.format;

    match cli.command {
        Commands::Stat { path } => {
            let io = FileIo::with_config(config);
            commands::emit(format, &commands::stat::run(&io, &path)?)
        }
        Commands::SetLen { path, length } => {
            let io = FileIo::with_config(config);
            commands::emit(format, &commands::set_len::run(&io, &path, length)?)
        }
        Commands::Zero {
            path,
            offset,
            length,
        } => {
            let io = FileIo::with_config(config);
            commands::emit(format, &commands::zero::run(&io, &path, offset, length)?)
        }
        Commands::Copy {
            path,
            source,
            destination,
            length,
            chunk_size,
        } => {
            let io = FileIo::with_config(config.copy_buffer_size(chunk_size));
            let report = commands::copy::run(&io, &path, source, destination, length)?;
            commands::emit(format, &report)
        }
        Commands::Dump {
            path,
            offset,
            length,
        } => {
            let io = FileIo::with_config(config);
            commands::emit(format, &commands::dump::run(&io, &path, offset, length)?)
        }
        Commands::Digest {
            path,
            offset,
            length,
        } => {
            let io = FileIo::with_config(config);
            commands::emit(format, &commands::digest::run(&io, &path, offset, length)?)
        }
        Commands::Version => {
            println!("tapeio CLI v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
