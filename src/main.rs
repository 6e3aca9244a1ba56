use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use padwire::commands;
use padwire::wire::Role;

#[derive(Parser)]
#[command(name = "padwire")]
#[command(about = "One-time-pad encryption daemons and clients over TCP", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a random key of the given length to stdout
    Keygen {
        /// Number of symbols to generate (1 to 2,000,000,000)
        length: String,
    },
    /// Run the encryption daemon
    EncDaemon {
        /// Port to listen on
        port: u16,
    },
    /// Run the decryption daemon
    DecDaemon {
        /// Port to listen on
        port: u16,
    },
    /// Encrypt a text file against a key file via the encryption daemon
    EncClient {
        /// File holding the plaintext (A-Z and space only)
        text_file: PathBuf,
        /// File holding the key, at least as long as the plaintext
        key_file: PathBuf,
        /// Port the encryption daemon listens on
        port: u16,
    },
    /// Decrypt a cipher file against a key file via the decryption daemon
    DecClient {
        /// File holding the ciphertext (A-Z and space only)
        cipher_file: PathBuf,
        /// File holding the key, at least as long as the ciphertext
        key_file: PathBuf,
        /// Port the decryption daemon listens on
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    // Argument errors are a local failure (exit 1), not a network one
    // (exit 2, clap's default), so parse failures are mapped by hand.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    // Configure logging based on verbose flag
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let code = match cli.command {
        Commands::Keygen { length } => match commands::keygen::run(&length) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("keygen: {}", e);
                1
            }
        },
        Commands::EncDaemon { port } => daemon(Role::Encrypt, port).await,
        Commands::DecDaemon { port } => daemon(Role::Decrypt, port).await,
        Commands::EncClient {
            text_file,
            key_file,
            port,
        } => client(Role::Encrypt, text_file, key_file, port).await,
        Commands::DecClient {
            cipher_file,
            key_file,
            port,
        } => client(Role::Decrypt, cipher_file, key_file, port).await,
    };

    process::exit(code);
}

/// Daemons only return on startup failure; anything after bind is logged
/// and survived inside the accept loop.
async fn daemon(role: Role, port: u16) -> i32 {
    match commands::daemon::run(role, port).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("SERVER: {}", e);
            1
        }
    }
}

async fn client(role: Role, text_file: PathBuf, key_file: PathBuf, port: u16) -> i32 {
    match commands::client::run(role, &text_file, &key_file, port).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("CLIENT: ERROR {}", e);
            e.exit_code()
        }
    }
}
