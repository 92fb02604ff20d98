// SPDX-FileCopyrightText: 2026 Partyline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Partyline - anonymous two-party chat for matchmaking boards.
//!
//! This is the binary entry point for the Partyline service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;
mod sweep;

/// Partyline - anonymous two-party chat for matchmaking boards.
#[derive(Parser, Debug)]
#[command(name = "partyline", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the chat service: HTTP/WebSocket gateway plus expiry sweeper.
    Serve,
    /// Run one expiry pass against the configured database and exit.
    Sweep,
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match partyline_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            partyline_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Sweep) => sweep::run_sweep(config).await,
        Some(Commands::CheckConfig) => {
            println!(
                "config OK (server={}:{}, database={})",
                config.server.host, config.server.port, config.storage.database_path
            );
            Ok(())
        }
        None => {
            println!("partyline: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
