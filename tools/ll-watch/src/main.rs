//! LL-Watch: command-line client for Ledger-Link.
//!
//! Talks to a node the same way any wallet would: the real-time endpoint
//! for notifications and the REST endpoint for announcements.
//!
//! ## Usage
//!
//! ```bash
//! # Derive an address
//! ll-watch address --public-key b4f12e7c... --network mijin-test
//!
//! # Stream notifications for an account
//! ll-watch --config node.toml watch --public-key b4f12e7c... --block
//!
//! # Announce and wait for the outcome
//! ll-watch announce --payload <HEX> --hash <HEX> --signer <HEX>
//! ```

mod commands;
mod config;
mod output;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ledger_telemetry::{init_logging, TelemetryConfig};
use shared_types::NetworkType;

use commands::AnnounceArgs;
use config::ClientConfig;

/// Ledger-Link command-line client
#[derive(Parser, Debug)]
#[command(name = "ll-watch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true, env = "LL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive the address of a public key
    Address {
        /// Hex public key (64 chars, or 66 with the 20 length prefix)
        #[arg(long)]
        public_key: String,
        /// Network name or identifier byte; defaults to the configured one
        #[arg(long)]
        network: Option<NetworkType>,
    },
    /// Check an address's checksum and network
    Validate {
        address: String,
    },
    /// Print notifications for an account until interrupted
    Watch {
        #[arg(long, conflicts_with = "address")]
        public_key: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// Also print new blocks
        #[arg(long)]
        block: bool,
    },
    /// Announce a signed transaction and wait for its outcome
    Announce {
        /// Signed transaction bytes, hex
        #[arg(long)]
        payload: String,
        /// Transaction hash, hex
        #[arg(long)]
        hash: String,
        /// Signer public key, hex
        #[arg(long)]
        signer: String,
        /// Seconds to wait for a confirmed or status notification
        #[arg(long, default_value = "60")]
        timeout: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<ClientConfig> {
    let mut config = match path {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    config.apply_env()?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&TelemetryConfig::from_env().for_service("ll-watch"))?;

    let config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Address {
            public_key,
            network,
        } => commands::address(&public_key, network.unwrap_or(config.network)),
        Command::Validate { address } => commands::validate(&address),
        Command::Watch {
            public_key,
            address,
            block,
        } => commands::watch(&config, public_key.as_deref(), address.as_deref(), block).await,
        Command::Announce {
            payload,
            hash,
            signer,
            timeout,
        } => {
            commands::announce(
                &config,
                AnnounceArgs {
                    payload: &payload,
                    hash: &hash,
                    signer: &signer,
                    timeout: Duration::from_secs(timeout),
                },
            )
            .await
        }
    }
}
