// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, ensure};
use clap::{Parser, Subcommand};
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use transfer_ledger_rs::{Config, Fixture, LedgerStore, TransferGateway, report, server};

/// Transfer Ledger - account transfers over an embedded SQLite ledger
///
/// Serves the transfer page and API, seeds ledger databases with the
/// standard fixture, and exports ledger contents as CSV.
#[derive(Parser, Debug)]
#[command(name = "transfer-ledger")]
#[command(about = "Account transfer service over an embedded SQLite ledger", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file (optional)
    #[arg(
        short,
        long,
        env = "LEDGER_CONFIG",
        default_value = "transfer-ledger.toml",
        global = true
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the transfer page and API until interrupted
    Serve {
        /// HTTP listen address
        #[arg(short, long, env = "LEDGER_LISTEN")]
        listen: Option<SocketAddr>,

        /// Ledger database file (in-memory when omitted)
        #[arg(short, long, env = "LEDGER_DATABASE")]
        database: Option<PathBuf>,

        /// Keep the existing ledger contents instead of seeding the fixture
        #[arg(long)]
        no_seed: bool,
    },
    /// Reset a ledger database file to the standard fixture
    Seed {
        #[arg(value_name = "DATABASE")]
        database: PathBuf,
    },
    /// Write accounts (or the transaction log) as CSV to stdout
    ///
    /// Example: transfer-ledger report ledger.db > accounts.csv
    Report {
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Export the transaction log instead of account balances
        #[arg(long)]
        transactions: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("loading config from '{}'", cli.config.display()))?;
    init_logging(&config.log_filter);

    match cli.command {
        Command::Serve {
            listen,
            database,
            no_seed,
        } => {
            if let Some(listen) = listen {
                config.listen = listen;
            }
            if database.is_some() {
                config.database = database;
            }
            if no_seed {
                config.seed = false;
            }
            serve(config).await
        }
        Command::Seed { database } => {
            let store = LedgerStore::open(&database)?;
            store.seed(&Fixture::standard())?;
            info!("seeded {}", database.display());
            Ok(())
        }
        Command::Report {
            database,
            transactions,
        } => {
            ensure!(
                database.exists(),
                "database '{}' does not exist",
                database.display()
            );
            let store = LedgerStore::open(&database)?;
            if transactions {
                report::write_transactions(&store.transactions()?, io::stdout())?;
            } else {
                report::write_accounts(&store.list_accounts()?, io::stdout())?;
            }
            Ok(())
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // stderr keeps stdout free for CSV reports
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store = config.open_store().context("opening ledger store")?;
    let gateway = TransferGateway::new(store);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("binding {}", config.listen))?;

    server::serve(listener, gateway, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("received shutdown signal");
    })
    .await?;

    info!("shutdown complete");
    Ok(())
}
