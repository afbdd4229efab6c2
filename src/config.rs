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

//! Runtime configuration.
//!
//! Loaded from an optional TOML file; command-line flags override file
//! values in the binary.
//!
//! ```toml
//! listen = "127.0.0.1:5001"
//! database = "ledger.db"
//! seed = true
//! log_filter = "info,transfer_ledger_rs=debug"
//! ```

use crate::error::{ConfigError, StoreError};
use crate::fixtures::Fixture;
use crate::store::LedgerStore;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listen address
    pub listen: SocketAddr,

    /// Ledger database file; `None` keeps the ledger in memory
    pub database: Option<PathBuf>,

    /// Reset the ledger to the standard fixture on startup
    pub seed: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 5001)),
            database: None,
            seed: true,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Opens the configured store, seeding it if requested.
    pub fn open_store(&self) -> Result<LedgerStore, StoreError> {
        let store = match &self.database {
            Some(path) => LedgerStore::open(path)?,
            None => LedgerStore::open_in_memory()?,
        };
        if self.seed {
            store.seed(&Fixture::standard())?;
        }
        Ok(store)
    }
}
