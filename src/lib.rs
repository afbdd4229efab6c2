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

//! # Transfer Ledger
//!
//! This library provides a money-transfer service over an embedded SQLite
//! ledger, plus the HTTP surface and fixtures used to verify it end to end.
//!
//! ## Core Components
//!
//! - [`LedgerStore`]: account balances and the append-only transaction log
//! - [`validate`]: pure decision logic run before any mutation
//! - [`TransferExecutor`]: applies a validated transfer as one atomic unit
//! - [`TransferGateway`]: `list_accounts` and `submit_transfer`, reporting a [`TransferOutcome`]
//! - [`server`]: `GET /`, `GET /api/accounts` and `POST /api/transfer`
//!
//! ## Example
//!
//! ```
//! use transfer_ledger_rs::{Fixture, LedgerStore, TransferGateway, TransferRequest};
//! use transfer_ledger_rs::fixtures::{JANE, JOHN};
//! use rust_decimal_macros::dec;
//!
//! let store = LedgerStore::open_in_memory().unwrap();
//! store.seed(&Fixture::standard()).unwrap();
//! let gateway = TransferGateway::new(store.clone());
//!
//! let outcome = gateway.submit_transfer(&TransferRequest::new(JOHN, JANE, dec!(200)));
//! assert!(outcome.is_success());
//!
//! // Money moves, but the total is conserved.
//! assert_eq!(store.get_account(JOHN).unwrap().unwrap().balance, dec!(800.00));
//! assert_eq!(store.total_balance().unwrap(), dec!(3500.00));
//! ```
//!
//! ## Concurrency
//!
//! All store handles share one connection behind a lock, so transfers are
//! serialized and callers only ever observe a transfer fully applied or not
//! at all.

pub mod account;
mod base;
pub mod config;
pub mod error;
mod executor;
pub mod fixtures;
mod gateway;
pub mod page;
pub mod report;
pub mod server;
mod store;
mod transaction;
mod validator;

pub use account::Account;
pub use base::{AccountId, TransactionId};
pub use config::Config;
pub use error::{ConfigError, ErrorClass, StoreError, TransferError};
pub use executor::{TransferExecutor, TransferReceipt};
pub use fixtures::Fixture;
pub use gateway::{TransferGateway, TransferOutcome, TransferRequest, TransferResponse, status_for};
pub use store::{LedgerStore, LedgerUnit};
pub use transaction::{
    NewTransaction, TransactionKind, TransactionRecord, TransactionStatus, UnknownVariant,
};
pub use validator::{AccountLookup, ValidatedTransfer, validate};
