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

//! Error types for the ledger store and transfer processing.

use crate::base::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Ledger store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying SQLite operation failed
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No account with this id exists
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// A balance adjustment would leave the account negative
    #[error("insufficient funds in account {account} (available {available})")]
    InsufficientFunds { account: AccountId, available: Decimal },
}

/// Broad category of a [`TransferError`], used to pick the response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed input or a business-rule violation the caller can correct.
    Validation,
    /// A referenced account does not exist.
    NotFound,
    /// The store could not complete the atomic unit.
    Storage,
}

/// Transfer rejections and failures.
///
/// The display text is the message reported back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// One of `from_account_id`, `to_account_id` or `amount` is absent
    #[error("Missing required fields: from_account_id, to_account_id, amount")]
    MissingFields,

    /// Source and destination are the same account
    #[error("Cannot transfer to the same account")]
    SameAccount,

    /// Amount is zero or negative
    #[error("Transfer amount must be greater than zero")]
    NonPositiveAmount,

    /// Source account does not exist
    #[error("Source account {0} not found")]
    SourceNotFound(AccountId),

    /// Destination account does not exist
    #[error("Destination account {0} not found")]
    DestinationNotFound(AccountId),

    /// Source balance is below the requested amount
    #[error("Insufficient funds. Available: ${available:.2}")]
    InsufficientFunds { available: Decimal },

    /// Storage failed; nothing was committed
    #[error("Transfer failed: {0}")]
    TransferFailed(String),
}

impl TransferError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TransferError::MissingFields
            | TransferError::SameAccount
            | TransferError::NonPositiveAmount
            | TransferError::InsufficientFunds { .. } => ErrorClass::Validation,
            TransferError::SourceNotFound(_) | TransferError::DestinationNotFound(_) => {
                ErrorClass::NotFound
            }
            TransferError::TransferFailed(_) => ErrorClass::Storage,
        }
    }
}

impl From<StoreError> for TransferError {
    fn from(err: StoreError) -> Self {
        TransferError::TransferFailed(err.to_string())
    }
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}
