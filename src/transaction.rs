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

//! Transaction log records.
//!
//! The log is append-only. Transfers are always written as
//! [`TransactionStatus::Completed`] in the same atomic unit as the balance
//! changes they describe, so a pending transfer is never observable.

use crate::base::{AccountId, TransactionId};
use chrono::NaiveDateTime;
use rusqlite::ToSql;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Transfer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Transfer => "transfer",
        }
    }
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

/// Error for an unrecognised kind or status column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown variant '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for TransactionKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "transfer" => Ok(Self::Transfer),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for TransactionStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A transaction about to be appended to the log.
///
/// The store assigns the id and the creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTransaction {
    /// Owning account. For transfers this is the source account.
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub from_account_id: Option<AccountId>,
    pub to_account_id: Option<AccountId>,
}

impl NewTransaction {
    /// A completed transfer between two accounts.
    pub fn transfer(from: AccountId, to: AccountId, amount: Decimal) -> Self {
        Self {
            account_id: from,
            kind: TransactionKind::Transfer,
            amount,
            status: TransactionStatus::Completed,
            from_account_id: Some(from),
            to_account_id: Some(to),
        }
    }

    pub fn deposit(account_id: AccountId, amount: Decimal, status: TransactionStatus) -> Self {
        Self {
            account_id,
            kind: TransactionKind::Deposit,
            amount,
            status,
            from_account_id: None,
            to_account_id: None,
        }
    }

    pub fn withdrawal(account_id: AccountId, amount: Decimal, status: TransactionStatus) -> Self {
        Self {
            account_id,
            kind: TransactionKind::Withdrawal,
            amount,
            status,
            from_account_id: None,
            to_account_id: None,
        }
    }
}

/// A transaction as stored in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    #[serde(rename = "user_id")]
    pub account_id: AccountId,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub from_account_id: Option<AccountId>,
    pub to_account_id: Option<AccountId>,
    pub created_on: NaiveDateTime,
}
