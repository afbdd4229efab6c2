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

//! Account records.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use transfer_ledger_rs::{Account, AccountId};
//!
//! let account = Account::new(AccountId(1), "John Smith", "john.smith@example.com", dec!(1000.00));
//! assert!(account.can_cover(dec!(1000.00)));
//! assert!(!account.can_cover(dec!(1000.01)));
//! ```

use crate::base::AccountId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// A ledger account.
///
/// `name` and `email` are display-only. `balance` is never negative and only
/// changes through a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    #[serde(rename = "account_balance")]
    pub balance: Decimal,
}

impl Account {
    /// Currency precision used when balances leave the process.
    pub const DECIMAL_PRECISION: u32 = 2;

    pub fn new(
        id: AccountId,
        name: impl Into<String>,
        email: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            balance,
        }
    }

    /// Returns `true` if the balance covers a debit of `amount`.
    pub fn can_cover(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Account", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field(
            "account_balance",
            &self.balance.round_dp(Account::DECIMAL_PRECISION),
        )?;
        state.end()
    }
}
