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

//! Fixed seed data for test environments.
//!
//! Every scenario starts from the same three accounts (total 3500.00) and a
//! short history of deposits and withdrawals.

use crate::account::Account;
use crate::base::AccountId;
use crate::transaction::{NewTransaction, TransactionStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const JOHN: AccountId = AccountId(1);
pub const JANE: AccountId = AccountId(2);
pub const BOB: AccountId = AccountId(3);

/// Accounts and history loaded by [`LedgerStore::seed`](crate::LedgerStore::seed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub accounts: Vec<Account>,
    /// Appended in order, so the first entry receives transaction id 1.
    pub history: Vec<NewTransaction>,
}

impl Fixture {
    /// The standard three-account environment.
    pub fn standard() -> Self {
        Self {
            accounts: vec![
                Account::new(JOHN, "John Smith", "john.smith@example.com", dec!(1000.00)),
                Account::new(JANE, "Jane Doe", "jane.doe@example.com", dec!(500.00)),
                Account::new(BOB, "Bob Johnson", "bob.johnson@example.com", dec!(2000.00)),
            ],
            history: vec![
                NewTransaction::deposit(JOHN, dec!(500.00), TransactionStatus::Completed),
                NewTransaction::withdrawal(JOHN, dec!(200.00), TransactionStatus::Completed),
                NewTransaction::deposit(JANE, dec!(500.00), TransactionStatus::Completed),
                NewTransaction::deposit(JANE, dec!(1500.00), TransactionStatus::Pending),
                NewTransaction::deposit(BOB, dec!(2000.00), TransactionStatus::Completed),
            ],
        }
    }

    /// Sum of all seeded balances.
    pub fn total_balance(&self) -> Decimal {
        self.accounts.iter().map(|account| account.balance).sum()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_fixture_totals_3500() {
        assert_eq!(Fixture::standard().total_balance(), dec!(3500.00));
    }

    #[test]
    fn standard_fixture_ids_are_ascending() {
        let fixture = Fixture::standard();
        let ids: Vec<_> = fixture.accounts.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![JOHN, JANE, BOB]);
    }
}
