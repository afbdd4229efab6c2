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

//! Transfer validation.
//!
//! Decides whether a transfer may proceed before anything is mutated. Rules
//! are checked in order and the first failure wins:
//!
//! 1. all of `from_account_id`, `to_account_id` and `amount` are present
//! 2. source and destination differ
//! 3. `amount > 0`
//! 4. the source account exists
//! 5. the destination account exists
//! 6. the source balance covers `amount`

use crate::account::Account;
use crate::base::AccountId;
use crate::error::{StoreError, TransferError};
use crate::gateway::TransferRequest;
use crate::store::{LedgerStore, LedgerUnit};
use rust_decimal::Decimal;

/// Read-only account lookup used during validation.
pub trait AccountLookup {
    fn lookup(&self, id: AccountId) -> Result<Option<Account>, StoreError>;
}

impl AccountLookup for LedgerStore {
    fn lookup(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.get_account(id)
    }
}

impl AccountLookup for LedgerUnit<'_> {
    fn lookup(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.get_account(id)
    }
}

impl AccountLookup for [Account] {
    fn lookup(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.iter().find(|account| account.id == id).cloned())
    }
}

/// A transfer that passed every rule, carrying the accounts as they were
/// read during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTransfer {
    pub from: Account,
    pub to: Account,
    pub amount: Decimal,
}

/// Checks `request` against the transfer rules.
///
/// # Errors
///
/// - [`TransferError::MissingFields`] - a field is absent.
/// - [`TransferError::SameAccount`] - source equals destination.
/// - [`TransferError::NonPositiveAmount`] - amount is zero or negative.
/// - [`TransferError::SourceNotFound`] / [`TransferError::DestinationNotFound`].
/// - [`TransferError::InsufficientFunds`] - carries the available balance.
/// - [`TransferError::TransferFailed`] - the lookup itself failed.
pub fn validate<L>(request: &TransferRequest, accounts: &L) -> Result<ValidatedTransfer, TransferError>
where
    L: AccountLookup + ?Sized,
{
    let (Some(from_id), Some(to_id), Some(amount)) = (
        request.from_account_id,
        request.to_account_id,
        request.amount,
    ) else {
        return Err(TransferError::MissingFields);
    };

    if from_id == to_id {
        return Err(TransferError::SameAccount);
    }

    if amount <= Decimal::ZERO {
        return Err(TransferError::NonPositiveAmount);
    }

    let from = accounts
        .lookup(from_id)?
        .ok_or(TransferError::SourceNotFound(from_id))?;
    let to = accounts
        .lookup(to_id)?
        .ok_or(TransferError::DestinationNotFound(to_id))?;

    if !from.can_cover(amount) {
        return Err(TransferError::InsufficientFunds {
            available: from.balance,
        });
    }

    Ok(ValidatedTransfer { from, to, amount })
}
