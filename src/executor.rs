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

//! Transfer execution.
//!
//! Applies a [`ValidatedTransfer`] as one atomic unit: debit the source,
//! credit the destination, and append a completed `transfer` log entry. If
//! any of the three writes fails, none of them is kept.
//!
//! [`TransferExecutor::validate_and_execute`] also runs validation inside
//! the unit, which is what the gateway uses.

use crate::base::TransactionId;
use crate::error::TransferError;
use crate::gateway::TransferRequest;
use crate::store::{LedgerStore, LedgerUnit};
use crate::transaction::NewTransaction;
use crate::validator::{self, ValidatedTransfer};
use rust_decimal::Decimal;
use tracing::error;

/// Result of a committed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transaction_id: TransactionId,
    pub from_name: String,
    pub to_name: String,
    pub amount: Decimal,
}

/// Applies validated transfers to a [`LedgerStore`].
#[derive(Clone)]
pub struct TransferExecutor {
    store: LedgerStore,
}

impl TransferExecutor {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Executes `transfer` in its own unit.
    ///
    /// The store re-checks the source balance inside the unit, so a balance
    /// that changed since validation still cannot go negative.
    ///
    /// # Errors
    ///
    /// [`TransferError::TransferFailed`] if any write fails. The ledger is
    /// left exactly as it was before the call.
    pub fn execute(&self, transfer: &ValidatedTransfer) -> Result<TransferReceipt, TransferError> {
        self.store
            .atomically(|unit| Self::apply(unit, transfer))
            .inspect_err(|e| log_rollback(transfer, e))
    }

    /// Validates `request` and executes it within one unit.
    ///
    /// Validation reads the balances the writes are based on, so concurrent
    /// submissions from the same account are decided one after the other and
    /// a losing submission is rejected with
    /// [`TransferError::InsufficientFunds`].
    pub fn validate_and_execute(
        &self,
        request: &TransferRequest,
    ) -> Result<TransferReceipt, TransferError> {
        self.store.atomically(|unit| {
            let transfer = validator::validate(request, unit)?;
            Self::apply(unit, &transfer)
        })
    }

    /// Debits, credits and logs `transfer` through an open unit.
    pub fn apply(
        unit: &LedgerUnit<'_>,
        transfer: &ValidatedTransfer,
    ) -> Result<TransferReceipt, TransferError> {
        let from = transfer.from.id;
        let to = transfer.to.id;
        let amount = transfer.amount;

        unit.adjust_balance(from, -amount)?;
        unit.adjust_balance(to, amount)?;
        let transaction_id = unit.append_transaction(&NewTransaction::transfer(from, to, amount))?;

        Ok(TransferReceipt {
            transaction_id,
            from_name: transfer.from.name.clone(),
            to_name: transfer.to.name.clone(),
            amount,
        })
    }
}

fn log_rollback(transfer: &ValidatedTransfer, err: &TransferError) {
    error!(
        from = %transfer.from.id,
        to = %transfer.to.id,
        amount = %transfer.amount,
        error = %err,
        "transfer rolled back"
    );
}
