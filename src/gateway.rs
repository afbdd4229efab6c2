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

//! Transfer gateway.
//!
//! The externally reachable operations: listing accounts and submitting a
//! transfer. The gateway holds no state between calls; each submission is
//! validated and executed within one atomic unit, so concurrent submissions
//! are decided in turn.
//!
//! # Status Mapping
//!
//! | Outcome | Status |
//! |---------|--------|
//! | Success | 200 |
//! | Missing fields, same account, non-positive amount, insufficient funds | 400 |
//! | Unknown source or destination | 404 |
//! | Storage failure | 500 |

use crate::account::Account;
use crate::base::{AccountId, TransactionId};
use crate::error::{ErrorClass, StoreError, TransferError};
use crate::executor::{TransferExecutor, TransferReceipt};
use crate::store::LedgerStore;
use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Transfer submission as received from a caller.
///
/// Every field is optional so that absent values reach validation instead of
/// failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    #[serde(default)]
    pub from_account_id: Option<AccountId>,
    #[serde(default)]
    pub to_account_id: Option<AccountId>,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

impl TransferRequest {
    pub fn new(from: AccountId, to: AccountId, amount: Decimal) -> Self {
        Self {
            from_account_id: Some(from),
            to_account_id: Some(to),
            amount: Some(amount),
        }
    }
}

/// Structured result of [`TransferGateway::submit_transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Success {
        transaction_id: TransactionId,
        from_name: String,
        to_name: String,
        message: String,
    },
    Failure {
        status: StatusCode,
        message: String,
    },
}

impl TransferOutcome {
    fn from_receipt(receipt: TransferReceipt) -> Self {
        TransferOutcome::Success {
            message: format!("Transfer of ${:.2} completed successfully", receipt.amount),
            transaction_id: receipt.transaction_id,
            from_name: receipt.from_name,
            to_name: receipt.to_name,
        }
    }

    fn from_error(err: &TransferError) -> Self {
        TransferOutcome::Failure {
            status: status_for(err.class()),
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success { .. })
    }

    pub fn status(&self) -> StatusCode {
        match self {
            TransferOutcome::Success { .. } => StatusCode::OK,
            TransferOutcome::Failure { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            TransferOutcome::Success { message, .. } | TransferOutcome::Failure { message, .. } => {
                message
            }
        }
    }
}

/// Maps an error class to its response status.
pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::Validation => StatusCode::BAD_REQUEST,
        ErrorClass::NotFound => StatusCode::NOT_FOUND,
        ErrorClass::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wire body for `POST /api/transfer` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<TransactionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,
}

impl TransferResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            transaction_id: None,
            from_account: None,
            to_account: None,
        }
    }
}

impl From<TransferOutcome> for TransferResponse {
    fn from(outcome: TransferOutcome) -> Self {
        match outcome {
            TransferOutcome::Success {
                transaction_id,
                from_name,
                to_name,
                message,
            } => TransferResponse {
                success: true,
                message,
                transaction_id: Some(transaction_id),
                from_account: Some(from_name),
                to_account: Some(to_name),
            },
            TransferOutcome::Failure { message, .. } => TransferResponse::failure(message),
        }
    }
}

/// Entry point for account listing and transfer submission.
///
/// Built per run around an injected [`LedgerStore`] handle.
#[derive(Clone)]
pub struct TransferGateway {
    store: LedgerStore,
    executor: TransferExecutor,
}

impl TransferGateway {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            executor: TransferExecutor::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// All accounts ordered by ascending id.
    pub fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.store.list_accounts()
    }

    /// Validates and executes one transfer.
    pub fn submit_transfer(&self, request: &TransferRequest) -> TransferOutcome {
        let result = self.executor.validate_and_execute(request);

        match result {
            Ok(receipt) => {
                info!(
                    transaction_id = %receipt.transaction_id,
                    from = %receipt.from_name,
                    to = %receipt.to_name,
                    amount = %receipt.amount,
                    "transfer completed"
                );
                TransferOutcome::from_receipt(receipt)
            }
            Err(err) => {
                match err.class() {
                    ErrorClass::Storage => error!(?request, error = %err, "transfer rolled back"),
                    _ => warn!(?request, reason = %err, "transfer rejected"),
                }
                TransferOutcome::from_error(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Fixture, JANE, JOHN};
    use rust_decimal_macros::dec;

    fn gateway() -> TransferGateway {
        let store = LedgerStore::open_in_memory().unwrap();
        store.seed(&Fixture::standard()).unwrap();
        TransferGateway::new(store)
    }

    #[test]
    fn success_message_mentions_amount() {
        let outcome = gateway().submit_transfer(&TransferRequest::new(JOHN, JANE, dec!(200)));

        assert!(outcome.is_success());
        assert_eq!(outcome.status(), StatusCode::OK);
        assert_eq!(outcome.message(), "Transfer of $200.00 completed successfully");
    }

    #[test]
    fn status_mapping_per_class() {
        assert_eq!(status_for(ErrorClass::Validation), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorClass::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_for(ErrorClass::Storage),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn success_response_carries_names_and_id() {
        let outcome = gateway().submit_transfer(&TransferRequest::new(JOHN, JANE, dec!(1)));
        let response = TransferResponse::from(outcome);

        assert!(response.success);
        assert_eq!(response.transaction_id, Some(TransactionId(6)));
        assert_eq!(response.from_account.as_deref(), Some("John Smith"));
        assert_eq!(response.to_account.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn failure_response_omits_success_fields() {
        let response = TransferResponse::failure("Cannot transfer to the same account");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Cannot transfer to the same account");
        assert!(json.get("transaction_id").is_none());
        assert!(json.get("from_account").is_none());
    }

    #[test]
    fn request_accepts_numeric_and_missing_fields() {
        let request: TransferRequest =
            serde_json::from_str(r#"{"from_account_id": 1, "amount": 200}"#).unwrap();

        assert_eq!(request.from_account_id, Some(JOHN));
        assert_eq!(request.to_account_id, None);
        assert_eq!(request.amount, Some(dec!(200)));
    }

    #[test]
    fn request_treats_null_as_missing() {
        let request: TransferRequest = serde_json::from_str(
            r#"{"from_account_id": 1, "to_account_id": 2, "amount": null}"#,
        )
        .unwrap();
        assert_eq!(request.amount, None);
    }
}
