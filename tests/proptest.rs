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

//! Property-based tests for the transfer gateway.
//!
//! These tests verify invariants that should hold for any sequence of
//! transfer submissions, valid or not.

use proptest::prelude::*;
use rust_decimal::Decimal;
use transfer_ledger_rs::{
    AccountId, Fixture, LedgerStore, TransferGateway, TransferOutcome, TransferRequest,
};

// =============================================================================
// Arbitrary Strategies
// =============================================================================

/// Generate an amount between -10.00 and 2500.00 in cents, so that zero,
/// negative and overdrawing amounts all show up.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000i64..=250_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Account ids including one that does not exist.
fn arb_account() -> impl Strategy<Value = AccountId> {
    (1i64..=4).prop_map(AccountId)
}

fn arb_request() -> impl Strategy<Value = TransferRequest> {
    (arb_account(), arb_account(), arb_amount())
        .prop_map(|(from, to, amount)| TransferRequest::new(from, to, amount))
}

fn setup() -> (LedgerStore, TransferGateway) {
    let store = LedgerStore::open_in_memory().unwrap();
    store.seed(&Fixture::standard()).unwrap();
    let gateway = TransferGateway::new(store.clone());
    (store, gateway)
}

// =============================================================================
// Ledger Invariant Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The total across all accounts never changes.
    #[test]
    fn total_is_conserved(requests in prop::collection::vec(arb_request(), 1..25)) {
        let (store, gateway) = setup();
        let total_before = store.total_balance().unwrap();

        for request in &requests {
            gateway.submit_transfer(request);
        }

        prop_assert_eq!(store.total_balance().unwrap(), total_before);
    }

    /// No balance ever goes negative.
    #[test]
    fn balances_never_negative(requests in prop::collection::vec(arb_request(), 1..25)) {
        let (store, gateway) = setup();

        for request in &requests {
            gateway.submit_transfer(request);
            for account in store.list_accounts().unwrap() {
                prop_assert!(account.balance >= Decimal::ZERO);
            }
        }
    }

    /// A rejected transfer changes nothing; an accepted one appends exactly
    /// one log entry and moves exactly `amount`.
    #[test]
    fn each_submission_is_all_or_nothing(requests in prop::collection::vec(arb_request(), 1..25)) {
        let (store, gateway) = setup();

        for request in &requests {
            let accounts_before = store.list_accounts().unwrap();
            let log_before = store.transactions().unwrap().len();

            let outcome = gateway.submit_transfer(request);

            let accounts_after = store.list_accounts().unwrap();
            let log_after = store.transactions().unwrap().len();

            match outcome {
                TransferOutcome::Success { .. } => {
                    let from = request.from_account_id.unwrap();
                    let to = request.to_account_id.unwrap();
                    let amount = request.amount.unwrap();
                    prop_assert_eq!(log_after, log_before + 1);

                    for (before, after) in accounts_before.iter().zip(&accounts_after) {
                        let expected = if before.id == from {
                            before.balance - amount
                        } else if before.id == to {
                            before.balance + amount
                        } else {
                            before.balance
                        };
                        prop_assert_eq!(after.balance, expected);
                    }
                }
                TransferOutcome::Failure { .. } => {
                    prop_assert_eq!(&accounts_after, &accounts_before);
                    prop_assert_eq!(log_after, log_before);
                }
            }
        }
    }

    /// Transaction ids strictly increase.
    #[test]
    fn transaction_ids_increase(requests in prop::collection::vec(arb_request(), 1..25)) {
        let (store, gateway) = setup();

        for request in &requests {
            gateway.submit_transfer(request);
        }

        let ids: Vec<_> = store.transactions().unwrap().iter().map(|r| r.id).collect();
        prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Reading accounts twice without a transfer in between gives the same answer.
    #[test]
    fn list_accounts_is_idempotent(requests in prop::collection::vec(arb_request(), 0..10)) {
        let (_, gateway) = setup();
        for request in &requests {
            gateway.submit_transfer(request);
        }

        prop_assert_eq!(gateway.list_accounts().unwrap(), gateway.list_accounts().unwrap());
    }
}
