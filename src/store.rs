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

//! SQLite-backed ledger store.
//!
//! Holds the `users` and `transactions` tables. Reads go through
//! [`LedgerStore`] directly; writes happen inside [`LedgerStore::atomically`],
//! which hands out a [`LedgerUnit`] bound to one SQLite transaction. Either
//! every write made through the unit is committed, or none is.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use transfer_ledger_rs::{AccountId, Fixture, LedgerStore, NewTransaction};
//!
//! let store = LedgerStore::open_in_memory().unwrap();
//! store.seed(&Fixture::standard()).unwrap();
//!
//! store
//!     .atomically(|unit| {
//!         unit.adjust_balance(AccountId(1), dec!(-25))?;
//!         unit.adjust_balance(AccountId(2), dec!(25))?;
//!         unit.append_transaction(&NewTransaction::transfer(AccountId(1), AccountId(2), dec!(25)))
//!     })
//!     .unwrap();
//!
//! assert_eq!(store.total_balance().unwrap(), dec!(3500.00));
//! ```

use crate::account::Account;
use crate::base::{AccountId, TransactionId};
use crate::error::StoreError;
use crate::fixtures::Fixture;
use crate::transaction::{NewTransaction, TransactionRecord, TransactionStatus};
use parking_lot::Mutex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    account_balance TEXT NOT NULL CHECK (CAST(account_balance AS REAL) >= 0)
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    amount TEXT NOT NULL,
    transaction_type TEXT NOT NULL,
    status TEXT NOT NULL,
    from_account_id INTEGER REFERENCES users(id),
    to_account_id INTEGER REFERENCES users(id),
    created_on TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id);
"#;

const ACCOUNT_COLUMNS: &str = "id, name, email, account_balance";
const TRANSACTION_COLUMNS: &str =
    "id, user_id, amount, transaction_type, status, from_account_id, to_account_id, created_on";

/// Decimal column codec. Written as exact text; INTEGER and REAL values
/// written by other tools are accepted on read.
struct SqlDecimal(Decimal);

impl ToSql for SqlDecimal {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for SqlDecimal {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(SqlDecimal(Decimal::from(i))),
            ValueRef::Real(f) => Decimal::try_from(f)
                .map(SqlDecimal)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Text(_) => Decimal::from_str(value.as_str()?)
                .map(SqlDecimal)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

fn account_from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        balance: row.get::<_, SqlDecimal>(3)?.0,
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        account_id: row.get(1)?,
        amount: row.get::<_, SqlDecimal>(2)?.0,
        kind: row.get(3)?,
        status: row.get(4)?,
        from_account_id: row.get(5)?,
        to_account_id: row.get(6)?,
        created_on: row.get(7)?,
    })
}

fn fetch_account(conn: &Connection, id: AccountId) -> Result<Option<Account>, StoreError> {
    let account = conn
        .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            account_from_row,
        )
        .optional()?;
    Ok(account)
}

fn insert_transaction(
    conn: &Connection,
    record: &NewTransaction,
) -> Result<TransactionId, StoreError> {
    conn.execute(
        "INSERT INTO transactions \
         (user_id, amount, transaction_type, status, from_account_id, to_account_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            record.account_id,
            SqlDecimal(record.amount),
            record.kind,
            record.status,
            record.from_account_id,
            record.to_account_id,
        ],
    )?;
    Ok(TransactionId(conn.last_insert_rowid()))
}

/// Handle to the ledger database.
///
/// Cloning is cheap; all clones share one connection, so every atomic unit
/// is serialized behind its lock.
#[derive(Clone)]
pub struct LedgerStore {
    conn: Arc<Mutex<Connection>>,
}

impl LedgerStore {
    /// Opens or creates a ledger database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self::from_connection(Connection::open(path.as_ref())?)?;
        debug!("opened ledger store at {}", path.as_ref().display());
        Ok(store)
    }

    /// Opens a private in-memory ledger.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Raw connection for test instrumentation such as installing triggers.
    ///
    /// Writes made here bypass [`LedgerStore::atomically`] and its balance
    /// checks.
    #[doc(hidden)]
    pub fn connection(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }

    /// Replaces the ledger contents with `fixture`.
    ///
    /// Both tables are emptied and the transaction id sequence restarts, so
    /// the fixture history receives ids starting at 1.
    pub fn seed(&self, fixture: &Fixture) -> Result<(), StoreError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute_batch(
            "DELETE FROM transactions;
             DELETE FROM users;
             DELETE FROM sqlite_sequence WHERE name = 'transactions';",
        )?;
        for account in &fixture.accounts {
            tx.execute(
                &format!("INSERT INTO users ({ACCOUNT_COLUMNS}) VALUES (?1, ?2, ?3, ?4)"),
                params![
                    account.id,
                    account.name,
                    account.email,
                    SqlDecimal(account.balance)
                ],
            )?;
        }
        for record in &fixture.history {
            insert_transaction(&tx, record)?;
        }
        tx.commit()?;

        debug!(
            accounts = fixture.accounts.len(),
            transactions = fixture.history.len(),
            "seeded ledger"
        );
        Ok(())
    }

    pub fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        fetch_account(&self.conn.lock(), id)
    }

    /// All accounts ordered by id.
    pub fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {ACCOUNT_COLUMNS} FROM users ORDER BY id"))?;
        let accounts = stmt
            .query_map([], account_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    /// Sum of every account balance, computed exactly.
    pub fn total_balance(&self) -> Result<Decimal, StoreError> {
        Ok(self
            .list_accounts()?
            .iter()
            .map(|account| account.balance)
            .sum())
    }

    pub fn transaction(&self, id: TransactionId) -> Result<Option<TransactionRecord>, StoreError> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE id = ?1"),
                params![id],
                transaction_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// The full transaction log in id order.
    pub fn transactions(&self) -> Result<Vec<TransactionRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id"
        ))?;
        let records = stmt
            .query_map([], transaction_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Transactions owned by `id` (the `user_id` column), in id order.
    pub fn transactions_for_account(
        &self,
        id: AccountId,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE user_id = ?1 ORDER BY id"
        ))?;
        let records = stmt
            .query_map(params![id], transaction_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn count_by_status(&self, status: TransactionStatus) -> Result<usize, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Runs `f` as one atomic unit.
    ///
    /// Commits if `f` returns `Ok`. Any error from `f` or from the commit
    /// rolls back every write made through the unit. The store lock is held
    /// for the whole of `f`, so reads made through the unit cannot go stale
    /// before the writes that depend on them.
    pub fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&LedgerUnit<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(StoreError::from)?;
        let value = f(&LedgerUnit { conn: &tx })?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

/// Write access inside one atomic unit. See [`LedgerStore::atomically`].
pub struct LedgerUnit<'a> {
    conn: &'a Connection,
}

impl LedgerUnit<'_> {
    pub fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        fetch_account(self.conn, id)
    }

    /// Adds `delta` to the balance of `id` and returns the new balance.
    ///
    /// # Errors
    ///
    /// - [`StoreError::AccountNotFound`] - no account with this id.
    /// - [`StoreError::InsufficientFunds`] - the balance would go negative.
    pub fn adjust_balance(&self, id: AccountId, delta: Decimal) -> Result<Decimal, StoreError> {
        let current = fetch_account(self.conn, id)?
            .ok_or(StoreError::AccountNotFound(id))?
            .balance;

        let updated = current + delta;
        if updated < Decimal::ZERO {
            return Err(StoreError::InsufficientFunds {
                account: id,
                available: current,
            });
        }

        self.conn.execute(
            "UPDATE users SET account_balance = ?1 WHERE id = ?2",
            params![SqlDecimal(updated), id],
        )?;
        Ok(updated)
    }

    /// Appends `record` to the log and returns its assigned id.
    pub fn append_transaction(&self, record: &NewTransaction) -> Result<TransactionId, StoreError> {
        insert_transaction(self.conn, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{BOB, JANE, JOHN};
    use crate::transaction::TransactionKind;
    use rust_decimal_macros::dec;

    fn seeded() -> LedgerStore {
        let store = LedgerStore::open_in_memory().unwrap();
        store.seed(&Fixture::standard()).unwrap();
        store
    }

    #[test]
    fn seed_loads_accounts_in_id_order() {
        let store = seeded();
        let accounts = store.list_accounts().unwrap();

        let names: Vec<_> = accounts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["John Smith", "Jane Doe", "Bob Johnson"]);
        assert_eq!(accounts[0].balance, dec!(1000.00));
    }

    #[test]
    fn seed_assigns_history_ids_from_one() {
        let store = seeded();
        let ids: Vec<_> = store
            .transactions()
            .unwrap()
            .iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, (1..=5).map(TransactionId).collect::<Vec<_>>());
    }

    #[test]
    fn reseed_restores_fixture_state() {
        let store = seeded();
        store
            .atomically(|unit| unit.adjust_balance(JOHN, dec!(-100)))
            .unwrap();

        store.seed(&Fixture::standard()).unwrap();

        assert_eq!(store.get_account(JOHN).unwrap().unwrap().balance, dec!(1000.00));
        assert_eq!(store.transactions().unwrap().len(), 5);
    }

    #[test]
    fn adjust_balance_unknown_account() {
        let store = seeded();
        let result = store.atomically(|unit| unit.adjust_balance(AccountId(42), dec!(1)));
        assert!(matches!(result, Err(StoreError::AccountNotFound(AccountId(42)))));
    }

    #[test]
    fn adjust_balance_refuses_negative_result() {
        let store = seeded();
        let result = store.atomically(|unit| unit.adjust_balance(JANE, dec!(-500.01)));

        match result {
            Err(StoreError::InsufficientFunds { account, available }) => {
                assert_eq!(account, JANE);
                assert_eq!(available, dec!(500.00));
            }
            other => panic!("expected insufficient funds, got {other:?}"),
        }
        assert_eq!(store.get_account(JANE).unwrap().unwrap().balance, dec!(500.00));
    }

    #[test]
    fn adjust_balance_to_exactly_zero() {
        let store = seeded();
        let balance = store
            .atomically(|unit| unit.adjust_balance(JANE, dec!(-500.00)))
            .unwrap();
        assert_eq!(balance, Decimal::ZERO);
    }

    #[test]
    fn failed_unit_rolls_back_earlier_writes() {
        let store = seeded();

        let result = store.atomically(|unit| {
            unit.adjust_balance(JOHN, dec!(-100))?;
            unit.adjust_balance(BOB, dec!(100))?;
            unit.adjust_balance(AccountId(99), dec!(0))
        });

        assert!(result.is_err());
        assert_eq!(store.get_account(JOHN).unwrap().unwrap().balance, dec!(1000.00));
        assert_eq!(store.get_account(BOB).unwrap().unwrap().balance, dec!(2000.00));
    }

    #[test]
    fn append_assigns_increasing_ids() {
        let store = seeded();
        let first = store
            .atomically(|unit| {
                unit.append_transaction(&NewTransaction::transfer(JOHN, JANE, dec!(1)))
            })
            .unwrap();
        let second = store
            .atomically(|unit| {
                unit.append_transaction(&NewTransaction::transfer(JANE, JOHN, dec!(1)))
            })
            .unwrap();

        assert_eq!(first, TransactionId(6));
        assert!(second > first);

        let record = store.transaction(first).unwrap().unwrap();
        assert_eq!(record.kind, TransactionKind::Transfer);
        assert_eq!(record.from_account_id, Some(JOHN));
        assert_eq!(record.to_account_id, Some(JANE));
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let store = seeded();
        let id = store
            .atomically(|unit| {
                unit.append_transaction(&NewTransaction::transfer(JOHN, JANE, dec!(1)))
            })
            .unwrap();
        store
            .connection()
            .lock()
            .execute("DELETE FROM transactions WHERE id = ?1", params![id])
            .unwrap();

        let next = store
            .atomically(|unit| {
                unit.append_transaction(&NewTransaction::transfer(JOHN, JANE, dec!(1)))
            })
            .unwrap();
        assert!(next > id);
    }

    #[test]
    fn reads_numeric_balances_written_by_other_tools() {
        let store = seeded();
        store
            .connection()
            .lock()
            .execute("UPDATE users SET account_balance = 12.5 WHERE id = 1", [])
            .unwrap();

        assert_eq!(store.get_account(JOHN).unwrap().unwrap().balance, dec!(12.5));
    }

    #[test]
    fn append_rejects_unknown_owner() {
        let store = seeded();
        let result = store.atomically(|unit| {
            unit.append_transaction(&NewTransaction::transfer(AccountId(77), JANE, dec!(1)))
        });
        assert!(matches!(result, Err(StoreError::Database(_))));
    }
}
