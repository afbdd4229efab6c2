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

//! CSV export of the ledger.

use crate::account::Account;
use crate::transaction::TransactionRecord;
use csv::Writer;
use std::io::Write;

/// Write accounts to a CSV writer.
///
/// # CSV Format
///
/// Columns: `id, name, email, account_balance`
///
/// ```csv
/// id,name,email,account_balance
/// 1,John Smith,john.smith@example.com,800.0
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_accounts<W: Write>(accounts: &[Account], writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for account in accounts {
        wtr.serialize(account)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the transaction log to a CSV writer.
///
/// Columns: `id, user_id, transaction_type, amount, status, from_account_id,
/// to_account_id, created_on`. Account columns are empty for deposits and
/// withdrawals.
pub fn write_transactions<W: Write>(
    records: &[TransactionRecord],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
