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

//! Transfer page served at `/`.
//!
//! The page reads accounts from `GET /api/accounts` and submits transfers to
//! `POST /api/transfer`. Browser-driven checks locate controls through the
//! `data-testid` values in [`selectors`], which must stay stable.

/// `data-testid` values of the page controls.
pub mod selectors {
    pub const FROM_ACCOUNT: &str = "from-account-select";
    pub const TO_ACCOUNT: &str = "to-account-select";
    pub const AMOUNT: &str = "amount-input";
    pub const SUBMIT: &str = "transfer-submit-button";
    pub const RESULT: &str = "transfer-result";

    pub const ALL: [&str; 5] = [FROM_ACCOUNT, TO_ACCOUNT, AMOUNT, SUBMIT, RESULT];
}

pub const TITLE: &str = "Bank Transfer";

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Bank Transfer</title>
  <style>
    body { font-family: sans-serif; max-width: 36rem; margin: 3rem auto; padding: 0 1rem; }
    label { display: block; font-weight: bold; margin: 0.75rem 0 0.25rem; }
    select, input { width: 100%; padding: 0.5rem; box-sizing: border-box; }
    button { margin-top: 1rem; padding: 0.6rem 1.2rem; background: #2e7d32; color: #fff; border: 0; cursor: pointer; }
    #balances { background: #f5f5f5; padding: 0.75rem; border-radius: 4px; }
    #result { display: none; margin-top: 1.25rem; padding: 0.9rem; border-radius: 4px; }
    #result.success { display: block; background: #e8f5e9; color: #1b5e20; border: 1px solid #a5d6a7; }
    #result.error { display: block; background: #ffebee; color: #b71c1c; border: 1px solid #ef9a9a; }
  </style>
</head>
<body>
  <h1>Bank Transfer</h1>

  <section id="balances">
    <h3>Available Accounts:</h3>
    <div id="accounts-list"></div>
  </section>

  <form id="transfer-form">
    <label for="from-account">From Account:</label>
    <select id="from-account" name="from_account" data-testid="from-account-select" required>
      <option value="">Select account...</option>
    </select>

    <label for="to-account">To Account:</label>
    <select id="to-account" name="to_account" data-testid="to-account-select" required>
      <option value="">Select account...</option>
    </select>

    <label for="amount">Amount ($):</label>
    <input type="number" id="amount" name="amount" data-testid="amount-input" step="0.01" min="0.01" required>

    <button type="submit" data-testid="transfer-submit-button">Transfer Funds</button>
  </form>

  <div id="result" data-testid="transfer-result" role="status"></div>

  <script>
    const money = (value) => '$' + Number(value).toFixed(2);

    function fillSelect(select, accounts) {
      select.innerHTML = '<option value="">Select account...</option>';
      for (const account of accounts) {
        const option = document.createElement('option');
        option.value = account.id;
        option.textContent = account.name + ' - ' + money(account.account_balance);
        select.appendChild(option);
      }
    }

    async function loadAccounts() {
      try {
        const response = await fetch('/api/accounts');
        const accounts = await response.json();
        fillSelect(document.getElementById('from-account'), accounts);
        fillSelect(document.getElementById('to-account'), accounts);

        const list = document.getElementById('accounts-list');
        list.innerHTML = '';
        for (const account of accounts) {
          const row = document.createElement('div');
          row.textContent = account.name + ': ' + money(account.account_balance);
          list.appendChild(row);
        }
      } catch (err) {
        console.error('failed to load accounts', err);
      }
    }

    function showResult(ok, message) {
      const result = document.getElementById('result');
      result.className = ok ? 'success' : 'error';
      result.textContent = message;
    }

    function numberOrNull(raw, parse) {
      const value = parse(raw);
      return Number.isNaN(value) ? null : value;
    }

    document.getElementById('transfer-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const body = {
        from_account_id: numberOrNull(document.getElementById('from-account').value, (v) => parseInt(v, 10)),
        to_account_id: numberOrNull(document.getElementById('to-account').value, (v) => parseInt(v, 10)),
        amount: numberOrNull(document.getElementById('amount').value, parseFloat),
      };

      try {
        const response = await fetch('/api/transfer', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(body),
        });
        const data = await response.json();
        showResult(data.success, data.message);
        if (data.success) {
          document.getElementById('transfer-form').reset();
          loadAccounts();
        }
      } catch (err) {
        showResult(false, 'Error processing transfer: ' + err.message);
      }
    });

    loadAccounts();
  </script>
</body>
</html>
"#;
