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

//! HTTP surface for the transfer gateway.
//!
//! ## Endpoints
//!
//! - `GET /` - transfer page
//! - `GET /api/accounts` - all accounts ordered by id
//! - `POST /api/transfer` - submit a transfer
//!
//! Store access blocks on SQLite and the store lock, so handlers run gateway
//! calls on the blocking thread pool.
//!
//! ## Example Usage
//!
//! ```bash
//! curl http://localhost:5001/api/accounts
//!
//! curl -X POST http://localhost:5001/api/transfer \
//!   -H "Content-Type: application/json" \
//!   -d '{"from_account_id": 1, "to_account_id": 2, "amount": 200}'
//! ```

use crate::gateway::{TransferGateway, TransferRequest, TransferResponse};
use crate::page::INDEX_HTML;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Shared application state containing the gateway.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<TransferGateway>,
}

/// GET / - transfer page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/accounts - list all accounts.
async fn list_accounts(State(state): State<AppState>) -> Response {
    let gateway = state.gateway.clone();
    let result = tokio::task::spawn_blocking(move || gateway.list_accounts()).await;

    let message = match result {
        Ok(Ok(accounts)) => return Json(accounts).into_response(),
        Ok(Err(err)) => err.to_string(),
        Err(err) => err.to_string(),
    };
    error!(error = %message, "failed to list accounts");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(TransferResponse::failure(message)),
    )
        .into_response()
}

/// POST /api/transfer - submit a transfer.
async fn submit_transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferRequest>, JsonRejection>,
) -> (StatusCode, Json<TransferResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let reason = rejection.body_text();
            warn!(%reason, "malformed transfer request");
            return (
                StatusCode::BAD_REQUEST,
                Json(TransferResponse::failure(format!(
                    "Error processing request: {reason}"
                ))),
            );
        }
    };

    let gateway = state.gateway.clone();
    match tokio::task::spawn_blocking(move || gateway.submit_transfer(&request)).await {
        Ok(outcome) => (outcome.status(), Json(TransferResponse::from(outcome))),
        Err(err) => {
            error!(error = %err, "transfer task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(TransferResponse::failure(format!("Transfer failed: {err}"))),
            )
        }
    }
}

pub fn router(gateway: TransferGateway) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/accounts", get(list_accounts))
        .route("/api/transfer", post(submit_transfer))
        .with_state(AppState {
            gateway: Arc::new(gateway),
        })
}

/// Serves the gateway on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, gateway: TransferGateway, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("transfer gateway listening on http://{addr}");
    }
    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown)
        .await
}
