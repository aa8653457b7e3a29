//! Defines the endpoints for reading transactions.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    api_response::DataResponse,
    database_id::TransactionId,
    transaction::core::{get_all_transactions, get_transaction},
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for getting a transaction by its ID.
///
/// Responds with 404 if the transaction does not exist or has been deleted.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Response {
    // A path that is not an integer cannot be the ID of a transaction.
    let Ok(Path(transaction_id)) = transaction_id else {
        return Error::NotFound.into_json_response();
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match get_transaction(transaction_id, &connection) {
        Ok(transaction) => Json(DataResponse { data: transaction }).into_response(),
        Err(error) => {
            tracing::debug!("could not get transaction {transaction_id}: {error}");
            error.into_json_response()
        }
    }
}

/// A route handler for listing every transaction that has not been deleted.
pub async fn get_transactions_endpoint(State(state): State<GetTransactionState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match get_all_transactions(&connection) {
        Ok(transactions) => Json(DataResponse { data: transactions }).into_response(),
        Err(error) => {
            tracing::error!("could not get transactions: {error}");
            error.into_json_response()
        }
    }
}
