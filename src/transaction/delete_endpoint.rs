//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::PathRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, api_response::DataResponse, database_id::TransactionId,
    transaction::core::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for soft deleting a transaction, responds with `{"data": true}`.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Response {
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

    match delete_transaction(transaction_id, &connection) {
        Ok(()) => {
            tracing::info!("deleted transaction {transaction_id}");
            Json(DataResponse { data: true }).into_response()
        }
        Err(Error::NotFound) => {
            tracing::debug!("tried to delete missing transaction {transaction_id}");
            Error::NotFound.into_json_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_json_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error, TransactionType,
        api_response::DataResponse,
        initialize_db,
        test_utils::parse_json_body,
        transaction::{
            NewTransaction, create_transaction,
            delete_endpoint::{DeleteTransactionState, delete_transaction_endpoint},
            get_all_transactions, get_transaction,
        },
    };

    #[tokio::test]
    async fn deletes_transaction() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let transaction = create_transaction(
            NewTransaction {
                date: datetime!(2025-04-26 0:00 UTC),
                transaction_type: TransactionType::Income,
                category: "賞与".to_owned(),
                amount: 400_000,
                memo: String::new(),
            },
            &connection,
        )
        .unwrap();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response =
            delete_transaction_endpoint(State(state.clone()), Ok(Path(transaction.id))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: DataResponse<bool> = parse_json_body(response).await;
        assert!(body.data);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        );
        assert!(get_all_transactions(&connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(State(state), Ok(Path(1))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
