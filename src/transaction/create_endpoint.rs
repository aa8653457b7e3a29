//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Taxonomy,
    api_response::DataResponse,
    transaction::{core::create_transaction, validation::TransactionInput, validate_new_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The categories that transactions are validated against.
    pub taxonomy: Arc<Taxonomy>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            taxonomy: state.taxonomy.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    body: Result<Json<TransactionInput>, JsonRejection>,
) -> Response {
    let Json(input) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected transaction body: {rejection}");
            return Error::InvalidBody(rejection.body_text()).into_json_response();
        }
    };

    let new_transaction = match validate_new_transaction(input, &state.taxonomy) {
        Ok(new_transaction) => new_transaction,
        Err(error) => {
            tracing::debug!("invalid transaction: {error}");
            return Error::from(error).into_json_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_json_response();
        }
    };

    match create_transaction(new_transaction, &connection) {
        Ok(transaction) => {
            tracing::info!("created transaction {}", transaction.id);
            Json(DataResponse { data: transaction }).into_response()
        }
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_json_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode};
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Taxonomy, Transaction, TransactionType,
        api_response::{DataResponse, ErrorResponse},
        db::initialize,
        test_utils::parse_json_body,
        transaction::{
            count_transactions,
            create_endpoint::{CreateTransactionState, create_transaction_endpoint},
            get_transaction,
            validation::TransactionInput,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
            taxonomy: Arc::new(Taxonomy::default()),
        }
    }

    fn input(transaction_type: &str, category: &str, amount: i64) -> TransactionInput {
        TransactionInput {
            date: datetime!(2025-06-01 0:00 UTC),
            transaction_type: transaction_type.to_owned(),
            category: category.to_owned(),
            amount,
            memo: Some("test transaction".to_owned()),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Ok(Json(input("expense", "食費", 980))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: DataResponse<Transaction> = parse_json_body(response).await;
        assert_eq!(body.data.id, 1);
        assert_eq!(body.data.transaction_type, TransactionType::Expense);
        assert_eq!(body.data.category, "食費");
        assert_eq!(body.data.amount, 980);
        assert_eq!(body.data.memo, "test transaction");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transaction(1, &connection).unwrap(), body.data);
    }

    #[tokio::test]
    async fn rejects_category_from_other_type() {
        let state = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Ok(Json(input("expense", "給与", 300_000))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = parse_json_body(response).await;
        assert_eq!(body.error, "invalid category '給与' for type 'expense'");

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_zero_and_negative_amounts() {
        let state = get_test_state();

        for amount in [0, -100] {
            let response = create_transaction_endpoint(
                State(state.clone()),
                Ok(Json(input("income", "給与", amount))),
            )
            .await;

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn rejects_unknown_type() {
        let state = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Ok(Json(input("refund", "食費", 100))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = parse_json_body(response).await;
        assert!(body.error.contains("refund"), "got error {:?}", body.error);
    }
}
