//! Defines the endpoint for updating a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{
        FromRef, Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, Taxonomy,
    api_response::DataResponse,
    database_id::TransactionId,
    transaction::{
        apply_patch,
        core::{get_transaction, update_transaction},
        validation::TransactionPatch,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The categories that transactions are validated against.
    pub taxonomy: Arc<Taxonomy>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            taxonomy: state.taxonomy.clone(),
        }
    }
}

/// A route handler for updating the fields of a transaction that are present
/// in the request body, responds with the updated transaction.
///
/// The transaction is looked up before the body is checked, so an unknown ID
/// is reported as 404 even when the body is invalid.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    body: Result<Json<TransactionPatch>, JsonRejection>,
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

    let existing = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::debug!("could not get transaction {transaction_id} for update: {error}");
            return error.into_json_response();
        }
    };

    let Json(patch) = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!("rejected transaction body: {rejection}");
            return Error::InvalidBody(rejection.body_text()).into_json_response();
        }
    };

    let transaction = match apply_patch(existing, patch, &state.taxonomy) {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::debug!("invalid update for transaction {transaction_id}: {error}");
            return Error::from(error).into_json_response();
        }
    };

    match update_transaction(&transaction, &connection) {
        Ok(transaction) => {
            tracing::info!("updated transaction {transaction_id}");
            Json(DataResponse { data: transaction }).into_response()
        }
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_json_response()
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Taxonomy, Transaction, TransactionType,
        api_response::{DataResponse, ErrorResponse},
        initialize_db,
        test_utils::parse_json_body,
        transaction::{
            NewTransaction, create_transaction,
            edit_endpoint::{EditTransactionState, edit_transaction_endpoint},
            get_transaction,
            validation::TransactionPatch,
        },
    };

    fn must_create_test_state() -> (EditTransactionState, Transaction) {
        let connection =
            Connection::open_in_memory().expect("could not create in-memory SQLite database");
        initialize_db(&connection).expect("could not initialize test DB");
        let transaction = create_transaction(
            NewTransaction {
                date: datetime!(2025-05-03 0:00 UTC),
                transaction_type: TransactionType::Expense,
                category: "日用品".to_owned(),
                amount: 640,
                memo: "detergent".to_owned(),
            },
            &connection,
        )
        .expect("could not create test transaction");

        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            taxonomy: Arc::new(Taxonomy::default()),
        };

        (state, transaction)
    }

    #[tokio::test]
    async fn updating_memo_keeps_other_fields() {
        let (state, existing) = must_create_test_state();
        let patch = TransactionPatch {
            memo: Some("laundry detergent".to_owned()),
            ..Default::default()
        };

        let response =
            edit_transaction_endpoint(State(state.clone()), Ok(Path(existing.id)), Ok(Json(patch)))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: DataResponse<Transaction> = parse_json_body(response).await;
        assert_eq!(body.data.memo, "laundry detergent");
        assert_eq!(body.data.date, existing.date);
        assert_eq!(body.data.transaction_type, existing.transaction_type);
        assert_eq!(body.data.category, existing.category);
        assert_eq!(body.data.amount, existing.amount);

        let stored = get_transaction(
            existing.id,
            &state.db_connection.lock().expect("could not get lock"),
        )
        .expect("could not get test transaction");
        assert_eq!(stored, body.data);
    }

    #[tokio::test]
    async fn can_update_every_field() {
        let (state, existing) = must_create_test_state();
        let patch = TransactionPatch {
            date: Some(datetime!(2025-05-25 0:00 UTC)),
            transaction_type: Some("income".to_owned()),
            category: Some("販売".to_owned()),
            amount: Some(4500),
            memo: Some("flea market".to_owned()),
        };

        let response =
            edit_transaction_endpoint(State(state), Ok(Path(existing.id)), Ok(Json(patch))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body: DataResponse<Transaction> = parse_json_body(response).await;
        assert_eq!(body.data.date, datetime!(2025-05-25 0:00 UTC));
        assert_eq!(body.data.transaction_type, TransactionType::Income);
        assert_eq!(body.data.category, "販売");
        assert_eq!(body.data.amount, 4500);
        assert_eq!(body.data.memo, "flea market");
        assert_eq!(body.data.created_at, existing.created_at);
    }

    #[tokio::test]
    async fn invalid_category_is_rejected_and_not_saved() {
        let (state, existing) = must_create_test_state();
        let patch = TransactionPatch {
            category: Some("給与".to_owned()),
            ..Default::default()
        };

        let response =
            edit_transaction_endpoint(State(state.clone()), Ok(Path(existing.id)), Ok(Json(patch)))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = parse_json_body(response).await;
        assert_eq!(body.error, "invalid category '給与' for type 'expense'");

        let stored = get_transaction(existing.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(stored, existing);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (state, _) = must_create_test_state();

        let response = edit_transaction_endpoint(
            State(state),
            Ok(Path(1234)),
            Ok(Json(TransactionPatch::default())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
