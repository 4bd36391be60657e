use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    alert::Alert,
    app_state::LedgerState,
    auth::require_store_user,
    database_id::TransactionId,
    transaction::editable_transaction,
    user::User,
};

/// A route handler for deleting one of the logged in user's transactions, responds with an alert.
pub async fn delete_transaction_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let mut ledger = match state.ledger.lock() {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    match editable_transaction(ledger.snapshot(), transaction_id, user.id) {
        Ok(_) => {}
        Err(Error::NotFound) => return Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => return error.into_alert_response(),
    }

    match ledger.delete_transaction(transaction_id) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => Alert::SuccessSimple {
            message: "Transaction deleted".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use time::macros::date;
    use uuid::Uuid;

    use crate::{
        app_state::LedgerState,
        month::MonthRef,
        test_utils::shared_test_ledger,
        transaction::{Transaction, TransactionType},
        user::{Role, User},
    };

    use super::delete_transaction_endpoint;

    const OWNER: Uuid = Uuid::from_u128(42);

    fn owner() -> User {
        User {
            id: OWNER,
            role: Role::Operator,
            username: "caio".to_owned(),
            ..User::seed_master()
        }
    }

    fn transaction(credit_sale_id: Option<Uuid>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date: date!(2024 - 05 - 03),
            kind: TransactionType::Exit,
            amount: 10.0,
            cost_center_id: None,
            subgroup_id: None,
            payment_method_id: None,
            description: "Pão".to_owned(),
            month_ref: MonthRef::new("2024-05").unwrap(),
            user_id: OWNER,
            credit_sale_id,
        }
    }

    fn state_with(transaction: &Transaction) -> LedgerState {
        let ledger = shared_test_ledger();
        ledger
            .lock()
            .unwrap()
            .add_transaction(transaction.clone())
            .unwrap();

        LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[tokio::test]
    async fn deletes_transaction() {
        let transaction = transaction(None);
        let state = state_with(&transaction);

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(owner()),
            Path(transaction.id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(state.ledger.lock().unwrap().snapshot().transactions.is_empty());
    }

    #[tokio::test]
    async fn deleting_missing_transaction_returns_not_found() {
        let state = state_with(&transaction(None));

        let response = delete_transaction_endpoint(
            State(state),
            Extension(owner()),
            Path(Uuid::new_v4()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn down_payment_is_kept() {
        let transaction = transaction(Some(Uuid::from_u128(9)));
        let state = state_with(&transaction);

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(owner()),
            Path(transaction.id),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.ledger.lock().unwrap().snapshot().transactions.len(), 1);
    }
}
