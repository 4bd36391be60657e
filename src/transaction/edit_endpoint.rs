//! Defines the endpoint for updating a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    database_id::TransactionId,
    endpoints,
    month::with_month,
    transaction::{
        editable_transaction,
        form::{TransactionForm, build_transaction},
    },
    user::User,
};

/// A route handler for replacing the fields of one of the logged in user's transactions.
///
/// Down payments of credit sales are rejected, they change with their sale.
pub async fn edit_transaction_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let redirect_url = with_month(endpoints::TRANSACTIONS_VIEW, &form.month_ref);

    let mut ledger = match state.ledger.lock() {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    let transaction = editable_transaction(ledger.snapshot(), transaction_id, user.id)
        .map_err(|error| match error {
            Error::NotFound => Error::UpdateMissingTransaction,
            error => error,
        })
        .and_then(|_| build_transaction(form, Some(transaction_id), user.id, ledger.snapshot()));

    let transaction = match transaction {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    match ledger.update_transaction(transaction) {
        Ok(()) => (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response(),
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
