//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    endpoints,
    month::with_month,
    transaction::form::{TransactionForm, build_transaction},
    user::User,
};

/// A route handler for creating a new transaction owned by the logged in user.
///
/// Redirects to the transactions of the form's month on success.
pub async fn create_transaction_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
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

    let transaction = match build_transaction(form, None, user.id, ledger.snapshot()) {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::error!("invalid transaction form: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = ledger.add_transaction(transaction) {
        tracing::error!("could not create transaction: {error}");
        return error.into_alert_response();
    }

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
