use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, alert::Alert, app_state::LedgerState, auth::require_master, database_id::UserId,
    user::User,
};

/// Deletes a store user. Their transactions and credit sales are kept.
pub async fn delete_user_endpoint(
    State(state): State<LedgerState>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<UserId>,
) -> Response {
    if let Err(error) = require_master(&current_user) {
        return error.into_alert_response();
    }

    let mut ledger = match state.ledger.lock() {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    match ledger.delete_user(user_id) {
        Ok(()) => {
            tracing::info!("deleted user {user_id}");
            Alert::SuccessSimple {
                message: "User deleted".to_owned(),
            }
            .into_response()
        }
        Err(error) => {
            tracing::error!("could not delete user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}
