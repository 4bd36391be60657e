use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    Error, app_state::LedgerState, auth::require_master, database_id::UserId, endpoints,
    user::User,
};

/// Switches a user between active and inactive.
///
/// Inactive users cannot log in and their open sessions end on their next request.
pub async fn toggle_user_active_endpoint(
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

    let Some(user) = ledger.snapshot().user(user_id).cloned() else {
        return Error::UpdateMissingUser.into_alert_response();
    };

    let active = !user.active;

    match ledger.update_user(User { active, ..user }) {
        Ok(()) => {
            tracing::info!("set user {user_id} active = {active}");
            (
                HxRedirect(endpoints::USERS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not change whether user {user_id} is active: {error}");
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
    use uuid::Uuid;

    use crate::{
        app_state::LedgerState,
        test_utils::shared_test_ledger,
        user::{MASTER_USER_ID, Role, User},
    };

    use super::toggle_user_active_endpoint;

    const OPERATOR: Uuid = Uuid::from_u128(42);

    fn state() -> LedgerState {
        let ledger = shared_test_ledger();
        ledger
            .lock()
            .unwrap()
            .add_user(User {
                id: OPERATOR,
                username: "caio".to_owned(),
                role: Role::Operator,
                ..User::seed_master()
            })
            .unwrap();

        LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn is_active(state: &LedgerState, id: Uuid) -> bool {
        state.ledger.lock().unwrap().snapshot().user(id).unwrap().active
    }

    #[tokio::test]
    async fn toggles_store_user() {
        let state = state();

        let response = toggle_user_active_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            Path(OPERATOR),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(!is_active(&state, OPERATOR));

        toggle_user_active_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            Path(OPERATOR),
        )
        .await;
        assert!(is_active(&state, OPERATOR));
    }

    #[tokio::test]
    async fn master_stays_active() {
        let state = state();

        let response = toggle_user_active_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            Path(MASTER_USER_ID),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(is_active(&state, MASTER_USER_ID));
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let response = toggle_user_active_endpoint(
            State(state()),
            Extension(User::seed_master()),
            Path(Uuid::from_u128(999)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
