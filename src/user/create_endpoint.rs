use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_master,
    database_id::new_id,
    endpoints,
    user::{Role, User},
    validation::required,
};

/// The form data for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserForm {
    pub username: String,
    pub password: String,
    pub store_name: String,
    pub admin_name: String,
    pub role: Role,
}

impl NewUserForm {
    /// An active user built from the form with surrounding whitespace removed.
    ///
    /// The password is kept exactly as typed.
    fn into_user(self) -> Result<User, Error> {
        if self.password.is_empty() {
            return Err(Error::EmptyField("password"));
        }

        if self.role == Role::Master {
            return Err(Error::CreateMasterUser);
        }

        Ok(User {
            id: new_id(),
            store_name: required(&self.store_name, "store name")?,
            admin_name: required(&self.admin_name, "name")?,
            username: required(&self.username, "username")?,
            password: self.password,
            role: self.role,
            active: true,
        })
    }
}

/// Creates a user that can log in straight away.
pub async fn create_user_endpoint(
    State(state): State<LedgerState>,
    Extension(current_user): Extension<User>,
    Form(form): Form<NewUserForm>,
) -> Response {
    if let Err(error) = require_master(&current_user) {
        return error.into_alert_response();
    }

    let user = match form.into_user() {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("invalid user form: {error}");
            return error.into_alert_response();
        }
    };

    let mut ledger = match state.ledger.lock() {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    let username = user.username.clone();

    match ledger.add_user(user) {
        Ok(()) => {
            tracing::info!("created user {username}");
            (
                HxRedirect(endpoints::USERS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not create user {username}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use uuid::Uuid;

    use crate::{
        app_state::LedgerState,
        endpoints,
        test_utils::{assert_hx_redirect, shared_test_ledger},
        user::{Role, User},
    };

    use super::{NewUserForm, create_user_endpoint};

    fn state() -> LedgerState {
        LedgerState {
            ledger: shared_test_ledger(),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn form(username: &str) -> NewUserForm {
        NewUserForm {
            username: username.to_owned(),
            password: " pass word ".to_owned(),
            store_name: "Loja Centro".to_owned(),
            admin_name: "Caio".to_owned(),
            role: Role::Finance,
        }
    }

    #[tokio::test]
    async fn creates_active_user() {
        let state = state();

        let response = create_user_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            Form(form(" caio ")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::USERS_VIEW);
        let ledger = state.ledger.lock().unwrap();
        let user = ledger
            .snapshot()
            .users
            .iter()
            .find(|user| user.username == "caio")
            .expect("user was not created");
        assert!(user.active);
        assert_eq!(user.role, Role::Finance);
        assert_eq!(user.password, " pass word ");
    }

    #[tokio::test]
    async fn rejects_duplicate_username() {
        let state = state();

        let response = create_user_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            Form(form("admin")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.ledger.lock().unwrap().snapshot().users.len(), 1);
    }

    #[tokio::test]
    async fn rejects_empty_fields() {
        let state = state();

        let response = create_user_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            Form(NewUserForm {
                store_name: " ".to_owned(),
                ..form("caio")
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.ledger.lock().unwrap().snapshot().users.len(), 1);
    }

    #[tokio::test]
    async fn rejects_master_role() {
        let state = state();

        let response = create_user_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            Form(NewUserForm {
                role: Role::Master,
                ..form("boss2")
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let ledger = state.ledger.lock().unwrap();
        assert_eq!(ledger.snapshot().users.len(), 1);
        assert!(ledger.snapshot().users.iter().all(|user| user.username != "boss2"));
    }

    #[tokio::test]
    async fn store_users_cannot_create_users() {
        let state = state();
        let manager = User {
            id: Uuid::from_u128(42),
            role: Role::Manager,
            ..User::seed_master()
        };

        let response = create_user_endpoint(
            State(state.clone()),
            Extension(manager),
            Form(form("caio")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
