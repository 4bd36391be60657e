//! Endpoints for adding, renaming and deleting payment methods.

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
    alert::Alert,
    app_state::LedgerState,
    auth::require_store_user,
    database_id::{PaymentMethodId, new_id},
    endpoints,
    payment_method::PaymentMethod,
    settings::NameForm,
    user::User,
    validation::required,
};

pub async fn create_payment_method_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Form(form): Form<NameForm>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let name = match required(&form.name, "payment method name") {
        Ok(name) => name,
        Err(error) => {
            tracing::error!("invalid payment method form: {error}");
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

    match ledger.add_payment_method(PaymentMethod { id: new_id(), name }) {
        Ok(()) => (
            HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create payment method: {error}");
            error.into_alert_response()
        }
    }
}

pub async fn rename_payment_method_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(payment_method_id): Path<PaymentMethodId>,
    Form(form): Form<NameForm>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let name = match required(&form.name, "payment method name") {
        Ok(name) => name,
        Err(error) => {
            tracing::error!("invalid payment method form: {error}");
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

    let payment_method = PaymentMethod {
        id: payment_method_id,
        name,
    };

    match ledger.update_payment_method(payment_method) {
        Ok(()) => (
            HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not rename payment method {payment_method_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Deletes a payment method.
///
/// Transactions and credit sales that used it keep their reference and show no method.
pub async fn delete_payment_method_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(payment_method_id): Path<PaymentMethodId>,
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

    match ledger.delete_payment_method(payment_method_id) {
        Ok(()) => Alert::SuccessSimple {
            message: "Payment method deleted".to_owned(),
        }
        .into_response(),
        Err(Error::DeleteMissingPaymentMethod) => {
            Error::DeleteMissingPaymentMethod.into_alert_response()
        }
        Err(error) => {
            tracing::error!("could not delete payment method {payment_method_id}: {error}");
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
    use axum_extra::extract::Form;
    use uuid::Uuid;

    use crate::{
        app_state::LedgerState,
        endpoints,
        payment_method::PaymentMethod,
        settings::NameForm,
        test_utils::{assert_hx_redirect, shared_test_ledger},
        user::{Role, User},
    };

    use super::{
        create_payment_method_endpoint, delete_payment_method_endpoint,
        rename_payment_method_endpoint,
    };

    const PIX: Uuid = Uuid::from_u128(300);

    fn finance() -> User {
        User {
            id: Uuid::from_u128(42),
            role: Role::Finance,
            username: "bia".to_owned(),
            ..User::seed_master()
        }
    }

    fn name(name: &str) -> Form<NameForm> {
        Form(NameForm {
            name: name.to_owned(),
        })
    }

    fn state() -> LedgerState {
        let ledger = shared_test_ledger();
        ledger
            .lock()
            .unwrap()
            .add_payment_method(PaymentMethod {
                id: PIX,
                name: "Pix".to_owned(),
            })
            .unwrap();

        LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn payment_methods(state: &LedgerState) -> Vec<PaymentMethod> {
        state.ledger.lock().unwrap().snapshot().payment_methods.clone()
    }

    #[tokio::test]
    async fn create_adds_payment_method() {
        let state = state();

        let response =
            create_payment_method_endpoint(State(state.clone()), Extension(finance()), name("Cash"))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SETTINGS_VIEW);
        let names = payment_methods(&state)
            .into_iter()
            .map(|method| method.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["Pix", "Cash"]);
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let state = state();

        let response =
            create_payment_method_endpoint(State(state.clone()), Extension(finance()), name(""))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(payment_methods(&state).len(), 1);
    }

    #[tokio::test]
    async fn rename_changes_name() {
        let state = state();

        let response = rename_payment_method_endpoint(
            State(state.clone()),
            Extension(finance()),
            Path(PIX),
            name("Pix (bank)"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(payment_methods(&state)[0].name, "Pix (bank)");
    }

    #[tokio::test]
    async fn rename_missing_payment_method_is_not_found() {
        let response = rename_payment_method_endpoint(
            State(state()),
            Extension(finance()),
            Path(Uuid::from_u128(999)),
            name("Card"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_payment_method() {
        let state = state();

        let response =
            delete_payment_method_endpoint(State(state.clone()), Extension(finance()), Path(PIX))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(payment_methods(&state).is_empty());

        let again =
            delete_payment_method_endpoint(State(state.clone()), Extension(finance()), Path(PIX))
                .await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }
}
