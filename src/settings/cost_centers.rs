//! Endpoints for the cost center list.
//!
//! The list is always saved whole: each endpoint edits a copy of the current
//! list and hands it to [Ledger::replace_cost_centers](crate::Ledger::replace_cost_centers).

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
    cost_center::{CostCenter, Subgroup},
    database_id::{CostCenterId, SubgroupId, new_id},
    endpoints,
    settings::NameForm,
    user::User,
    validation::required,
};

/// Apply `change` to a copy of the cost center list and save the result.
fn change_cost_centers(
    state: &LedgerState,
    change: impl FnOnce(&mut Vec<CostCenter>) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    let mut cost_centers = ledger.snapshot().cost_centers.clone();
    change(&mut cost_centers)?;

    ledger.replace_cost_centers(cost_centers)
}

fn find_mut(
    cost_centers: &mut [CostCenter],
    id: CostCenterId,
) -> Result<&mut CostCenter, Error> {
    cost_centers
        .iter_mut()
        .find(|center| center.id == id)
        .ok_or(Error::MissingCostCenterRecord)
}

fn redirect_to_settings() -> Response {
    (
        HxRedirect(endpoints::SETTINGS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

pub async fn create_cost_center_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Form(form): Form<NameForm>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let result = required(&form.name, "cost center name").and_then(|name| {
        change_cost_centers(&state, |cost_centers| {
            cost_centers.push(CostCenter {
                id: new_id(),
                name,
                subgroups: Vec::new(),
            });
            Ok(())
        })
    });

    match result {
        Ok(()) => redirect_to_settings(),
        Err(error) => {
            tracing::error!("could not create cost center: {error}");
            error.into_alert_response()
        }
    }
}

pub async fn rename_cost_center_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(cost_center_id): Path<CostCenterId>,
    Form(form): Form<NameForm>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let result = required(&form.name, "cost center name").and_then(|name| {
        change_cost_centers(&state, |cost_centers| {
            find_mut(cost_centers, cost_center_id)?.name = name;
            Ok(())
        })
    });

    match result {
        Ok(()) => redirect_to_settings(),
        Err(error) => {
            tracing::error!("could not rename cost center {cost_center_id}: {error}");
            error.into_alert_response()
        }
    }
}

/// Deletes a cost center and its subgroups.
///
/// Transactions filed under it are kept and show up under "Other".
pub async fn delete_cost_center_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(cost_center_id): Path<CostCenterId>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let result = change_cost_centers(&state, |cost_centers| {
        let count = cost_centers.len();
        cost_centers.retain(|center| center.id != cost_center_id);

        if cost_centers.len() == count {
            Err(Error::MissingCostCenterRecord)
        } else {
            Ok(())
        }
    });

    match result {
        Ok(()) => Alert::SuccessSimple {
            message: "Cost center deleted".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not delete cost center {cost_center_id}: {error}");
            error.into_alert_response()
        }
    }
}

pub async fn create_subgroup_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(cost_center_id): Path<CostCenterId>,
    Form(form): Form<NameForm>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let result = required(&form.name, "subgroup name").and_then(|name| {
        change_cost_centers(&state, |cost_centers| {
            find_mut(cost_centers, cost_center_id)?
                .subgroups
                .push(Subgroup { id: new_id(), name });
            Ok(())
        })
    });

    match result {
        Ok(()) => redirect_to_settings(),
        Err(error) => {
            tracing::error!("could not add subgroup to cost center {cost_center_id}: {error}");
            error.into_alert_response()
        }
    }
}

pub async fn delete_subgroup_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path((cost_center_id, subgroup_id)): Path<(CostCenterId, SubgroupId)>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let result = change_cost_centers(&state, |cost_centers| {
        let subgroups = &mut find_mut(cost_centers, cost_center_id)?.subgroups;
        let count = subgroups.len();
        subgroups.retain(|subgroup| subgroup.id != subgroup_id);

        if subgroups.len() == count {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    });

    match result {
        Ok(()) => Alert::SuccessSimple {
            message: "Subgroup removed".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!(
                "could not remove subgroup {subgroup_id} from cost center {cost_center_id}: {error}"
            );
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
        cost_center::{CostCenter, Subgroup},
        endpoints,
        settings::NameForm,
        test_utils::{assert_hx_redirect, shared_test_ledger},
        user::{Role, User},
    };

    use super::{
        create_cost_center_endpoint, create_subgroup_endpoint, delete_cost_center_endpoint,
        delete_subgroup_endpoint, rename_cost_center_endpoint,
    };

    const RENT: Uuid = Uuid::from_u128(100);
    const SALES: Uuid = Uuid::from_u128(200);
    const COUNTER: Uuid = Uuid::from_u128(201);

    fn manager() -> User {
        User {
            id: Uuid::from_u128(42),
            role: Role::Manager,
            username: "ana".to_owned(),
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
            .replace_cost_centers(vec![
                CostCenter {
                    id: RENT,
                    name: "Rent".to_owned(),
                    subgroups: vec![],
                },
                CostCenter {
                    id: SALES,
                    name: "Sales".to_owned(),
                    subgroups: vec![Subgroup {
                        id: COUNTER,
                        name: "Counter".to_owned(),
                    }],
                },
            ])
            .unwrap();

        LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn cost_centers(state: &LedgerState) -> Vec<CostCenter> {
        state.ledger.lock().unwrap().snapshot().cost_centers.clone()
    }

    #[tokio::test]
    async fn create_appends_trimmed_name() {
        let state = state();

        let response = create_cost_center_endpoint(
            State(state.clone()),
            Extension(manager()),
            name(" Payroll "),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::SETTINGS_VIEW);
        let cost_centers = cost_centers(&state);
        assert_eq!(cost_centers.len(), 3);
        assert_eq!(cost_centers[2].name, "Payroll");
        assert!(cost_centers[2].subgroups.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let state = state();

        let response = create_cost_center_endpoint(
            State(state.clone()),
            Extension(manager()),
            name("  "),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(cost_centers(&state).len(), 2);
    }

    #[tokio::test]
    async fn master_cannot_change_settings() {
        let state = state();

        let response = create_cost_center_endpoint(
            State(state.clone()),
            Extension(User::seed_master()),
            name("Payroll"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(cost_centers(&state).len(), 2);
    }

    #[tokio::test]
    async fn rename_keeps_subgroups() {
        let state = state();

        let response = rename_cost_center_endpoint(
            State(state.clone()),
            Extension(manager()),
            Path(SALES),
            name("Store sales"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let cost_centers = cost_centers(&state);
        assert_eq!(cost_centers[1].name, "Store sales");
        assert_eq!(cost_centers[1].subgroups.len(), 1);
    }

    #[tokio::test]
    async fn rename_missing_cost_center_is_not_found() {
        let state = state();

        let response = rename_cost_center_endpoint(
            State(state),
            Extension(manager()),
            Path(Uuid::from_u128(999)),
            name("Payroll"),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_only_that_cost_center() {
        let state = state();

        let response = delete_cost_center_endpoint(
            State(state.clone()),
            Extension(manager()),
            Path(RENT),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let cost_centers = cost_centers(&state);
        assert_eq!(cost_centers.len(), 1);
        assert_eq!(cost_centers[0].id, SALES);

        let again = delete_cost_center_endpoint(
            State(state.clone()),
            Extension(manager()),
            Path(RENT),
        )
        .await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn subgroups_can_be_added_and_removed() {
        let state = state();

        let response = create_subgroup_endpoint(
            State(state.clone()),
            Extension(manager()),
            Path(RENT),
            name("Warehouse"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(cost_centers(&state)[0].subgroups[0].name, "Warehouse");

        let response = delete_subgroup_endpoint(
            State(state.clone()),
            Extension(manager()),
            Path((SALES, COUNTER)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(cost_centers(&state)[1].subgroups.is_empty());
    }

    #[tokio::test]
    async fn removing_missing_subgroup_is_not_found() {
        let state = state();

        let response = delete_subgroup_endpoint(
            State(state.clone()),
            Extension(manager()),
            Path((RENT, COUNTER)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(cost_centers(&state)[1].subgroups.len(), 1);
    }
}
