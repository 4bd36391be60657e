use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, alert::Alert, app_state::LedgerState, auth::require_store_user,
    credit_sale::edit::owned_sale, database_id::CreditSaleId, user::User,
};

/// Deletes one of the logged in store's credit sales together with its down payment.
pub async fn delete_credit_sale_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(sale_id): Path<CreditSaleId>,
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

    if let Err(error) = owned_sale(ledger.snapshot(), sale_id, &user) {
        return error.into_alert_response();
    }

    match ledger.delete_credit_sale(sale_id) {
        Ok(()) => Alert::SuccessSimple {
            message: "Credit sale deleted".to_owned(),
        }
        .into_response(),
        Err(error) => {
            tracing::error!("could not delete credit sale {sale_id}: {error}");
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
        credit_sale::CreditSale,
        month::MonthRef,
        test_utils::shared_test_ledger,
        transaction::{Transaction, TransactionType},
        user::{Role, User},
    };

    use super::delete_credit_sale_endpoint;

    const OWNER: Uuid = Uuid::from_u128(42);

    fn owner() -> User {
        User {
            id: OWNER,
            role: Role::Manager,
            username: "ana".to_owned(),
            ..User::seed_master()
        }
    }

    fn state_with_sale() -> (LedgerState, Uuid) {
        let sale = CreditSale {
            id: Uuid::new_v4(),
            client_name: "Ana".to_owned(),
            client_code: String::new(),
            total_amount: 500.0,
            down_payment: 150.0,
            payment_method_id: None,
            sale_date: date!(2024 - 05 - 03),
            month_ref: MonthRef::new("2024-05").unwrap(),
            user_id: OWNER,
        };
        let transaction = Transaction {
            id: Uuid::new_v4(),
            date: sale.sale_date,
            kind: TransactionType::Entry,
            amount: 150.0,
            cost_center_id: None,
            subgroup_id: None,
            payment_method_id: None,
            description: "Store credit down payment: Ana".to_owned(),
            month_ref: sale.month_ref.clone(),
            user_id: OWNER,
            credit_sale_id: Some(sale.id),
        };
        let sale_id = sale.id;
        let ledger = shared_test_ledger();
        ledger
            .lock()
            .unwrap()
            .save_credit_sale(sale, Some(transaction))
            .unwrap();

        (
            LedgerState {
                ledger,
                local_timezone: "Etc/UTC".to_owned(),
            },
            sale_id,
        )
    }

    #[tokio::test]
    async fn deletes_sale_and_down_payment() {
        let (state, sale_id) = state_with_sale();

        let response =
            delete_credit_sale_endpoint(State(state.clone()), Extension(owner()), Path(sale_id))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let ledger = state.ledger.lock().unwrap();
        assert!(ledger.snapshot().credit_sales.is_empty());
        assert!(ledger.snapshot().transactions.is_empty());
    }

    #[tokio::test]
    async fn other_store_cannot_delete_sale() {
        let (state, sale_id) = state_with_sale();
        let stranger = User {
            id: Uuid::from_u128(43),
            ..owner()
        };

        let response =
            delete_credit_sale_endpoint(State(state.clone()), Extension(stranger), Path(sale_id))
                .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(state.ledger.lock().unwrap().snapshot().credit_sales.len(), 1);
    }
}
