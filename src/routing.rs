//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Extension, Router, middleware,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_hx, get_log_in_page, get_log_out, home_page, post_log_in},
    credit_sale::{
        create_credit_sale_endpoint, delete_credit_sale_endpoint, edit_credit_sale_endpoint,
        get_create_credit_sale_page, get_credit_sales_page, get_edit_credit_sale_page,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    master::get_master_page,
    not_found::get_404_not_found,
    settings::{
        create_cost_center_endpoint, create_payment_method_endpoint, create_subgroup_endpoint,
        delete_cost_center_endpoint, delete_payment_method_endpoint, delete_subgroup_endpoint,
        get_settings_page, rename_cost_center_endpoint, rename_payment_method_endpoint,
    },
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_create_transaction_page, get_edit_transaction_page, get_transactions_page,
    },
    user::{
        User, create_user_endpoint, delete_user_endpoint, get_profile_page, get_users_page,
        toggle_user_active_endpoint, update_profile_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::CREDIT_SALES_VIEW, get(get_credit_sales_page))
        .route(
            endpoints::NEW_CREDIT_SALE_VIEW,
            get(get_create_credit_sale_page),
        )
        .route(
            endpoints::EDIT_CREDIT_SALE_VIEW,
            get(get_edit_credit_sale_page),
        )
        .route(endpoints::SETTINGS_VIEW, get(get_settings_page))
        .route(endpoints::PROFILE_VIEW, get(get_profile_page))
        .route(endpoints::MASTER_VIEW, get(get_master_page))
        .route(endpoints::USERS_VIEW, get(get_users_page))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // These POST/PUT/DELETE routes need to use the HX-REDIRECT header for auth redirects to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(
                endpoints::CREDIT_SALES_API,
                post(create_credit_sale_endpoint),
            )
            .route(
                endpoints::CREDIT_SALE,
                put(edit_credit_sale_endpoint).delete(delete_credit_sale_endpoint),
            )
            .route(
                endpoints::COST_CENTERS_API,
                post(create_cost_center_endpoint),
            )
            .route(
                endpoints::COST_CENTER,
                put(rename_cost_center_endpoint).delete(delete_cost_center_endpoint),
            )
            .route(endpoints::SUBGROUPS_API, post(create_subgroup_endpoint))
            .route(endpoints::SUBGROUP, delete(delete_subgroup_endpoint))
            .route(
                endpoints::PAYMENT_METHODS_API,
                post(create_payment_method_endpoint),
            )
            .route(
                endpoints::PAYMENT_METHOD,
                put(rename_payment_method_endpoint).delete(delete_payment_method_endpoint),
            )
            .route(endpoints::USERS_API, post(create_user_endpoint))
            .route(endpoints::USER, delete(delete_user_endpoint))
            .route(endpoints::USER_ACTIVE, put(toggle_user_active_endpoint))
            .route(endpoints::PROFILE_API, put(update_profile_endpoint))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the landing page for the user's role.
async fn get_index_page(Extension(user): Extension<User>) -> Redirect {
    Redirect::to(home_page(&user))
}
