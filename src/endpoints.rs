//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/users/{user_id}', use [format_endpoint].

use std::fmt::Display;

/// The root route which redirects to the page for the user's role or the log in page.
pub const ROOT: &str = "/";
/// The landing page for store users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for displaying a user's store credit sales.
pub const CREDIT_SALES_VIEW: &str = "/credit_sales";
/// The page for creating a new store credit sale.
pub const NEW_CREDIT_SALE_VIEW: &str = "/credit_sales/new";
/// The page for editing an existing store credit sale.
pub const EDIT_CREDIT_SALE_VIEW: &str = "/credit_sales/{credit_sale_id}/edit";
/// The page for managing cost centers and payment methods.
pub const SETTINGS_VIEW: &str = "/settings";
/// The page for editing the logged in user's details.
pub const PROFILE_VIEW: &str = "/profile";
/// The landing page for master users.
pub const MASTER_VIEW: &str = "/master";
/// The page for managing users.
pub const USERS_VIEW: &str = "/users";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to create store credit sales.
pub const CREDIT_SALES_API: &str = "/api/credit_sales";
/// The route to update or delete a single store credit sale.
pub const CREDIT_SALE: &str = "/api/credit_sales/{credit_sale_id}";
/// The route to create cost centers.
pub const COST_CENTERS_API: &str = "/api/cost_centers";
/// The route to rename or delete a single cost center.
pub const COST_CENTER: &str = "/api/cost_centers/{cost_center_id}";
/// The route to add a subgroup to a cost center.
pub const SUBGROUPS_API: &str = "/api/cost_centers/{cost_center_id}/subgroups";
/// The route to remove a subgroup from a cost center.
pub const SUBGROUP: &str = "/api/cost_centers/{cost_center_id}/subgroups/{subgroup_id}";
/// The route to create payment methods.
pub const PAYMENT_METHODS_API: &str = "/api/payment_methods";
/// The route to rename or delete a single payment method.
pub const PAYMENT_METHOD: &str = "/api/payment_methods/{payment_method_id}";
/// The route to create users.
pub const USERS_API: &str = "/api/users";
/// The route to delete a user.
pub const USER: &str = "/api/users/{user_id}";
/// The route to activate or deactivate a user.
pub const USER_ACTIVE: &str = "/api/users/{user_id}/active";
/// The route to update the logged in user's details.
pub const PROFILE_API: &str = "/api/profile";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// For paths with two parameters, call this function once per parameter, in order.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;
    use uuid::Uuid;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        for endpoint in [
            endpoints::ROOT,
            endpoints::DASHBOARD_VIEW,
            endpoints::TRANSACTIONS_VIEW,
            endpoints::NEW_TRANSACTION_VIEW,
            endpoints::EDIT_TRANSACTION_VIEW,
            endpoints::CREDIT_SALES_VIEW,
            endpoints::NEW_CREDIT_SALE_VIEW,
            endpoints::EDIT_CREDIT_SALE_VIEW,
            endpoints::SETTINGS_VIEW,
            endpoints::PROFILE_VIEW,
            endpoints::MASTER_VIEW,
            endpoints::USERS_VIEW,
            endpoints::LOG_IN_VIEW,
            endpoints::INTERNAL_ERROR_VIEW,
            endpoints::STATIC,
            endpoints::LOG_IN_API,
            endpoints::LOG_OUT,
            endpoints::TRANSACTIONS_API,
            endpoints::TRANSACTION,
            endpoints::CREDIT_SALES_API,
            endpoints::CREDIT_SALE,
            endpoints::COST_CENTERS_API,
            endpoints::COST_CENTER,
            endpoints::SUBGROUPS_API,
            endpoints::SUBGROUP,
            endpoints::PAYMENT_METHODS_API,
            endpoints::PAYMENT_METHOD,
            endpoints::USERS_API,
            endpoints::USER,
            endpoints::USER_ACTIVE,
            endpoints::PROFILE_API,
        ] {
            assert_endpoint_is_valid_uri(endpoint);
        }
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn replaces_two_parameters_in_order() {
        let center = Uuid::from_u128(1);
        let subgroup = Uuid::from_u128(2);

        let formatted_path = format_endpoint(
            &format_endpoint(endpoints::SUBGROUP, center),
            subgroup,
        );

        assert_eq!(
            formatted_path,
            format!("/api/cost_centers/{center}/subgroups/{subgroup}")
        );
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
