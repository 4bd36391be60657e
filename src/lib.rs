//! Rumont is a web app for keeping the books of a group of stores.
//!
//! Store managers record income and expense transactions and store credit
//! sales against shared cost centers and payment methods, while the master
//! account follows every store from a single panel.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod cost_center;
mod credit_sale;
mod dashboard;
mod database_id;
mod endpoints;
mod html;
mod internal_server_error;
mod ledger;
mod logging;
mod master;
mod month;
mod navigation;
mod not_found;
mod payment_method;
mod routing;
mod settings;
mod snapshot;
mod store;
mod timezone;
mod transaction;
mod user;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use ledger::Ledger;
pub use logging::logging_middleware;
pub use routing::build_router;
pub use snapshot::Snapshot;
pub use store::{Backend, LocalStore, STORAGE_KEY, SqliteStore, Store};

use crate::{
    alert::Alert, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// No user matched the username and password entered at log-in.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The username and password matched a user whose account is disabled.
    #[error("the account is disabled")]
    InactiveAccount,

    /// The auth cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The auth cookie could not be decoded or its session has ended.
    #[error("the session token is invalid or has expired")]
    InvalidSession,

    /// The logged in user is not allowed to use the requested page or action.
    #[error("the user's role does not allow this action")]
    Forbidden,

    /// A month reference was not in the `YYYY-MM` format.
    #[error("\"{0}\" is not a month in the format YYYY-MM")]
    InvalidMonth(String),

    /// An amount was negative.
    #[error("amounts cannot be negative")]
    NegativeAmount,

    /// A name (cost center, subgroup, payment method, user field) was empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A transaction was submitted without a cost center.
    #[error("a cost center is required")]
    MissingCostCenter,

    /// A transaction was submitted without a subgroup while its cost center has subgroups.
    #[error("the cost center requires a subgroup")]
    MissingSubgroup,

    /// A transaction was submitted without a payment method.
    #[error("a payment method is required")]
    MissingPaymentMethod,

    /// The cost center ID did not refer to a configured cost center.
    #[error("the cost center ID does not refer to a valid cost center")]
    InvalidCostCenter,

    /// The subgroup ID did not refer to a subgroup of the selected cost center.
    #[error("the subgroup ID does not refer to a subgroup of the cost center")]
    InvalidSubgroup,

    /// The payment method ID did not refer to a configured payment method.
    #[error("the payment method ID does not refer to a valid payment method")]
    InvalidPaymentMethod,

    /// The transaction records a credit sale's down payment and is changed through the sale.
    #[error("the transaction belongs to a credit sale")]
    LinkedTransaction,

    /// A credit sale was submitted without a client name.
    #[error("the client name is required")]
    MissingClient,

    /// A credit sale with a down payment was submitted without a payment method for it.
    #[error("a payment method is required for the down payment")]
    MissingDownPaymentMethod,

    /// A credit sale with a down payment was submitted before any cost center exists.
    #[error("at least one cost center must be configured to record a down payment")]
    NoCostCenterConfigured,

    /// The username is already taken by another user.
    #[error("the username \"{0}\" is already taken")]
    DuplicateUsername(String),

    /// A record with the same ID already exists in the store.
    #[error("a record with the same ID already exists in the store")]
    DuplicateId,

    /// Master users are never deleted.
    #[error("master users cannot be deleted")]
    DeleteMasterUser,

    /// Master users are never deactivated.
    #[error("master users cannot be deactivated")]
    DeactivateMasterUser,

    /// The master user is seeded with the store, new users get a store role.
    #[error("new users cannot have the master role")]
    CreateMasterUser,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The local state file could not be read or written.
    #[error("could not access the local state file: {0}")]
    LocalStateError(String),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not convert to or from JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the ledger lock
    #[error("could not acquire the ledger lock")]
    LedgerLockError,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the store")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the store")]
    DeleteMissingTransaction,

    /// Tried to update a user that does not exist
    #[error("tried to update a user that is not in the store")]
    UpdateMissingUser,

    /// Tried to delete a user that does not exist
    #[error("tried to delete a user that is not in the store")]
    DeleteMissingUser,

    /// Tried to update a payment method that does not exist
    #[error("tried to update a payment method that is not in the store")]
    UpdateMissingPaymentMethod,

    /// Tried to delete a payment method that does not exist
    #[error("tried to delete a payment method that is not in the store")]
    DeleteMissingPaymentMethod,

    /// Tried to change a cost center that does not exist
    #[error("tried to change a cost center that is not in the store")]
    MissingCostCenterRecord,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code:
                        rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                        | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateId,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Forbidden => InternalServerError::forbidden().into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
                ..Default::default()
            }
            .into_response(),
            Error::LedgerLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        let (status_code, message, details) = match &self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                "Not allowed",
                "Your account is not allowed to do this.".to_owned(),
            ),
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                "Invalid month",
                format!("\"{month}\" is not a month. Use the format YYYY-MM, e.g. 2024-05."),
            ),
            Error::NegativeAmount => (
                StatusCode::BAD_REQUEST,
                "Invalid amount",
                "Amounts cannot be negative.".to_owned(),
            ),
            Error::EmptyField(field) => (
                StatusCode::BAD_REQUEST,
                "Missing field",
                format!("Fill in the {field}."),
            ),
            Error::MissingCostCenter
            | Error::MissingSubgroup
            | Error::MissingPaymentMethod
            | Error::InvalidCostCenter
            | Error::InvalidSubgroup
            | Error::InvalidPaymentMethod => (
                StatusCode::BAD_REQUEST,
                "Please fill in all required fields",
                format!("{}.", capitalize(&self.to_string())),
            ),
            Error::LinkedTransaction => (
                StatusCode::BAD_REQUEST,
                "Transaction belongs to a credit sale",
                "Edit or delete the credit sale to change its down payment.".to_owned(),
            ),
            Error::MissingClient => (
                StatusCode::BAD_REQUEST,
                "Missing client",
                "Fill in the client name and the total amount.".to_owned(),
            ),
            Error::MissingDownPaymentMethod => (
                StatusCode::BAD_REQUEST,
                "Missing payment method",
                "Select the payment method used for the down payment.".to_owned(),
            ),
            Error::NoCostCenterConfigured => (
                StatusCode::BAD_REQUEST,
                "No cost center configured",
                "Configure at least one cost center in Settings before recording sales with a \
                down payment."
                    .to_owned(),
            ),
            Error::DuplicateUsername(username) => (
                StatusCode::BAD_REQUEST,
                "Duplicate Username",
                format!("The username \"{username}\" is already taken. Choose a different one."),
            ),
            Error::DeleteMasterUser => (
                StatusCode::BAD_REQUEST,
                "Could not delete user",
                "Master users cannot be deleted.".to_owned(),
            ),
            Error::DeactivateMasterUser => (
                StatusCode::BAD_REQUEST,
                "Could not deactivate user",
                "Master users cannot be deactivated.".to_owned(),
            ),
            Error::CreateMasterUser => (
                StatusCode::BAD_REQUEST,
                "Could not create user",
                "Choose a manager, finance or operator role.".to_owned(),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not update transaction",
                "The transaction could not be found.".to_owned(),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingUser => (
                StatusCode::NOT_FOUND,
                "Could not update user",
                "The user could not be found.".to_owned(),
            ),
            Error::DeleteMissingUser => (
                StatusCode::NOT_FOUND,
                "Could not delete user",
                "The user could not be found. \
                Try refreshing the page to see if the user has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingPaymentMethod => (
                StatusCode::NOT_FOUND,
                "Could not update payment method",
                "The payment method could not be found.".to_owned(),
            ),
            Error::DeleteMissingPaymentMethod => (
                StatusCode::NOT_FOUND,
                "Could not delete payment method",
                "The payment method could not be found. \
                Try refreshing the page to see if it has already been deleted."
                    .to_owned(),
            ),
            Error::MissingCostCenterRecord | Error::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The record could not be found. Try refreshing the page.".to_owned(),
            ),
            Error::SqlError(_)
            | Error::LocalStateError(_)
            | Error::JSONSerializationError(_)
            | Error::DuplicateId => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Could not save to the database",
                "Check your connection and try again.".to_owned(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.".to_owned(),
            ),
        };

        (
            status_code,
            Alert::Error {
                message: message.to_owned(),
                details,
            },
        )
            .into_response()
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
