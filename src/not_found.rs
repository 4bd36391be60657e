use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::internal_server_error::InternalServerError;

pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    InternalServerError {
        title: "Not Found",
        header: "404",
        description: "Something's missing.",
        fix: "Sorry, we can't find that page. The navigation bar lists the pages for your account.",
        status_code: StatusCode::NOT_FOUND,
    }
    .into_response()
}
