//! The full-page responses for errors that stop a page from rendering.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// An error page with a big status header, a short description and a suggested fix.
pub struct InternalServerError<'a> {
    pub title: &'a str,
    pub header: &'a str,
    pub description: &'a str,
    pub fix: &'a str,
    pub status_code: StatusCode,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            title: "Internal Server Error",
            header: "500",
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl InternalServerError<'static> {
    /// Shown when a store user opens a master page or the master opens a store page.
    pub fn forbidden() -> Self {
        Self {
            title: "Forbidden",
            header: "403",
            description: "This page is not available to your account.",
            fix: "Use the navigation bar to go back to the pages for your role.",
            status_code: StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let page = error_view(self.title, self.header, self.description, self.fix);

        (self.status_code, Html(page.into_string())).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
