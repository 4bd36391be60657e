//! The logged in user's own details.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    app_state::LedgerState,
    endpoints,
    html::{FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, submit_button},
    navigation::NavBar,
    user::User,
    validation::required,
};

/// The form data for updating the logged in user.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileForm {
    pub admin_name: String,
    pub username: String,
    /// Left empty to keep the current password.
    #[serde(default)]
    pub password: String,
}

fn profile_view(user: &User) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW, user.role).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(endpoints::PROFILE_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Profile" }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (user.store_name) " · " (user.role)
                }

                div
                {
                    label for="admin_name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        name="admin_name"
                        id="admin_name"
                        type="text"
                        autocomplete="name"
                        value=(user.admin_name)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="username" class=(FORM_LABEL_STYLE) { "Username" }

                    input
                        name="username"
                        id="username"
                        type="text"
                        autocomplete="username"
                        value=(user.username)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="password" class=(FORM_LABEL_STYLE) { "New password" }

                    input
                        name="password"
                        id="password"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Leave empty to keep the current password"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (submit_button("Save"))
            }
        }
    };

    base("Profile", &[], &content)
}

pub async fn get_profile_page(Extension(user): Extension<User>) -> Response {
    profile_view(&user).into_response()
}

/// Updates the logged in user's name, username and, if given, password.
pub async fn update_profile_endpoint(
    State(state): State<LedgerState>,
    Extension(current_user): Extension<User>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let mut ledger = match state.ledger.lock() {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    let Some(existing) = ledger.snapshot().user(current_user.id).cloned() else {
        return Error::UpdateMissingUser.into_alert_response();
    };

    let updated = required(&form.admin_name, "name").and_then(|admin_name| {
        Ok(User {
            admin_name,
            username: required(&form.username, "username")?,
            password: if form.password.is_empty() {
                existing.password.clone()
            } else {
                form.password
            },
            ..existing
        })
    });

    let result = updated.and_then(|user| ledger.update_user(user));

    match result {
        Ok(()) => (
            HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update profile of user {}: {error}", current_user.id);
            error.into_alert_response()
        }
    }
}
