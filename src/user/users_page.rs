//! The master's page for listing and creating users.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_master,
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, BUTTON_DELETE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        password_input, submit_button,
    },
    navigation::NavBar,
    user::{Role, User},
};

fn text_input(name: &str, label: &str, autocomplete: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="text"
                autocomplete=(autocomplete)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn new_user_form() -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS_API)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            h2 class="text-xl font-bold" { "New User" }

            (text_input("username", "Username", "off"))

            (password_input("", None))

            (text_input("store_name", "Store", "organization"))

            (text_input("admin_name", "Name", "name"))

            div
            {
                label for="role" class=(FORM_LABEL_STYLE) { "Role" }

                select name="role" id="role" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for role in Role::STORE_ROLES {
                        option value=(role) selected[role == Role::Manager] { (role) }
                    }
                }
            }

            (submit_button("Create User"))
        }
    }
}

fn status_badge(active: bool) -> Markup {
    let (text, colour) = if active {
        ("Active", "bg-green-100 text-green-800 dark:bg-green-900 dark:text-green-300")
    } else {
        ("Inactive", "bg-gray-100 text-gray-800 dark:bg-gray-700 dark:text-gray-300")
    };

    html! {
        span class={ (BADGE_STYLE) " " (colour) } { (text) }
    }
}

fn user_actions(user: &User) -> Markup {
    if user.is_master() {
        return html! {
            span class="text-xs text-gray-500 dark:text-gray-400" { "Protected" }
        };
    }

    let toggle_text = if user.active { "Deactivate" } else { "Activate" };

    html! {
        div class="flex gap-4"
        {
            button
                hx-put=(format_endpoint(endpoints::USER_ACTIVE, user.id))
                hx-target-error="#alert-container"
                class=(LINK_STYLE)
            {
                (toggle_text)
            }

            button
                hx-delete=(format_endpoint(endpoints::USER, user.id))
                hx-confirm={ "Are you sure you want to delete the user '" (user.username) "'?" }
                hx-target="closest tr"
                hx-target-error="#alert-container"
                hx-swap="delete"
                class=(BUTTON_DELETE_STYLE)
            {
                "Delete"
            }
        }
    }
}

fn users_view(current_user: &User, users: &[User]) -> Markup {
    let nav_bar = NavBar::new(endpoints::USERS_VIEW, current_user.role).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full space-y-8 lg:max-w-5xl lg:mx-auto"
            {
                section class="max-w-md" { (new_user_form()) }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    h2 class="text-xl font-bold mb-4" { "Users" }

                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Username" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Store" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Role" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for user in users {
                                tr class=(TABLE_ROW_STYLE) data-user=(user.id)
                                {
                                    th
                                        scope="row"
                                        class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                    {
                                        (user.username)
                                    }
                                    td class=(TABLE_CELL_STYLE) { (user.admin_name) }
                                    td class=(TABLE_CELL_STYLE) { (user.store_name) }
                                    td class=(TABLE_CELL_STYLE) { (user.role) }
                                    td class=(TABLE_CELL_STYLE) { (status_badge(user.active)) }
                                    td class=(TABLE_CELL_STYLE) { (user_actions(user)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Users", &[], &content)
}

/// Renders every user with controls to create, deactivate and delete them.
pub async fn get_users_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    require_master(&user)?;

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    Ok(users_view(&user, &ledger.snapshot().users).into_response())
}
