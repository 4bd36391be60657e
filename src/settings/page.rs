//! The settings page.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    cost_center::CostCenter,
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    payment_method::PaymentMethod,
    snapshot::Snapshot,
    user::{Role, User},
};

const CARD_STYLE: &str = "rounded border border-gray-200 bg-white px-4 py-3 shadow-sm \
    dark:border-gray-700 dark:bg-gray-800";

enum Request {
    Post,
    Put,
}

/// A single line form with a text input named "name".
fn name_form(request: Request, url: &str, value: &str, placeholder: &str, button: &str) -> Markup {
    let (hx_post, hx_put) = match request {
        Request::Post => (Some(url), None),
        Request::Put => (None, Some(url)),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            class="flex gap-2 items-center"
        {
            input
                name="name"
                type="text"
                value=(value)
                placeholder=(placeholder)
                aria-label=(placeholder)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            button type="submit" class=(LINK_STYLE) { (button) }
        }
    }
}

fn delete_button(url: &str, confirm_message: &str, hx_target: &str) -> Markup {
    html! {
        button
            hx-delete=(url)
            hx-confirm=(confirm_message)
            hx-target=(hx_target)
            hx-target-error="#alert-container"
            hx-swap="delete"
            class=(BUTTON_DELETE_STYLE)
        {
            "Delete"
        }
    }
}

fn cost_center_card(center: &CostCenter) -> Markup {
    let center_url = format_endpoint(endpoints::COST_CENTER, center.id);
    let subgroups_url = format_endpoint(endpoints::SUBGROUPS_API, center.id);

    html! {
        li class=(CARD_STYLE) data-cost-center=(center.id)
        {
            div class="flex items-center justify-between gap-4"
            {
                (name_form(Request::Put, &center_url, &center.name, "Cost center name", "Rename"))

                (delete_button(
                    &center_url,
                    &format!(
                        "Are you sure you want to delete '{}' and its subgroups? \
                        Its transactions will be listed under Other.",
                        center.name
                    ),
                    "closest li",
                ))
            }

            ul class="mt-3 ms-4 space-y-2"
            {
                @for subgroup in &center.subgroups {
                    li class="flex items-center justify-between gap-4 text-sm" data-subgroup=(subgroup.id)
                    {
                        span { (subgroup.name) }

                        (delete_button(
                            &format_endpoint(&format_endpoint(endpoints::SUBGROUP, center.id), subgroup.id),
                            &format!("Are you sure you want to remove the subgroup '{}'?", subgroup.name),
                            "closest li",
                        ))
                    }
                }
            }

            div class="mt-3 ms-4"
            {
                (name_form(Request::Post, &subgroups_url, "", "New subgroup", "Add subgroup"))
            }
        }
    }
}

fn payment_method_card(method: &PaymentMethod) -> Markup {
    let url = format_endpoint(endpoints::PAYMENT_METHOD, method.id);

    html! {
        li class=(CARD_STYLE) data-payment-method=(method.id)
        {
            div class="flex items-center justify-between gap-4"
            {
                (name_form(Request::Put, &url, &method.name, "Payment method name", "Rename"))

                (delete_button(
                    &url,
                    &format!("Are you sure you want to delete '{}'?", method.name),
                    "closest li",
                ))
            }
        }
    }
}

fn settings_view(role: Role, snapshot: &Snapshot) -> Markup {
    let nav_bar = NavBar::new(endpoints::SETTINGS_VIEW, role).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full space-y-8 lg:max-w-3xl lg:mx-auto"
            {
                section id="cost-centers" class="space-y-4"
                {
                    h2 class="text-xl font-bold" { "Cost Centers" }

                    (name_form(Request::Post, endpoints::COST_CENTERS_API, "", "New cost center", "Add cost center"))

                    ul class="space-y-4"
                    {
                        @for center in &snapshot.cost_centers {
                            (cost_center_card(center))
                        }
                    }

                    @if snapshot.cost_centers.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "No cost centers yet. Transactions need at least one."
                        }
                    }
                }

                section id="payment-methods" class="space-y-4"
                {
                    h2 class="text-xl font-bold" { "Payment Methods" }

                    (name_form(Request::Post, endpoints::PAYMENT_METHODS_API, "", "New payment method", "Add payment method"))

                    ul class="space-y-4"
                    {
                        @for method in &snapshot.payment_methods {
                            (payment_method_card(method))
                        }
                    }

                    @if snapshot.payment_methods.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "No payment methods yet."
                        }
                    }
                }
            }
        }
    };

    base("Settings", &[], &content)
}

/// Renders the cost centers and payment methods with forms to change them.
pub async fn get_settings_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    Ok(settings_view(user.role, ledger.snapshot()).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State};
    use scraper::Selector;
    use uuid::Uuid;

    use crate::{
        Error,
        app_state::LedgerState,
        cost_center::{CostCenter, Subgroup},
        endpoints::{self, format_endpoint},
        payment_method::PaymentMethod,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document, shared_test_ledger},
        user::{Role, User},
    };

    use super::get_settings_page;

    const SALES: Uuid = Uuid::from_u128(200);
    const COUNTER: Uuid = Uuid::from_u128(201);
    const PIX: Uuid = Uuid::from_u128(300);

    fn operator() -> User {
        User {
            id: Uuid::from_u128(42),
            role: Role::Operator,
            username: "caio".to_owned(),
            ..User::seed_master()
        }
    }

    fn state() -> LedgerState {
        let ledger = shared_test_ledger();
        {
            let mut ledger = ledger.lock().unwrap();
            ledger
                .replace_cost_centers(vec![CostCenter {
                    id: SALES,
                    name: "Sales".to_owned(),
                    subgroups: vec![Subgroup {
                        id: COUNTER,
                        name: "Counter".to_owned(),
                    }],
                }])
                .unwrap();
            ledger
                .add_payment_method(PaymentMethod {
                    id: PIX,
                    name: "Pix".to_owned(),
                })
                .unwrap();
        }

        LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn attribute_values(document: &scraper::Html, selector: &str, attribute: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();

        document
            .select(&selector)
            .filter_map(|element| element.value().attr(attribute))
            .map(str::to_owned)
            .collect()
    }

    #[tokio::test]
    async fn lists_cost_centers_and_payment_methods_with_forms() {
        let response = get_settings_page(State(state()), Extension(operator()))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let posts = attribute_values(&document, "form[hx-post]", "hx-post");
        assert!(posts.contains(&endpoints::COST_CENTERS_API.to_owned()));
        assert!(posts.contains(&endpoints::PAYMENT_METHODS_API.to_owned()));
        assert!(posts.contains(&format_endpoint(endpoints::SUBGROUPS_API, SALES)));

        let puts = attribute_values(&document, "form[hx-put]", "hx-put");
        assert_eq!(
            puts,
            [
                format_endpoint(endpoints::COST_CENTER, SALES),
                format_endpoint(endpoints::PAYMENT_METHOD, PIX),
            ]
        );

        let deletes = attribute_values(&document, "button[hx-delete]", "hx-delete");
        assert!(deletes.contains(&format_endpoint(
            &format_endpoint(endpoints::SUBGROUP, SALES),
            COUNTER
        )));
    }

    #[tokio::test]
    async fn master_is_forbidden() {
        let result = get_settings_page(State(state()), Extension(User::seed_master())).await;

        assert_eq!(result.err(), Some(Error::Forbidden));
    }
}
