//! Displays the logged in store's credit sales for a month.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    credit_sale::CreditSale,
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, edit_delete_action_links,
        format_currency, month_selector,
    },
    month::{MonthRef, with_month},
    navigation::NavBar,
    snapshot::Snapshot,
    timezone::local_offset,
    user::User,
};

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct CreditSaleQuery {
    pub month: Option<String>,
    /// Matches client names ignoring case, or client codes exactly as typed.
    pub search: Option<String>,
}

impl CreditSaleQuery {
    fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
    }

    fn matches(&self, sale: &CreditSale) -> bool {
        let Some(search) = self.search_text() else {
            return true;
        };

        sale.client_name
            .to_lowercase()
            .contains(&search.to_lowercase())
            || (!sale.client_code.is_empty() && sale.client_code.contains(search))
    }
}

/// The credit sales of `user` filed under `month` that match `query`, newest first.
fn sales_in_month<'a>(
    snapshot: &'a Snapshot,
    user: &User,
    month: &MonthRef,
    query: &CreditSaleQuery,
) -> Vec<&'a CreditSale> {
    let mut sales = snapshot
        .credit_sales
        .iter()
        .filter(|sale| sale.user_id == user.id && &sale.month_ref == month)
        .filter(|sale| query.matches(sale))
        .collect::<Vec<_>>();

    sales.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));

    sales
}

fn search_form(month: &MonthRef, query: &CreditSaleQuery) -> Markup {
    html! {
        form
            method="get"
            action=(endpoints::CREDIT_SALES_VIEW)
            class="flex gap-3 w-full md:w-1/2"
            aria-label="Search"
        {
            input type="hidden" name="month" value=(month);

            input
                name="search"
                type="search"
                placeholder="Client name or code"
                aria-label="Client name or code"
                value=(query.search.as_deref().unwrap_or_default())
                class=(FORM_TEXT_INPUT_STYLE);

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Search" }
        }
    }
}

fn action_links(sale: &CreditSale, hx_target: &str, hx_swap: &str) -> Markup {
    edit_delete_action_links(
        &format_endpoint(endpoints::EDIT_CREDIT_SALE_VIEW, sale.id),
        &format_endpoint(endpoints::CREDIT_SALE, sale.id),
        &format!(
            "Are you sure you want to delete the sale to '{}'? Its down payment will be deleted too.",
            sale.client_name
        ),
        hx_target,
        hx_swap,
    )
}

fn client_code(sale: &CreditSale) -> &str {
    if sale.client_code.is_empty() {
        "-"
    } else {
        &sale.client_code
    }
}

fn credit_sales_view(
    user: &User,
    month: &MonthRef,
    query: &CreditSaleQuery,
    sales: &[&CreditSale],
    snapshot: &Snapshot,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CREDIT_SALES_VIEW, user.role).into_html();
    let new_sale_url = with_month(endpoints::NEW_CREDIT_SALE_VIEW, month);
    let outstanding: f64 = sales.iter().map(|sale| sale.outstanding()).sum();
    let empty_message = if query.search_text().is_some() {
        html! { "No credit sales match the search." }
    } else {
        html! {
            "No credit sales in " (month.label()) ". Record one "
            a href=(new_sale_url) class=(LINK_STYLE) { "here" }
            "."
        }
    };

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Credit Sales" }

                    (month_selector(endpoints::CREDIT_SALES_VIEW, month, &[]))

                    a href=(new_sale_url) class=(LINK_STYLE) { "New credit sale" }
                }

                (search_form(month, query))

                p class="text-sm"
                {
                    "Outstanding: "
                    span class="font-semibold tabular-nums" data-outstanding="true"
                    {
                        (format_currency(outstanding))
                    }
                }

                ul class="lg:hidden space-y-4"
                {
                    @for sale in sales {
                        li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                            data-credit-sale-card="true"
                        {
                            div class="flex items-start justify-between gap-3"
                            {
                                div class="text-sm font-semibold text-gray-900 dark:text-white"
                                { (sale.client_name) }
                                div class="text-sm tabular-nums text-right"
                                { (format_currency(sale.total_amount)) }
                            }

                            div class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                            {
                                "#" (client_code(sale)) " · " (sale.sale_date)
                                " · Outstanding " (format_currency(sale.outstanding()))
                            }

                            div class="mt-2 flex items-center gap-4 text-sm"
                            {
                                (action_links(sale, "closest [data-credit-sale-card='true']", "outerHTML"))
                            }
                        }
                    }

                    @if sales.is_empty() {
                        li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                        {
                            (empty_message)
                        }
                    }
                }

                section class="hidden lg:block w-full overflow-x-auto lg:overflow-visible dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Client" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Code" }
                                th scope="col" class="px-6 py-3 text-right" { "Total" }
                                th scope="col" class="px-6 py-3 text-right" { "Down payment" }
                                th scope="col" class="px-6 py-3 text-right" { "Outstanding" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment method" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for sale in sales {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE) { (sale.sale_date) }
                                    th
                                        scope="row"
                                        class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                    {
                                        (sale.client_name)
                                    }
                                    td class=(TABLE_CELL_STYLE) { (client_code(sale)) }
                                    td class="px-6 py-4 text-right tabular-nums"
                                    { (format_currency(sale.total_amount)) }
                                    td class="px-6 py-4 text-right tabular-nums"
                                    { (format_currency(sale.down_payment)) }
                                    td class="px-6 py-4 text-right tabular-nums"
                                    { (format_currency(sale.outstanding())) }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        (snapshot.payment_method_name(sale.payment_method_id).unwrap_or("-"))
                                    }
                                    td class=(TABLE_CELL_STYLE)
                                    {
                                        div class="flex gap-4" { (action_links(sale, "closest tr", "delete")) }
                                    }
                                }
                            }

                            @if sales.is_empty() {
                                tr
                                {
                                    td
                                        colspan="8"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        (empty_message)
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    };

    base("Credit Sales", &[], &content)
}

/// Renders the logged in store's credit sales for the selected month.
pub async fn get_credit_sales_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Query(query): Query<CreditSaleQuery>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let month = MonthRef::from_query(query.month.as_deref(), local_offset(&state.local_timezone)?);

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;
    let snapshot = ledger.snapshot();
    let sales = sales_in_month(snapshot, &user, &month, &query);

    Ok(credit_sales_view(&user, &month, &query, &sales, snapshot).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Query;
    use scraper::Selector;
    use time::{Date, macros::date};
    use uuid::Uuid;

    use crate::{
        app_state::LedgerState,
        credit_sale::CreditSale,
        month::MonthRef,
        snapshot::Snapshot,
        test_utils::{assert_valid_html, parse_html_document, shared_test_ledger},
        user::{Role, User},
    };

    use super::{CreditSaleQuery, get_credit_sales_page, sales_in_month};

    const OWNER: Uuid = Uuid::from_u128(42);

    fn owner() -> User {
        User {
            id: OWNER,
            role: Role::Manager,
            username: "ana".to_owned(),
            ..User::seed_master()
        }
    }

    fn sale(client_name: &str, client_code: &str, sale_date: Date) -> CreditSale {
        CreditSale {
            id: Uuid::new_v4(),
            client_name: client_name.to_owned(),
            client_code: client_code.to_owned(),
            total_amount: 500.0,
            down_payment: 150.0,
            payment_method_id: None,
            sale_date,
            month_ref: MonthRef::new("2024-05").unwrap(),
            user_id: OWNER,
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            credit_sales: vec![
                sale("Ana Souza", "C-17", date!(2024 - 05 - 02)),
                sale("Bruno", "", date!(2024 - 05 - 20)),
                CreditSale {
                    user_id: Uuid::from_u128(99),
                    ..sale("Other store", "", date!(2024 - 05 - 03))
                },
                CreditSale {
                    month_ref: MonthRef::new("2024-04").unwrap(),
                    ..sale("Last month", "", date!(2024 - 04 - 03))
                },
            ],
            ..Snapshot::seed()
        }
    }

    fn names(sales: &[&CreditSale]) -> Vec<String> {
        sales.iter().map(|sale| sale.client_name.clone()).collect()
    }

    fn may(search: Option<&str>) -> CreditSaleQuery {
        CreditSaleQuery {
            month: Some("2024-05".to_owned()),
            search: search.map(str::to_owned),
        }
    }

    #[test]
    fn lists_own_sales_of_month_newest_first() {
        let snapshot = snapshot();
        let month = MonthRef::new("2024-05").unwrap();

        let sales = sales_in_month(&snapshot, &owner(), &month, &may(None));

        assert_eq!(names(&sales), ["Bruno", "Ana Souza"]);
    }

    #[test]
    fn searches_client_name_ignoring_case_and_code() {
        let snapshot = snapshot();
        let month = MonthRef::new("2024-05").unwrap();

        let by_name = sales_in_month(&snapshot, &owner(), &month, &may(Some("souza")));
        let by_code = sales_in_month(&snapshot, &owner(), &month, &may(Some("C-1")));
        let wrong_case_code = sales_in_month(&snapshot, &owner(), &month, &may(Some("c-17")));

        assert_eq!(names(&by_name), ["Ana Souza"]);
        assert_eq!(names(&by_code), ["Ana Souza"]);
        assert!(wrong_case_code.is_empty());
    }

    #[tokio::test]
    async fn page_shows_outstanding_total() {
        let ledger = shared_test_ledger();
        {
            let mut ledger = ledger.lock().unwrap();
            for sale in snapshot().credit_sales {
                ledger.save_credit_sale(sale, None).unwrap();
            }
        }
        let state = LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        };

        let response = get_credit_sales_page(State(state), Extension(owner()), Query(may(None)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let outstanding = Selector::parse("[data-outstanding]").unwrap();
        let text = document
            .select(&outstanding)
            .next()
            .map(|span| span.text().collect::<String>())
            .unwrap();
        assert_eq!(text.trim(), "R$700.00");
    }
}
