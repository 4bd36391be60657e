//! Dashboard HTTP handler and view rendering.
//!
//! The overview built here is shared with the master panel, which shows the
//! same sections for the store it has selected.

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
    dashboard::{
        aggregation::{Summary, cost_center_breakdown, monthly_history, owned_in_month},
        cards::{breakdown_cards, summary_cards},
        charts::{DashboardChart, breakdown_chart, charts_scripts, charts_view, history_chart},
        tables::history_table,
    },
    database_id::UserId,
    endpoints,
    html::{HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base, month_selector},
    month::{MonthRef, with_month},
    navigation::NavBar,
    snapshot::Snapshot,
    timezone::local_offset,
    user::User,
};

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub month: Option<String>,
}

/// The rendered sections of a store's overview and the scripts they need.
pub struct StoreOverview {
    pub content: Markup,
    pub head_elements: Vec<HeadElement>,
}

/// The month's totals, cost center breakdown and monthly history of the
/// store run by `user_id`.
///
/// `empty_state` is shown instead of the breakdown when the store has no
/// transactions in `month`.
pub fn store_overview(
    snapshot: &Snapshot,
    user_id: UserId,
    month: &MonthRef,
    empty_state: Markup,
) -> StoreOverview {
    let month_transactions = owned_in_month(&snapshot.transactions, user_id, month);
    let summary = Summary::of(month_transactions.iter().copied());
    let breakdown = cost_center_breakdown(&month_transactions, snapshot);
    let history = monthly_history(&snapshot.transactions, user_id);

    let mut charts = Vec::new();
    if !breakdown.is_empty() {
        charts.push(DashboardChart::new("breakdown-chart", &breakdown_chart(&breakdown)));
    }
    if !history.is_empty() {
        charts.push(DashboardChart::new("history-chart", &history_chart(&history)));
    }

    let head_elements = if charts.is_empty() {
        Vec::new()
    } else {
        charts_scripts(&charts).into()
    };

    let content = html! {
        div class="w-full space-y-8"
        {
            (summary_cards(&summary))

            @if month_transactions.is_empty() {
                (empty_state)
            } @else {
                (breakdown_cards(&breakdown))
            }

            @if !charts.is_empty() {
                (charts_view(&charts))
            }

            @if !history.is_empty() {
                (history_table(&history, month))
            }
        }
    };

    StoreOverview {
        content,
        head_elements,
    }
}

fn empty_state_view(month: &MonthRef) -> Markup {
    let new_transaction_url = with_month(endpoints::NEW_TRANSACTION_VIEW, month);

    html! {
        section class="w-full mx-auto" data-empty-state="true"
        {
            div class="bg-white dark:bg-gray-800 border border-gray-200
                       dark:border-gray-700 rounded-lg p-8 shadow-md
                       text-center max-w-md mx-auto"
            {
                h3 class="text-xl font-semibold mb-3" { "Nothing here yet" }

                p class="text-gray-700 dark:text-gray-300 mb-4"
                {
                    "There are no transactions in " (month.label()) "."
                }

                a href=(new_transaction_url) class=(LINK_STYLE) { "Record a transaction" }
            }
        }
    }
}

fn dashboard_view(user: &User, month: &MonthRef, overview: StoreOverview) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, user.role).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full space-y-6 lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (user.store_name) }
                        p class="text-sm text-gray-600 dark:text-gray-400" { (month.label()) }
                    }

                    (month_selector(endpoints::DASHBOARD_VIEW, month, &[]))
                }

                (overview.content)
            }
        }
    };

    base("Dashboard", &overview.head_elements, &content)
}

/// Display the logged in store's overview for the selected month.
pub async fn get_dashboard_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let month = MonthRef::from_query(query.month.as_deref(), local_offset(&state.local_timezone)?);

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    let overview = store_overview(ledger.snapshot(), user.id, &month, empty_state_view(&month));

    Ok(dashboard_view(&user, &month, overview).into_response())
}

#[cfg(test)]
mod tests {
    use axum::{Extension, extract::State};
    use axum_extra::extract::Query;
    use scraper::Selector;
    use time::macros::date;
    use uuid::Uuid;

    use crate::{
        Error,
        app_state::LedgerState,
        month::MonthRef,
        test_utils::{
            assert_status_ok, assert_valid_html, element_texts, parse_html_document,
            shared_test_ledger,
        },
        transaction::{Transaction, TransactionType},
        user::{Role, User},
    };

    use super::{DashboardQuery, get_dashboard_page};

    const ANA: Uuid = Uuid::from_u128(42);
    const BIA: Uuid = Uuid::from_u128(43);

    fn manager() -> User {
        User {
            id: ANA,
            store_name: "Loja Centro".to_owned(),
            role: Role::Manager,
            username: "ana".to_owned(),
            ..User::seed_master()
        }
    }

    fn transaction(user_id: Uuid, kind: TransactionType, amount: f64) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date: date!(2024 - 05 - 03),
            kind,
            amount,
            cost_center_id: None,
            subgroup_id: None,
            payment_method_id: None,
            description: String::new(),
            month_ref: MonthRef::new("2024-05").unwrap(),
            user_id,
            credit_sale_id: None,
        }
    }

    fn state(transactions: Vec<Transaction>) -> LedgerState {
        let ledger = shared_test_ledger();
        {
            let mut ledger = ledger.lock().unwrap();
            for transaction in transactions {
                ledger.add_transaction(transaction).unwrap();
            }
        }

        LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn may() -> Query<DashboardQuery> {
        Query(DashboardQuery {
            month: Some("2024-05".to_owned()),
        })
    }

    #[tokio::test]
    async fn shows_net_of_own_transactions_only() {
        let state = state(vec![
            transaction(ANA, TransactionType::Entry, 500.0),
            transaction(ANA, TransactionType::Exit, 150.0),
            transaction(BIA, TransactionType::Exit, 999.0),
        ]);

        let response = get_dashboard_page(State(state), Extension(manager()), may())
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(element_texts(&document, "[data-entries]"), ["R$500.00"]);
        assert_eq!(element_texts(&document, "[data-exits]"), ["R$150.00"]);
        assert_eq!(element_texts(&document, "[data-net]"), ["R$350.00"]);
        assert_eq!(element_texts(&document, "[data-cost-center-total] h4"), ["Other"]);
    }

    #[tokio::test]
    async fn empty_month_shows_empty_state() {
        let state = state(vec![transaction(BIA, TransactionType::Entry, 10.0)]);

        let response = get_dashboard_page(State(state), Extension(manager()), may())
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        let empty_state = Selector::parse("[data-empty-state]").unwrap();
        assert!(document.select(&empty_state).next().is_some());
        assert_eq!(element_texts(&document, "[data-net]"), ["R$0.00"]);
    }

    #[tokio::test]
    async fn master_is_forbidden() {
        let result =
            get_dashboard_page(State(state(vec![])), Extension(User::seed_master()), may()).await;

        assert_eq!(result.err(), Some(Error::Forbidden));
    }
}
