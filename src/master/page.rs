//! The landing page of master users.

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
    auth::require_master,
    dashboard::{StoreSummary, owned_in_month, store_overview, store_summaries},
    database_id::UserId,
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, month_selector},
    master::stores_table::stores_table,
    month::MonthRef,
    navigation::NavBar,
    snapshot::Snapshot,
    timezone::local_offset,
    transaction::{
        TransactionQuery, TransactionTableRow, filter_form, net_total_view, transactions_table,
    },
    user::User,
};

/// The store selected on the master panel, read from the same query string
/// as the transaction filters.
#[derive(Debug, Default, Deserialize)]
pub struct StoreQuery {
    pub store: Option<UserId>,
}

/// The selected store's overview and its transactions matching the filters.
fn store_report(
    store: &User,
    month: &MonthRef,
    filter: &TransactionQuery,
    snapshot: &Snapshot,
) -> (Markup, Vec<HeadElement>) {
    let overview = store_overview(
        snapshot,
        store.id,
        month,
        html! {
            p class="text-center text-gray-500 dark:text-gray-400" data-empty-state="true"
            {
                (store.store_name) " has no transactions in " (month.label()) "."
            }
        },
    );

    let mut transactions = filter.apply(owned_in_month(&snapshot.transactions, store.id, month));
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    let rows = transactions
        .iter()
        .map(|transaction| TransactionTableRow::new(transaction, snapshot))
        .collect::<Vec<_>>();

    let empty_message = if filter.is_filtering() {
        html! { "No transactions match the filters." }
    } else {
        html! { "No transactions in " (month.label()) "." }
    };

    let hidden = [("store", store.id.to_string())];

    let content = html! {
        section class="w-full space-y-6" aria-label="Store report"
        {
            h2 class="text-xl font-bold" data-selected-store=(store.id)
            {
                (store.store_name)
            }

            (overview.content)

            div class="space-y-4" data-report="true"
            {
                h3 class="text-xl font-semibold" { "Transactions" }

                (filter_form(endpoints::MASTER_VIEW, month, filter, snapshot, &hidden))
                (net_total_view(&transactions))
                (transactions_table(&rows, false, &empty_message))
            }
        }
    };

    (content, overview.head_elements)
}

fn master_view(
    user: &User,
    month: &MonthRef,
    stores: &[StoreSummary],
    selected: Option<&User>,
    report: Option<Markup>,
    head_elements: &[HeadElement],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::MASTER_VIEW, user.role).into_html();
    let hidden = selected
        .map(|store| vec![("store", store.id.to_string())])
        .unwrap_or_default();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full space-y-8 lg:max-w-6xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { "Stores" }
                        p class="text-sm text-gray-600 dark:text-gray-400" { (month.label()) }
                    }

                    (month_selector(endpoints::MASTER_VIEW, month, &hidden))
                }

                (stores_table(stores, month, selected.map(|store| store.id)))

                @if let Some(report) = report {
                    (report)
                } @else if !stores.is_empty() {
                    p class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Select a store to see its dashboard and transactions."
                    }
                }
            }
        }
    };

    base("Master panel", head_elements, &content)
}

/// Display every store's totals for the month and, when a store is selected,
/// that store's overview and filtered transactions, newest first.
pub async fn get_master_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Query(filter): Query<TransactionQuery>,
    Query(selection): Query<StoreQuery>,
) -> Result<Response, Error> {
    require_master(&user)?;

    let month = MonthRef::from_query(filter.month.as_deref(), local_offset(&state.local_timezone)?);

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;
    let snapshot = ledger.snapshot();

    let stores = store_summaries(snapshot, &month);

    let selected = match selection.store {
        None => None,
        Some(store_id) => match snapshot.user(store_id) {
            Some(store) if !store.is_master() => Some(store),
            _ => {
                tracing::debug!("master panel requested unknown store {store_id}");
                return Err(Error::NotFound);
            }
        },
    };

    let (report, head_elements) = match selected {
        Some(store) => {
            let (report, head_elements) = store_report(store, &month, &filter, snapshot);
            (Some(report), head_elements)
        }
        None => (None, Vec::new()),
    };

    Ok(master_view(&user, &month, &stores, selected, report, &head_elements).into_response())
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
        transaction::{Transaction, TransactionQuery, TransactionType},
        user::{Role, User},
    };

    use super::{StoreQuery, get_master_page};

    const ANA: Uuid = Uuid::from_u128(42);
    const BIA: Uuid = Uuid::from_u128(43);

    fn store_user(id: Uuid, store_name: &str, username: &str) -> User {
        User {
            id,
            store_name: store_name.to_owned(),
            username: username.to_owned(),
            role: Role::Manager,
            ..User::seed_master()
        }
    }

    fn transaction(
        user_id: Uuid,
        day: u8,
        kind: TransactionType,
        amount: f64,
        description: &str,
    ) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date: date!(2024 - 05 - 01).replace_day(day).unwrap(),
            kind,
            amount,
            cost_center_id: None,
            subgroup_id: None,
            payment_method_id: None,
            description: description.to_owned(),
            month_ref: MonthRef::new("2024-05").unwrap(),
            user_id,
            credit_sale_id: None,
        }
    }

    fn state() -> LedgerState {
        let ledger = shared_test_ledger();
        {
            let mut ledger = ledger.lock().unwrap();
            ledger.add_user(store_user(ANA, "Loja Centro", "ana")).unwrap();
            ledger.add_user(store_user(BIA, "Loja Norte", "bia")).unwrap();
            for transaction in [
                transaction(ANA, 3, TransactionType::Entry, 500.0, "Vendas"),
                transaction(ANA, 10, TransactionType::Exit, 150.0, "Aluguel"),
                transaction(ANA, 7, TransactionType::Exit, 20.0, "Café"),
                transaction(BIA, 4, TransactionType::Exit, 80.0, "Luz"),
            ] {
                ledger.add_transaction(transaction).unwrap();
            }
        }

        LedgerState {
            ledger,
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn may(kind: Option<TransactionType>) -> Query<TransactionQuery> {
        Query(TransactionQuery {
            month: Some("2024-05".to_owned()),
            kind,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn lists_every_store_with_its_totals() {
        let response = get_master_page(
            State(state()),
            Extension(User::seed_master()),
            may(None),
            Query(StoreQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(
            element_texts(&document, "[data-store] th a"),
            ["Loja Centro", "Loja Norte"]
        );
        assert_eq!(
            element_texts(&document, "[data-store-balance]"),
            ["R$330.00", "-R$80.00"]
        );
        assert_eq!(element_texts(&document, "[data-store-count]"), ["3", "1"]);
        assert!(element_texts(&document, "[data-report]").is_empty());
    }

    #[tokio::test]
    async fn selected_store_shows_its_transactions_newest_first() {
        let response = get_master_page(
            State(state()),
            Extension(User::seed_master()),
            may(None),
            Query(StoreQuery { store: Some(ANA) }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_eq!(element_texts(&document, "[data-selected-store]"), ["Loja Centro"]);
        assert_eq!(
            element_texts(&document, "[data-report] tbody tr td:nth-child(6)"),
            ["Aluguel", "Café", "Vendas"]
        );
        assert_eq!(element_texts(&document, "[data-report] [data-net-total]"), ["R$330.00"]);
        assert_eq!(element_texts(&document, "[data-net]"), ["R$330.00"]);
    }

    #[tokio::test]
    async fn report_applies_filters() {
        let response = get_master_page(
            State(state()),
            Extension(User::seed_master()),
            may(Some(TransactionType::Exit)),
            Query(StoreQuery { store: Some(ANA) }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        assert_eq!(
            element_texts(&document, "[data-report] tbody tr td:nth-child(6)"),
            ["Aluguel", "Café"]
        );
        assert_eq!(element_texts(&document, "[data-report] [data-net-total]"), ["-R$170.00"]);
    }

    #[tokio::test]
    async fn month_selector_keeps_selected_store() {
        let response = get_master_page(
            State(state()),
            Extension(User::seed_master()),
            may(None),
            Query(StoreQuery { store: Some(BIA) }),
        )
        .await
        .unwrap();

        let document = parse_html_document(response).await;
        let hidden = Selector::parse("header input[name=store]").unwrap();
        let value = document
            .select(&hidden)
            .next()
            .and_then(|input| input.value().attr("value"));
        assert_eq!(value, Some(BIA.to_string().as_str()));
    }

    #[tokio::test]
    async fn unknown_or_master_store_is_not_found() {
        for store in [Uuid::from_u128(99), User::seed_master().id] {
            let result = get_master_page(
                State(state()),
                Extension(User::seed_master()),
                may(None),
                Query(StoreQuery { store: Some(store) }),
            )
            .await;

            assert_eq!(result.err(), Some(Error::NotFound), "store {store}");
        }
    }

    #[tokio::test]
    async fn store_users_are_forbidden() {
        let result = get_master_page(
            State(state()),
            Extension(store_user(ANA, "Loja Centro", "ana")),
            may(None),
            Query(StoreQuery::default()),
        )
        .await;

        assert_eq!(result.err(), Some(Error::Forbidden));
    }
}
