//! Displays the logged in store's transactions for a month.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    dashboard::{OTHER_COST_CENTER_LABEL, owned_in_month},
    endpoints::{self, format_endpoint},
    html::{
        BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links, format_currency, month_selector,
    },
    month::{MonthRef, with_month},
    navigation::NavBar,
    snapshot::Snapshot,
    timezone::local_offset,
    transaction::{
        Transaction, TransactionType,
        filter::{TransactionQuery, filter_form, net_total},
    },
    user::User,
};

/// The query parameter that prefills the new transaction form for a daily bill.
pub const DAILY_BILL_PRESET: &str = "daily_bill";

/// A transaction as shown in a table row or card.
#[derive(Debug, PartialEq)]
pub struct TransactionTableRow {
    date: Date,
    kind: TransactionType,
    amount: f64,
    cost_center: String,
    payment_method: String,
    description: String,
    is_credit_sale: bool,
    edit_url: String,
    /// Down payments of credit sales are deleted with their sale.
    delete_url: Option<String>,
}

impl TransactionTableRow {
    pub fn new(transaction: &Transaction, snapshot: &Snapshot) -> Self {
        let center = transaction
            .cost_center_id
            .and_then(|id| snapshot.cost_center(id));
        let cost_center = match center {
            None => OTHER_COST_CENTER_LABEL.to_owned(),
            Some(center) => match transaction
                .subgroup_id
                .and_then(|id| center.subgroup(id))
            {
                Some(subgroup) => format!("{} / {}", center.name, subgroup.name),
                None => center.name.clone(),
            },
        };

        let (edit_url, delete_url) = match transaction.credit_sale_id {
            Some(sale_id) => (
                with_month(
                    &format_endpoint(endpoints::EDIT_CREDIT_SALE_VIEW, sale_id),
                    &transaction.month_ref,
                ),
                None,
            ),
            None => (
                format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id),
                Some(format_endpoint(endpoints::TRANSACTION, transaction.id)),
            ),
        };

        Self {
            date: transaction.date,
            kind: transaction.kind,
            amount: transaction.amount,
            cost_center,
            payment_method: snapshot
                .payment_method_name(transaction.payment_method_id)
                .unwrap_or("-")
                .to_owned(),
            description: transaction.description.clone(),
            is_credit_sale: transaction.credit_sale_id.is_some(),
            edit_url,
            delete_url,
        }
    }

    fn signed_amount_str(&self) -> String {
        match self.kind {
            TransactionType::Entry => format_currency(self.amount),
            TransactionType::Exit => format_currency(-self.amount),
        }
    }

    fn amount_style(&self) -> &'static str {
        match self.kind {
            TransactionType::Entry => "text-green-700 dark:text-green-400",
            TransactionType::Exit => "text-red-700 dark:text-red-400",
        }
    }
}

const DATE_ATTRIBUTE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[year]-[month repr:numerical padding:zero]-[day padding:zero]");

fn date_datetime_attr(date: Date) -> String {
    date.format(DATE_ATTRIBUTE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

fn action_links(row: &TransactionTableRow, hx_target: &str, hx_swap: &str) -> Markup {
    match &row.delete_url {
        Some(delete_url) => edit_delete_action_links(
            &row.edit_url,
            delete_url,
            &format!(
                "Are you sure you want to delete the transaction '{}'? This cannot be undone.",
                row.description
            ),
            hx_target,
            hx_swap,
        ),
        None => html! {
            a href=(row.edit_url) class=(LINK_STYLE) { "Edit sale" }
        },
    }
}

fn credit_sale_badge(row: &TransactionTableRow) -> Markup {
    html! {
        @if row.is_credit_sale {
            span class=(BADGE_STYLE) { "Credit sale" }
        }
    }
}

/// The transactions as cards on small screens and a table on large screens.
///
/// `show_actions` adds the edit and delete links. `empty_message` is shown
/// when there are no rows.
pub fn transactions_table(
    rows: &[TransactionTableRow],
    show_actions: bool,
    empty_message: &Markup,
) -> Markup {
    let column_count = if show_actions { 7 } else { 6 };

    html! {
        ul class="lg:hidden space-y-4"
        {
            @for row in rows {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-transaction-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        div class="text-sm font-semibold text-gray-900 dark:text-white"
                        {
                            (row.description) " " (credit_sale_badge(row))
                        }
                        div class={"text-sm tabular-nums text-right " (row.amount_style())}
                        { (row.signed_amount_str()) }
                    }

                    div class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                    {
                        time datetime=(date_datetime_attr(row.date)) { (row.date) }
                        " · " (row.cost_center) " · " (row.payment_method)
                    }

                    @if show_actions {
                        div class="mt-2 flex items-center gap-4 text-sm"
                        {
                            (action_links(row, "closest [data-transaction-card='true']", "outerHTML"))
                        }
                    }
                }
            }

            @if rows.is_empty() {
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
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Cost center" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Payment method" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        @if show_actions {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }
                }

                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE)
                            {
                                time datetime=(date_datetime_attr(row.date)) { (row.date) }
                            }
                            td class=(TABLE_CELL_STYLE) { (row.kind.label()) }
                            td class={"px-6 py-4 text-right tabular-nums " (row.amount_style())}
                            {
                                (row.signed_amount_str())
                            }
                            td class=(TABLE_CELL_STYLE) { (row.cost_center) }
                            td class=(TABLE_CELL_STYLE) { (row.payment_method) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (row.description) " " (credit_sale_badge(row))
                            }
                            @if show_actions {
                                td class=(TABLE_CELL_STYLE)
                                {
                                    div class="flex gap-4" { (action_links(row, "closest tr", "delete")) }
                                }
                            }
                        }
                    }

                    @if rows.is_empty() {
                        tr
                        {
                            td
                                colspan=(column_count)
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

/// The net total of the listed transactions.
pub fn net_total_view(transactions: &[&Transaction]) -> Markup {
    let net = net_total(transactions);
    let style = if net < 0.0 {
        "text-red-700 dark:text-red-400"
    } else {
        "text-green-700 dark:text-green-400"
    };

    html! {
        p class="text-sm"
        {
            "Net total: "
            span class={"font-semibold tabular-nums " (style)} data-net-total="true"
            {
                (format_currency(net))
            }
        }
    }
}

fn daily_bill_url(month: &MonthRef) -> String {
    let params = [("month", month.as_str()), ("preset", DAILY_BILL_PRESET)];

    match serde_urlencoded::to_string(params) {
        Ok(query) => format!("{}?{query}", endpoints::NEW_TRANSACTION_VIEW),
        Err(error) => {
            tracing::error!("could not encode daily bill parameters: {error}");
            endpoints::NEW_TRANSACTION_VIEW.to_owned()
        }
    }
}

fn transactions_view(
    user: &User,
    month: &MonthRef,
    query: &TransactionQuery,
    transactions: &[&Transaction],
    snapshot: &Snapshot,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW, user.role).into_html();
    let new_transaction_url = with_month(endpoints::NEW_TRANSACTION_VIEW, month);
    let rows = transactions
        .iter()
        .map(|transaction| TransactionTableRow::new(transaction, snapshot))
        .collect::<Vec<_>>();
    let empty_message = if query.is_filtering() {
        html! { "No transactions match the filters." }
    } else {
        html! {
            "No transactions in " (month.label()) ". Record one "
            a href=(new_transaction_url) class=(LINK_STYLE) { "here" }
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
                    h1 class="text-xl font-bold" { "Transactions" }

                    (month_selector(endpoints::TRANSACTIONS_VIEW, month, &[]))

                    div class="flex gap-4"
                    {
                        a href=(daily_bill_url(month)) class=(LINK_STYLE) { "Daily bill" }
                        a href=(new_transaction_url) class=(LINK_STYLE) { "New transaction" }
                    }
                }

                (filter_form(endpoints::TRANSACTIONS_VIEW, month, query, snapshot, &[]))

                (net_total_view(transactions))

                (transactions_table(&rows, true, &empty_message))
            }
        }
    };

    base("Transactions", &[], &content)
}

/// Renders the logged in store's transactions for the selected month, newest first.
pub async fn get_transactions_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Query(query): Query<TransactionQuery>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let month = MonthRef::from_query(query.month.as_deref(), local_offset(&state.local_timezone)?);

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;
    let snapshot = ledger.snapshot();

    let mut transactions = query.apply(owned_in_month(&snapshot.transactions, user.id, &month));
    transactions.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(transactions_view(&user, &month, &query, &transactions, snapshot).into_response())
}
