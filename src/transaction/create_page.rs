//! Defines the route handler for the page for creating a new transaction.

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
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, link, submit_button},
    month::{MonthRef, with_month},
    navigation::NavBar,
    snapshot::Snapshot,
    timezone::{local_offset, today},
    transaction::{
        TransactionType,
        form::{TransactionFormDefaults, transaction_form_fields},
        transactions_page::DAILY_BILL_PRESET,
    },
    user::{Role, User},
};

/// The description the daily bill shortcut fills in.
pub const DAILY_BILL_DESCRIPTION: &str = "Daily bill payment";

#[derive(Debug, Default, Deserialize)]
pub struct NewTransactionQuery {
    pub month: Option<String>,
    /// Set to [DAILY_BILL_PRESET] to prefill the form for a daily bill.
    pub preset: Option<String>,
}

fn create_transaction_view(
    role: Role,
    defaults: &TransactionFormDefaults<'_>,
    snapshot: &Snapshot,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW, role).into_html();
    let cancel_url = with_month(endpoints::TRANSACTIONS_VIEW, defaults.month_ref);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Filed under " (defaults.month_ref.label()) "."
                }

                (transaction_form_fields(defaults, snapshot))

                (submit_button("Create Transaction"))

                p class="text-sm" { (link(&cancel_url, "Back to transactions")) }
            }
        }
    };

    base("Create Transaction", &[currency_input_styles()], &content)
}

/// Renders the page for creating a transaction.
///
/// The date defaults to today and the month to the one in the query string.
pub async fn get_create_transaction_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Query(query): Query<NewTransactionQuery>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let local_offset = local_offset(&state.local_timezone)?;
    let month = MonthRef::from_query(query.month.as_deref(), local_offset);
    let is_daily_bill = query.preset.as_deref() == Some(DAILY_BILL_PRESET);

    let defaults = TransactionFormDefaults {
        kind: TransactionType::Exit,
        amount: None,
        date: today(local_offset),
        description: if is_daily_bill {
            DAILY_BILL_DESCRIPTION
        } else {
            ""
        },
        cost_center_id: None,
        subgroup_id: None,
        payment_method_id: None,
        month_ref: &month,
    };

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    Ok(create_transaction_view(user.role, &defaults, ledger.snapshot()).into_response())
}
