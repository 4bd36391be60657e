//! Defines the route handler for the page for editing a transaction.

use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, link, submit_button},
    month::with_month,
    navigation::NavBar,
    snapshot::Snapshot,
    transaction::{
        Transaction, editable_transaction,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
    user::{Role, User},
};

fn edit_transaction_view(role: Role, transaction: &Transaction, snapshot: &Snapshot) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let update_url = format_endpoint(endpoints::TRANSACTION, transaction.id);
    let nav_bar = NavBar::new(&edit_url, role).into_html();
    let cancel_url = with_month(endpoints::TRANSACTIONS_VIEW, &transaction.month_ref);
    let defaults = TransactionFormDefaults::from_transaction(transaction);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Transaction" }

                (transaction_form_fields(&defaults, snapshot))

                (submit_button("Update Transaction"))

                p class="text-sm" { (link(&cancel_url, "Back to transactions")) }
            }
        }
    };

    base("Edit Transaction", &[currency_input_styles()], &content)
}

/// Renders the page for editing one of the logged in store's transactions.
///
/// Down payments of credit sales redirect to the page for editing their sale.
pub async fn get_edit_transaction_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;
    let snapshot = ledger.snapshot();

    match editable_transaction(snapshot, transaction_id, user.id) {
        Ok(transaction) => {
            Ok(edit_transaction_view(user.role, transaction, snapshot).into_response())
        }
        Err(Error::LinkedTransaction) => {
            let sale_url = snapshot
                .transaction(transaction_id)
                .and_then(|transaction| {
                    transaction.credit_sale_id.map(|sale_id| {
                        with_month(
                            &format_endpoint(endpoints::EDIT_CREDIT_SALE_VIEW, sale_id),
                            &transaction.month_ref,
                        )
                    })
                })
                .unwrap_or_else(|| endpoints::CREDIT_SALES_VIEW.to_owned());

            Ok(Redirect::to(&sale_url).into_response())
        }
        Err(error) => Err(error),
    }
}
