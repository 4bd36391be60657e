//! Credit sale editing page and endpoint.

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    credit_sale::{
        CreditSale, CreditSaleForm, build_credit_sale,
        form::{CreditSaleFormDefaults, credit_sale_form_fields},
    },
    database_id::CreditSaleId,
    endpoints::{self, format_endpoint},
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, link, submit_button},
    month::with_month,
    navigation::NavBar,
    snapshot::Snapshot,
    user::{Role, User},
};

/// The credit sale `id` if `user` owns it.
pub(super) fn owned_sale<'a>(
    snapshot: &'a Snapshot,
    id: CreditSaleId,
    user: &User,
) -> Result<&'a CreditSale, Error> {
    snapshot
        .credit_sale(id)
        .filter(|sale| sale.user_id == user.id)
        .ok_or(Error::NotFound)
}

fn edit_credit_sale_view(role: Role, sale: &CreditSale, snapshot: &Snapshot) -> Markup {
    let edit_url = format_endpoint(endpoints::EDIT_CREDIT_SALE_VIEW, sale.id);
    let update_url = format_endpoint(endpoints::CREDIT_SALE, sale.id);
    let nav_bar = NavBar::new(&edit_url, role).into_html();
    let cancel_url = with_month(endpoints::CREDIT_SALES_VIEW, &sale.month_ref);
    let defaults = CreditSaleFormDefaults::from_sale(sale);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Credit Sale" }

                (credit_sale_form_fields(&defaults, snapshot))

                (submit_button("Update Credit Sale"))

                p class="text-sm" { (link(&cancel_url, "Back to credit sales")) }
            }
        }
    };

    base("Edit Credit Sale", &[currency_input_styles()], &content)
}

/// Renders the page for editing one of the logged in store's credit sales.
pub async fn get_edit_credit_sale_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(sale_id): Path<CreditSaleId>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;
    let snapshot = ledger.snapshot();
    let sale = owned_sale(snapshot, sale_id, &user)?;

    Ok(edit_credit_sale_view(user.role, sale, snapshot).into_response())
}

/// Replaces a credit sale and brings its down payment transaction in line with it.
///
/// The sale keeps its ID and owner. A down payment that is set to zero
/// removes the transaction.
pub async fn edit_credit_sale_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Path(sale_id): Path<CreditSaleId>,
    Form(form): Form<CreditSaleForm>,
) -> Response {
    if let Err(error) = require_store_user(&user) {
        return error.into_alert_response();
    }

    let redirect_url = with_month(endpoints::CREDIT_SALES_VIEW, &form.month_ref);

    let mut ledger = match state.ledger.lock() {
        Ok(ledger) => ledger,
        Err(error) => {
            tracing::error!("could not acquire ledger lock: {error}");
            return Error::LedgerLockError.into_alert_response();
        }
    };

    let built = owned_sale(ledger.snapshot(), sale_id, &user).and_then(|existing| {
        build_credit_sale(form, Some(existing), user.id, ledger.snapshot())
    });

    let (sale, transaction) = match built {
        Ok(built) => built,
        Err(error) => {
            tracing::error!("could not update credit sale {sale_id}: {error}");
            return error.into_alert_response();
        }
    };

    match ledger.save_credit_sale(sale, transaction) {
        Ok(()) => (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response(),
        Err(error) => {
            tracing::error!("could not update credit sale {sale_id}: {error}");
            error.into_alert_response()
        }
    }
}
