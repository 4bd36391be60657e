//! Credit sale creation page and endpoint.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, Query};
use axum_htmx::HxRedirect;
use maud::{Markup, html};

use crate::{
    Error,
    app_state::LedgerState,
    auth::require_store_user,
    credit_sale::{
        CreditSaleForm, build_credit_sale,
        form::{CreditSaleFormDefaults, credit_sale_form_fields},
        list::CreditSaleQuery,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base, currency_input_styles, link, submit_button},
    month::{MonthRef, with_month},
    navigation::NavBar,
    snapshot::Snapshot,
    timezone::{local_offset, today},
    user::{Role, User},
};

fn create_credit_sale_view(
    role: Role,
    defaults: &CreditSaleFormDefaults<'_>,
    snapshot: &Snapshot,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CREDIT_SALE_VIEW, role).into_html();
    let cancel_url = with_month(endpoints::CREDIT_SALES_VIEW, defaults.month_ref);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::CREDIT_SALES_API)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Credit Sale" }

                (credit_sale_form_fields(defaults, snapshot))

                (submit_button("Create Credit Sale"))

                p class="text-sm" { (link(&cancel_url, "Back to credit sales")) }
            }
        }
    };

    base("Create Credit Sale", &[currency_input_styles()], &content)
}

/// Renders the page for creating a credit sale in the selected month.
pub async fn get_create_credit_sale_page(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
    Query(query): Query<CreditSaleQuery>,
) -> Result<Response, Error> {
    require_store_user(&user)?;

    let local_offset = local_offset(&state.local_timezone)?;
    let month = MonthRef::from_query(query.month.as_deref(), local_offset);
    let defaults = CreditSaleFormDefaults::new(today(local_offset), &month);

    let ledger = state
        .ledger
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire ledger lock: {error}"))
        .map_err(|_| Error::LedgerLockError)?;

    Ok(create_credit_sale_view(user.role, &defaults, ledger.snapshot()).into_response())
}

/// Creates a credit sale and, if it has a down payment, its entry transaction.
pub async fn create_credit_sale_endpoint(
    State(state): State<LedgerState>,
    Extension(user): Extension<User>,
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

    let (sale, transaction) = match build_credit_sale(form, None, user.id, ledger.snapshot()) {
        Ok(built) => built,
        Err(error) => {
            tracing::error!("invalid credit sale form: {error}");
            return error.into_alert_response();
        }
    };

    if let Err(error) = ledger.save_credit_sale(sale, transaction) {
        tracing::error!("could not create credit sale: {error}");
        return error.into_alert_response();
    }

    (HxRedirect(redirect_url), StatusCode::SEE_OTHER).into_response()
}
