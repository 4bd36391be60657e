//! The month's totals of every store, one row per store.

use maud::{Markup, html};

use crate::{
    dashboard::StoreSummary,
    database_id::UserId,
    endpoints,
    html::{LINK_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    month::MonthRef,
};

/// The master panel URL showing `store_id` in `month`.
pub(super) fn store_url(store_id: UserId, month: &MonthRef) -> String {
    let params = [("month", month.to_string()), ("store", store_id.to_string())];

    match serde_urlencoded::to_string(params) {
        Ok(query) => format!("{}?{query}", endpoints::MASTER_VIEW),
        Err(error) => {
            tracing::error!("could not encode store parameters: {error}");
            endpoints::MASTER_VIEW.to_owned()
        }
    }
}

fn balance_style(balance: f64) -> &'static str {
    if balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    }
}

pub(super) fn stores_table(
    stores: &[StoreSummary],
    month: &MonthRef,
    selected: Option<UserId>,
) -> Markup {
    html! {
        section class="w-full" aria-label="Stores"
        {
            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Store" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Manager" }
                            th scope="col" class="px-6 py-3 text-right" { "Entries" }
                            th scope="col" class="px-6 py-3 text-right" { "Exits" }
                            th scope="col" class="px-6 py-3 text-right" { "Balance" }
                            th scope="col" class="px-6 py-3 text-right" { "Transactions" }
                        }
                    }

                    tbody
                    {
                        @for store in stores {
                            @let balance = store.summary.net();

                            tr
                                class={
                                    (TABLE_ROW_STYLE)
                                    @if selected == Some(store.user.id) { " font-semibold" }
                                }
                                data-store=(store.user.id)
                            {
                                th scope="row" class="px-6 py-4 whitespace-nowrap"
                                {
                                    a href=(store_url(store.user.id, month)) class=(LINK_STYLE)
                                    {
                                        (store.user.store_name)
                                    }

                                    @if !store.user.active {
                                        " "
                                        span class="text-xs text-gray-500" { "(inactive)" }
                                    }
                                }
                                td class=(TABLE_CELL_STYLE) { (store.user.admin_name) }
                                td class="px-6 py-4 text-right tabular-nums" data-store-entries="true"
                                {
                                    (format_currency(store.summary.entries))
                                }
                                td class="px-6 py-4 text-right tabular-nums" data-store-exits="true"
                                {
                                    (format_currency(store.summary.exits))
                                }
                                td
                                    class={ "px-6 py-4 text-right tabular-nums " (balance_style(balance)) }
                                    data-store-balance="true"
                                {
                                    (format_currency(balance))
                                }
                                td class="px-6 py-4 text-right tabular-nums" data-store-count="true"
                                {
                                    (store.summary.count)
                                }
                            }
                        }

                        @if stores.is_empty() {
                            tr
                            {
                                td colspan="6" class="px-6 py-4 text-center"
                                {
                                    "No stores yet. "
                                    a href=(endpoints::USERS_VIEW) class=(LINK_STYLE) { "Add a user" }
                                    " to start a store."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
