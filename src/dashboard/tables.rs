//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::MonthSummary,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    month::MonthRef,
};

const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Gets the CSS class for coloring amounts (green for positive, red for negative).
fn amount_color_class(amount: f64) -> &'static str {
    if amount >= 0.0 {
        TABLE_CELL_GREEN_STYLE
    } else {
        TABLE_CELL_RED_STYLE
    }
}

/// A row per month with its entries, exits and net result, newest first.
///
/// The row for `selected` is highlighted.
pub(super) fn history_table(history: &[MonthSummary], selected: &MonthRef) -> Markup {
    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { "Monthly history" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            th scope="col" class="px-6 py-3 text-right" { "Entries" }
                            th scope="col" class="px-6 py-3 text-right" { "Exits" }
                            th scope="col" class="px-6 py-3 text-right" { "Net" }
                        }
                    }

                    tbody
                    {
                        @for month in history.iter().rev() {
                            tr
                                class={
                                    (TABLE_ROW_STYLE)
                                    @if &month.month == selected { " font-semibold" }
                                }
                                data-month=(month.month)
                            {
                                th scope="row" class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                                {
                                    (month.month.label())
                                }
                                td class={ "px-6 py-4 text-right tabular-nums " (TABLE_CELL_GREEN_STYLE) }
                                {
                                    (format_currency(month.summary.entries))
                                }
                                td class={ "px-6 py-4 text-right tabular-nums " (TABLE_CELL_RED_STYLE) }
                                {
                                    (format_currency(month.summary.exits))
                                }
                                td class={ "px-6 py-4 text-right tabular-nums " (amount_color_class(month.summary.net())) }
                                {
                                    (format_currency(month.summary.net()))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
