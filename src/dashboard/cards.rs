//! Card components for the month's totals and cost center breakdown.

use maud::{Markup, html};

use crate::{
    dashboard::aggregation::{CostCenterTotal, Summary},
    html::format_currency,
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

/// Formats a percentage value, avoiding "-0%" display.
fn format_percentage(value: f64) -> String {
    let rounded = value.round();
    if rounded.abs() < 0.5 {
        "0".to_string()
    } else {
        format!("{:.0}", rounded)
    }
}

fn amount_colour(amount: f64) -> &'static str {
    if amount >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    }
}

/// Three cards with the month's entries, exits and net result.
pub(super) fn summary_cards(summary: &Summary) -> Markup {
    html! {
        section class="w-full grid grid-cols-1 sm:grid-cols-3 gap-4" aria-label="Month totals"
        {
            div class=(CARD_STYLE)
            {
                h3 class="text-sm text-gray-600 dark:text-gray-400" { "Entries" }
                div class="text-2xl font-bold text-green-600 dark:text-green-400" data-entries="true"
                {
                    (format_currency(summary.entries))
                }
            }

            div class=(CARD_STYLE)
            {
                h3 class="text-sm text-gray-600 dark:text-gray-400" { "Exits" }
                div class="text-2xl font-bold text-red-600 dark:text-red-400" data-exits="true"
                {
                    (format_currency(summary.exits))
                }
            }

            div class=(CARD_STYLE)
            {
                h3 class="text-sm text-gray-600 dark:text-gray-400" { "Net result" }
                div class={ "text-2xl font-bold " (amount_colour(summary.net())) } data-net="true"
                {
                    (format_currency(summary.net()))
                }
                p class="text-xs text-gray-500 dark:text-gray-400"
                {
                    (summary.count) " transactions"
                }
            }
        }
    }
}

/// Renders a horizontal progress bar showing a share of the month's total.
fn progress_bar(percentage: f64) -> Markup {
    let clamped = percentage.clamp(0.0, 100.0);

    // Ensure minimum 3% width so rounded corners are visible
    let display_percentage = if clamped > 0.0 && clamped < 3.0 {
        3.0
    } else {
        clamped
    };

    html! {
        div
            class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5 mb-2"
            role="progressbar"
            aria-valuenow=(format_percentage(clamped))
            aria-valuemin="0"
            aria-valuemax="100"
        {
            @if clamped > 0.0 {
                div
                    class="bg-blue-600 dark:bg-blue-500 h-2.5 rounded-full transition-all"
                    style=(format!("width: {:.1}%", display_percentage))
                {}
            }
        }
    }
}

/// One card per cost center with its share of the month's amounts.
pub(super) fn breakdown_cards(breakdown: &[CostCenterTotal]) -> Markup {
    let total: f64 = breakdown.iter().map(|total| total.amount).sum();

    html! {
        section class="w-full" aria-label="Cost centers"
        {
            h3 class="text-xl font-semibold mb-4" { "By cost center" }

            div class="grid grid-cols-1 sm:grid-cols-2 md:grid-cols-3 lg:grid-cols-4 gap-4"
            {
                @for cost_center in breakdown {
                    @let percentage = if total > 0.0 { cost_center.amount / total * 100.0 } else { 0.0 };

                    div class=(CARD_STYLE) data-cost-center-total=(cost_center.name)
                    {
                        h4 class="text-lg font-semibold mb-3 truncate" title=(cost_center.name)
                        {
                            (cost_center.name)
                        }

                        div class="text-2xl font-bold mb-1" { (format_currency(cost_center.amount)) }

                        div class="text-sm text-gray-600 dark:text-gray-400 mb-2"
                        {
                            (format_percentage(percentage)) "% of the month"
                        }

                        (progress_bar(percentage))
                    }
                }
            }
        }
    }
}
