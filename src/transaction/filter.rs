//! Narrowing down a list of transactions and the form for choosing the filters.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    database_id::{CostCenterId, PaymentMethodId},
    html::{BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE},
    month::MonthRef,
    snapshot::Snapshot,
    transaction::{Transaction, TransactionType},
};

/// The query string of the pages that list transactions.
///
/// Every filter is optional. The date range only applies when both ends are given.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TransactionQuery {
    /// The selected month, see [MonthRef::from_query].
    pub month: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub cost_center_id: Option<CostCenterId>,
    pub payment_method_id: Option<PaymentMethodId>,
    /// Case-insensitive text to look for in descriptions.
    pub search: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

impl TransactionQuery {
    fn search_text(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|search| !search.is_empty())
            .map(str::to_lowercase)
    }

    fn date_range(&self) -> Option<(Date, Date)> {
        self.start_date.zip(self.end_date)
    }

    /// Whether any filter other than the month is set.
    pub fn is_filtering(&self) -> bool {
        self.kind.is_some()
            || self.cost_center_id.is_some()
            || self.payment_method_id.is_some()
            || self.search_text().is_some()
            || self.date_range().is_some()
    }

    /// Keep the transactions that pass every filter, in their original order.
    pub fn apply<'a>(&self, transactions: Vec<&'a Transaction>) -> Vec<&'a Transaction> {
        let search = self.search_text();
        let date_range = self.date_range();

        transactions
            .into_iter()
            .filter(|transaction| self.kind.is_none_or(|kind| transaction.kind == kind))
            .filter(|transaction| {
                self.cost_center_id
                    .is_none_or(|id| transaction.cost_center_id == Some(id))
            })
            .filter(|transaction| {
                self.payment_method_id
                    .is_none_or(|id| transaction.payment_method_id == Some(id))
            })
            .filter(|transaction| {
                search.as_ref().is_none_or(|search| {
                    transaction.description.to_lowercase().contains(search)
                })
            })
            .filter(|transaction| {
                date_range
                    .is_none_or(|(start, end)| (start..=end).contains(&transaction.date))
            })
            .collect()
    }
}

/// The sum of entries minus the sum of exits.
pub fn net_total(transactions: &[&Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| transaction.signed_amount())
        .sum()
}

/// A GET form that reloads `path` with the chosen filters.
///
/// `hidden` carries query parameters that must survive a filter change, e.g. the selected store.
pub fn filter_form(
    path: &str,
    month: &MonthRef,
    query: &TransactionQuery,
    snapshot: &Snapshot,
    hidden: &[(&str, String)],
) -> Markup {
    let search = query.search.as_deref().unwrap_or_default();
    let clear_url = {
        let mut params = vec![("month", month.to_string())];
        params.extend(hidden.iter().map(|(name, value)| (*name, value.clone())));

        match serde_urlencoded::to_string(&params) {
            Ok(params) => format!("{path}?{params}"),
            Err(error) => {
                tracing::error!("could not encode filter parameters: {error}");
                path.to_owned()
            }
        }
    };

    html! {
        form
            method="get"
            action=(path)
            class="grid grid-cols-1 gap-3 w-full md:grid-cols-3 lg:grid-cols-4"
            aria-label="Filters"
        {
            input type="hidden" name="month" value=(month);

            @for (name, value) in hidden {
                input type="hidden" name=(name) value=(value);
            }

            div
            {
                label for="filter-type" class=(FORM_LABEL_STYLE) { "Type" }

                select id="filter-type" name="type" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All" }

                    @for kind in [TransactionType::Entry, TransactionType::Exit] {
                        option value=(kind) selected[query.kind == Some(kind)] { (kind.label()) }
                    }
                }
            }

            div
            {
                label for="filter-cost-center" class=(FORM_LABEL_STYLE) { "Cost center" }

                select id="filter-cost-center" name="cost_center_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All" }

                    @for center in &snapshot.cost_centers {
                        option
                            value=(center.id)
                            selected[query.cost_center_id == Some(center.id)]
                        {
                            (center.name)
                        }
                    }
                }
            }

            div
            {
                label for="filter-payment-method" class=(FORM_LABEL_STYLE) { "Payment method" }

                select
                    id="filter-payment-method"
                    name="payment_method_id"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "All" }

                    @for method in &snapshot.payment_methods {
                        option
                            value=(method.id)
                            selected[query.payment_method_id == Some(method.id)]
                        {
                            (method.name)
                        }
                    }
                }
            }

            div
            {
                label for="filter-search" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    id="filter-search"
                    name="search"
                    type="search"
                    placeholder="Search descriptions"
                    value=(search)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-start-date" class=(FORM_LABEL_STYLE) { "From" }

                input
                    id="filter-start-date"
                    name="start_date"
                    type="date"
                    value=[query.start_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-end-date" class=(FORM_LABEL_STYLE) { "To" }

                input
                    id="filter-end-date"
                    name="end_date"
                    type="date"
                    value=[query.end_date]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-end gap-4"
            {
                button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Apply filters" }

                @if query.is_filtering() {
                    a href=(clear_url) class=(LINK_STYLE) { "Clear" }
                }
            }
        }
    }
}
