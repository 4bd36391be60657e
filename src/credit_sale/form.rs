//! The fields shared by the create and edit credit sale pages.

use maud::{Markup, html};
use time::Date;

use crate::{
    credit_sale::CreditSale,
    database_id::PaymentMethodId,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    month::MonthRef,
    snapshot::Snapshot,
};

/// The values the form fields start with.
pub struct CreditSaleFormDefaults<'a> {
    pub client_name: &'a str,
    pub client_code: &'a str,
    pub total_amount: Option<f64>,
    pub down_payment: Option<f64>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub sale_date: Date,
    pub month_ref: &'a MonthRef,
}

impl<'a> CreditSaleFormDefaults<'a> {
    /// An empty form for a sale made on `sale_date`.
    pub fn new(sale_date: Date, month_ref: &'a MonthRef) -> Self {
        Self {
            client_name: "",
            client_code: "",
            total_amount: None,
            down_payment: None,
            payment_method_id: None,
            sale_date,
            month_ref,
        }
    }

    pub fn from_sale(sale: &'a CreditSale) -> Self {
        Self {
            client_name: &sale.client_name,
            client_code: &sale.client_code,
            total_amount: Some(sale.total_amount),
            down_payment: Some(sale.down_payment),
            payment_method_id: sale.payment_method_id,
            sale_date: sale.sale_date,
            month_ref: &sale.month_ref,
        }
    }
}

fn amount_input(name: &str, label: &str, value: Option<f64>, required: bool) -> Markup {
    let value = value.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name=(name)
                    id=(name)
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required[required]
                    value=[value]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

pub fn credit_sale_form_fields(
    defaults: &CreditSaleFormDefaults<'_>,
    snapshot: &Snapshot,
) -> Markup {
    html! {
        input type="hidden" name="month_ref" value=(defaults.month_ref);

        div
        {
            label for="client_name" class=(FORM_LABEL_STYLE) { "Client name" }

            input
                name="client_name"
                id="client_name"
                type="text"
                placeholder="Client name"
                value=(defaults.client_name)
                required
                autofocus
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="client_code" class=(FORM_LABEL_STYLE) { "Client code" }

            input
                name="client_code"
                id="client_code"
                type="text"
                placeholder="Optional"
                value=(defaults.client_code)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        (amount_input("total_amount", "Total amount", defaults.total_amount, true))

        (amount_input("down_payment", "Down payment", defaults.down_payment, false))

        div
        {
            label for="payment_method_id" class=(FORM_LABEL_STYLE) { "Down payment method" }

            select name="payment_method_id" id="payment_method_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "None" }

                @for method in &snapshot.payment_methods {
                    option
                        value=(method.id)
                        selected[defaults.payment_method_id == Some(method.id)]
                    {
                        (method.name)
                    }
                }
            }

            p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
            {
                "A down payment is recorded as an entry under the first cost center."
            }
        }

        div
        {
            label for="sale_date" class=(FORM_LABEL_STYLE) { "Sale date" }

            input
                name="sale_date"
                id="sale_date"
                type="date"
                value=(defaults.sale_date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
