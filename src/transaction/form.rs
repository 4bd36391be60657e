//! The fields shared by the create and edit transaction pages, and the
//! validation of what they submit.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    database_id::{CostCenterId, PaymentMethodId, SubgroupId, TransactionId, UserId, new_id},
    html::{
        FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE,
    },
    month::MonthRef,
    snapshot::Snapshot,
    transaction::{Transaction, TransactionType},
    validation::non_negative,
};

/// The form data for creating or editing a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    pub date: Date,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub cost_center_id: Option<CostCenterId>,
    pub subgroup_id: Option<SubgroupId>,
    pub payment_method_id: Option<PaymentMethodId>,
    #[serde(default)]
    pub description: String,
    /// The month that was selected when the form was opened.
    pub month_ref: MonthRef,
}

/// Turn a submitted form into a transaction owned by `user_id`.
///
/// # Errors
///
/// Returns:
/// - [Error::NegativeAmount] if the amount is negative.
/// - [Error::MissingCostCenter] or [Error::InvalidCostCenter] if the cost center is missing or unknown.
/// - [Error::MissingSubgroup] if the cost center has subgroups and none was chosen.
/// - [Error::InvalidSubgroup] if the subgroup does not belong to the cost center.
/// - [Error::MissingPaymentMethod] or [Error::InvalidPaymentMethod] if the payment method is missing or unknown.
pub fn build_transaction(
    form: TransactionForm,
    id: Option<TransactionId>,
    user_id: UserId,
    snapshot: &Snapshot,
) -> Result<Transaction, Error> {
    let amount = non_negative(form.amount)?;

    let cost_center_id = form.cost_center_id.ok_or(Error::MissingCostCenter)?;
    let cost_center = snapshot
        .cost_center(cost_center_id)
        .ok_or(Error::InvalidCostCenter)?;

    let subgroup_id = match (cost_center.subgroups.is_empty(), form.subgroup_id) {
        (true, _) => None,
        (false, None) => return Err(Error::MissingSubgroup),
        (false, Some(subgroup_id)) => {
            cost_center
                .subgroup(subgroup_id)
                .ok_or(Error::InvalidSubgroup)?;
            Some(subgroup_id)
        }
    };

    let payment_method_id = form.payment_method_id.ok_or(Error::MissingPaymentMethod)?;
    snapshot
        .payment_method(payment_method_id)
        .ok_or(Error::InvalidPaymentMethod)?;

    Ok(Transaction {
        id: id.unwrap_or_else(new_id),
        date: form.date,
        kind: form.kind,
        amount,
        cost_center_id: Some(cost_center_id),
        subgroup_id,
        payment_method_id: Some(payment_method_id),
        description: form.description.trim().to_owned(),
        month_ref: form.month_ref,
        user_id,
        credit_sale_id: None,
    })
}

/// The values the form fields start with.
pub struct TransactionFormDefaults<'a> {
    pub kind: TransactionType,
    pub amount: Option<f64>,
    pub date: Date,
    pub description: &'a str,
    pub cost_center_id: Option<CostCenterId>,
    pub subgroup_id: Option<SubgroupId>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub month_ref: &'a MonthRef,
}

impl<'a> TransactionFormDefaults<'a> {
    /// The values of an existing transaction.
    pub fn from_transaction(transaction: &'a Transaction) -> Self {
        Self {
            kind: transaction.kind,
            amount: Some(transaction.amount),
            date: transaction.date,
            description: &transaction.description,
            cost_center_id: transaction.cost_center_id,
            subgroup_id: transaction.subgroup_id,
            payment_method_id: transaction.payment_method_id,
            month_ref: &transaction.month_ref,
        }
    }
}

pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    snapshot: &Snapshot,
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));
    let centers_with_subgroups = snapshot
        .cost_centers
        .iter()
        .filter(|center| !center.subgroups.is_empty());

    html! {
        input type="hidden" name="month_ref" value=(defaults.month_ref);

        fieldset class="space-y-2"
        {
            legend class=(FORM_LABEL_STYLE) { "Transaction type" }

            div class=(FORM_RADIO_GROUP_STYLE)
            {
                @for kind in [TransactionType::Entry, TransactionType::Exit] {
                    @let id = format!("transaction-type-{}", kind.label().to_lowercase());

                    div class="flex items-center gap-3"
                    {
                        input
                            name="type"
                            id=(id)
                            type="radio"
                            value=(kind)
                            checked[defaults.kind == kind]
                            required
                            tabindex="0"
                            class=(FORM_RADIO_INPUT_STYLE);

                        label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (kind.label()) }
                    }
                }
            }
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            // w-full needed to ensure input takes the full width when prefilled with a value
            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    autofocus
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="cost_center_id" class=(FORM_LABEL_STYLE) { "Cost center" }

            select
                name="cost_center_id"
                id="cost_center_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a cost center" }

                @for center in &snapshot.cost_centers {
                    option
                        value=(center.id)
                        selected[defaults.cost_center_id == Some(center.id)]
                    {
                        (center.name)
                    }
                }
            }
        }

        div
        {
            label for="subgroup_id" class=(FORM_LABEL_STYLE) { "Subgroup" }

            select name="subgroup_id" id="subgroup_id" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "None" }

                @for center in centers_with_subgroups {
                    optgroup label=(center.name)
                    {
                        @for subgroup in &center.subgroups {
                            option
                                value=(subgroup.id)
                                selected[defaults.subgroup_id == Some(subgroup.id)]
                            {
                                (subgroup.name)
                            }
                        }
                    }
                }
            }

            p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
            {
                "Required when the cost center has subgroups."
            }
        }

        div
        {
            label for="payment_method_id" class=(FORM_LABEL_STYLE) { "Payment method" }

            select
                name="payment_method_id"
                id="payment_method_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a payment method" }

                @for method in &snapshot.payment_methods {
                    option
                        value=(method.id)
                        selected[defaults.payment_method_id == Some(method.id)]
                    {
                        (method.name)
                    }
                }
            }
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Description"
                value=(defaults.description)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}
