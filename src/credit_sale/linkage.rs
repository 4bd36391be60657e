//! Builds a credit sale and its down payment transaction from a submitted form.

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    credit_sale::CreditSale,
    database_id::{PaymentMethodId, UserId, new_id},
    month::MonthRef,
    snapshot::Snapshot,
    transaction::{Transaction, TransactionType},
    validation::non_negative,
};

/// The form data for creating or editing a credit sale.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditSaleForm {
    pub client_name: String,
    #[serde(default)]
    pub client_code: String,
    pub total_amount: Option<f64>,
    pub down_payment: Option<f64>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub sale_date: Date,
    pub month_ref: MonthRef,
}

/// The description given to the down payment transaction of a sale to `client_name`.
pub fn down_payment_description(client_name: &str) -> String {
    format!("Store credit down payment: {client_name}")
}

/// Build the sale described by `form` and, if it has a positive down
/// payment, the entry transaction recording that down payment.
///
/// When editing, `existing` is the sale being edited: its ID and owner are
/// kept, and the transaction reuses the ID of the sale's current down payment
/// transaction so that it is updated rather than duplicated.
///
/// The transaction is filed under the first cost center and its first
/// subgroup.
///
/// # Errors
///
/// Returns:
/// - [Error::MissingClient] if the client name or total is missing.
/// - [Error::NegativeAmount] if the total or down payment is negative.
/// - [Error::MissingDownPaymentMethod] if there is a down payment without a payment method.
/// - [Error::InvalidPaymentMethod] if the payment method does not exist.
/// - [Error::NoCostCenterConfigured] if there is a down payment but no cost centers.
pub fn build_credit_sale(
    form: CreditSaleForm,
    existing: Option<&CreditSale>,
    current_user: UserId,
    snapshot: &Snapshot,
) -> Result<(CreditSale, Option<Transaction>), Error> {
    let client_name = form.client_name.trim();
    let total_amount = match form.total_amount {
        Some(total) if !client_name.is_empty() => non_negative(total)?,
        _ => return Err(Error::MissingClient),
    };
    let down_payment = non_negative(form.down_payment.unwrap_or(0.0))?;
    let has_down_payment = down_payment > 0.0;

    if form
        .payment_method_id
        .is_some_and(|id| snapshot.payment_method(id).is_none())
    {
        return Err(Error::InvalidPaymentMethod);
    }

    if has_down_payment && form.payment_method_id.is_none() {
        return Err(Error::MissingDownPaymentMethod);
    }

    let cost_center = snapshot.cost_centers.first();

    if has_down_payment && cost_center.is_none() {
        return Err(Error::NoCostCenterConfigured);
    }

    let sale = CreditSale {
        id: existing.map(|sale| sale.id).unwrap_or_else(new_id),
        client_name: client_name.to_owned(),
        client_code: form.client_code.trim().to_owned(),
        total_amount,
        down_payment,
        payment_method_id: form.payment_method_id,
        sale_date: form.sale_date,
        month_ref: form.month_ref,
        user_id: existing.map(|sale| sale.user_id).unwrap_or(current_user),
    };

    if !has_down_payment {
        return Ok((sale, None));
    }

    let transaction = Transaction {
        id: snapshot
            .linked_transaction(sale.id)
            .map(|transaction| transaction.id)
            .unwrap_or_else(new_id),
        date: sale.sale_date,
        kind: TransactionType::Entry,
        amount: down_payment,
        cost_center_id: cost_center.map(|center| center.id),
        subgroup_id: cost_center
            .and_then(|center| center.subgroups.first())
            .map(|subgroup| subgroup.id),
        payment_method_id: sale.payment_method_id,
        description: down_payment_description(&sale.client_name),
        month_ref: sale.month_ref.clone(),
        user_id: sale.user_id,
        credit_sale_id: Some(sale.id),
    };

    Ok((sale, Some(transaction)))
}
