//! Transaction totals for the dashboard and the master panel.
//!
//! Everything here is recomputed from the snapshot on each request.

use std::collections::BTreeSet;

use crate::{
    database_id::UserId,
    month::MonthRef,
    snapshot::Snapshot,
    transaction::{Transaction, TransactionType},
    user::User,
};

/// The name of the bucket for transactions without a known cost center.
pub const OTHER_COST_CENTER_LABEL: &str = "Other";

/// The sums of entries and exits over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub entries: f64,
    pub exits: f64,
    pub count: usize,
}

impl Summary {
    pub fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut summary = Summary::default();

        for transaction in transactions {
            match transaction.kind {
                TransactionType::Entry => summary.entries += transaction.amount,
                TransactionType::Exit => summary.exits += transaction.amount,
            }
            summary.count += 1;
        }

        summary
    }

    /// Entries minus exits.
    pub fn net(&self) -> f64 {
        self.entries - self.exits
    }
}

/// The transactions owned by `user_id` and filed under `month`.
pub fn owned_in_month<'a>(
    transactions: &'a [Transaction],
    user_id: UserId,
    month: &MonthRef,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.user_id == user_id && &transaction.month_ref == month)
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: MonthRef,
    pub summary: Summary,
}

/// The totals of each month that `user_id` has transactions in, oldest first.
pub fn monthly_history(transactions: &[Transaction], user_id: UserId) -> Vec<MonthSummary> {
    let owned = transactions
        .iter()
        .filter(|transaction| transaction.user_id == user_id)
        .collect::<Vec<_>>();
    let months = owned
        .iter()
        .map(|transaction| transaction.month_ref.clone())
        .collect::<BTreeSet<_>>();

    months
        .into_iter()
        .map(|month| {
            let summary = Summary::of(
                owned
                    .iter()
                    .copied()
                    .filter(|transaction| transaction.month_ref == month),
            );

            MonthSummary { month, summary }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostCenterTotal {
    pub name: String,
    pub amount: f64,
}

/// The sum of the amounts of `transactions` grouped by cost center name,
/// largest first.
///
/// Transactions whose cost center is missing or has been deleted are grouped
/// under [OTHER_COST_CENTER_LABEL].
pub fn cost_center_breakdown(
    transactions: &[&Transaction],
    snapshot: &Snapshot,
) -> Vec<CostCenterTotal> {
    let mut totals: Vec<CostCenterTotal> = Vec::new();

    for transaction in transactions {
        let name = snapshot
            .cost_center_name(transaction.cost_center_id)
            .unwrap_or(OTHER_COST_CENTER_LABEL);

        match totals.iter_mut().find(|total| total.name == name) {
            Some(total) => total.amount += transaction.amount,
            None => totals.push(CostCenterTotal {
                name: name.to_owned(),
                amount: transaction.amount,
            }),
        }
    }

    totals.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    totals
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub user: User,
    pub summary: Summary,
}

/// The month's totals for every store, i.e. every user that is not a master user.
pub fn store_summaries(snapshot: &Snapshot, month: &MonthRef) -> Vec<StoreSummary> {
    snapshot
        .users
        .iter()
        .filter(|user| !user.is_master())
        .map(|user| StoreSummary {
            user: user.clone(),
            summary: Summary::of(owned_in_month(&snapshot.transactions, user.id, month)),
        })
        .collect()
}
