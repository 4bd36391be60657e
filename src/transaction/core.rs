//! Defines the core data model and table for transactions.

use std::fmt::Display;

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{
    Error,
    database_id::{CostCenterId, CreditSaleId, PaymentMethodId, SubgroupId, TransactionId, UserId},
    month::MonthRef,
    snapshot::Snapshot,
    store::{
        Record, SortOrder, Table, get_optional_uuid, get_uuid, optional_uuid_value, uuid_value,
    },
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money received, e.g. a sale.
    Entry,
    /// Money paid, e.g. a bill.
    Exit,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Entry => "ENTRY",
            TransactionType::Exit => "EXIT",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Entry => "Entry",
            TransactionType::Exit => "Exit",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text {
            "ENTRY" => Some(TransactionType::Entry),
            "EXIT" => Some(TransactionType::Exit),
            _ => None,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An income or expense recorded by a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// When the money moved.
    pub date: Date,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always non-negative, [Transaction::kind] gives the direction.
    pub amount: f64,
    pub cost_center_id: Option<CostCenterId>,
    /// Empty when the cost center has no subgroups.
    pub subgroup_id: Option<SubgroupId>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub description: String,
    /// The month selected when the transaction was saved.
    pub month_ref: MonthRef,
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// Set when the transaction is the down payment of a credit sale.
    pub credit_sale_id: Option<CreditSaleId>,
}

impl Transaction {
    /// The amount with entries positive and exits negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Entry => self.amount,
            TransactionType::Exit => -self.amount,
        }
    }
}

/// The transaction `id` if `user_id` owns it and it can be changed on its own.
///
/// # Errors
///
/// Returns [Error::NotFound] if the user has no transaction with that ID and
/// [Error::LinkedTransaction] if it is the down payment of a credit sale.
pub fn editable_transaction(
    snapshot: &Snapshot,
    id: TransactionId,
    user_id: UserId,
) -> Result<&Transaction, Error> {
    let transaction = snapshot
        .transaction(id)
        .filter(|transaction| transaction.user_id == user_id)
        .ok_or(Error::NotFound)?;

    match transaction.credit_sale_id {
        Some(_) => Err(Error::LinkedTransaction),
        None => Ok(transaction),
    }
}

impl Record for Transaction {
    const TABLE: Table = Table::Transactions;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "date",
        "type",
        "amount",
        "cost_center_id",
        "subgroup_id",
        "payment_method_id",
        "description",
        "month_ref",
        "user_id",
        "credit_sale_id",
    ];
    const ORDER_BY: Option<(&'static str, SortOrder)> = Some(("date", SortOrder::Descending));

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            Value::Text(self.date.to_string()),
            Value::Text(self.kind.as_str().to_owned()),
            Value::Real(self.amount),
            optional_uuid_value(self.cost_center_id),
            optional_uuid_value(self.subgroup_id),
            optional_uuid_value(self.payment_method_id),
            Value::Text(self.description.clone()),
            Value::Text(self.month_ref.to_string()),
            uuid_value(self.user_id),
            optional_uuid_value(self.credit_sale_id),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let kind: String = row.get(2)?;
        let kind = TransactionType::parse(&kind).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown transaction type {kind}").into(),
            )
        })?;
        let month_ref: String = row.get(8)?;
        let month_ref = MonthRef::new(&month_ref).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                8,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        Ok(Self {
            id: get_uuid(row, 0)?,
            date: row.get(1)?,
            kind,
            amount: row.get(3)?,
            cost_center_id: get_optional_uuid(row, 4)?,
            subgroup_id: get_optional_uuid(row, 5)?,
            payment_method_id: get_optional_uuid(row, 6)?,
            description: row.get(7)?,
            month_ref,
            user_id: get_uuid(row, 9)?,
            credit_sale_id: get_optional_uuid(row, 10)?,
        })
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.transactions
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.transactions
    }
}

// ============================================================================
// DATABASE
// ============================================================================

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                type TEXT NOT NULL,
                amount REAL NOT NULL,
                cost_center_id TEXT,
                subgroup_id TEXT,
                payment_method_id TEXT,
                description TEXT NOT NULL,
                month_ref TEXT NOT NULL,
                user_id TEXT NOT NULL,
                credit_sale_id TEXT
                )",
        (),
    )?;

    // Used by the dashboard and the credit sale linkage.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_month ON transactions(user_id, month_ref);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_credit_sale ON transactions(credit_sale_id);",
        (),
    )?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
