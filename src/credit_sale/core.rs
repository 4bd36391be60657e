//! The store credit sale model and its table.

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::{
    database_id::{CreditSaleId, PaymentMethodId, UserId},
    month::MonthRef,
    snapshot::Snapshot,
    store::{
        Record, SortOrder, Table, get_optional_uuid, get_uuid, optional_uuid_value, uuid_value,
    },
};

/// A sale on store credit, where the client may pay part of the total up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditSale {
    pub id: CreditSaleId,
    pub client_name: String,
    /// The store's own reference for the client.
    pub client_code: String,
    pub total_amount: f64,
    /// The amount paid up front. A positive down payment is recorded as an
    /// entry transaction linked to the sale.
    pub down_payment: f64,
    /// How the down payment was paid.
    pub payment_method_id: Option<PaymentMethodId>,
    pub sale_date: Date,
    pub month_ref: MonthRef,
    pub user_id: UserId,
}

impl CreditSale {
    /// The amount still owed by the client.
    pub fn outstanding(&self) -> f64 {
        self.total_amount - self.down_payment
    }
}

impl Record for CreditSale {
    const TABLE: Table = Table::CreditSales;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "client_name",
        "client_code",
        "total_amount",
        "down_payment",
        "payment_method_id",
        "sale_date",
        "month_ref",
        "user_id",
    ];
    const ORDER_BY: Option<(&'static str, SortOrder)> =
        Some(("sale_date", SortOrder::Descending));

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            Value::Text(self.client_name.clone()),
            Value::Text(self.client_code.clone()),
            Value::Real(self.total_amount),
            Value::Real(self.down_payment),
            optional_uuid_value(self.payment_method_id),
            Value::Text(self.sale_date.to_string()),
            Value::Text(self.month_ref.to_string()),
            uuid_value(self.user_id),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let month_ref: String = row.get(7)?;
        let month_ref = MonthRef::new(&month_ref).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        Ok(Self {
            id: get_uuid(row, 0)?,
            client_name: row.get(1)?,
            client_code: row.get(2)?,
            total_amount: row.get(3)?,
            down_payment: row.get(4)?,
            payment_method_id: get_optional_uuid(row, 5)?,
            sale_date: row.get(6)?,
            month_ref,
            user_id: get_uuid(row, 8)?,
        })
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.credit_sales
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.credit_sales
    }
}

pub fn create_credit_sale_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS credit_sales (
                id TEXT PRIMARY KEY,
                client_name TEXT NOT NULL,
                client_code TEXT NOT NULL DEFAULT '',
                total_amount REAL NOT NULL,
                down_payment REAL NOT NULL DEFAULT 0,
                payment_method_id TEXT,
                sale_date TEXT NOT NULL,
                month_ref TEXT NOT NULL,
                user_id TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}
