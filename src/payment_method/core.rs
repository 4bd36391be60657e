//! The payment method model and its table.

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    database_id::PaymentMethodId,
    snapshot::Snapshot,
    store::{Record, Table, get_uuid, uuid_value},
};

/// How money changed hands, e.g. "Pix" or "Cash".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub name: String,
}

impl Record for PaymentMethod {
    const TABLE: Table = Table::PaymentMethods;
    const COLUMNS: &'static [&'static str] = &["id", "name"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![uuid_value(self.id), Value::Text(self.name.clone())]
    }

    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: get_uuid(row, 0)?,
            name: row.get(1)?,
        })
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.payment_methods
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.payment_methods
    }
}

pub fn create_payment_method_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment_methods (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}
