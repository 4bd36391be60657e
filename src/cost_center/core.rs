//! The cost center model and its table.

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    database_id::{CostCenterId, SubgroupId},
    snapshot::Snapshot,
    store::{Record, Table, get_uuid, uuid_value},
};

/// A bucket that transactions are classified under, e.g. "Rent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostCenter {
    pub id: CostCenterId,
    pub name: String,
    /// The finer grained buckets owned by this cost center, in display order.
    ///
    /// A transaction filed under a cost center with subgroups must name one of them.
    #[serde(default)]
    pub subgroups: Vec<Subgroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subgroup {
    pub id: SubgroupId,
    pub name: String,
}

impl CostCenter {
    pub fn subgroup(&self, id: SubgroupId) -> Option<&Subgroup> {
        self.subgroups.iter().find(|subgroup| subgroup.id == id)
    }
}

impl Record for CostCenter {
    const TABLE: Table = Table::CostCenters;
    const COLUMNS: &'static [&'static str] = &["id", "name", "subgroups"];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_sql_values(&self) -> Vec<Value> {
        // Serializing a list of plain structs cannot fail.
        let subgroups = serde_json::to_string(&self.subgroups).unwrap_or_else(|error| {
            tracing::error!("could not serialize subgroups: {error}");
            "[]".to_owned()
        });

        vec![
            uuid_value(self.id),
            Value::Text(self.name.clone()),
            Value::Text(subgroups),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let subgroups: String = row.get(2)?;
        let subgroups = serde_json::from_str(&subgroups).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(error),
            )
        })?;

        Ok(Self {
            id: get_uuid(row, 0)?,
            name: row.get(1)?,
            subgroups,
        })
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.cost_centers
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.cost_centers
    }
}

/// Create the cost centers table. Subgroups are kept as a JSON list.
pub fn create_cost_center_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS cost_centers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                subgroups TEXT NOT NULL DEFAULT '[]'
                )",
        (),
    )?;

    Ok(())
}
