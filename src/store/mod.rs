//! The table-shaped persistence backends for the five Rumont collections.
//!
//! A [Store] supports filtered selects, inserts, updates by ID, upserts and
//! deletes by filter on each table. [SqliteStore] keeps each collection in an
//! SQL table while [LocalStore] keeps the whole state in a single JSON
//! document on disk.

mod local;
mod sqlite;

use rusqlite::{Row, types::Value};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, snapshot::Snapshot};

pub use local::{LocalStore, STORAGE_KEY};
pub use sqlite::SqliteStore;

/// The names of the tables in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    CostCenters,
    PaymentMethods,
    Transactions,
    CreditSales,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Users => "users",
            Table::CostCenters => "cost_centers",
            Table::PaymentMethods => "payment_methods",
            Table::Transactions => "transactions",
            Table::CreditSales => "credit_sales",
        }
    }
}

/// Which rows a select or delete applies to.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every row in the table.
    All,
    /// Rows where `column = value`.
    Eq(&'static str, String),
    /// Rows where `column NOT IN (values)`. An empty list matches every row.
    NotIn(&'static str, Vec<String>),
}

impl Filter {
    /// Rows whose ID is `id`.
    pub fn id(id: Uuid) -> Self {
        Filter::Eq("id", id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A row type that can be stored in one of the five tables.
///
/// The names in [Record::COLUMNS] must match the serialized field names of
/// the type, and the first column must be the primary key `id`.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const TABLE: Table;
    const COLUMNS: &'static [&'static str];
    /// The natural order of rows returned by a select.
    const ORDER_BY: Option<(&'static str, SortOrder)> = None;

    fn id(&self) -> Uuid;

    /// The SQL values for [Record::COLUMNS], in the same order.
    fn to_sql_values(&self) -> Vec<Value>;

    fn from_row(row: &Row) -> Result<Self, rusqlite::Error>;

    fn collection(snapshot: &Snapshot) -> &Vec<Self>;

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;
}

/// The table API shared by the SQLite store and the local fallback store.
pub trait Store {
    /// Get the rows matching `filter` in the table's natural order.
    fn select<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, Error>;

    /// Add a new row.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateId] if a row with the same ID exists.
    fn insert<R: Record>(&mut self, record: &R) -> Result<(), Error>;

    /// Replace the row with the same ID as `record`, returning the number of
    /// rows changed.
    fn update<R: Record>(&mut self, record: &R) -> Result<usize, Error>;

    /// Insert each record, replacing any row that has the same ID.
    fn upsert<R: Record>(&mut self, records: &[R]) -> Result<(), Error>;

    /// Delete the rows matching `filter`, returning the number of rows deleted.
    fn delete<R: Record>(&mut self, filter: &Filter) -> Result<usize, Error>;
}

/// The store selected at startup.
#[derive(Debug)]
pub enum Backend {
    Sqlite(SqliteStore),
    Local(LocalStore),
}

impl Store for Backend {
    fn select<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, Error> {
        match self {
            Backend::Sqlite(store) => store.select(filter),
            Backend::Local(store) => store.select(filter),
        }
    }

    fn insert<R: Record>(&mut self, record: &R) -> Result<(), Error> {
        match self {
            Backend::Sqlite(store) => store.insert(record),
            Backend::Local(store) => store.insert(record),
        }
    }

    fn update<R: Record>(&mut self, record: &R) -> Result<usize, Error> {
        match self {
            Backend::Sqlite(store) => store.update(record),
            Backend::Local(store) => store.update(record),
        }
    }

    fn upsert<R: Record>(&mut self, records: &[R]) -> Result<(), Error> {
        match self {
            Backend::Sqlite(store) => store.upsert(records),
            Backend::Local(store) => store.upsert(records),
        }
    }

    fn delete<R: Record>(&mut self, filter: &Filter) -> Result<usize, Error> {
        match self {
            Backend::Sqlite(store) => store.delete::<R>(filter),
            Backend::Local(store) => store.delete::<R>(filter),
        }
    }
}

/// Read a UUID stored as text in column `index`.
pub(crate) fn get_uuid(row: &Row, index: usize) -> Result<Uuid, rusqlite::Error> {
    let text: String = row.get(index)?;

    Uuid::parse_str(&text).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })
}

/// Read an optional UUID stored as text in column `index`.
pub(crate) fn get_optional_uuid(row: &Row, index: usize) -> Result<Option<Uuid>, rusqlite::Error> {
    let text: Option<String> = row.get(index)?;

    text.filter(|text| !text.is_empty())
        .map(|text| {
            Uuid::parse_str(&text).map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(
                    index,
                    rusqlite::types::Type::Text,
                    Box::new(error),
                )
            })
        })
        .transpose()
}

pub(crate) fn uuid_value(id: Uuid) -> Value {
    Value::Text(id.to_string())
}

pub(crate) fn optional_uuid_value(id: Option<Uuid>) -> Value {
    id.map(uuid_value).unwrap_or(Value::Null)
}
