//! The SQLite implementation of the table API.

use rusqlite::{Connection, params_from_iter, types::Value};

use crate::{
    Error,
    cost_center::create_cost_center_table,
    credit_sale::create_credit_sale_table,
    payment_method::create_payment_method_table,
    store::{Filter, Record, SortOrder, Store},
    transaction::create_transaction_table,
    user::create_user_table,
};

/// A store where each collection is an SQL table.
#[derive(Debug)]
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Wrap `connection` and create the five tables if they are missing.
    ///
    /// # Errors
    /// Returns an error if the tables cannot be created.
    pub fn new(connection: Connection) -> Result<Self, Error> {
        initialize(&connection)?;

        Ok(Self { connection })
    }

    /// Open the database file at `path`, creating it if it does not exist.
    pub fn open(path: &str) -> Result<Self, Error> {
        Self::new(Connection::open(path)?)
    }

    /// An empty store backed by an in-memory database.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }
}

/// Create the tables for the domain models in the database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_user_table(&transaction)?;
    create_cost_center_table(&transaction)?;
    create_payment_method_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_credit_sale_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

fn column_list(columns: &[&str]) -> String {
    columns
        .iter()
        .map(|column| format!("\"{column}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the WHERE clause for `filter` and the values bound to it.
fn where_clause(filter: &Filter) -> (String, Vec<Value>) {
    match filter {
        Filter::All => (String::new(), Vec::new()),
        Filter::Eq(column, value) => (
            format!(" WHERE \"{column}\" = ?1"),
            vec![Value::Text(value.clone())],
        ),
        Filter::NotIn(_, values) if values.is_empty() => (String::new(), Vec::new()),
        Filter::NotIn(column, values) => (
            format!(" WHERE \"{column}\" NOT IN ({})", placeholders(values.len())),
            values.iter().cloned().map(Value::Text).collect(),
        ),
    }
}

fn insert_statement<R: Record>() -> String {
    format!(
        "INSERT INTO \"{}\" ({}) VALUES ({})",
        R::TABLE.name(),
        column_list(R::COLUMNS),
        placeholders(R::COLUMNS.len())
    )
}

impl Store for SqliteStore {
    fn select<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, Error> {
        let (where_clause, values) = where_clause(filter);
        let order_by = match R::ORDER_BY {
            Some((column, SortOrder::Ascending)) => format!(" ORDER BY \"{column}\" ASC"),
            Some((column, SortOrder::Descending)) => format!(" ORDER BY \"{column}\" DESC"),
            None => String::new(),
        };
        let query = format!(
            "SELECT {} FROM \"{}\"{where_clause}{order_by}",
            column_list(R::COLUMNS),
            R::TABLE.name()
        );

        self.connection
            .prepare(&query)?
            .query_map(params_from_iter(values), |row| R::from_row(row))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn insert<R: Record>(&mut self, record: &R) -> Result<(), Error> {
        self.connection.execute(
            &insert_statement::<R>(),
            params_from_iter(record.to_sql_values()),
        )?;

        Ok(())
    }

    fn update<R: Record>(&mut self, record: &R) -> Result<usize, Error> {
        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, column)| format!("\"{column}\" = ?{}", index + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "UPDATE \"{}\" SET {assignments} WHERE \"id\" = ?1",
            R::TABLE.name()
        );

        self.connection
            .execute(&query, params_from_iter(record.to_sql_values()))
            .map_err(Error::from)
    }

    fn upsert<R: Record>(&mut self, records: &[R]) -> Result<(), Error> {
        let assignments = R::COLUMNS
            .iter()
            .skip(1)
            .map(|column| format!("\"{column}\" = excluded.\"{column}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "{} ON CONFLICT(\"id\") DO UPDATE SET {assignments}",
            insert_statement::<R>()
        );

        let transaction = self.connection.transaction()?;

        for record in records {
            transaction.execute(&query, params_from_iter(record.to_sql_values()))?;
        }

        transaction.commit()?;

        Ok(())
    }

    fn delete<R: Record>(&mut self, filter: &Filter) -> Result<usize, Error> {
        let (where_clause, values) = where_clause(filter);
        let query = format!("DELETE FROM \"{}\"{where_clause}", R::TABLE.name());

        self.connection
            .execute(&query, params_from_iter(values))
            .map_err(Error::from)
    }
}
