//! The user model and its table.

use std::fmt::Display;

use rusqlite::{Connection, Row, types::Value};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    database_id::UserId,
    snapshot::Snapshot,
    store::{Record, Table, get_uuid, uuid_value},
};

/// The ID of the master account created with every new store.
pub const MASTER_USER_ID: UserId = Uuid::from_u128(1);

/// What a user is allowed to see and do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Oversees every store from the master panel and manages users.
    Master,
    Manager,
    Finance,
    Operator,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Master, Role::Manager, Role::Finance, Role::Operator];

    /// The roles an admin can assign to a new user.
    pub const STORE_ROLES: [Role; 3] = [Role::Manager, Role::Finance, Role::Operator];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Master => "MASTER",
            Role::Manager => "MANAGER",
            Role::Finance => "FINANCE",
            Role::Operator => "OPERATOR",
        }
    }

    fn parse(text: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| role.as_str() == text)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user of the application, either the master account or the manager of a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// The name of the store the user manages.
    pub store_name: String,
    /// The display name of the person using the account.
    pub admin_name: String,
    pub username: String,
    /// Stored and compared as entered.
    pub password: String,
    pub role: Role,
    /// Inactive users cannot log in.
    pub active: bool,
}

impl User {
    /// The master account that every new store starts with.
    pub fn seed_master() -> Self {
        Self {
            id: MASTER_USER_ID,
            store_name: "Rumont Matriz".to_owned(),
            admin_name: "Master Admin".to_owned(),
            username: "admin".to_owned(),
            password: "admin".to_owned(),
            role: Role::Master,
            active: true,
        }
    }

    pub fn is_master(&self) -> bool {
        self.role == Role::Master
    }
}

impl Record for User {
    const TABLE: Table = Table::Users;
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "store_name",
        "admin_name",
        "username",
        "password",
        "role",
        "active",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn to_sql_values(&self) -> Vec<Value> {
        vec![
            uuid_value(self.id),
            Value::Text(self.store_name.clone()),
            Value::Text(self.admin_name.clone()),
            Value::Text(self.username.clone()),
            Value::Text(self.password.clone()),
            Value::Text(self.role.as_str().to_owned()),
            Value::Integer(self.active.into()),
        ]
    }

    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        let role: String = row.get(5)?;
        let role = Role::parse(&role).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown role {role}").into(),
            )
        })?;

        Ok(Self {
            id: get_uuid(row, 0)?,
            store_name: row.get(1)?,
            admin_name: row.get(2)?,
            username: row.get(3)?,
            password: row.get(4)?,
            role,
            active: row.get(6)?,
        })
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.users
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.users
    }
}

/// Create the users table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                store_name TEXT NOT NULL,
                admin_name TEXT NOT NULL,
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                role TEXT NOT NULL,
                active INTEGER NOT NULL DEFAULT 1
                )",
        (),
    )?;

    Ok(())
}
