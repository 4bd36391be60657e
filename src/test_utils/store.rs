use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use crate::{
    Error, Ledger,
    store::{Backend, Filter, LocalStore, Record, SqliteStore, Store, Table},
};

/// A ledger over an empty in-memory SQLite store, holding only the master user.
pub(crate) fn test_ledger() -> Ledger {
    let store = SqliteStore::open_in_memory().expect("Could not open in-memory store");

    Ledger::hydrate(Backend::Sqlite(store)).expect("Could not hydrate ledger")
}

pub(crate) fn shared_test_ledger() -> Arc<Mutex<Ledger>> {
    Arc::new(Mutex::new(test_ledger()))
}

/// A ledger over a local store in `directory`.
pub(crate) fn local_test_ledger(directory: &Path) -> Ledger {
    let store = LocalStore::open(directory).expect("Could not open local store");

    Ledger::hydrate(Backend::Local(store)).expect("Could not hydrate ledger")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Insert,
    Update,
    Upsert,
    Delete,
}

/// A SQLite store that fails one kind of operation on one table.
pub(crate) struct FailingStore {
    inner: SqliteStore,
    operation: Operation,
    table: Table,
}

impl FailingStore {
    pub(crate) fn new(operation: Operation, table: Table) -> Self {
        Self {
            inner: SqliteStore::open_in_memory().expect("Could not open in-memory store"),
            operation,
            table,
        }
    }

    fn check(&self, operation: Operation, table: Table) -> Result<(), Error> {
        if operation == self.operation && table == self.table {
            Err(Error::LocalStateError(format!(
                "simulated {operation:?} failure on {}",
                table.name()
            )))
        } else {
            Ok(())
        }
    }
}

impl Store for FailingStore {
    fn select<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, Error> {
        self.inner.select(filter)
    }

    fn insert<R: Record>(&mut self, record: &R) -> Result<(), Error> {
        self.check(Operation::Insert, R::TABLE)?;
        self.inner.insert(record)
    }

    fn update<R: Record>(&mut self, record: &R) -> Result<usize, Error> {
        self.check(Operation::Update, R::TABLE)?;
        self.inner.update(record)
    }

    fn upsert<R: Record>(&mut self, records: &[R]) -> Result<(), Error> {
        self.check(Operation::Upsert, R::TABLE)?;
        self.inner.upsert(records)
    }

    fn delete<R: Record>(&mut self, filter: &Filter) -> Result<usize, Error> {
        self.check(Operation::Delete, R::TABLE)?;
        self.inner.delete::<R>(filter)
    }
}
