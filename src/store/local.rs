//! The local fallback store that keeps the whole state in one JSON document.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{
    Error,
    snapshot::Snapshot,
    store::{Filter, Record, SortOrder, Store},
};

/// The fixed key the state document is stored under.
pub const STORAGE_KEY: &str = "rumont_db";

/// A store that reads and writes the whole state as a JSON document in the
/// file `rumont_db.json`.
///
/// Every mutation rewrites the whole document.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    state: Snapshot,
}

impl LocalStore {
    /// Open the state document in `directory`, creating the directory if needed.
    ///
    /// A missing, empty or malformed document is replaced by the seed state.
    ///
    /// # Errors
    /// Returns [Error::LocalStateError] if the directory cannot be created.
    pub fn open(directory: &Path) -> Result<Self, Error> {
        fs::create_dir_all(directory).map_err(|error| {
            Error::LocalStateError(format!(
                "could not create directory {}: {error}",
                directory.display()
            ))
        })?;

        let path = directory.join(format!("{STORAGE_KEY}.json"));
        let state = load_state(&path);

        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_state(&self, state: &Snapshot) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(state)?;

        fs::write(&self.path, text).map_err(|error| {
            tracing::error!("could not write {}: {error}", self.path.display());
            Error::LocalStateError(error.to_string())
        })
    }

    /// Apply `change` to a copy of the state and keep it only if it was saved.
    fn mutate<R, T>(
        &mut self,
        change: impl FnOnce(&mut Vec<R>) -> Result<T, Error>,
    ) -> Result<T, Error>
    where
        R: Record,
    {
        let mut state = self.state.clone();
        let result = change(R::collection_mut(&mut state))?;

        self.save_state(&state)?;
        self.state = state;

        Ok(result)
    }
}

fn load_state(path: &Path) -> Snapshot {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::info!("No state found at {}, using the seed state.", path.display());
            return Snapshot::seed();
        }
        Err(error) => {
            tracing::warn!(
                "Could not read {}: {error}. Using the seed state.",
                path.display()
            );
            return Snapshot::seed();
        }
    };

    if text.trim().is_empty() {
        return Snapshot::seed();
    }

    serde_json::from_str(&text).unwrap_or_else(|error| {
        tracing::warn!(
            "Could not parse {}: {error}. Using the seed state.",
            path.display()
        );
        Snapshot::seed()
    })
}

/// The text of the field `column` in the JSON form of a record.
fn field_text(record: &Value, column: &str) -> String {
    match record.get(column) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Null) | None => String::new(),
        Some(value) => value.to_string(),
    }
}

fn matches<R: Record>(record: &R, filter: &Filter) -> Result<bool, Error> {
    let (column, values, keep_if_found) = match filter {
        Filter::All => return Ok(true),
        Filter::Eq(column, value) => (column, std::slice::from_ref(value), true),
        Filter::NotIn(column, values) => (column, values.as_slice(), false),
    };

    let json = serde_json::to_value(record)?;
    let found = values.contains(&field_text(&json, column));

    Ok(found == keep_if_found)
}

impl Store for LocalStore {
    fn select<R: Record>(&self, filter: &Filter) -> Result<Vec<R>, Error> {
        let mut records = Vec::new();

        for record in R::collection(&self.state) {
            if matches(record, filter)? {
                records.push(record.clone());
            }
        }

        if let Some((column, order)) = R::ORDER_BY {
            let mut keyed = records
                .into_iter()
                .map(|record| Ok((field_text(&serde_json::to_value(&record)?, column), record)))
                .collect::<Result<Vec<_>, Error>>()?;

            keyed.sort_by(|(left, _), (right, _)| match order {
                SortOrder::Ascending => left.cmp(right),
                SortOrder::Descending => right.cmp(left),
            });

            records = keyed.into_iter().map(|(_, record)| record).collect();
        }

        Ok(records)
    }

    fn insert<R: Record>(&mut self, record: &R) -> Result<(), Error> {
        self.mutate(|records: &mut Vec<R>| {
            if records.iter().any(|existing| existing.id() == record.id()) {
                return Err(Error::DuplicateId);
            }

            records.push(record.clone());

            Ok(())
        })
    }

    fn update<R: Record>(&mut self, record: &R) -> Result<usize, Error> {
        if !R::collection(&self.state)
            .iter()
            .any(|existing| existing.id() == record.id())
        {
            return Ok(0);
        }

        self.mutate(|records: &mut Vec<R>| {
            let mut changed = 0;

            for existing in records.iter_mut().filter(|existing| existing.id() == record.id()) {
                *existing = record.clone();
                changed += 1;
            }

            Ok(changed)
        })
    }

    fn upsert<R: Record>(&mut self, records: &[R]) -> Result<(), Error> {
        self.mutate(|existing: &mut Vec<R>| {
            for record in records {
                match existing.iter_mut().find(|row| row.id() == record.id()) {
                    Some(row) => *row = record.clone(),
                    None => existing.push(record.clone()),
                }
            }

            Ok(())
        })
    }

    fn delete<R: Record>(&mut self, filter: &Filter) -> Result<usize, Error> {
        let mut remaining = Vec::new();

        for record in R::collection(&self.state) {
            if !matches(record, filter)? {
                remaining.push(record.clone());
            }
        }

        let deleted = R::collection(&self.state).len() - remaining.len();

        if deleted == 0 {
            return Ok(0);
        }

        self.mutate(|records: &mut Vec<R>| {
            *records = remaining;
            Ok(deleted)
        })
    }
}
