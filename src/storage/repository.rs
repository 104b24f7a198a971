//! Generic JSON-file repository
//!
//! Every record kind is stored as a JSON array in its own file. In memory
//! the records live in a map keyed by id; listings come back in creation
//! order so new rows always appear last.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::FairShareError;
use crate::models::{Budget, Category, Expense, Income, LinkedAccount};

use super::file_io::{read_json, write_json_atomic};

/// A storable record with a stable identity
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync {
    type Id: Copy + Eq + Hash + Ord + Display + Send + Sync;

    fn record_id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_record {
    ($ty:ty, $id:ty) => {
        impl Record for $ty {
            type Id = $id;

            fn record_id(&self) -> $id {
                self.id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        }
    };
}

impl_record!(Expense, crate::models::ExpenseId);
impl_record!(Income, crate::models::IncomeId);
impl_record!(Category, crate::models::CategoryId);
impl_record!(Budget, crate::models::BudgetId);
impl_record!(LinkedAccount, crate::models::LinkedAccountId);

/// Repository for one record kind
pub struct JsonRepository<T: Record> {
    path: PathBuf,
    records: RwLock<HashMap<T::Id, T>>,
}

impl<T: Record> JsonRepository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<T::Id, T>>, FairShareError> {
        self.records
            .read()
            .map_err(|e| FairShareError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<T::Id, T>>, FairShareError> {
        self.records
            .write()
            .map_err(|e| FairShareError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load records from disk, replacing whatever is in memory
    pub fn load(&self) -> Result<(), FairShareError> {
        let list: Vec<T> = read_json(&self.path)?;
        let mut records = self.write()?;
        records.clear();
        for record in list {
            records.insert(record.record_id(), record);
        }
        Ok(())
    }

    /// Save records to disk
    pub fn save(&self) -> Result<(), FairShareError> {
        let list = self.get_all()?;
        write_json_atomic(&self.path, &list)
    }

    pub fn get(&self, id: T::Id) -> Result<Option<T>, FairShareError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// All records in creation order
    pub fn get_all(&self) -> Result<Vec<T>, FairShareError> {
        let records = self.read()?;
        let mut list: Vec<T> = records.values().cloned().collect();
        list.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.record_id().cmp(&b.record_id()))
        });
        Ok(list)
    }

    /// First record matching a predicate, in creation order
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Result<Option<T>, FairShareError> {
        Ok(self.get_all()?.into_iter().find(|r| pred(r)))
    }

    pub fn upsert(&self, record: T) -> Result<(), FairShareError> {
        self.write()?.insert(record.record_id(), record);
        Ok(())
    }

    /// Remove a record; false if it did not exist
    pub fn delete(&self, id: T::Id) -> Result<bool, FairShareError> {
        Ok(self.write()?.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, FairShareError> {
        Ok(self.read()?.len())
    }
}
