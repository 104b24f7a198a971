//! Grid preferences
//!
//! A small string key-value store for the expense and income grid choices
//! (payer filter, grouping, sort). Values are read once at start-up and
//! written synchronously whenever the user changes one.

use std::collections::BTreeMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::FairShareResult;
use crate::storage::{read_json, write_json_atomic};
use crate::view::{
    GroupBy, IncomeSortColumn, IncomeSortKey, PayerFilter, SortColumn, SortDirection, SortKey,
    ViewQuery,
};

pub const EXPENSES_FILTER_PAYER: &str = "expenses_filterPayer";
pub const EXPENSES_GROUP_BY: &str = "expenses_groupBy";
pub const EXPENSES_SORT_COL: &str = "expenses_sortCol";
pub const EXPENSES_SORT_DIR: &str = "expenses_sortDir";
pub const INCOMES_SORT_COL: &str = "incomes_sortCol";
pub const INCOMES_SORT_DIR: &str = "incomes_sortDir";

/// Durable key-value store for preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> FairShareResult<()>;
}

/// Preferences kept in `preferences.json`
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonPreferenceStore {
    /// Open the store; an unreadable file starts empty
    pub fn open(path: PathBuf) -> Self {
        let values = match read_json::<BTreeMap<String, String>, _>(&path) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable preferences file");
                BTreeMap::new()
            }
        };
        Self { path, values }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> FairShareResult<()> {
        if self.values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value.to_string());
        write_json_atomic(&self.path, &self.values)?;
        debug!(key, value, "saved preference");
        Ok(())
    }
}

/// Non-durable store for tests and one-shot commands
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> FairShareResult<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn parsed<T: std::str::FromStr + Default>(store: &dyn PreferenceStore, key: &str) -> T {
    store
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default()
}

/// Saved expense grid choice; missing or garbage values fall back to
/// all payers, no grouping, name ascending
pub fn load_expense_query(store: &dyn PreferenceStore) -> ViewQuery {
    ViewQuery {
        filter: parsed::<PayerFilter>(store, EXPENSES_FILTER_PAYER),
        group_by: parsed::<GroupBy>(store, EXPENSES_GROUP_BY),
        sort: SortKey::new(
            parsed::<SortColumn>(store, EXPENSES_SORT_COL),
            parsed::<SortDirection>(store, EXPENSES_SORT_DIR),
        ),
    }
}

pub fn save_expense_query(store: &mut dyn PreferenceStore, query: &ViewQuery) -> FairShareResult<()> {
    store.set(EXPENSES_FILTER_PAYER, query.filter.key())?;
    store.set(EXPENSES_GROUP_BY, query.group_by.key())?;
    store.set(EXPENSES_SORT_COL, query.sort.column.key())?;
    store.set(EXPENSES_SORT_DIR, query.sort.direction.key())
}

pub fn load_income_sort(store: &dyn PreferenceStore) -> IncomeSortKey {
    IncomeSortKey::new(
        parsed::<IncomeSortColumn>(store, INCOMES_SORT_COL),
        parsed::<SortDirection>(store, INCOMES_SORT_DIR),
    )
}

pub fn save_income_sort(store: &mut dyn PreferenceStore, sort: &IncomeSortKey) -> FairShareResult<()> {
    store.set(INCOMES_SORT_COL, sort.column.key())?;
    store.set(INCOMES_SORT_DIR, sort.direction.key())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Partner;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_empty() {
        let store = MemoryPreferenceStore::new();
        let query = load_expense_query(&store);
        assert_eq!(query, ViewQuery::default());
        assert_eq!(query.sort.column, SortColumn::Name);
        assert_eq!(load_income_sort(&store), IncomeSortKey::default());
    }

    #[test]
    fn test_garbage_values_fall_back() {
        let mut store = MemoryPreferenceStore::new();
        store.set(EXPENSES_GROUP_BY, "colour").unwrap();
        store.set(EXPENSES_SORT_DIR, "sideways").unwrap();
        store.set(EXPENSES_FILTER_PAYER, "Y").unwrap();

        let query = load_expense_query(&store);
        assert_eq!(query.group_by, GroupBy::None);
        assert_eq!(query.sort.direction, SortDirection::Asc);
        assert_eq!(query.filter, PayerFilter::Only(Partner::Y));
    }

    #[test]
    fn test_json_store_persists_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");

        let mut store = JsonPreferenceStore::open(path.clone());
        let query = ViewQuery {
            filter: PayerFilter::Only(Partner::X),
            sort: SortKey::new(SortColumn::Monthly, SortDirection::Desc),
            group_by: GroupBy::Category,
        };
        save_expense_query(&mut store, &query).unwrap();
        save_income_sort(
            &mut store,
            &IncomeSortKey::new(IncomeSortColumn::Partner, SortDirection::Desc),
        )
        .unwrap();

        let reopened = JsonPreferenceStore::open(path);
        assert_eq!(load_expense_query(&reopened), query);
        assert_eq!(reopened.get(INCOMES_SORT_COL).as_deref(), Some("partner_label"));
        assert_eq!(reopened.get(EXPENSES_SORT_COL).as_deref(), Some("monthly"));
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("preferences.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonPreferenceStore::open(path);
        assert_eq!(store.get(EXPENSES_GROUP_BY), None);
    }
}
