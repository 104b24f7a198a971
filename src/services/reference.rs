//! Category, budget and payment-method management
//!
//! The three reference kinds share one service. Names are trimmed, at most
//! 50 characters and unique per kind ignoring case. An entity that
//! expenses still point at is never deleted silently: the caller either
//! picks a replacement or explicitly unassigns.

use std::marker::PhantomData;

use tracing::{debug, info};

use crate::error::{FairShareError, FairShareResult};
use crate::models::reference::validate_name;
use crate::models::{Expense, LinkedAccount, LinkedAccountId, Partner, ReferenceEntity};
use crate::storage::{Record, Storage, Stored};

/// Id type of a reference kind
pub type RefId<T> = <T as ReferenceEntity>::Id;

/// Service for one reference kind
pub struct ReferenceService<'a, T> {
    storage: &'a Storage,
    _kind: PhantomData<T>,
}

impl<'a, T> ReferenceService<'a, T>
where
    T: ReferenceEntity + Stored + Record<Id = RefId<T>>,
{
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            _kind: PhantomData,
        }
    }

    fn kind_label() -> &'static str {
        T::KIND.label()
    }

    fn not_found(identifier: impl Into<String>) -> FairShareError {
        FairShareError::NotFound {
            entity_type: Self::kind_label(),
            identifier: identifier.into(),
        }
    }

    pub fn list(&self) -> FairShareResult<Vec<T>> {
        self.storage.repository::<T>().get_all()
    }

    pub fn get(&self, id: RefId<T>) -> FairShareResult<Option<T>> {
        self.storage.repository::<T>().get(id)
    }

    /// Find by case-insensitive name or by id
    pub fn find(&self, identifier: &str) -> FairShareResult<Option<T>> {
        let needle = identifier.trim().to_lowercase();
        let repo = self.storage.repository::<T>();
        if let Some(found) = repo.find(|r| r.name().to_lowercase() == needle)? {
            return Ok(Some(found));
        }
        let parsed = identifier.trim().parse::<RefId<T>>().ok();
        repo.find(|r| {
            let id = ReferenceEntity::id(r);
            Some(id) == parsed || id.to_string() == identifier.trim()
        })
    }

    pub fn resolve(&self, identifier: &str) -> FairShareResult<T> {
        self.find(identifier)?
            .ok_or_else(|| Self::not_found(identifier))
    }

    fn require(&self, id: RefId<T>) -> FairShareResult<T> {
        self.get(id)?.ok_or_else(|| Self::not_found(id.to_string()))
    }

    /// Trimmed, valid and not taken by another record of this kind
    fn checked_name(&self, name: &str, except: Option<RefId<T>>) -> FairShareResult<String> {
        validate_name(name).map_err(|e| FairShareError::Validation(e.to_string()))?;
        let name = name.trim().to_string();
        let lowered = name.to_lowercase();
        let taken = self
            .storage
            .repository::<T>()
            .find(|r| r.name().to_lowercase() == lowered && Some(ReferenceEntity::id(r)) != except)?;
        if taken.is_some() {
            return Err(FairShareError::Duplicate {
                entity_type: Self::kind_label(),
                identifier: name,
            });
        }
        Ok(name)
    }

    pub fn add(&self, name: &str) -> FairShareResult<T> {
        let name = self.checked_name(name, None)?;
        let record = T::named(name);
        self.insert(record)
    }

    /// Store a fully built record after the same name checks as `add`
    pub fn insert(&self, mut record: T) -> FairShareResult<T> {
        let name = self.checked_name(record.name(), None)?;
        record.set_name(name);

        let repo = self.storage.repository::<T>();
        repo.upsert(record.clone())?;
        repo.save()?;

        info!(kind = Self::kind_label(), name = record.name(), "added reference");
        Ok(record)
    }

    pub fn rename(&self, id: RefId<T>, name: &str) -> FairShareResult<T> {
        let mut record = self.require(id)?;
        let name = self.checked_name(name, Some(id))?;
        if record.name() == name {
            return Ok(record);
        }
        record.set_name(name);

        let repo = self.storage.repository::<T>();
        repo.upsert(record.clone())?;
        repo.save()?;

        debug!(kind = Self::kind_label(), %id, "renamed reference");
        Ok(record)
    }

    /// Number of expenses pointing at `id`
    pub fn usage_count(&self, id: RefId<T>) -> FairShareResult<usize> {
        Ok(self
            .storage
            .expenses
            .get_all()?
            .iter()
            .filter(|e| T::referenced_by(e) == Some(id))
            .count())
    }

    /// Delete an entity no expense uses
    pub fn remove(&self, id: RefId<T>) -> FairShareResult<T> {
        let record = self.require(id)?;
        let usage = self.usage_count(id)?;
        if usage > 0 {
            return Err(FairShareError::ReferentialConflict {
                kind: Self::kind_label(),
                name: record.name().to_string(),
                usage,
            });
        }

        let repo = self.storage.repository::<T>();
        repo.delete(id)?;
        repo.save()?;

        info!(kind = Self::kind_label(), %id, "removed reference");
        Ok(record)
    }

    /// Repoint every expense using `from` at `to`, or clear it when `to`
    /// is `None`; returns how many expenses changed
    pub fn reassign(&self, from: RefId<T>, to: Option<RefId<T>>) -> FairShareResult<usize> {
        self.require(from)?;
        if to == Some(from) {
            return Err(FairShareError::Validation(format!(
                "Cannot reassign a {} to itself",
                Self::kind_label().to_lowercase()
            )));
        }
        let target = to.map(|id| self.require(id)).transpose()?;
        let patch = T::repoint(target.as_ref());

        let affected: Vec<Expense> = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| T::referenced_by(e) == Some(from))
            .collect();
        let count = affected.len();
        for mut expense in affected {
            expense.apply(&patch);
            self.storage.expenses.upsert(expense)?;
        }
        if count > 0 {
            self.storage.expenses.save()?;
        }

        info!(kind = Self::kind_label(), %from, count, "reassigned references");
        Ok(count)
    }

    /// Reassign (or unassign) every user of `id`, then delete it
    pub fn remove_reassigning(
        &self,
        id: RefId<T>,
        to: Option<RefId<T>>,
    ) -> FairShareResult<(T, usize)> {
        let moved = self.reassign(id, to)?;
        let record = self.remove(id)?;
        Ok((record, moved))
    }
}

impl ReferenceService<'_, LinkedAccount> {
    /// Change who owns a payment method; expenses paid through it follow
    pub fn set_owner(
        &self,
        id: LinkedAccountId,
        owner: Option<Partner>,
    ) -> FairShareResult<LinkedAccount> {
        let mut account = self.require(id)?;
        account.owner = owner;
        account.updated_at = chrono::Utc::now();
        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        let patch = LinkedAccount::repoint(Some(&account));
        let mut touched = false;
        for mut expense in self.storage.expenses.get_all()? {
            if expense.linked_account_id == Some(id) && expense.payer != owner {
                expense.apply(&patch);
                self.storage.expenses.upsert(expense)?;
                touched = true;
            }
        }
        if touched {
            self.storage.expenses.save()?;
        }
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FairSharePaths;
    use crate::models::{Budget, Category, ExpenseId, NewExpense};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairSharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    fn add_expense(storage: &Storage, fields: NewExpense) -> Expense {
        let expense = Expense::create(ExpenseId::new(), fields);
        storage.expenses.upsert(expense.clone()).unwrap();
        expense
    }

    #[test]
    fn test_add_trims_and_rejects_duplicates() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<Category>::new(&storage);

        let groceries = service.add("  Groceries ").unwrap();
        assert_eq!(groceries.name, "Groceries");

        let err = service.add("groceries").unwrap_err();
        assert!(matches!(err, FairShareError::Duplicate { .. }));
        assert!(service.add("").unwrap_err().is_validation());
        assert!(service.add(&"x".repeat(51)).unwrap_err().is_validation());
    }

    #[test]
    fn test_same_name_allowed_across_kinds() {
        let (_temp_dir, storage) = create_test_storage();
        ReferenceService::<Category>::new(&storage).add("Home").unwrap();
        assert!(ReferenceService::<Budget>::new(&storage).add("Home").is_ok());
    }

    #[test]
    fn test_rename_to_own_name_with_new_case() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<Budget>::new(&storage);
        let fun = service.add("fun money").unwrap();
        service.add("Bills").unwrap();

        let renamed = service.rename(fun.id, "Fun Money").unwrap();
        assert_eq!(renamed.name, "Fun Money");
        assert!(service.rename(fun.id, "bills").is_err());
    }

    #[test]
    fn test_remove_in_use_is_a_conflict() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<Category>::new(&storage);
        let housing = service.add("Housing").unwrap();
        add_expense(
            &storage,
            NewExpense {
                name: "Rent".into(),
                category_id: Some(housing.id),
                ..Default::default()
            },
        );

        assert_eq!(service.usage_count(housing.id).unwrap(), 1);
        let err = service.remove(housing.id).unwrap_err();
        assert!(err.is_conflict());
        assert!(service.get(housing.id).unwrap().is_some());
    }

    #[test]
    fn test_remove_reassigning_to_replacement() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<Category>::new(&storage);
        let old = service.add("Food").unwrap();
        let new = service.add("Groceries").unwrap();
        let expense = add_expense(
            &storage,
            NewExpense {
                category_id: Some(old.id),
                ..Default::default()
            },
        );

        let (removed, moved) = service.remove_reassigning(old.id, Some(new.id)).unwrap();
        assert_eq!(removed.id, old.id);
        assert_eq!(moved, 1);
        let reloaded = storage.expenses.get(expense.id).unwrap().unwrap();
        assert_eq!(reloaded.category_id, Some(new.id));
    }

    #[test]
    fn test_unassign_payment_method_clears_payer() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<LinkedAccount>::new(&storage);
        let card = service
            .insert(LinkedAccount::with_owner("Visa", Some(Partner::X)))
            .unwrap();
        let expense = add_expense(
            &storage,
            NewExpense {
                linked_account_id: Some(card.id),
                payer: Some(Partner::X),
                ..Default::default()
            },
        );

        service.remove_reassigning(card.id, None).unwrap();
        let reloaded = storage.expenses.get(expense.id).unwrap().unwrap();
        assert_eq!(reloaded.linked_account_id, None);
        assert_eq!(reloaded.payer, None);
    }

    #[test]
    fn test_reassign_payment_method_rederives_payer() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<LinkedAccount>::new(&storage);
        let mine = service
            .insert(LinkedAccount::with_owner("Mine", Some(Partner::X)))
            .unwrap();
        let theirs = service
            .insert(LinkedAccount::with_owner("Theirs", Some(Partner::Y)))
            .unwrap();
        let expense = add_expense(
            &storage,
            NewExpense {
                linked_account_id: Some(mine.id),
                payer: Some(Partner::X),
                ..Default::default()
            },
        );

        assert_eq!(service.reassign(mine.id, Some(theirs.id)).unwrap(), 1);
        let reloaded = storage.expenses.get(expense.id).unwrap().unwrap();
        assert_eq!(reloaded.payer, Some(Partner::Y));
        assert!(service.reassign(theirs.id, Some(theirs.id)).is_err());
    }

    #[test]
    fn test_set_owner_updates_payers() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<LinkedAccount>::new(&storage);
        let joint = service.add("Joint").unwrap();
        let expense = add_expense(
            &storage,
            NewExpense {
                linked_account_id: Some(joint.id),
                ..Default::default()
            },
        );

        service.set_owner(joint.id, Some(Partner::Y)).unwrap();
        let reloaded = storage.expenses.get(expense.id).unwrap().unwrap();
        assert_eq!(reloaded.payer, Some(Partner::Y));
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ReferenceService::<Category>::new(&storage);
        let gym = service.add("Gym").unwrap();

        assert_eq!(service.find("GYM").unwrap().unwrap().id, gym.id);
        assert_eq!(service.find(&gym.id.to_string()).unwrap().unwrap().id, gym.id);
        assert_eq!(
            service.find(&gym.id.as_uuid().to_string()).unwrap().unwrap().id,
            gym.id
        );
        assert!(service.resolve("Pool").unwrap_err().is_not_found());
    }
}
