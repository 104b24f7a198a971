//! Income service

use tracing::{debug, info};

use crate::error::{FairShareError, FairShareResult};
use crate::models::{Income, IncomeId, IncomePatch, NewIncome};
use crate::storage::Storage;
use crate::split::HouseholdIncome;

/// Service for income management
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn list(&self) -> FairShareResult<Vec<Income>> {
        self.storage.incomes.get_all()
    }

    pub fn get(&self, id: IncomeId) -> FairShareResult<Option<Income>> {
        self.storage.incomes.get(id)
    }

    /// Find by id (full or short form) or by case-insensitive name
    pub fn find(&self, identifier: &str) -> FairShareResult<Option<Income>> {
        if let Some(income) = self.storage.incomes.find(|i| i.id.matches(identifier))? {
            return Ok(Some(income));
        }
        let needle = identifier.trim().to_lowercase();
        self.storage
            .incomes
            .find(|i| i.name.trim().to_lowercase() == needle)
    }

    pub fn resolve(&self, identifier: &str) -> FairShareResult<Income> {
        self.find(identifier)?
            .ok_or_else(|| FairShareError::income_not_found(identifier))
    }

    pub fn add(&self, fields: NewIncome) -> FairShareResult<Income> {
        let income = Income::create(IncomeId::new(), fields);
        income
            .validate()
            .map_err(|e| FairShareError::Validation(e.to_string()))?;

        self.storage.incomes.upsert(income.clone())?;
        self.storage.incomes.save()?;

        info!(id = %income.id, partner = %income.partner, "added income");
        Ok(income)
    }

    pub fn update(&self, id: IncomeId, patch: &IncomePatch) -> FairShareResult<Income> {
        let mut income = self
            .storage
            .incomes
            .get(id)?
            .ok_or_else(|| FairShareError::income_not_found(id.to_string()))?;

        if patch.is_empty() {
            return Ok(income);
        }

        income.apply(patch);
        income
            .validate()
            .map_err(|e| FairShareError::Validation(e.to_string()))?;

        self.storage.incomes.upsert(income.clone())?;
        self.storage.incomes.save()?;

        debug!(%id, "updated income");
        Ok(income)
    }

    pub fn remove(&self, id: IncomeId) -> FairShareResult<Income> {
        let income = self
            .storage
            .incomes
            .get(id)?
            .ok_or_else(|| FairShareError::income_not_found(id.to_string()))?;

        self.storage.incomes.delete(id)?;
        self.storage.incomes.save()?;

        info!(%id, "removed income");
        Ok(income)
    }

    /// Per-partner monthly totals
    pub fn summary(&self) -> FairShareResult<HouseholdIncome> {
        Ok(HouseholdIncome::from_incomes(&self.list()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FairSharePaths;
    use crate::models::{FrequencyType, Money, Partner};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairSharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_defaults() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeService::new(&storage);

        let income = service.add(NewIncome::default()).unwrap();
        assert_eq!(income.name, "New income");
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeService::new(&storage);
        let income = service.add(NewIncome::default()).unwrap();

        let patch = IncomePatch {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(service.update(income.id, &patch).unwrap_err().is_validation());
    }

    #[test]
    fn test_summary_ratio() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeService::new(&storage);
        service
            .add(NewIncome {
                name: "Salary".into(),
                amount: Money::from_whole(6000),
                ..Default::default()
            })
            .unwrap();
        service
            .add(NewIncome {
                name: "Contract".into(),
                amount: Money::from_whole(48000),
                frequency_type: FrequencyType::Annual,
                partner: Partner::Y,
                ..Default::default()
            })
            .unwrap();

        let summary = service.summary().unwrap();
        assert_eq!(summary.total(), Money::from_whole(10000));
        assert_eq!(summary.ratio().percent(Partner::X), 60);
    }

    #[test]
    fn test_update_frequency_clears_param() {
        let (_temp_dir, storage) = create_test_storage();
        let service = IncomeService::new(&storage);
        let income = service
            .add(NewIncome {
                frequency_type: FrequencyType::EveryNWeeks,
                frequency_param: Some(2),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(income.frequency_param, Some(2));

        let updated = service
            .update(
                income.id,
                &IncomePatch {
                    frequency_type: Some(FrequencyType::Weekly),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.frequency_param, None);
    }
}
