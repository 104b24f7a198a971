//! Persistence backed by the local JSON storage

use tracing::warn;

use super::request::{ReferenceId, WriteReceipt, WriteRequest};
use super::Persistence;
use crate::config::settings::Settings;
use crate::error::{FairShareError, FairShareResult};
use crate::models::{Budget, Category, LinkedAccount, ReferenceKind};
use crate::services::{
    AccountService, BudgetService, CategoryService, ExpenseService, IncomeService,
    ReferenceService,
};
use crate::storage::Storage;

/// Executes writes through the services against [`Storage`]
pub struct StoragePersistence {
    storage: Storage,
}

impl StoragePersistence {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    fn run(&self, request: WriteRequest) -> FairShareResult<WriteReceipt> {
        let storage = &self.storage;
        let receipt = match request {
            WriteRequest::AddExpense(fields) => {
                WriteReceipt::Expense(ExpenseService::new(storage).add(fields)?)
            }
            WriteRequest::UpdateExpense { id, patch } => {
                WriteReceipt::Expense(ExpenseService::new(storage).update(id, &patch)?)
            }
            WriteRequest::RemoveExpense(id) => {
                ExpenseService::new(storage).remove(id)?;
                WriteReceipt::Removed
            }
            WriteRequest::AddIncome(fields) => {
                WriteReceipt::Income(IncomeService::new(storage).add(fields)?)
            }
            WriteRequest::UpdateIncome { id, patch } => {
                WriteReceipt::Income(IncomeService::new(storage).update(id, &patch)?)
            }
            WriteRequest::RemoveIncome(id) => {
                IncomeService::new(storage).remove(id)?;
                WriteReceipt::Removed
            }
            WriteRequest::AddReference { kind, name, owner } => match kind {
                ReferenceKind::Category => {
                    WriteReceipt::Category(CategoryService::new(storage).add(&name)?)
                }
                ReferenceKind::Budget => {
                    WriteReceipt::Budget(BudgetService::new(storage).add(&name)?)
                }
                ReferenceKind::LinkedAccount => WriteReceipt::Account(
                    AccountService::new(storage).insert(LinkedAccount::with_owner(name, owner))?,
                ),
            },
            WriteRequest::RenameReference { id, name } => match id {
                ReferenceId::Category(id) => {
                    WriteReceipt::Category(CategoryService::new(storage).rename(id, &name)?)
                }
                ReferenceId::Budget(id) => {
                    WriteReceipt::Budget(BudgetService::new(storage).rename(id, &name)?)
                }
                ReferenceId::Account(id) => {
                    WriteReceipt::Account(AccountService::new(storage).rename(id, &name)?)
                }
            },
            WriteRequest::RemoveReference(id) => {
                match id {
                    ReferenceId::Category(id) => {
                        CategoryService::new(storage).remove(id)?;
                    }
                    ReferenceId::Budget(id) => {
                        BudgetService::new(storage).remove(id)?;
                    }
                    ReferenceId::Account(id) => {
                        AccountService::new(storage).remove(id)?;
                    }
                }
                WriteReceipt::Removed
            }
            WriteRequest::ReassignReferences { from, to } => {
                WriteReceipt::Reassigned(reassign(storage, from, to, false)?)
            }
            WriteRequest::RemoveReferenceReassigning { id, to } => {
                WriteReceipt::Reassigned(reassign(storage, id, to, true)?)
            }
            WriteRequest::SetAccountOwner { id, owner } => {
                WriteReceipt::Account(AccountService::new(storage).set_owner(id, owner)?)
            }
            WriteRequest::RenamePartners { x, y } => {
                let paths = storage.paths();
                let mut settings = Settings::load_or_create(paths)?;
                settings.rename_partners(&x, &y)?;
                settings.save(paths)?;
                WriteReceipt::Partners(settings.partners)
            }
        };
        Ok(receipt)
    }
}

fn reassign(
    storage: &Storage,
    from: ReferenceId,
    to: Option<ReferenceId>,
    remove: bool,
) -> FairShareResult<usize> {
    macro_rules! dispatch {
        ($kind:ty, $from:expr, $to:expr) => {{
            let service = ReferenceService::<$kind>::new(storage);
            if remove {
                service.remove_reassigning($from, $to).map(|(_, n)| n)
            } else {
                service.reassign($from, $to)
            }
        }};
    }

    match (from, to) {
        (ReferenceId::Category(a), None) => dispatch!(Category, a, None),
        (ReferenceId::Category(a), Some(ReferenceId::Category(b))) => {
            dispatch!(Category, a, Some(b))
        }
        (ReferenceId::Budget(a), None) => dispatch!(Budget, a, None),
        (ReferenceId::Budget(a), Some(ReferenceId::Budget(b))) => {
            dispatch!(Budget, a, Some(b))
        }
        (ReferenceId::Account(a), None) => dispatch!(LinkedAccount, a, None),
        (ReferenceId::Account(a), Some(ReferenceId::Account(b))) => {
            dispatch!(LinkedAccount, a, Some(b))
        }
        (from, Some(to)) => Err(FairShareError::Validation(format!(
            "Cannot move {} references onto a {}",
            from.kind().label().to_lowercase(),
            to.kind().label().to_lowercase()
        ))),
    }
}

/// Storage failures surface as persistence errors; rule violations keep
/// their own kind
fn classify(err: FairShareError) -> FairShareError {
    match err {
        FairShareError::Storage(msg) | FairShareError::Io(msg) | FairShareError::Json(msg) => {
            FairShareError::Persistence(msg)
        }
        other => other,
    }
}

impl Persistence for StoragePersistence {
    fn execute(&mut self, request: WriteRequest) -> FairShareResult<WriteReceipt> {
        let label = request.describe();
        self.run(request).map_err(|e| {
            let e = classify(e);
            warn!(request = %label, error = %e, "write rejected");
            e
        })
    }
}
