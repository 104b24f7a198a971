//! Category, budget and payment-method CLI commands
//!
//! The three kinds share one command set; payment methods additionally
//! carry an owning partner.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::reference::ListingExtra;
use crate::display::format_reference_list;
use crate::error::{FairShareError, FairShareResult};
use crate::models::{LinkedAccount, Partner, ReferenceEntity};
use crate::services::{AccountService, RefId, ReferenceService};
use crate::storage::{Record, Storage, Stored};

#[derive(Subcommand)]
pub enum ReferenceCommands {
    /// List entries with usage counts
    List,

    /// Add an entry
    Add {
        /// Name (unique, at most 50 characters)
        name: String,

        /// Owning partner (payment methods only)
        #[arg(long)]
        owner: Option<Partner>,
    },

    /// Rename an entry
    Rename {
        /// Current name or ID
        entry: String,
        /// New name
        new_name: String,
    },

    /// Remove an entry
    ///
    /// An entry still used by expenses is only removed when a replacement
    /// is given with --reassign-to, or with --unassign.
    Remove {
        /// Name or ID
        entry: String,

        /// Move its expenses to this entry first
        #[arg(long, conflicts_with = "unassign")]
        reassign_to: Option<String>,

        /// Clear it from its expenses first
        #[arg(long)]
        unassign: bool,
    },

    /// Set or clear the owner of a payment method
    Owner {
        /// Payment method name or ID
        entry: String,
        /// X or Y; omit for a joint account
        partner: Option<Partner>,
    },
}

pub fn handle_reference_command<T>(
    storage: &Storage,
    settings: &Settings,
    cmd: ReferenceCommands,
) -> FairShareResult<()>
where
    T: ReferenceEntity + Stored + Record<Id = RefId<T>> + ListingExtra,
{
    let service = ReferenceService::<T>::new(storage);
    let label = T::KIND.label();

    match cmd {
        ReferenceCommands::List => {
            let records = service.list()?;
            let household = storage.snapshot()?;
            println!(
                "{}",
                format_reference_list(&records, &household, &settings.partners)
            );
        }

        ReferenceCommands::Add { name, owner } => {
            if owner.is_some() {
                return Err(owner_unsupported(label));
            }
            let record = service.add(&name)?;
            println!("Created {}: {}", label.to_lowercase(), record.name());
            println!("  ID: {}", record.id());
        }

        ReferenceCommands::Rename { entry, new_name } => {
            let record = service.resolve(&entry)?;
            let old = record.name().to_string();
            let renamed = service.rename(record.id(), &new_name)?;
            println!("Renamed {} '{}' to '{}'", label.to_lowercase(), old, renamed.name());
        }

        ReferenceCommands::Remove {
            entry,
            reassign_to,
            unassign,
        } => {
            let record = service.resolve(&entry)?;
            if let Some(target) = reassign_to {
                let target = service.resolve(&target)?;
                let (removed, moved) = service.remove_reassigning(record.id(), Some(target.id()))?;
                println!(
                    "Removed {} '{}'; {} expense(s) moved to '{}'",
                    label.to_lowercase(),
                    removed.name(),
                    moved,
                    target.name()
                );
            } else if unassign {
                let (removed, moved) = service.remove_reassigning(record.id(), None)?;
                println!(
                    "Removed {} '{}'; {} expense(s) unassigned",
                    label.to_lowercase(),
                    removed.name(),
                    moved
                );
            } else {
                let removed = service.remove(record.id())?;
                println!("Removed {} '{}'", label.to_lowercase(), removed.name());
            }
        }

        ReferenceCommands::Owner { .. } => return Err(owner_unsupported(label)),
    }

    Ok(())
}

/// Payment methods: owner-aware add and owner changes, the rest shared
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReferenceCommands,
) -> FairShareResult<()> {
    let service = AccountService::new(storage);

    match cmd {
        ReferenceCommands::Add {
            name,
            owner: Some(owner),
        } => {
            let account = service.insert(LinkedAccount::with_owner(name, Some(owner)))?;
            println!(
                "Created payment method: {} ({})",
                account.name,
                settings.partners.name(owner)
            );
            println!("  ID: {}", account.id);
            Ok(())
        }

        ReferenceCommands::Owner { entry, partner } => {
            let account = service.resolve(&entry)?;
            let account = service.set_owner(account.id, partner)?;
            println!(
                "Payment method '{}' now belongs to {}",
                account.name,
                partner.map_or("both partners", |p| settings.partners.name(p))
            );
            Ok(())
        }

        other => handle_reference_command::<LinkedAccount>(storage, settings, other),
    }
}

fn owner_unsupported(label: &str) -> FairShareError {
    FairShareError::Validation(format!("{} entries have no owner", label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FairSharePaths;
    use crate::models::Category;
    use crate::services::CategoryService;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairSharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_category_owner_rejected() {
        let (_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let err = handle_reference_command::<Category>(
            &storage,
            &settings,
            ReferenceCommands::Add {
                name: "Food".into(),
                owner: Some(Partner::X),
            },
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert!(CategoryService::new(&storage).list().unwrap().is_empty());
    }

    #[test]
    fn test_account_add_with_owner() {
        let (_dir, storage) = create_test_storage();
        let settings = Settings::default();
        handle_account_command(
            &storage,
            &settings,
            ReferenceCommands::Add {
                name: "Visa".into(),
                owner: Some(Partner::Y),
            },
        )
        .unwrap();
        let account = AccountService::new(&storage).resolve("visa").unwrap();
        assert_eq!(account.owner, Some(Partner::Y));
    }

    #[test]
    fn test_remove_with_unassign() {
        let (_dir, storage) = create_test_storage();
        let settings = Settings::default();
        CategoryService::new(&storage).add("Food").unwrap();
        handle_reference_command::<Category>(
            &storage,
            &settings,
            ReferenceCommands::Remove {
                entry: "Food".into(),
                reassign_to: None,
                unassign: true,
            },
        )
        .unwrap();
        assert!(CategoryService::new(&storage).list().unwrap().is_empty());
    }
}
