//! Expense CLI commands

use clap::{Args, Subcommand};

use crate::config::settings::Settings;
use crate::display::format_expense_report;
use crate::error::{FairShareError, FairShareResult};
use crate::grid::convert::{parse_amount, parse_param};
use crate::models::{BenefitWeight, ExpensePatch, FrequencyType, NewExpense, Partner};
use crate::services::{AccountService, BudgetService, CategoryService, ExpenseService};
use crate::storage::Storage;
use crate::view::{derive_expense_view, GroupBy, PayerFilter, SortColumn, SortDirection, SortKey, ViewQuery};

/// Filter, sort and grouping options shared by listing commands
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Group rows: none, category, estimated, payer, payment_method
    #[arg(short, long)]
    pub group_by: Option<GroupBy>,

    /// Only expenses paid by this partner (X or Y), or all
    #[arg(short, long)]
    pub payer: Option<PayerFilter>,

    /// Sort column, e.g. name, monthly, category, fair_x
    #[arg(short, long)]
    pub sort: Option<SortColumn>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

impl ViewArgs {
    pub fn query(&self) -> ViewQuery {
        let direction = if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        ViewQuery {
            filter: self.payer.unwrap_or_default(),
            sort: SortKey::new(self.sort.unwrap_or_default(), direction),
            group_by: self.group_by.unwrap_or_default(),
        }
    }
}

/// Fields settable on add and edit
#[derive(Args, Debug, Clone, Default)]
pub struct ExpenseFields {
    /// Amount per occurrence (e.g. "120", "$1,200.50")
    #[arg(short, long)]
    pub amount: Option<String>,

    /// Frequency: weekly, twice_monthly, monthly, annual, every_n_days, ...
    #[arg(short, long)]
    pub frequency: Option<FrequencyType>,

    /// N for every-N / K-times frequencies
    #[arg(short = 'n', long)]
    pub every: Option<String>,

    /// Percent of the benefit going to partner X (0-100)
    #[arg(long)]
    pub benefit_x: Option<i64>,

    /// Category name or ID
    #[arg(short, long)]
    pub category: Option<String>,

    /// Budget name or ID
    #[arg(short, long)]
    pub budget: Option<String>,

    /// Payment method name or ID; sets the payer to its owner
    #[arg(short = 'm', long)]
    pub method: Option<String>,

    /// Payer (X or Y) when no payment method decides it
    #[arg(long)]
    pub payer: Option<Partner>,

    /// Mark the amount as an estimate
    #[arg(long)]
    pub estimate: bool,
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// List expenses with fair shares
    List {
        #[command(flatten)]
        view: ViewArgs,
    },

    /// Add an expense
    Add {
        /// Expense name
        name: String,
        #[command(flatten)]
        fields: ExpenseFields,
    },

    /// Edit an expense
    Edit {
        /// Expense name or ID
        expense: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ExpenseFields,
        /// Clear the estimate flag
        #[arg(long, conflicts_with = "estimate")]
        exact: bool,
        /// Clear the category
        #[arg(long, conflicts_with = "category")]
        no_category: bool,
        /// Clear the budget
        #[arg(long, conflicts_with = "budget")]
        no_budget: bool,
        /// Clear the payment method (and payer)
        #[arg(long, conflicts_with = "method")]
        no_method: bool,
    },

    /// Remove an expense
    Remove {
        /// Expense name or ID
        expense: String,
    },
}

fn benefit(value: Option<i64>) -> FairShareResult<Option<BenefitWeight>> {
    value
        .map(|v| BenefitWeight::new(v).map_err(|e| FairShareError::Validation(e.to_string())))
        .transpose()
}

/// Resolve the shared fields into a patch
fn fields_patch(storage: &Storage, fields: &ExpenseFields) -> FairShareResult<ExpensePatch> {
    let mut patch = ExpensePatch {
        amount: fields.amount.as_deref().map(parse_amount).transpose()?,
        frequency_type: fields.frequency,
        frequency_param: fields.every.as_deref().map(parse_param).transpose()?,
        benefit_x: benefit(fields.benefit_x)?,
        ..Default::default()
    };
    if let Some(category) = &fields.category {
        patch.category_id = Some(Some(CategoryService::new(storage).resolve(category)?.id));
    }
    if let Some(budget) = &fields.budget {
        patch.budget_id = Some(Some(BudgetService::new(storage).resolve(budget)?.id));
    }
    if let Some(payer) = fields.payer {
        patch.payer = Some(Some(payer));
    }
    if let Some(method) = &fields.method {
        let account = AccountService::new(storage).resolve(method)?;
        patch.set_linked_account(Some(&account));
        if let (Some(explicit), Some(owner)) = (fields.payer, account.owner) {
            if explicit != owner {
                return Err(FairShareError::Validation(format!(
                    "Payment method '{}' belongs to partner {}",
                    account.name, owner
                )));
            }
        }
        if account.owner.is_none() {
            patch.payer = Some(fields.payer);
        }
    }
    if fields.estimate {
        patch.is_estimate = Some(true);
    }
    Ok(patch)
}

pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> FairShareResult<()> {
    let service = ExpenseService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::List { view } => {
            let household = storage.snapshot()?;
            let view = derive_expense_view(&household, &settings.partners, &view.query());
            print!("{}", format_expense_report(&view, &settings.partners, currency));
        }

        ExpenseCommands::Add { name, fields } => {
            let patch = fields_patch(storage, &fields)?;
            let defaults = NewExpense::default();
            let expense = service.add(NewExpense {
                name,
                amount: patch.amount.unwrap_or(defaults.amount),
                frequency_type: patch.frequency_type.unwrap_or(defaults.frequency_type),
                frequency_param: patch.frequency_param.flatten(),
                benefit_x: patch.benefit_x.unwrap_or(defaults.benefit_x),
                payer: patch.payer.flatten(),
                category_id: patch.category_id.flatten(),
                budget_id: patch.budget_id.flatten(),
                linked_account_id: patch.linked_account_id.flatten(),
                is_estimate: fields.estimate,
            })?;

            println!("Added expense: {}", expense.display_name());
            println!("  Monthly: {}", expense.monthly().format_with_symbol(currency));
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::Edit {
            expense,
            name,
            fields,
            exact,
            no_category,
            no_budget,
            no_method,
        } => {
            let target = service.resolve(&expense)?;
            let mut patch = fields_patch(storage, &fields)?;
            patch.name = name;
            if exact {
                patch.is_estimate = Some(false);
            }
            if no_category {
                patch.category_id = Some(None);
            }
            if no_budget {
                patch.budget_id = Some(None);
            }
            if no_method {
                patch.set_linked_account(None);
                if let Some(payer) = fields.payer {
                    patch.payer = Some(Some(payer));
                }
            }

            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let updated = service.update(target.id, &patch)?;
            println!("Updated expense: {}", updated);
        }

        ExpenseCommands::Remove { expense } => {
            let target = service.resolve(&expense)?;
            let removed = service.remove(target.id)?;
            println!("Removed expense: {}", removed.display_name());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::FairSharePaths;
    use crate::models::LinkedAccount;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = FairSharePaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_view_args_defaults() {
        assert_eq!(ViewArgs::default().query(), ViewQuery::default());
        let args = ViewArgs {
            desc: true,
            sort: Some(SortColumn::Monthly),
            ..Default::default()
        };
        assert_eq!(args.query().sort, SortKey::new(SortColumn::Monthly, SortDirection::Desc));
    }

    #[test]
    fn test_fields_patch_resolves_method_owner() {
        let (_dir, storage) = create_test_storage();
        AccountService::new(&storage)
            .insert(LinkedAccount::with_owner("Visa", Some(Partner::Y)))
            .unwrap();

        let fields = ExpenseFields {
            method: Some("visa".into()),
            ..Default::default()
        };
        let patch = fields_patch(&storage, &fields).unwrap();
        assert_eq!(patch.payer, Some(Some(Partner::Y)));

        let conflicting = ExpenseFields {
            payer: Some(Partner::X),
            ..fields
        };
        assert!(fields_patch(&storage, &conflicting).unwrap_err().is_validation());
    }

    #[test]
    fn test_benefit_out_of_range_rejected() {
        let (_dir, storage) = create_test_storage();
        let fields = ExpenseFields {
            benefit_x: Some(120),
            ..Default::default()
        };
        assert!(fields_patch(&storage, &fields).unwrap_err().is_validation());
    }

    #[test]
    fn test_joint_method_keeps_explicit_payer() {
        let (_dir, storage) = create_test_storage();
        AccountService::new(&storage).add("Joint").unwrap();
        let fields = ExpenseFields {
            method: Some("Joint".into()),
            payer: Some(Partner::X),
            ..Default::default()
        };
        let patch = fields_patch(&storage, &fields).unwrap();
        assert_eq!(patch.payer, Some(Some(Partner::X)));
    }
}
