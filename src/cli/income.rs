//! Income CLI commands

use clap::{Args, Subcommand};

use crate::config::settings::Settings;
use crate::display::format_income_list;
use crate::error::FairShareResult;
use crate::grid::convert::{parse_amount, parse_param};
use crate::models::{FrequencyType, IncomePatch, NewIncome, Partner};
use crate::services::IncomeService;
use crate::storage::Storage;
use crate::view::{derive_income_view, IncomeSortColumn, IncomeSortKey, SortDirection};

#[derive(Args, Debug, Clone, Default)]
pub struct IncomeFields {
    /// Amount per occurrence
    #[arg(short, long)]
    pub amount: Option<String>,

    /// Frequency: weekly, twice_monthly, monthly, annual, ...
    #[arg(short, long)]
    pub frequency: Option<FrequencyType>,

    /// N for every-N / K-times frequencies
    #[arg(short = 'n', long)]
    pub every: Option<String>,

    /// Partner receiving this income (X or Y)
    #[arg(short, long)]
    pub partner: Option<Partner>,
}

impl IncomeFields {
    fn patch(&self) -> FairShareResult<IncomePatch> {
        Ok(IncomePatch {
            amount: self.amount.as_deref().map(parse_amount).transpose()?,
            frequency_type: self.frequency,
            frequency_param: self.every.as_deref().map(parse_param).transpose()?,
            partner: self.partner,
            ..Default::default()
        })
    }
}

#[derive(Subcommand)]
pub enum IncomeCommands {
    /// List income streams and the household ratio
    List {
        /// Sort column: name, partner, amount, frequency, monthly
        #[arg(short, long)]
        sort: Option<IncomeSortColumn>,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Add an income stream
    Add {
        /// Income name
        #[arg(default_value = "New income")]
        name: String,
        #[command(flatten)]
        fields: IncomeFields,
    },

    /// Edit an income stream
    Edit {
        /// Income name or ID
        income: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        fields: IncomeFields,
    },

    /// Remove an income stream
    Remove {
        /// Income name or ID
        income: String,
    },
}

pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: IncomeCommands,
) -> FairShareResult<()> {
    let service = IncomeService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        IncomeCommands::List { sort, desc } => {
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            let key = IncomeSortKey::new(sort.unwrap_or_default(), direction);
            let view = derive_income_view(&storage.snapshot()?, &key);
            print!("{}", format_income_list(&view, &settings.partners, currency));
        }

        IncomeCommands::Add { name, fields } => {
            let patch = fields.patch()?;
            let defaults = NewIncome::default();
            let income = service.add(NewIncome {
                name,
                amount: patch.amount.unwrap_or(defaults.amount),
                frequency_type: patch.frequency_type.unwrap_or(defaults.frequency_type),
                frequency_param: patch.frequency_param.flatten(),
                partner: patch.partner.unwrap_or(defaults.partner),
            })?;

            println!(
                "Added income: {} ({})",
                income.name,
                settings.partners.name(income.partner)
            );
            println!("  Monthly: {}", income.monthly().format_with_symbol(currency));
            println!("  ID: {}", income.id);
        }

        IncomeCommands::Edit {
            income,
            name,
            fields,
        } => {
            let target = service.resolve(&income)?;
            let mut patch = fields.patch()?;
            patch.name = name;
            if patch.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let updated = service.update(target.id, &patch)?;
            println!("Updated income: {}", updated);
        }

        IncomeCommands::Remove { income } => {
            let target = service.resolve(&income)?;
            let removed = service.remove(target.id)?;
            println!("Removed income: {}", removed.name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_patch() {
        let fields = IncomeFields {
            amount: Some("$2,500".into()),
            frequency: Some(FrequencyType::EveryNWeeks),
            every: Some("2".into()),
            partner: Some(Partner::Y),
        };
        let patch = fields.patch().unwrap();
        assert_eq!(patch.amount, Some(crate::models::Money::from_whole(2500)));
        assert_eq!(patch.frequency_param, Some(Some(2)));
        assert_eq!(patch.partner, Some(Partner::Y));
    }

    #[test]
    fn test_bad_amount_is_validation_error() {
        let fields = IncomeFields {
            amount: Some("lots".into()),
            ..Default::default()
        };
        assert!(fields.patch().unwrap_err().is_validation());
    }
}
