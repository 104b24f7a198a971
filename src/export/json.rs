//! Full JSON export
//!
//! Every record plus partner names, the income ratio and grand totals.

use std::io::Write;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{FairShareError, FairShareResult};
use crate::models::{Budget, Category, Expense, Household, Income, LinkedAccount, Money, PartnerNames};
use crate::split::HouseholdIncome;
use crate::view::{derive_expense_view, ViewQuery};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub partners: PartnerNames,
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub payment_methods: Vec<LinkedAccount>,
    pub summary: ExportSummary,
}

/// Derived figures at export time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Partner X's share of household income, in `[0, 1]`
    pub income_ratio_x: Decimal,
    pub monthly_income_x: Money,
    pub monthly_income_y: Money,
    pub monthly_expenses: Money,
    pub fair_share_x: Money,
    pub fair_share_y: Money,
}

impl FullExport {
    pub fn from_household(household: &Household, partners: &PartnerNames) -> Self {
        let income = HouseholdIncome::from_incomes(&household.incomes);
        let view = derive_expense_view(household, partners, &ViewQuery::default());

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            partners: partners.clone(),
            expenses: household.expenses.clone(),
            incomes: household.incomes.clone(),
            categories: household.categories.clone(),
            budgets: household.budgets.clone(),
            payment_methods: household.accounts.clone(),
            summary: ExportSummary {
                income_ratio_x: income.ratio().x(),
                monthly_income_x: income.x,
                monthly_income_y: income.y,
                monthly_expenses: view.totals.monthly,
                fair_share_x: view.totals.fair_x,
                fair_share_y: view.totals.fair_y,
            },
        }
    }
}

pub fn export_full_json<W: Write>(export: &FullExport, writer: &mut W) -> FairShareResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| FairShareError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| FairShareError::Export(e.to_string()))?;
    Ok(())
}
