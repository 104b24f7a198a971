//! Category, budget and payment-method listings

use crate::models::{Household, LinkedAccount, PartnerNames, ReferenceEntity};

use super::render_table;

/// Extra column shown for payment methods
pub trait ListingExtra {
    fn owner_column(&self, _names: &PartnerNames) -> Option<String> {
        None
    }
}

impl ListingExtra for crate::models::Category {}
impl ListingExtra for crate::models::Budget {}

impl ListingExtra for LinkedAccount {
    fn owner_column(&self, names: &PartnerNames) -> Option<String> {
        Some(names.name_or_dash(self.owner).to_string())
    }
}

/// Table of one reference kind with usage counts
pub fn format_reference_list<T>(records: &[T], household: &Household, names: &PartnerNames) -> String
where
    T: ReferenceEntity + ListingExtra,
{
    if records.is_empty() {
        return format!("No {} found.", T::KIND.plural().to_lowercase());
    }

    let with_owner = records
        .first()
        .and_then(|r| r.owner_column(names))
        .is_some();

    let rows = records
        .iter()
        .map(|r| {
            let mut row = vec![
                r.id().to_string(),
                r.name().to_string(),
                r.color().unwrap_or("").to_string(),
            ];
            if let Some(owner) = r.owner_column(names) {
                row.push(owner);
            }
            row.push(household.usage_count::<T>(r.id()).to_string());
            row
        })
        .collect();

    let header: Vec<&str> = if with_owner {
        vec!["ID", "Name", "Color", "Owner", "Used by"]
    } else {
        vec!["ID", "Name", "Color", "Used by"]
    };
    let last = header.len() - 1;
    render_table(&header, rows, last..)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Expense, ExpenseId, NewExpense, Partner};

    #[test]
    fn test_empty_listing() {
        let h = Household::default();
        let text = format_reference_list::<LinkedAccount>(&[], &h, &PartnerNames::default());
        assert_eq!(text, "No payment methods found.");
    }

    #[test]
    fn test_usage_and_owner_columns() {
        let mut h = Household::default();
        let card = LinkedAccount::with_owner("Visa", Some(Partner::Y));
        h.expenses.push(Expense::create(
            ExpenseId::new(),
            NewExpense {
                linked_account_id: Some(card.id),
                ..Default::default()
            },
        ));
        h.accounts.push(card);
        let names = PartnerNames::new("Alex", "Sam");

        let text = format_reference_list(&h.accounts, &h, &names);
        assert!(text.contains("Owner"));
        assert!(text.contains("Sam"));

        let cats = vec![Category::new("Food")];
        let text = format_reference_list(&cats, &h, &names);
        assert!(!text.contains("Owner"));
        assert!(text.contains("Food"));
    }
}
