//! CSV export of the derived expense view
//!
//! One row per visible expense, in display order, with resolved names and
//! exact (unrounded) monthly and fair-share figures.

use std::io::Write;

use crate::error::{FairShareError, FairShareResult};
use crate::models::{Partner, PartnerNames};
use crate::view::ExpenseView;

fn export_err(e: impl std::fmt::Display) -> FairShareError {
    FairShareError::Export(e.to_string())
}

pub fn export_expenses_csv<W: Write>(
    view: &ExpenseView,
    names: &PartnerNames,
    writer: W,
) -> FairShareResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let fair_x = format!("Fair share {}", names.x);
    let fair_y = format!("Fair share {}", names.y);
    csv.write_record([
        "ID",
        "Name",
        "Category",
        "Budget",
        "Payment method",
        "Payer",
        "Amount",
        "Frequency",
        "Frequency param",
        "Monthly",
        "Benefit X",
        "Benefit Y",
        fair_x.as_str(),
        fair_y.as_str(),
        "Estimate",
    ])
    .map_err(export_err)?;

    for row in &view.rows {
        let e = &row.expense;
        csv.write_record([
            e.id.as_uuid().to_string(),
            e.name.clone(),
            row.category.clone(),
            row.budget.clone(),
            row.account.clone(),
            e.payer.map(|p| names.name(p).to_string()).unwrap_or_default(),
            e.amount.edit_text(),
            e.frequency_type.key().to_string(),
            e.frequency_param.map(|n| n.to_string()).unwrap_or_default(),
            row.share.monthly.edit_text(),
            e.benefit_x.for_partner(Partner::X).to_string(),
            e.benefit_x.for_partner(Partner::Y).to_string(),
            row.share.x.edit_text(),
            row.share.y.edit_text(),
            e.is_estimate.to_string(),
        ])
        .map_err(export_err)?;
    }

    csv.flush().map_err(export_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, ExpenseId, FrequencyType, Household, Money, NewExpense};
    use crate::view::{derive_expense_view, ViewQuery};

    #[test]
    fn test_csv_rows_and_quoting() {
        let mut h = Household::default();
        h.expenses.push(Expense::create(
            ExpenseId::new(),
            NewExpense {
                name: "Gas, electric".into(),
                amount: Money::from_whole(100),
                frequency_type: FrequencyType::Weekly,
                payer: Some(Partner::X),
                ..Default::default()
            },
        ));
        let names = PartnerNames::new("Alex", "Sam");
        let view = derive_expense_view(&h, &names, &ViewQuery::default());

        let mut out = Vec::new();
        export_expenses_csv(&view, &names, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Fair share Alex"));
        assert!(lines[1].contains("\"Gas, electric\""));
        assert!(lines[1].contains(",weekly,,433,"));
        assert!(lines[1].contains(",Alex,"));
    }
}
