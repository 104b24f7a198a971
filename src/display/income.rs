//! Income table and summary

use crate::models::{Partner, PartnerNames};
use crate::split::IncomeRatio;
use crate::view::IncomeView;

use super::render_table;

/// Ratio with partner names, e.g. `Alex 60% / Sam 40%`
pub fn format_ratio(ratio: IncomeRatio, names: &PartnerNames) -> String {
    format!(
        "{} {}% / {} {}%",
        names.x,
        ratio.percent(Partner::X),
        names.y,
        ratio.percent(Partner::Y)
    )
}

/// Income rows followed by per-partner totals and the ratio
pub fn format_income_list(view: &IncomeView, names: &PartnerNames, currency: &str) -> String {
    let mut output = String::new();

    if view.is_empty() {
        output.push_str("No incomes found.\n");
    } else {
        let rows = view
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.income.id.to_string(),
                    r.income.name.clone(),
                    names.name(r.income.partner).to_string(),
                    r.income.amount.format_with_symbol(currency),
                    r.income.schedule(),
                    r.monthly.format_whole(currency),
                ]
            })
            .collect();
        output.push_str(&render_table(
            &["ID", "Name", "Partner", "Amount", "Frequency", "Monthly"],
            rows,
            3..,
        ));
        output.push_str("\n\n");
    }

    for partner in Partner::ALL {
        output.push_str(&format!(
            "{}: {} / month\n",
            names.name(partner),
            view.totals.for_partner(partner).format_whole(currency)
        ));
    }
    output.push_str(&format!(
        "Household: {} / month\n",
        view.totals.total().format_whole(currency)
    ));
    output.push_str(&format!("Ratio: {}\n", format_ratio(view.ratio, names)));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Household, Income, IncomeId, Money, NewIncome};
    use crate::view::{derive_income_view, IncomeSortKey};

    #[test]
    fn test_zero_income_shows_even_split() {
        let view = derive_income_view(&Household::default(), &IncomeSortKey::default());
        let text = format_income_list(&view, &PartnerNames::default(), "$");
        assert!(text.contains("No incomes found."));
        assert!(text.contains("Ratio: Partner X 50% / Partner Y 50%"));
    }

    #[test]
    fn test_list_and_ratio() {
        let mut h = Household::default();
        h.incomes.push(Income::create(
            IncomeId::new(),
            NewIncome {
                name: "Salary".into(),
                amount: Money::from_whole(3000),
                ..Default::default()
            },
        ));
        h.incomes.push(Income::create(
            IncomeId::new(),
            NewIncome {
                name: "Wages".into(),
                amount: Money::from_whole(1000),
                partner: Partner::Y,
                ..Default::default()
            },
        ));
        let view = derive_income_view(&h, &IncomeSortKey::default());
        let names = PartnerNames::new("Alex", "Sam");
        let text = format_income_list(&view, &names, "$");

        assert!(text.contains("Salary"));
        assert!(text.contains("Alex: $3000 / month"));
        assert!(text.contains("Household: $4000 / month"));
        assert!(text.contains("Ratio: Alex 75% / Sam 25%"));
    }
}
