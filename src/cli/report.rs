//! Household report: income summary followed by the expense breakdown

use crate::config::settings::Settings;
use crate::display::{format_expense_report, format_ratio};
use crate::error::FairShareResult;
use crate::models::Partner;
use crate::split::HouseholdIncome;
use crate::storage::Storage;
use crate::view::derive_expense_view;

use super::expense::ViewArgs;

pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    args: ViewArgs,
) -> FairShareResult<()> {
    let household = storage.snapshot()?;
    let names = &settings.partners;
    let currency = settings.currency_symbol.as_str();
    let income = HouseholdIncome::from_incomes(&household.incomes);

    println!("Household income");
    println!("================");
    for partner in Partner::ALL {
        println!(
            "  {:<12} {} / month",
            names.name(partner),
            income.for_partner(partner).format_whole(currency)
        );
    }
    println!("  {:<12} {} / month", "Household", income.total().format_whole(currency));
    println!("  Ratio: {}", format_ratio(income.ratio(), names));
    println!();

    let view = derive_expense_view(&household, names, &args.query());
    println!("Expenses");
    println!("========");
    print!("{}", format_expense_report(&view, names, currency));
    Ok(())
}
