//! Expense table and grouped report

use crate::models::{Partner, PartnerNames};
use crate::view::{ExpenseRow, ExpenseView, Totals};

use super::income::format_ratio;
use super::render_table;

fn expense_cells(row: &ExpenseRow, names: &PartnerNames, currency: &str) -> Vec<String> {
    let e = &row.expense;
    vec![
        e.id.to_string(),
        e.display_name().to_string(),
        row.category.clone(),
        row.budget.clone(),
        e.schedule(),
        row.account.clone(),
        names.name_or_dash(e.payer).to_string(),
        if e.is_estimate { "~" } else { "" }.to_string(),
        e.amount.format_with_symbol(currency),
        row.share.monthly.format_whole(currency),
        e.benefit_x.for_partner(Partner::X).to_string(),
        e.benefit_x.for_partner(Partner::Y).to_string(),
        row.share.x.format_whole(currency),
        row.share.y.format_whole(currency),
    ]
}

/// One table of expense rows
pub fn format_expense_table(rows: &[ExpenseRow], names: &PartnerNames, currency: &str) -> String {
    if rows.is_empty() {
        return "No expenses found.".to_string();
    }

    let x_pct = format!("{} %", names.x);
    let y_pct = format!("{} %", names.y);
    let fair_x = format!("{} share", names.x);
    let fair_y = format!("{} share", names.y);
    let header = [
        "ID",
        "Name",
        "Category",
        "Budget",
        "Frequency",
        "Payment method",
        "Payer",
        "Est.",
        "Amount",
        "Monthly",
        x_pct.as_str(),
        y_pct.as_str(),
        fair_x.as_str(),
        fair_y.as_str(),
    ];
    let body = rows
        .iter()
        .map(|r| expense_cells(r, names, currency))
        .collect();
    render_table(&header, body, 8..)
}

fn totals_line(label: &str, totals: &Totals, names: &PartnerNames, currency: &str) -> String {
    format!(
        "{}: {} expense(s), {} / month ({} {}, {} {})",
        label,
        totals.count,
        totals.monthly.format_whole(currency),
        names.x,
        totals.fair_x.format_whole(currency),
        names.y,
        totals.fair_y.format_whole(currency),
    )
}

/// Full report: one section per group (if grouped), then grand totals
pub fn format_expense_report(
    view: &ExpenseView,
    names: &PartnerNames,
    currency: &str,
) -> String {
    let mut output = String::new();

    match &view.groups {
        Some(groups) if !groups.is_empty() => {
            for group in groups {
                output.push_str(&format!("== {} ==\n", group.label));
                output.push_str(&format_expense_table(
                    &view.rows[group.rows.clone()],
                    names,
                    currency,
                ));
                output.push('\n');
                output.push_str(&totals_line("Subtotal", &group.totals, names, currency));
                output.push_str("\n\n");
            }
        }
        _ => {
            output.push_str(&format_expense_table(&view.rows, names, currency));
            output.push_str("\n\n");
        }
    }

    output.push_str(&totals_line("Total", &view.totals, names, currency));
    output.push('\n');
    output.push_str(&format!("Income ratio: {}\n", format_ratio(view.ratio, names)));
    output
}
