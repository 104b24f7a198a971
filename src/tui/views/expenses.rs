//! Expense grid view
//!
//! Rows come from the derived expense view; with grouping on, each group
//! gets a heading and a subtotal line, and a household total closes the
//! grid either way.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::grid::{CellContext, ExpenseColumn, EXPENSE_COLUMNS};
use crate::view::{ExpenseRow, ExpenseView, Totals, ViewQuery};
use crate::tui::app::App;
use crate::tui::widgets::{render_grid, GridColumn, GridLine};

fn column_index(key: ExpenseColumn) -> usize {
    EXPENSE_COLUMNS
        .iter()
        .position(|c| c.key == key)
        .unwrap_or(0)
}

pub(crate) fn columns(view: &ExpenseView, ctx: &CellContext<'_>, query: &ViewQuery) -> Vec<GridColumn> {
    EXPENSE_COLUMNS
        .iter()
        .map(|c| GridColumn {
            header: c.header.render(ctx.names),
            width: c.width,
            align: c.align,
            sorted: (c.sort == Some(query.sort.column)).then_some(query.sort.direction),
            editable: view
                .rows
                .first()
                .map_or(true, |row| (c.editor)(row).is_editable()),
        })
        .collect()
}

fn data_line(index: usize, row: &ExpenseRow, ctx: &CellContext<'_>) -> GridLine {
    GridLine::Data {
        row: index,
        cells: EXPENSE_COLUMNS.iter().map(|c| (c.display)(row, ctx)).collect(),
    }
}

fn summary_line(label: String, totals: &Totals, currency: &str) -> GridLine {
    let mut cells = vec![String::new(); EXPENSE_COLUMNS.len()];
    cells[column_index(ExpenseColumn::Name)] = label;
    cells[column_index(ExpenseColumn::Monthly)] = totals.monthly.format_with_symbol(currency);
    cells[column_index(ExpenseColumn::FairX)] = totals.fair_x.format_with_symbol(currency);
    cells[column_index(ExpenseColumn::FairY)] = totals.fair_y.format_with_symbol(currency);
    GridLine::Summary(cells)
}

/// Body lines in display order
pub(crate) fn lines(view: &ExpenseView, ctx: &CellContext<'_>) -> Vec<GridLine> {
    let mut lines = Vec::with_capacity(view.len() + 1);
    match &view.groups {
        None => {
            lines.extend(
                view.rows
                    .iter()
                    .enumerate()
                    .map(|(idx, row)| data_line(idx, row, ctx)),
            );
        }
        Some(groups) => {
            for group in groups {
                lines.push(GridLine::Heading(format!(
                    "{} ({})",
                    group.label, group.totals.count
                )));
                for idx in group.rows.clone() {
                    lines.push(data_line(idx, &view.rows[idx], ctx));
                }
                lines.push(summary_line(
                    format!("Subtotal: {}", group.label),
                    &group.totals,
                    ctx.currency,
                ));
            }
        }
    }
    if !view.is_empty() {
        lines.push(summary_line(
            format!("Total ({})", view.totals.count),
            &view.totals,
            ctx.currency,
        ));
    }
    lines
}

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let names = app.settings.partners.clone();
    let currency = app.settings.currency_symbol.clone();
    let query = app.expense_query;
    let focus = app.expense_grid.focus();
    let pending = app.expense_grid.pending().map(str::to_string);
    let ctx = CellContext {
        names: &names,
        currency: &currency,
    };

    let view = app.expense_view();
    let columns = columns(view, &ctx, &query);
    let lines = lines(view, &ctx);

    let border = if app.is_editing() {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(" Expenses ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.expense_hits = render_grid(
        frame,
        inner,
        &columns,
        &lines,
        focus,
        pending.as_deref(),
        &mut app.expense_scroll,
    );

    if lines.is_empty() && inner.height > 2 {
        let message = if app.household.expenses.is_empty() {
            "No expenses yet. Press 'a' to add one."
        } else {
            "No expenses match the payer filter. Press 'f' to change it."
        };
        frame.render_widget(
            Paragraph::new(message).style(Style::default().fg(Color::DarkGray)),
            Rect::new(inner.x + 1, inner.y + 2, inner.width.saturating_sub(2), 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Expense, ExpenseId, Household, Money, NewExpense, PartnerNames};
    use crate::view::{derive_expense_view, GroupBy};

    fn household() -> Household {
        let mut h = Household::default();
        let food = Category::new("Food");
        for (name, amount, category) in [("Rent", 1000, None), ("Groceries", 400, Some(food.id))] {
            h.expenses.push(Expense::create(
                ExpenseId::new(),
                NewExpense {
                    name: name.into(),
                    amount: Money::from_whole(amount),
                    category_id: category,
                    ..Default::default()
                },
            ));
        }
        h.categories.push(food);
        h
    }

    #[test]
    fn test_flat_view_ends_with_total() {
        let names = PartnerNames::default();
        let ctx = CellContext { names: &names, currency: "$" };
        let view = derive_expense_view(&household(), &names, &ViewQuery::default());
        let lines = lines(&view, &ctx);

        assert_eq!(lines.len(), 3);
        match lines.last() {
            Some(GridLine::Summary(cells)) => {
                assert_eq!(cells[column_index(ExpenseColumn::Name)], "Total (2)");
                assert_eq!(cells[column_index(ExpenseColumn::Monthly)], "$1400.00");
            }
            other => panic!("expected total line, got {:?}", other),
        }
    }

    #[test]
    fn test_grouped_view_has_heading_and_subtotal_per_group() {
        let names = PartnerNames::default();
        let ctx = CellContext { names: &names, currency: "$" };
        let query = ViewQuery {
            group_by: GroupBy::Category,
            ..Default::default()
        };
        let view = derive_expense_view(&household(), &names, &query);
        let lines = lines(&view, &ctx);

        let headings = lines
            .iter()
            .filter(|l| matches!(l, GridLine::Heading(_)))
            .count();
        let summaries = lines
            .iter()
            .filter(|l| matches!(l, GridLine::Summary(_)))
            .count();
        assert_eq!(headings, 2);
        assert_eq!(summaries, 3);
    }

    #[test]
    fn test_empty_view_has_no_lines() {
        let names = PartnerNames::default();
        let ctx = CellContext { names: &names, currency: "$" };
        let view = derive_expense_view(&Household::default(), &names, &ViewQuery::default());
        assert!(lines(&view, &ctx).is_empty());
    }
}
