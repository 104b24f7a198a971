//! Income grid view

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::grid::{CellContext, IncomeColumn, INCOME_COLUMNS};
use crate::models::{Money, Partner};
use crate::tui::app::App;
use crate::tui::widgets::{render_grid, GridColumn, GridLine};
use crate::view::{IncomeSortKey, IncomeView};

fn column_index(key: IncomeColumn) -> usize {
    INCOME_COLUMNS
        .iter()
        .position(|c| c.key == key)
        .unwrap_or(0)
}

fn columns(ctx: &CellContext<'_>, sort: &IncomeSortKey) -> Vec<GridColumn> {
    INCOME_COLUMNS
        .iter()
        .map(|c| GridColumn {
            header: c.header.render(ctx.names),
            width: c.width,
            align: c.align,
            sorted: (c.sort == Some(sort.column)).then_some(sort.direction),
            editable: c.key != IncomeColumn::Monthly,
        })
        .collect()
}

fn summary_line(label: String, monthly: Money, currency: &str) -> GridLine {
    let mut cells = vec![String::new(); INCOME_COLUMNS.len()];
    cells[column_index(IncomeColumn::Name)] = label;
    cells[column_index(IncomeColumn::Monthly)] = monthly.format_with_symbol(currency);
    GridLine::Summary(cells)
}

/// Income rows, then a monthly total per partner and for the household
fn lines(view: &IncomeView, ctx: &CellContext<'_>) -> Vec<GridLine> {
    if view.is_empty() {
        return Vec::new();
    }
    let mut lines: Vec<GridLine> = view
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| GridLine::Data {
            row: idx,
            cells: INCOME_COLUMNS.iter().map(|c| (c.display)(row, ctx)).collect(),
        })
        .collect();
    for partner in Partner::ALL {
        lines.push(summary_line(
            format!(
                "{} ({}%)",
                ctx.names.name(partner),
                view.ratio.percent(partner)
            ),
            view.totals.for_partner(partner),
            ctx.currency,
        ));
    }
    lines.push(summary_line(
        "Household".to_string(),
        view.totals.total(),
        ctx.currency,
    ));
    lines
}

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let view = app.income_view();
    let ctx = CellContext {
        names: &app.settings.partners,
        currency: &app.settings.currency_symbol,
    };
    let columns = columns(&ctx, &app.income_sort);
    let lines = lines(&view, &ctx);
    let focus = app.income_grid.focus();
    let pending = app.income_grid.pending().map(str::to_string);

    let border = if app.income_grid.is_editing() {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(" Incomes ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.income_hits = render_grid(
        frame,
        inner,
        &columns,
        &lines,
        focus,
        pending.as_deref(),
        &mut app.income_scroll,
    );

    if lines.is_empty() && inner.height > 2 {
        frame.render_widget(
            Paragraph::new("No incomes yet. Press 'a' to add one.")
                .style(Style::default().fg(Color::DarkGray)),
            Rect::new(inner.x + 1, inner.y + 2, inner.width.saturating_sub(2), 1),
        );
    }
}
