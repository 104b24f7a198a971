//! TUI Views module
//!
//! The expense, income and configuration tabs, plus the tab bar, toolbar
//! and status bar around them.

pub mod config;
pub mod expenses;
pub mod incomes;
pub mod status_bar;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::grid::{ColumnSpec, Header};
use crate::models::PartnerNames;
use crate::view::{PayerFilter, SortDirection};

use super::app::{ActiveDialog, ActiveView, App};
use super::dialogs;
use super::layout::{notification_rect, AppLayout};
use super::widgets::NotificationWidget;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    render_tabs(frame, app, layout.tabs);
    render_toolbar(frame, app, layout.toolbar);

    match app.active_view {
        ActiveView::Expenses => expenses::render(frame, app, layout.main),
        ActiveView::Incomes => incomes::render(frame, app, layout.main),
        ActiveView::Config => config::render(frame, app, layout.main),
    }

    status_bar::render(frame, app, layout.status_bar);

    match &app.active_dialog {
        ActiveDialog::None => {}
        ActiveDialog::Help => dialogs::help::render(frame, app.active_view),
        ActiveDialog::Picker(state) => dialogs::picker::render(frame, state),
        ActiveDialog::Confirm(state) => dialogs::confirm::render(frame, state),
        ActiveDialog::Input(state) => dialogs::input::render(frame, state),
    }

    if let Some(notification) = app.notifications.current() {
        frame.render_widget(
            NotificationWidget::new(notification),
            notification_rect(frame.area()),
        );
    }
}

/// Tab titles; remembers where each one landed for mouse clicks
fn render_tabs(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = Vec::new();
    let mut hits = Vec::new();
    let mut x = area.x;

    for (idx, view) in ActiveView::ALL.iter().enumerate() {
        let label = format!(" {} {} ", idx + 1, view.title());
        let width = label.chars().count() as u16;
        let style = if *view == app.active_view {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        hits.push((*view, x, x + width));
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    }
    app.tab_hits = hits;

    spans.push(Span::styled(
        " FairShare",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Header of the column sorted by `sort`, or an empty string
fn sort_header<K, R, S: PartialEq>(columns: &[ColumnSpec<K, R, S>], sort: S, names: &PartnerNames) -> String {
    columns
        .iter()
        .find(|c| c.sort.as_ref() == Some(&sort))
        .map(|c| c.header)
        .unwrap_or(Header::Text(""))
        .render(names)
}

fn arrow(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    }
}

fn render_toolbar(frame: &mut Frame, app: &App, area: Rect) {
    let names = &app.settings.partners;
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::Yellow);

    let spans = match app.active_view {
        ActiveView::Expenses => {
            let query = app.expense_query;
            let filter = match query.filter {
                PayerFilter::All => "All payers".to_string(),
                PayerFilter::Only(p) => format!("Paid by {}", names.name(p)),
            };
            vec![
                Span::styled(" Filter: ", label),
                Span::styled(filter, value),
                Span::styled("  ·  ", label),
                Span::styled(query.group_by.label(), value),
                Span::styled("  ·  Sort: ", label),
                Span::styled(
                    format!(
                        "{} {}",
                        sort_header(&crate::grid::EXPENSE_COLUMNS, query.sort.column, names),
                        arrow(query.sort.direction)
                    ),
                    value,
                ),
                Span::styled("   f:Filter  g:Group  s:Sort", label),
            ]
        }
        ActiveView::Incomes => {
            let sort = app.income_sort;
            vec![
                Span::styled(" Sort: ", label),
                Span::styled(
                    format!(
                        "{} {}",
                        sort_header(&crate::grid::INCOME_COLUMNS, sort.column, names),
                        arrow(sort.direction)
                    ),
                    value,
                ),
            ]
        }
        ActiveView::Config => vec![Span::styled(
            " ←/→:Section  ↑/↓:Select  a:Add  r:Rename  x:Delete  o:Owner",
            label,
        )],
    };

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
