//! Status bar view
//!
//! Shows the income ratio, monthly totals, pending writes and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::models::Partner;
use crate::tui::app::App;

/// Partner color from settings, if it names a terminal color
fn partner_color(app: &App, partner: Partner) -> Color {
    app.settings
        .partner_colors
        .for_partner(partner)
        .and_then(|c| c.parse().ok())
        .unwrap_or(Color::Cyan)
}

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let currency = app.settings.currency_symbol.clone();
    let (ratio, expense_monthly) = {
        let view = app.expense_view();
        (view.ratio, view.totals.monthly)
    };
    let income = app.income_view().totals;

    let mut spans = vec![Span::raw(" ")];

    for (idx, partner) in Partner::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" / "));
        }
        spans.push(Span::styled(
            format!(
                "{} {}%",
                app.settings.partners.name(*partner),
                ratio.percent(*partner)
            ),
            Style::default()
                .fg(partner_color(app, *partner))
                .add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("Income: ", Style::default().fg(Color::White)));
    spans.push(Span::styled(
        income.total().format_whole(&currency),
        Style::default().fg(Color::Green),
    ));

    spans.push(Span::raw(" │ "));
    spans.push(Span::styled("Expenses: ", Style::default().fg(Color::White)));
    spans.push(Span::styled(
        format!("{}/mo", expense_monthly.format_whole(&currency)),
        Style::default().fg(Color::Yellow),
    ));

    let pending = app.writes_in_flight();
    if pending > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("Saving ({})", pending),
            Style::default().fg(Color::Yellow),
        ));
    }

    // Key hints (right-aligned)
    let hints = " q:Quit  ?:Help  a:Add  x:Delete ";

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize).saturating_sub(left_len + hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
