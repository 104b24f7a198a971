//! Help dialog
//!
//! Shows keyboard shortcuts for the active view

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::ActiveView;
use crate::tui::layout::centered_rect_fixed;

pub fn render(frame: &mut Frame, view: ActiveView) {
    let area = centered_rect_fixed(60, 24, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines(view))
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
    ))
}

fn key_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::raw(description),
    ])
}

fn help_lines(view: ActiveView) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Global"),
        key_line("1 / 2 / 3", "Expenses / Incomes / Configuration"),
        key_line("q  Ctrl+c", "Quit"),
        key_line("?", "Show/hide help"),
        Line::from(""),
    ];

    match view {
        ActiveView::Expenses | ActiveView::Incomes => {
            lines.push(heading("Grid"));
            lines.push(key_line("Arrows", "Move focus"));
            lines.push(key_line("Enter", "Edit cell, or open its picker"));
            lines.push(key_line("Enter / Tab", "While editing: save and move"));
            lines.push(key_line("Esc", "Discard the edit"));
            lines.push(key_line("a", "Add a row and start editing it"));
            lines.push(key_line("x / Del", "Delete the focused row"));
            lines.push(key_line("s", "Sort by focused column"));
            lines.push(key_line("Click", "Focus or edit a cell; sort by header"));
            if view == ActiveView::Expenses {
                lines.push(key_line("f", "Payer filter: all / X / Y"));
                lines.push(key_line("g", "Cycle grouping"));
            }
        }
        ActiveView::Config => {
            lines.push(heading("Configuration"));
            lines.push(key_line("Left / Right", "Switch section"));
            lines.push(key_line("Up / Down", "Select entry"));
            lines.push(key_line("a", "Add entry"));
            lines.push(key_line("Enter / r", "Rename entry or partner"));
            lines.push(key_line("x / Del", "Delete entry (reassigning if in use)"));
            lines.push(key_line("o", "Cycle payment method owner"));
        }
    }

    lines
}
