//! Single-line text input dialog for names

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{ExpenseId, Partner, ReferenceKind};
use crate::persistence::ReferenceId;
use crate::tui::layout::centered_rect_fixed;

/// What the entered text is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    AddReference(ReferenceKind),
    /// Add an entry and assign it to an expense once it is saved
    AddReferenceFor { kind: ReferenceKind, expense: ExpenseId },
    RenameReference(ReferenceId),
    PartnerName(Partner),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputState {
    pub title: String,
    pub purpose: InputPurpose,
    pub value: String,
}

impl InputState {
    pub fn new(title: impl Into<String>, purpose: InputPurpose, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            purpose,
            value: value.into(),
        }
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }
}

pub fn render(frame: &mut Frame, state: &InputState) {
    let area = centered_rect_fixed(50, 5, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", state.title))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = vec![
        Line::from(vec![
            Span::styled(state.value.as_str(), Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::Yellow)),
        ]),
        Line::from(Span::styled(
            "Enter to save, Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
