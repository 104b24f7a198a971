//! Option picker for select cells and for reassignment
//!
//! The same list dialog serves the category / budget / payment method /
//! frequency / payer cells of the grids and the "move its expenses to"
//! choice offered when deleting an entry that is still in use.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::grid::expense_grid::ExpenseColumn;
use crate::grid::income_grid::IncomeColumn;
use crate::grid::{Choice, SelectOption};
use crate::models::{ExpenseId, IncomeId};
use crate::persistence::ReferenceId;
use crate::tui::layout::centered_rect_fixed;

/// What the picked option applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerTarget {
    Expense { id: ExpenseId, column: ExpenseColumn },
    Income { id: IncomeId, column: IncomeColumn },
    /// Replacement for an entry about to be deleted
    Reassign(ReferenceId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerState {
    pub title: String,
    /// Extra line shown above the options
    pub prompt: Option<String>,
    pub target: PickerTarget,
    pub options: Vec<SelectOption>,
    pub selected: usize,
}

impl PickerState {
    pub fn new(title: impl Into<String>, target: PickerTarget, options: Vec<SelectOption>) -> Self {
        Self {
            title: title.into(),
            prompt: None,
            target,
            options,
            selected: 0,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Start on the option matching the cell's current value
    pub fn preselect(mut self, current: &str) -> Self {
        if let Some(idx) = self.options.iter().position(|o| o.label == current) {
            self.selected = idx;
        }
        self
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.options.len() {
            self.selected += 1;
        }
    }

    pub fn choice(&self) -> Option<Choice> {
        self.options.get(self.selected).map(|o| o.choice)
    }
}

pub fn render(frame: &mut Frame, state: &PickerState) {
    let extra = u16::from(state.prompt.is_some()) * 2;
    let height = (state.options.len() as u16 + 2 + extra).min(20);
    let width = state
        .options
        .iter()
        .map(|o| o.label.chars().count())
        .chain(state.prompt.iter().map(|p| p.chars().count()))
        .max()
        .unwrap_or(10)
        .clamp(24, 60) as u16
        + 4;
    let area = centered_rect_fixed(width, height, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", state.title))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut list_area = inner;
    if let Some(prompt) = &state.prompt {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                prompt.as_str(),
                Style::default().fg(Color::Yellow),
            ))),
            inner,
        );
        list_area.y += 2;
        list_area.height = list_area.height.saturating_sub(2);
    }

    let items: Vec<ListItem> = state
        .options
        .iter()
        .map(|o| ListItem::new(o.label.as_str()))
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, list_area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Partner;

    fn picker() -> PickerState {
        PickerState::new(
            "Payer",
            PickerTarget::Expense {
                id: ExpenseId::new(),
                column: ExpenseColumn::Payer,
            },
            vec![
                SelectOption::new("(none)", Choice::Unassigned),
                SelectOption::new("Ana", Choice::Partner(Partner::X)),
                SelectOption::new("Ben", Choice::Partner(Partner::Y)),
            ],
        )
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut p = picker();
        p.move_up();
        assert_eq!(p.selected, 0);
        p.move_down();
        p.move_down();
        p.move_down();
        assert_eq!(p.choice(), Some(Choice::Partner(Partner::Y)));
    }

    #[test]
    fn test_preselect() {
        let p = picker().preselect("Ana");
        assert_eq!(p.choice(), Some(Choice::Partner(Partner::X)));
        let p = picker().preselect("nobody");
        assert_eq!(p.selected, 0);
    }
}
