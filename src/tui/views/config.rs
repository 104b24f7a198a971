//! Configuration view
//!
//! Partner names on top; categories, budgets and payment methods side by
//! side below, each entry with the number of expenses using it.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{Partner, PartnerNames};
use crate::tui::app::{reference_entries, App, ConfigSection, ReferenceEntry};
use crate::tui::layout::ConfigLayout;

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn entry_label(entry: &ReferenceEntry, names: &PartnerNames) -> String {
    let mut label = entry.name.clone();
    if entry.id.kind() == crate::models::ReferenceKind::LinkedAccount {
        let owner = entry.owner.map_or("Joint", |p| names.name(p));
        label.push_str(&format!(" · {}", owner));
    }
    if entry.usage > 0 {
        label.push_str(&format!(" ({})", entry.usage));
    }
    label
}

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let layout = ConfigLayout::new(area);
    let config = app.config;
    let names = &app.settings.partners;

    let partners_active = config.section == ConfigSection::Partners;
    let lines: Vec<Line> = Partner::ALL
        .iter()
        .enumerate()
        .map(|(idx, partner)| {
            let style = if partners_active && idx == config.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!(" Partner {}: ", partner), Style::default().fg(Color::DarkGray)),
                Span::styled(names.name(*partner).to_string(), style),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Partners ")
                .borders(Borders::ALL)
                .border_style(border_style(partners_active)),
        ),
        layout.partners,
    );

    let sections = [
        ConfigSection::Categories,
        ConfigSection::Budgets,
        ConfigSection::Accounts,
    ];
    for (section, pane) in sections.into_iter().zip(layout.lists) {
        let Some(kind) = section.kind() else {
            continue;
        };
        let active = config.section == section;
        let entries = reference_entries(&app.household, kind);
        let items: Vec<ListItem> = if entries.is_empty() {
            vec![ListItem::new(Span::styled(
                "(none)",
                Style::default().fg(Color::DarkGray),
            ))]
        } else {
            entries
                .iter()
                .map(|e| ListItem::new(entry_label(e, names)))
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ", kind.plural()))
                    .borders(Borders::ALL)
                    .border_style(border_style(active)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        if active && !entries.is_empty() {
            state.select(Some(config.selected));
        }
        frame.render_stateful_widget(list, pane, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkedAccountId, Partner};
    use crate::persistence::ReferenceId;

    #[test]
    fn test_account_label_shows_owner_and_usage() {
        let names = PartnerNames::new("Ana", "Ben");
        let entry = ReferenceEntry {
            id: ReferenceId::Account(LinkedAccountId::new()),
            name: "Visa".into(),
            owner: Some(Partner::Y),
            usage: 2,
        };
        assert_eq!(entry_label(&entry, &names), "Visa · Ben (2)");

        let joint = ReferenceEntry {
            owner: None,
            usage: 0,
            ..entry
        };
        assert_eq!(entry_label(&joint, &names), "Visa · Joint");
    }
}
