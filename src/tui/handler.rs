//! Event handler for the TUI
//!
//! Routes keyboard and mouse events to the appropriate handlers
//! based on the current application state.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::grid::{GridEvent, GridKey};

use super::app::{ActiveDialog, ActiveView, App};
use super::event::Event;

/// Handle an incoming event
pub fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        // Leaving the terminal counts as leaving the cell
        Event::FocusLost => app.blur(),
        Event::Tick => {
            app.poll_writes();
            app.notifications.remove_expired();
        }
        Event::Resize(_, _) => {}
    }
}

fn grid_key(code: KeyCode) -> Option<GridKey> {
    Some(match code {
        KeyCode::Up => GridKey::Up,
        KeyCode::Down => GridKey::Down,
        KeyCode::Left => GridKey::Left,
        KeyCode::Right => GridKey::Right,
        KeyCode::Enter => GridKey::Enter,
        KeyCode::Tab => GridKey::Tab,
        KeyCode::BackTab => GridKey::BackTab,
        KeyCode::Esc => GridKey::Escape,
        _ => return None,
    })
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if app.active_dialog != ActiveDialog::None {
        handle_dialog_key(app, key);
        return;
    }

    if app.is_editing() {
        handle_editing_key(app, key);
        return;
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.active_dialog = ActiveDialog::Help,
        KeyCode::Char('1') => app.switch_view(ActiveView::Expenses),
        KeyCode::Char('2') => app.switch_view(ActiveView::Incomes),
        KeyCode::Char('3') => app.switch_view(ActiveView::Config),
        _ => match app.active_view {
            ActiveView::Expenses | ActiveView::Incomes => handle_grid_key(app, key),
            ActiveView::Config => handle_config_key(app, key),
        },
    }
}

/// Keys while a cell is being edited: everything printable is text
fn handle_editing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => app.grid_event(GridEvent::Backspace),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.grid_event(GridEvent::Input(c))
        }
        code => {
            if let Some(key) = grid_key(code) {
                app.grid_event(GridEvent::Key(key));
            }
        }
    }
}

fn handle_grid_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('a') => app.add_row(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_row_delete(),
        KeyCode::Char('s') => {
            if let Some(focus) = app.active_grid().and_then(|g| g.focus()) {
                app.sort_by_column(focus.col);
            }
        }
        KeyCode::Char('f') if app.active_view == ActiveView::Expenses => app.cycle_payer_filter(),
        KeyCode::Char('g') if app.active_view == ActiveView::Expenses => app.cycle_grouping(),
        KeyCode::Esc => {
            app.notifications.dismiss();
            app.grid_event(GridEvent::Key(GridKey::Escape));
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.grid_event(GridEvent::Input(c))
        }
        code => {
            if let Some(key) = grid_key(code) {
                app.grid_event(GridEvent::Key(key));
            }
        }
    }
}

fn handle_config_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::BackTab => app.config_section(-1),
        KeyCode::Right | KeyCode::Tab => app.config_section(1),
        KeyCode::Up | KeyCode::Char('k') => app.config_move(-1),
        KeyCode::Down | KeyCode::Char('j') => app.config_move(1),
        KeyCode::Char('a') => app.begin_add_reference(),
        KeyCode::Char('r') | KeyCode::Enter => app.begin_rename(),
        KeyCode::Char('x') | KeyCode::Delete => app.request_reference_delete(),
        KeyCode::Char('o') => app.cycle_account_owner(),
        KeyCode::Esc => app.notifications.dismiss(),
        _ => {}
    }
}

/// Handle keys while a dialog is open; the dialog is taken out and put
/// back unless the key closed it
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match std::mem::take(&mut app.active_dialog) {
        ActiveDialog::None | ActiveDialog::Help => {}
        ActiveDialog::Picker(mut picker) => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                picker.move_up();
                app.active_dialog = ActiveDialog::Picker(picker);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                picker.move_down();
                app.active_dialog = ActiveDialog::Picker(picker);
            }
            KeyCode::Enter => {
                if let Some(choice) = picker.choice() {
                    app.pick(picker.target, choice);
                }
            }
            KeyCode::Esc => {}
            _ => app.active_dialog = ActiveDialog::Picker(picker),
        },
        ActiveDialog::Confirm(confirm) => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm(confirm.action),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
            _ => app.active_dialog = ActiveDialog::Confirm(confirm),
        },
        ActiveDialog::Input(mut input) => match key.code {
            KeyCode::Enter => app.submit_input(input),
            KeyCode::Esc => {}
            KeyCode::Backspace => {
                input.pop();
                app.active_dialog = ActiveDialog::Input(input);
            }
            KeyCode::Char(c) => {
                input.push(c);
                app.active_dialog = ActiveDialog::Input(input);
            }
            _ => app.active_dialog = ActiveDialog::Input(input),
        },
    }
}

/// Handle a mouse event: tab clicks, header clicks (sort) and cell
/// clicks (focus, and start editing for text cells)
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.active_dialog != ActiveDialog::None {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {}
        MouseEventKind::ScrollUp if !app.is_editing() => {
            app.grid_event(GridEvent::Key(GridKey::Up));
            return;
        }
        MouseEventKind::ScrollDown if !app.is_editing() => {
            app.grid_event(GridEvent::Key(GridKey::Down));
            return;
        }
        _ => return,
    }

    let (x, y) = (mouse.column, mouse.row);
    if y == 0 {
        let tab = app
            .tab_hits
            .iter()
            .find(|(_, start, end)| x >= *start && x < *end)
            .map(|(view, _, _)| *view);
        if let Some(view) = tab {
            app.switch_view(view);
        }
        return;
    }

    let hits = match app.active_view {
        ActiveView::Expenses => &app.expense_hits,
        ActiveView::Incomes => &app.income_hits,
        ActiveView::Config => return,
    };
    let header = hits.header_column(x, y);
    let cell = hits.cell_at(x, y);

    if let Some(col) = header {
        app.blur();
        app.sort_by_column(col);
    } else if let Some(coord) = cell {
        app.grid_event(GridEvent::PointerDown(coord));
    } else {
        app.blur();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::preferences::MemoryPreferenceStore;
    use crate::config::settings::Settings;
    use crate::error::FairShareResult;
    use crate::grid::{GridCoord, GridMode};
    use crate::models::{Expense, ExpenseId, Household, Money, NewExpense};
    use crate::persistence::{Persistence, WriteQueue, WriteReceipt, WriteRequest};
    use crate::tui::widgets::GridHitMap;

    struct Accepting;

    impl Persistence for Accepting {
        fn execute(&mut self, _request: WriteRequest) -> FairShareResult<WriteReceipt> {
            Ok(WriteReceipt::Removed)
        }
    }

    fn app() -> App {
        let mut household = Household::default();
        household.expenses.push(Expense::create(
            ExpenseId::new(),
            NewExpense {
                name: "Rent".into(),
                amount: Money::from_whole(1000),
                ..Default::default()
            },
        ));
        App::new(
            household,
            Settings::default(),
            Box::new(MemoryPreferenceStore::new()),
            WriteQueue::spawn(Accepting),
        )
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_event(app, Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_quit_key_types_while_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.is_editing());

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit);
        assert_eq!(app.expense_grid.pending(), Some("Rentq"));

        press(&mut app, KeyCode::Esc);
        assert!(!app.is_editing());
        assert_eq!(app.household.expenses[0].name, "Rent");

        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_focus_lost_commits_edit() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('!'));
        handle_event(&mut app, Event::FocusLost);

        assert_eq!(app.household.expenses[0].name, "Rent!");
        assert!(matches!(app.expense_grid.mode(), GridMode::Idle(Some(_))));
    }

    #[test]
    fn test_click_on_cell_focuses_it() {
        let mut app = app();
        app.expense_hits = GridHitMap {
            header_y: 3,
            body_y: 4,
            columns: vec![(0, 1, 20), (1, 22, 14)],
            lines: vec![Some(0)],
        };
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 25,
            row: 4,
            modifiers: KeyModifiers::NONE,
        };
        handle_event(&mut app, Event::Mouse(click));
        assert_eq!(app.expense_grid.focus(), Some(GridCoord::new(0, 1)));
    }

    #[test]
    fn test_delete_asks_for_confirmation() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('x'));
        assert!(matches!(app.active_dialog, ActiveDialog::Confirm(_)));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.active_dialog, ActiveDialog::None);
        assert_eq!(app.household.expenses.len(), 1);

        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.household.expenses.is_empty());
    }
}
