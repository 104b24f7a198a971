//! Grid interaction state machine
//!
//! The grid is either `Idle` (optionally with a focused cell) or `Editing`
//! one cell with a pending value. Every input is fed through
//! [`GridState::dispatch`], which updates the state and returns at most one
//! effect for the host to carry out. The state knows nothing about
//! rendering; it only asks a [`GridSource`] for bounds, cell text and the
//! editor kind of a cell.

use super::columns::CellEditor;

/// A (row, column) position in the visible grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub row: usize,
    pub col: usize,
}

impl GridCoord {
    pub const ORIGIN: GridCoord = GridCoord { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// What the grid exposes to the state machine
pub trait GridSource {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Editing behavior of one cell
    fn editor(&self, coord: GridCoord) -> CellEditor;

    /// The committed value of a cell as edit text
    fn cell_text(&self, coord: GridCoord) -> String;

    fn contains(&self, coord: GridCoord) -> bool {
        coord.row < self.row_count() && coord.col < self.column_count()
    }

    /// First column a freshly added row should start editing in
    fn first_text_column(&self, row: usize) -> Option<usize> {
        (0..self.column_count()).find(|col| self.editor(GridCoord::new(row, *col)).is_text_entry())
    }
}

/// Navigation and editing keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Tab,
    BackTab,
    Escape,
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEvent {
    PointerDown(GridCoord),
    Key(GridKey),
    /// A printable character typed into the grid
    Input(char),
    Backspace,
    /// The grid lost focus
    Blur,
    /// A new row exists at this visible index
    RowAdded { row: usize },
    /// Rows were added, removed or reordered
    RowsReshaped,
}

/// Work the host must carry out after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridEffect {
    /// Persist a changed value (only issued when it differs from the
    /// value editing started from)
    Commit { coord: GridCoord, value: String },
    /// Open the picker for a select cell or flip a toggle cell
    Activate(GridCoord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridMode {
    Idle(Option<GridCoord>),
    Editing {
        coord: GridCoord,
        original: String,
        pending: String,
    },
}

impl Default for GridMode {
    fn default() -> Self {
        Self::Idle(None)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridState {
    mode: GridMode,
}

impl GridState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &GridMode {
        &self.mode
    }

    /// The focused cell, whether idle or editing
    pub fn focus(&self) -> Option<GridCoord> {
        match &self.mode {
            GridMode::Idle(focus) => *focus,
            GridMode::Editing { coord, .. } => Some(*coord),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, GridMode::Editing { .. })
    }

    /// The value being typed, while editing
    pub fn pending(&self) -> Option<&str> {
        match &self.mode {
            GridMode::Editing { pending, .. } => Some(pending),
            GridMode::Idle(_) => None,
        }
    }

    /// Apply one event
    pub fn dispatch(&mut self, event: GridEvent, source: &impl GridSource) -> Option<GridEffect> {
        match event {
            GridEvent::PointerDown(coord) => self.pointer_down(coord, source),
            GridEvent::Key(key) => self.key(key, source),
            GridEvent::Input(c) => self.input(c, source),
            GridEvent::Backspace => {
                if let GridMode::Editing { pending, .. } = &mut self.mode {
                    pending.pop();
                }
                None
            }
            GridEvent::Blur => {
                let coord = self.focus()?;
                let effect = self.finish_edit();
                self.mode = GridMode::Idle(Some(coord));
                effect
            }
            GridEvent::RowAdded { row } => {
                // Any edit in flight referred to the old row layout
                self.mode = GridMode::Idle(None);
                if row >= source.row_count() {
                    return None;
                }
                let col = source.first_text_column(row)?;
                self.begin_edit(GridCoord::new(row, col), source);
                None
            }
            GridEvent::RowsReshaped => {
                self.mode = GridMode::Idle(None);
                None
            }
        }
    }

    fn pointer_down(&mut self, coord: GridCoord, source: &impl GridSource) -> Option<GridEffect> {
        if !source.contains(coord) {
            return None;
        }
        if let GridMode::Editing { coord: current, .. } = &self.mode {
            if *current == coord {
                return None;
            }
        }
        let effect = self.finish_edit();
        if source.editor(coord).is_text_entry() {
            self.begin_edit(coord, source);
        } else {
            self.mode = GridMode::Idle(Some(coord));
        }
        effect
    }

    fn key(&mut self, key: GridKey, source: &impl GridSource) -> Option<GridEffect> {
        if self.is_editing() {
            return self.editing_key(key, source);
        }

        let Some(focus) = self.focus() else {
            // Nothing focused yet: any navigation lands on the first cell
            if key != GridKey::Escape && source.contains(GridCoord::ORIGIN) {
                self.mode = GridMode::Idle(Some(GridCoord::ORIGIN));
            }
            return None;
        };

        match key {
            GridKey::Enter => match source.editor(focus) {
                editor if editor.is_text_entry() => {
                    self.begin_edit(focus, source);
                    None
                }
                CellEditor::Select | CellEditor::Toggle => Some(GridEffect::Activate(focus)),
                _ => None,
            },
            GridKey::Escape => None,
            nav => {
                self.mode = GridMode::Idle(Some(step(focus, nav, source)));
                None
            }
        }
    }

    fn editing_key(&mut self, key: GridKey, source: &impl GridSource) -> Option<GridEffect> {
        let coord = self.focus()?;
        match key {
            GridKey::Escape => {
                self.mode = GridMode::Idle(Some(coord));
                None
            }
            GridKey::Enter => {
                let effect = self.finish_edit();
                self.mode = GridMode::Idle(Some(step(coord, GridKey::Down, source)));
                effect
            }
            GridKey::Tab => {
                let effect = self.finish_edit();
                self.mode = GridMode::Idle(Some(step(coord, GridKey::Right, source)));
                effect
            }
            GridKey::BackTab => {
                let effect = self.finish_edit();
                self.mode = GridMode::Idle(Some(step(coord, GridKey::Left, source)));
                effect
            }
            // No caret inside a cell; arrows are ignored while typing
            GridKey::Up | GridKey::Down | GridKey::Left | GridKey::Right => None,
        }
    }

    fn input(&mut self, c: char, source: &impl GridSource) -> Option<GridEffect> {
        if let GridMode::Editing { pending, .. } = &mut self.mode {
            pending.push(c);
            return None;
        }
        // Typing over a focused text cell replaces its value
        if let Some(coord) = self.focus() {
            if source.contains(coord) && source.editor(coord).is_text_entry() {
                self.mode = GridMode::Editing {
                    coord,
                    original: source.cell_text(coord),
                    pending: c.to_string(),
                };
            }
        }
        None
    }

    fn begin_edit(&mut self, coord: GridCoord, source: &impl GridSource) {
        let text = source.cell_text(coord);
        self.mode = GridMode::Editing {
            coord,
            original: text.clone(),
            pending: text,
        };
    }

    /// Leave editing, yielding a commit when the value changed
    fn finish_edit(&mut self) -> Option<GridEffect> {
        let mode = std::mem::take(&mut self.mode);
        match mode {
            GridMode::Editing {
                coord,
                original,
                pending,
            } => {
                self.mode = GridMode::Idle(Some(coord));
                (pending != original).then_some(GridEffect::Commit {
                    coord,
                    value: pending,
                })
            }
            idle => {
                self.mode = idle;
                None
            }
        }
    }
}

/// Move one cell in a direction, clamped to the grid
fn step(from: GridCoord, key: GridKey, source: &impl GridSource) -> GridCoord {
    let last_row = source.row_count().saturating_sub(1);
    let last_col = source.column_count().saturating_sub(1);
    match key {
        GridKey::Up => GridCoord::new(from.row.saturating_sub(1), from.col),
        GridKey::Down | GridKey::Enter => GridCoord::new((from.row + 1).min(last_row), from.col),
        GridKey::Left | GridKey::BackTab => GridCoord::new(from.row, from.col.saturating_sub(1)),
        GridKey::Right | GridKey::Tab => GridCoord::new(from.row, (from.col + 1).min(last_col)),
        GridKey::Escape => from,
    }
}
