//! Spreadsheet grid widget
//!
//! Renders fixed-width columns line by line so that every cell's screen
//! position is known exactly. The returned [`GridHitMap`] lets mouse
//! clicks be translated back into grid coordinates and header clicks into
//! sort requests.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::grid::{Align, GridCoord};
use crate::view::SortDirection;

/// One rendered column
#[derive(Debug, Clone)]
pub struct GridColumn {
    pub header: String,
    pub width: u16,
    pub align: Align,
    /// Sort indicator when this column drives the current sort
    pub sorted: Option<SortDirection>,
    pub editable: bool,
}

/// One line of grid body
#[derive(Debug, Clone, PartialEq)]
pub enum GridLine {
    /// A record; `row` is its index in the visible row set
    Data { row: usize, cells: Vec<String> },
    /// Group heading
    Heading(String),
    /// Subtotal or total line, aligned to the columns
    Summary(Vec<String>),
}

impl GridLine {
    fn row(&self) -> Option<usize> {
        match self {
            Self::Data { row, .. } => Some(*row),
            _ => None,
        }
    }
}

/// Scroll position, adjusted on every render to keep the focus visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridScroll {
    pub line: usize,
    pub col: usize,
}

/// Screen geometry of the last rendered grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridHitMap {
    pub header_y: u16,
    pub body_y: u16,
    /// (column index, x, width) for each visible column
    pub columns: Vec<(usize, u16, u16)>,
    /// Grid row shown on each body line, top to bottom
    pub lines: Vec<Option<usize>>,
}

impl GridHitMap {
    fn column_at(&self, x: u16) -> Option<usize> {
        self.columns
            .iter()
            .find(|(_, start, width)| x >= *start && x < start + width)
            .map(|(col, _, _)| *col)
    }

    /// Column whose header was clicked
    pub fn header_column(&self, x: u16, y: u16) -> Option<usize> {
        if y != self.header_y {
            return None;
        }
        self.column_at(x)
    }

    /// Cell under a screen position
    pub fn cell_at(&self, x: u16, y: u16) -> Option<GridCoord> {
        let line = usize::from(y.checked_sub(self.body_y)?);
        let row = (*self.lines.get(line)?)?;
        Some(GridCoord::new(row, self.column_at(x)?))
    }
}

/// Pad or cut `text` to exactly `width` characters
fn fit(text: &str, width: usize, align: Align) -> String {
    let len = text.chars().count();
    if len > width {
        if width == 0 {
            return String::new();
        }
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('…');
        return cut;
    }
    let pad = width - len;
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(pad)),
        Align::Right => format!("{}{}", " ".repeat(pad), text),
        Align::Center => {
            let left = pad / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
        }
    }
}

/// First column to draw so that `focus_col` fits in `width`
fn first_visible_column(columns: &[GridColumn], focus_col: usize, current: usize, width: u16) -> usize {
    let mut start = current.min(focus_col);
    loop {
        let used: u16 = columns[start..=focus_col]
            .iter()
            .map(|c| c.width + 1)
            .sum();
        if used <= width || start == focus_col {
            return start;
        }
        start += 1;
    }
}

/// First body line to draw so that `focus_line` fits in `height`
fn first_visible_line(focus_line: usize, current: usize, height: usize) -> usize {
    if height == 0 {
        return focus_line;
    }
    if focus_line < current {
        focus_line
    } else if focus_line >= current + height {
        focus_line + 1 - height
    } else {
        current
    }
}

/// Render a grid and return its hit map
pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    columns: &[GridColumn],
    lines: &[GridLine],
    focus: Option<GridCoord>,
    pending: Option<&str>,
    scroll: &mut GridScroll,
) -> GridHitMap {
    let mut hit = GridHitMap {
        header_y: area.y,
        body_y: area.y + 1,
        ..Default::default()
    };
    if area.height < 2 || columns.is_empty() {
        return hit;
    }
    let body_height = usize::from(area.height - 1);

    if let Some(focus) = focus {
        scroll.col = first_visible_column(columns, focus.col.min(columns.len() - 1), scroll.col, area.width);
        if let Some(line) = lines.iter().position(|l| l.row() == Some(focus.row)) {
            scroll.line = first_visible_line(line, scroll.line, body_height);
        }
    }
    scroll.line = scroll.line.min(lines.len().saturating_sub(1));
    scroll.col = scroll.col.min(columns.len() - 1);

    let mut x = area.x;
    for (idx, column) in columns.iter().enumerate().skip(scroll.col) {
        if x >= area.x + area.width {
            break;
        }
        let width = column.width.min(area.x + area.width - x);
        hit.columns.push((idx, x, width));
        x += column.width + 1;
    }

    let header_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let header: Vec<Span> = hit
        .columns
        .iter()
        .map(|(idx, _, width)| {
            let column = &columns[*idx];
            let label = match column.sorted {
                Some(SortDirection::Asc) => format!("{} ▲", column.header),
                Some(SortDirection::Desc) => format!("{} ▼", column.header),
                None => column.header.clone(),
            };
            Span::styled(format!("{} ", fit(&label, usize::from(*width), column.align)), header_style)
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(header)),
        Rect::new(area.x, area.y, area.width, 1),
    );

    for (offset, line) in lines.iter().skip(scroll.line).take(body_height).enumerate() {
        let y = area.y + 1 + offset as u16;
        hit.lines.push(line.row());
        let spans: Vec<Span> = match line {
            GridLine::Heading(label) => vec![Span::styled(
                format!("▸ {}", label),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )],
            GridLine::Summary(cells) => hit
                .columns
                .iter()
                .map(|(idx, _, width)| {
                    let text = cells.get(*idx).map(String::as_str).unwrap_or("");
                    Span::styled(
                        format!("{} ", fit(text, usize::from(*width), columns[*idx].align)),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )
                })
                .collect(),
            GridLine::Data { row, cells } => hit
                .columns
                .iter()
                .map(|(idx, _, width)| {
                    let coord = GridCoord::new(*row, *idx);
                    let focused = focus == Some(coord);
                    let text = match (focused, pending) {
                        (true, Some(value)) => format!("{}▏", value),
                        _ => cells.get(*idx).cloned().unwrap_or_default(),
                    };
                    let align = if focused && pending.is_some() {
                        Align::Left
                    } else {
                        columns[*idx].align
                    };
                    let mut style = Style::default();
                    if !columns[*idx].editable {
                        style = style.fg(Color::Gray);
                    }
                    if focus.map(|f| f.row) == Some(*row) {
                        style = style.bg(Color::DarkGray);
                    }
                    if focused {
                        style = if pending.is_some() {
                            Style::default().fg(Color::Black).bg(Color::Yellow)
                        } else {
                            style.add_modifier(Modifier::REVERSED)
                        };
                    }
                    Span::styled(format!("{} ", fit(&text, usize::from(*width), align)), style)
                })
                .collect(),
        };
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(area.x, y, area.width, 1),
        );
    }

    hit
}
