//! Toast notifications
//!
//! Failed writes arrive asynchronously from the write queue and are shown
//! here; nothing on screen is rolled back. A burst of identical failures
//! (every edit hitting a full disk, say) collapses into one toast with a
//! repeat count.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Toasts kept at most; the oldest is dropped first
const MAX_QUEUED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    fn color(self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Error => Color::Red,
        }
    }

    fn lifetime(self) -> Duration {
        match self {
            Self::Info => Duration::from_secs(3),
            Self::Error => Duration::from_secs(6),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// How many times the same message was raised while queued
    pub repeats: usize,
    shown_at: Instant,
}

impl Notification {
    fn with_severity(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            repeats: 1,
            shown_at: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Info)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_severity(message, Severity::Error)
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.severity.lifetime()
    }

    fn title(&self) -> String {
        let label = match self.severity {
            Severity::Info => "Info",
            Severity::Error => "Error",
        };
        if self.repeats > 1 {
            format!(" {} (x{}) ", label, self.repeats)
        } else {
            format!(" {} ", label)
        }
    }
}

pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

impl Widget for NotificationWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = self.notification.severity.color();
        Clear.render(area, buf);

        Paragraph::new(self.notification.message.as_str())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(self.notification.title())
                    .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD)),
            )
            .render(area, buf);
    }
}

/// Toasts waiting to be shown, oldest first
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Vec<Notification>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a toast; a repeat of a queued message bumps its count and
    /// restarts its timer instead
    pub fn push(&mut self, notification: Notification) {
        if let Some(existing) = self
            .pending
            .iter_mut()
            .find(|n| n.severity == notification.severity && n.message == notification.message)
        {
            existing.repeats += 1;
            existing.shown_at = notification.shown_at;
            return;
        }
        if self.pending.len() == MAX_QUEUED {
            self.pending.remove(0);
        }
        self.pending.push(notification);
    }

    /// Only the toast on screen ages; the rest wait their turn
    pub fn remove_expired(&mut self) {
        if self.pending.first().is_some_and(Notification::is_expired) {
            self.pending.remove(0);
            if let Some(next) = self.pending.first_mut() {
                next.shown_at = Instant::now();
            }
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.pending.first()
    }

    pub fn dismiss(&mut self) {
        if !self.pending.is_empty() {
            self.pending.remove(0);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_failure_collapses() {
        let mut queue = NotificationQueue::new();
        queue.push(Notification::error("update expense Rent: Could not save: disk full"));
        queue.push(Notification::error("update expense Rent: Could not save: disk full"));
        queue.push(Notification::info("update expense Rent: Could not save: disk full"));

        assert_eq!(queue.len(), 2);
        let first = queue.current().unwrap();
        assert_eq!(first.repeats, 2);
        assert_eq!(first.title(), " Error (x2) ");
    }

    #[test]
    fn test_queue_is_capped() {
        let mut queue = NotificationQueue::new();
        for i in 0..MAX_QUEUED + 2 {
            queue.push(Notification::error(format!("failure {}", i)));
        }
        assert_eq!(queue.len(), MAX_QUEUED);
        assert_eq!(queue.current().unwrap().message, "failure 2");

        queue.dismiss();
        assert_eq!(queue.current().unwrap().message, "failure 3");
    }

    #[test]
    fn test_fresh_toast_is_not_expired() {
        let n = Notification::info("Added expense is hidden by the payer filter");
        assert!(!n.is_expired());
        assert_eq!(n.title(), " Info ");
    }
}
