//! Toast notifications
//!
//! Notices from the event channel become short-lived overlay boxes in the
//! bottom-right corner, stacked upward, colored by severity. Expiry is
//! checked on the tick.

use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::notify::Notification;
use crate::tui::theme::Theme;

const TOAST_LIFETIME: Duration = Duration::from_secs(3);
const TOAST_HEIGHT: u16 = 4;
const TOAST_MAX_WIDTH: u16 = 44;

pub struct Toast {
    notification: Notification,
    created: Instant,
}

impl Toast {
    pub fn new(notification: Notification) -> Self {
        Self {
            notification,
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created.elapsed() >= TOAST_LIFETIME
    }

    /// Render this toast into `slot` positions from the bottom of `area`.
    pub fn render(&self, f: &mut Frame, area: Rect, slot: u16, theme: &Theme) {
        let width = (self.notification.message.width() as u16 + 4)
            .max(self.notification.title.width() as u16 + 4)
            .clamp(20, TOAST_MAX_WIDTH)
            .min(area.width);
        let bottom_offset = 1 + slot * TOAST_HEIGHT;
        if bottom_offset + TOAST_HEIGHT > area.height || width + 2 > area.width {
            return;
        }

        let rect = Rect {
            x: area.x + area.width - width - 2,
            y: area.y + area.height - bottom_offset - TOAST_HEIGHT,
            width,
            height: TOAST_HEIGHT,
        };

        let color = theme.severity(self.notification.severity);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Span::styled(
                format!(" {} ", self.notification.title),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));

        let body = Paragraph::new(Line::from(Span::styled(
            self.notification.message.clone(),
            Style::default().fg(theme.fg),
        )))
        .wrap(ratatui::widgets::Wrap { trim: true })
        .block(block);

        f.render_widget(Clear, rect);
        f.render_widget(body, rect);
    }
}
