//! Notification stack, drawn top-left on narrow terminals and bottom-left
//! otherwise.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use smartdns_core::{Notification, NotificationAnchor, NotificationLevel};

use crate::component::View;
use crate::theme::ThemeToken;

const TOAST_HEIGHT: u16 = 3;
const MAX_WIDTH: u16 = 60;
/// Rows kept free under a bottom-anchored stack (tab bar + status bar).
const CHROME_ROWS: u16 = 2;

/// Areas for `count` toasts, first notification first. Toasts that don't
/// fit vertically are dropped.
pub fn layout(area: Rect, anchor: NotificationAnchor, widths: &[u16]) -> Vec<Rect> {
    let room = match anchor {
        NotificationAnchor::TopLeft => area.height,
        NotificationAnchor::BottomLeft => area.height.saturating_sub(CHROME_ROWS),
    };
    let fits = usize::from(room / TOAST_HEIGHT);
    let widths = &widths[..widths.len().min(fits)];
    let max_width = MAX_WIDTH.min(area.width.saturating_sub(1));

    let mut out = Vec::with_capacity(widths.len());
    let mut offset = 0u16;
    for &w in widths {
        let width = w.clamp(20.min(max_width), max_width);
        let y = match anchor {
            NotificationAnchor::TopLeft => area.y + offset,
            NotificationAnchor::BottomLeft => {
                area.y + room.saturating_sub(offset + TOAST_HEIGHT)
            }
        };
        out.push(Rect::new(area.x + 1, y, width, TOAST_HEIGHT));
        offset += TOAST_HEIGHT;
    }
    out
}

pub fn render<'a>(
    frame: &mut Frame,
    area: Rect,
    anchor: NotificationAnchor,
    notifications: impl Iterator<Item = &'a Notification>,
    view: &View,
) {
    let toasts: Vec<(&Notification, Line<'_>)> = notifications
        .map(|n| (n, toast_line(n, view)))
        .collect();
    let widths: Vec<u16> = toasts
        .iter()
        .map(|(_, line)| u16::try_from(line.width()).unwrap_or(MAX_WIDTH).saturating_add(2))
        .collect();

    for ((notif, line), rect) in toasts.into_iter().zip(layout(area, anchor, &widths)) {
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(view.theme.fg(level_token(notif.level)))
            .style(view.theme.surface());
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

fn level_token(level: NotificationLevel) -> ThemeToken {
    match level {
        NotificationLevel::Success => ThemeToken::Success,
        NotificationLevel::Error => ThemeToken::Error,
        NotificationLevel::Info => ThemeToken::Info,
    }
}

fn toast_line<'a>(notif: &'a Notification, view: &View) -> Line<'a> {
    let icon = match notif.level {
        NotificationLevel::Success => "✓",
        NotificationLevel::Error => "✗",
        NotificationLevel::Info => "·",
    };
    Line::from(vec![
        Span::styled(format!(" {icon} "), view.theme.fg(level_token(notif.level))),
        Span::styled(notif.message.as_str(), view.theme.fg(ThemeToken::Text)),
    ])
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn top_left_stacks_downwards() {
        let area = Rect::new(0, 0, 50, 24);
        let rects = layout(area, NotificationAnchor::TopLeft, &[10, 30]);
        assert_eq!(rects, vec![Rect::new(1, 0, 20, 3), Rect::new(1, 3, 30, 3)]);
    }

    #[test]
    fn bottom_left_stacks_upwards_above_status_bar() {
        let area = Rect::new(0, 0, 120, 24);
        let rects = layout(area, NotificationAnchor::BottomLeft, &[25, 200]);
        assert_eq!(rects, vec![Rect::new(1, 19, 25, 3), Rect::new(1, 16, 60, 3)]);
    }

    #[test]
    fn toasts_that_do_not_fit_are_dropped() {
        let area = Rect::new(0, 0, 80, 8);
        let rects = layout(area, NotificationAnchor::BottomLeft, &[20; 5]);
        assert_eq!(rects.len(), 2);
    }
}
