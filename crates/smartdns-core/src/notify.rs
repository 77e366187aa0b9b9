// ── Transient notifications ──
//
// A bounded queue of toasts. At most `MAX_VISIBLE` are shown; each expires
// `NOTIFICATION_LIFETIME` after it was pushed. The viewport anchor follows
// the terminal width.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const MAX_VISIBLE: usize = 5;
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(6);
/// At or below this many columns the viewport moves to the top.
pub const NARROW_WIDTH: u16 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Where the notification stack is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAnchor {
    TopLeft,
    BottomLeft,
}

impl NotificationAnchor {
    pub fn for_width(columns: u16) -> Self {
        if columns <= NARROW_WIDTH {
            Self::TopLeft
        } else {
            Self::BottomLeft
        }
    }
}

#[derive(Debug)]
struct Queued {
    notification: Notification,
    shown_at: Instant,
}

#[derive(Debug)]
pub struct NotificationQueue {
    items: VecDeque<Queued>,
    lifetime: Duration,
    anchor: NotificationAnchor,
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
            lifetime: NOTIFICATION_LIFETIME,
            anchor: NotificationAnchor::BottomLeft,
        }
    }
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notification: Notification) {
        self.push_at(notification, Instant::now());
    }

    pub fn push_at(&mut self, notification: Notification, now: Instant) {
        self.items.push_back(Queued {
            notification,
            shown_at: now,
        });
        while self.items.len() > MAX_VISIBLE {
            self.items.pop_front();
        }
    }

    /// Drop expired entries. Returns `true` if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        let lifetime = self.lifetime;
        self.items
            .retain(|q| now.saturating_duration_since(q.shown_at) < lifetime);
        self.items.len() != before
    }

    /// Oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter().map(|q| &q.notification)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn anchor(&self) -> NotificationAnchor {
        self.anchor
    }

    /// Recompute the anchor for a new terminal width.
    pub fn set_viewport_width(&mut self, columns: u16) -> NotificationAnchor {
        self.anchor = NotificationAnchor::for_width(columns);
        self.anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_visible_at_five() {
        let mut q = NotificationQueue::new();
        let now = Instant::now();
        for i in 0..7 {
            q.push_at(Notification::info(format!("n{i}")), now);
        }
        let shown: Vec<_> = q.visible().map(|n| n.message.as_str()).collect();
        assert_eq!(shown, ["n2", "n3", "n4", "n5", "n6"]);
    }

    #[test]
    fn expires_after_six_seconds() {
        let mut q = NotificationQueue::new();
        let start = Instant::now();
        q.push_at(Notification::success("done"), start);
        assert!(!q.prune(start + Duration::from_secs(5)));
        assert!(q.prune(start + Duration::from_secs(6)));
        assert!(q.is_empty());
    }

    #[test]
    fn anchor_follows_width() {
        let mut q = NotificationQueue::new();
        assert_eq!(q.set_viewport_width(60), NotificationAnchor::TopLeft);
        assert_eq!(q.set_viewport_width(61), NotificationAnchor::BottomLeft);
        assert_eq!(q.anchor(), NotificationAnchor::BottomLeft);
    }
}
