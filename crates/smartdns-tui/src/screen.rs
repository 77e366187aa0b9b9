//! Screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Clients, // 1
    Upstream, // 2
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Clients, Self::Upstream];

    /// Numeric key for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Clients => 1,
            Self::Upstream => 2,
        }
    }

    /// Screen from a numeric key. Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.number() == n)
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Untranslated tab label; doubles as the i18n key.
    pub fn label(self) -> &'static str {
        match self {
            Self::Clients => "Clients",
            Self::Upstream => "Upstream Servers",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn numbers_and_cycling() {
        assert_eq!(ScreenId::from_number(2), Some(ScreenId::Upstream));
        assert_eq!(ScreenId::from_number(3), None);
        assert_eq!(ScreenId::Clients.next(), ScreenId::Upstream);
        assert_eq!(ScreenId::Clients.prev(), ScreenId::Upstream);
        assert_eq!(ScreenId::Upstream.next(), ScreenId::Clients);
    }
}
