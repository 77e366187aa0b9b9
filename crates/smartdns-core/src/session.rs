// ── Session validity ──
//
// Session expiry is never shown as a local error. Tables route backend
// errors through `check_session_error`, which hands expiries to an
// application-level `SessionHandler` (re-login, or a global prompt).

use tracing::info;

use crate::error::CoreError;

pub trait SessionHandler: Send + Sync {
    fn on_session_expired(&self, error: &CoreError);
}

/// Returns `true` if `error` is a session expiry, after notifying `handler`.
pub fn check_session_error(error: &CoreError, handler: &dyn SessionHandler) -> bool {
    if error.is_session_expired() {
        info!("session expired, delegating to session handler");
        handler.on_session_expired(error);
        true
    } else {
        false
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts expiries without acting on them.
    #[derive(Debug, Default)]
    pub(crate) struct CountingSessionHandler {
        count: AtomicUsize,
    }

    impl CountingSessionHandler {
        pub(crate) fn count(&self) -> usize {
            self.count.load(Ordering::Relaxed)
        }
    }

    impl SessionHandler for CountingSessionHandler {
        fn on_session_expired(&self, _error: &CoreError) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn only_expiry_reaches_handler() {
        let handler = CountingSessionHandler::default();
        assert!(check_session_error(&CoreError::SessionExpired, &handler));
        assert!(!check_session_error(&CoreError::MissingPayload, &handler));
        assert_eq!(handler.count(), 1);
    }
}
