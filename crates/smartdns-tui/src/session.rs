//! Bridges session expiry from the table state machines into the app loop.

use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use smartdns_core::{CoreError, SessionHandler};

use crate::action::Action;

/// Turns a session-expired error into [`Action::SessionExpired`]; the app
/// decides whether to log in again.
pub struct SessionBridge {
    tx: UnboundedSender<Action>,
}

impl SessionBridge {
    pub fn new(tx: UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

impl SessionHandler for SessionBridge {
    fn on_session_expired(&self, error: &CoreError) {
        warn!(error = %error, "session expired");
        let _ = self.tx.send(Action::SessionExpired);
    }
}
