// ── Request dispatcher ──
//
// Deduplicates fetches by their serialized key and retires superseded
// requests. Each issued ticket carries a generation; only the ticket
// matching the latest generation may deliver a result. Issuing a new
// ticket cancels the previous in-flight request's token.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Handle for one issued request.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    key: String,
    cancel: CancellationToken,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Serialized request key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Token cancelled once this ticket is superseded.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[derive(Debug, Default)]
pub struct RequestDispatcher {
    generation: u64,
    last_key: Option<String>,
    in_flight: Option<CancellationToken>,
}

impl RequestDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a request key. Keys are plain data, so failure only
    /// occurs for non-string map keys; such keys never dedupe.
    pub fn key_of(key: &impl Serialize) -> String {
        serde_json::to_string(key).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }

    /// Issue a ticket unless `key` equals the most recently issued key.
    pub fn begin(&mut self, key: &impl Serialize) -> Option<FetchTicket> {
        let key = Self::key_of(key);
        if self.last_key.as_deref() == Some(key.as_str()) {
            trace!(key, "request key unchanged, not refetching");
            return None;
        }
        Some(self.issue(key))
    }

    /// Issue a ticket even if the key is unchanged.
    pub fn force(&mut self, key: &impl Serialize) -> FetchTicket {
        self.issue(Self::key_of(key))
    }

    fn issue(&mut self, key: String) -> FetchTicket {
        if let Some(previous) = self.in_flight.take() {
            debug!(generation = self.generation, "superseding in-flight request");
            previous.cancel();
        }
        self.generation += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.last_key = Some(key.clone());
        FetchTicket {
            generation: self.generation,
            key,
            cancel,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Settle a ticket. Returns `false` for a superseded ticket, whose
    /// result must be discarded.
    pub fn complete(&mut self, ticket: &FetchTicket) -> bool {
        if !self.is_current(ticket) {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale response"
            );
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn identical_key_issues_once() {
        let mut d = RequestDispatcher::new();
        assert!(d.begin(&("page", 1)).is_some());
        assert!(d.begin(&("page", 1)).is_none());
        assert!(d.begin(&("page", 2)).is_some());
    }

    #[test]
    fn new_key_cancels_and_supersedes_previous() {
        let mut d = RequestDispatcher::new();
        let first = d.begin(&1).unwrap();
        let second = d.begin(&2).unwrap();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(!d.complete(&first));
        assert!(d.in_flight());
        assert!(d.complete(&second));
        assert!(!d.in_flight());
    }

    #[test]
    fn force_reissues_same_key() {
        let mut d = RequestDispatcher::new();
        let a = d.begin(&"k").unwrap();
        assert!(d.complete(&a));
        let b = d.force(&"k");
        assert_eq!(a.key(), b.key());
        assert!(b.generation() > a.generation());
        assert!(!d.is_current(&a));
    }
}
