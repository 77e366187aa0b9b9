// ── Scoped listener registration ──
//
// `ListenerRegistry::subscribe` hands back a `Subscription` guard; the
// listener stays registered exactly as long as the guard lives. Storage is
// a `DashMap` so listeners can be added or dropped from any task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

type Listener<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Listeners<E> {
    next_id: AtomicU64,
    by_id: DashMap<u64, Listener<E>>,
}

/// Fan-out of events of type `E` to registered listeners.
pub struct ListenerRegistry<E> {
    inner: Arc<Listeners<E>>,
}

impl<E: 'static> ListenerRegistry<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Listeners {
                next_id: AtomicU64::new(0),
                by_id: DashMap::new(),
            }),
        }
    }

    /// Register `listener` until the returned guard is dropped.
    #[must_use = "dropping the Subscription deregisters the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&E) + Send + Sync + 'static) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.by_id.insert(id, Arc::new(listener));
        let weak: Weak<Listeners<E>> = Arc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.by_id.remove(&id);
                }
            })),
        }
    }

    /// Deliver `event` to every live listener.
    pub fn emit(&self, event: &E) {
        // Snapshot first so a listener may drop its own subscription.
        let listeners: Vec<Listener<E>> =
            self.inner.by_id.iter().map(|e| Arc::clone(e.value())).collect();
        for listener in listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.by_id.is_empty()
    }
}

impl<E: 'static> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// Registration guard. Deregisters its listener on drop.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Deregister now.
    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    #[test]
    fn drop_deregisters() {
        let registry: ListenerRegistry<u32> = ListenerRegistry::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let sub = registry.subscribe(move |n| {
            counter.fetch_add(usize::try_from(*n).unwrap_or(0), Ordering::Relaxed);
        });
        assert_eq!(registry.len(), 1);

        registry.emit(&2);
        drop(sub);
        registry.emit(&5);

        assert_eq!(hits.load(Ordering::Relaxed), 2);
        assert!(registry.is_empty());
    }

    #[test]
    fn guard_outliving_registry_is_harmless() {
        let registry: ListenerRegistry<()> = ListenerRegistry::new();
        let sub = registry.subscribe(|_| {});
        drop(registry);
        sub.cancel();
    }
}
