//! Synchronous, fire-and-forget notifications for presentation layers.

use std::fmt;

/// Economy values changed (tick, purchase, reset, offline credit).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateChanged;

/// A prestige reset completed and awarded `payout` prestige currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrestigeOccurred {
    pub payout: u64,
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<E> = Box<dyn FnMut(&E) + Send>;

/// Ordered list of listeners for one event type.
pub struct Subscribers<E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&E) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Invoke every listener in subscription order.
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_reaches_listeners_until_unsubscribed() {
        let hits = Arc::new(AtomicU32::new(0));
        let mut subs = Subscribers::<StateChanged>::new();
        let h = hits.clone();
        let id = subs.subscribe(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        subs.emit(&StateChanged);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.emit(&StateChanged);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(subs.is_empty());
    }
}
