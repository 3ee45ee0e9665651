use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

pub(crate) type Subscriber<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Type-erased removal, so `Subscription` does not carry the state type.
pub(crate) trait Registry: Send + Sync {
    fn remove(&self, id: u64) -> bool;
}

struct SubscriberList<S> {
    next_id: u64,
    entries: Vec<(u64, Subscriber<S>)>,
}

/// Subscribers of one store, in registration order.
pub(crate) struct Subscribers<S> {
    store: String,
    list: Mutex<SubscriberList<S>>,
}

impl<S> Subscribers<S> {
    pub(crate) fn new(store: String) -> Self {
        Self {
            store,
            list: Mutex::new(SubscriberList {
                next_id: 0,
                entries: Vec::new(),
            }),
        }
    }

    pub(crate) fn insert(&self, subscriber: Subscriber<S>) -> u64 {
        let mut list = self.list.lock();
        let id = list.next_id;
        list.next_id += 1;
        list.entries.push((id, subscriber));
        tracing::debug!(store = %self.store, subscriber = id, "Subscriber added");
        id
    }

    /// Subscribers registered right now.
    ///
    /// Notification iterates this copy with the lock released, so callbacks
    /// may subscribe or unsubscribe; changes apply from the next dispatch.
    pub(crate) fn snapshot(&self) -> Vec<Subscriber<S>> {
        self.list
            .lock()
            .entries
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.list.lock().entries.len()
    }
}

impl<S> Registry for Subscribers<S>
where
    S: Send + Sync + 'static,
{
    fn remove(&self, id: u64) -> bool {
        let mut list = self.list.lock();
        let Some(pos) = list.entries.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        list.entries.remove(pos);
        tracing::debug!(store = %self.store, subscriber = id, "Subscriber removed");
        true
    }
}

/// Handle returned by [`Store::subscribe`](crate::Store::subscribe).
///
/// Dropping the handle does not unsubscribe; call
/// [`unsubscribe`](Subscription::unsubscribe) or convert it with
/// [`guard`](Subscription::guard).
#[must_use = "dropping a Subscription leaves the callback registered; call `unsubscribe` or `guard`"]
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Registry>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: Weak<dyn Registry>) -> Self {
        Self { id, registry }
    }

    /// Remove the callback from its store.
    ///
    /// Calling this more than once, or after the store is gone, does nothing.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    /// Unsubscribe when the returned guard is dropped.
    pub fn guard(self) -> SubscriptionGuard {
        SubscriptionGuard { subscription: self }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// RAII guard for a subscription.
#[derive(Debug)]
pub struct SubscriptionGuard {
    subscription: Subscription,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
