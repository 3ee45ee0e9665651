use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::reducer::Action;
use crate::store::{Store, Subscription};

type SelectFn<S, T> = Arc<dyn Fn(&Arc<S>) -> T + Send + Sync>;

struct Cache<S, T> {
    // The Weak keeps the allocation (not the value) alive, so the address
    // cannot be reused by a different state while it is cached.
    input: Weak<S>,
    output: T,
}

/// A memoized computed value over state `S`.
///
/// Clones share the same cache.
///
/// ```
/// use std::sync::Arc;
/// use reducto::Selector;
///
/// let total = Selector::new(|items: &Vec<u32>| items.iter().sum::<u32>());
/// let state = Arc::new(vec![1, 2, 3]);
///
/// assert_eq!(total.get(&state), 6);
/// assert_eq!(total.get(&state), 6);
/// assert_eq!(total.recomputations(), 1);
/// ```
pub struct Selector<S, T> {
    select: SelectFn<S, T>,
    cache: Arc<Mutex<Option<Cache<S, T>>>>,
    recomputations: Arc<AtomicUsize>,
}

impl<S, T> Clone for Selector<S, T> {
    fn clone(&self) -> Self {
        Self {
            select: Arc::clone(&self.select),
            cache: Arc::clone(&self.cache),
            recomputations: Arc::clone(&self.recomputations),
        }
    }
}

impl<S, T> Selector<S, T>
where
    S: Send + Sync + 'static,
    T: Clone + Send + 'static,
{
    /// Create a selector from a projection of the state.
    pub fn new<F>(select: F) -> Self
    where
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        Self::from_arc_fn(move |state: &Arc<S>| select(&**state))
    }

    fn from_arc_fn<F>(select: F) -> Self
    where
        F: Fn(&Arc<S>) -> T + Send + Sync + 'static,
    {
        Self {
            select: Arc::new(select),
            cache: Arc::new(Mutex::new(None)),
            recomputations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the selected value, recomputing only if `state` is a different
    /// `Arc` from the last call.
    pub fn get(&self, state: &Arc<S>) -> T {
        if let Some(cache) = self.cache.lock().as_ref() {
            if std::ptr::eq(cache.input.as_ptr(), Arc::as_ptr(state)) {
                return cache.output.clone();
            }
        }

        // Computed without the lock held so nested selectors can share state.
        let output = (self.select)(state);
        self.recomputations.fetch_add(1, Ordering::Relaxed);
        *self.cache.lock() = Some(Cache {
            input: Arc::downgrade(state),
            output: output.clone(),
        });
        output
    }

    /// Number of times the projection has run.
    pub fn recomputations(&self) -> usize {
        self.recomputations.load(Ordering::Relaxed)
    }

    /// Derive a selector from this one's output.
    ///
    /// The derived selector reuses this selector's cache for its input.
    pub fn map<U, F>(&self, f: F) -> Selector<S, U>
    where
        U: Clone + Send + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        Selector::from_arc_fn(move |state: &Arc<S>| f(&source.get(state)))
    }
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    /// Evaluate `selector` against the current state.
    pub fn select<T>(&self, selector: &Selector<S, T>) -> T
    where
        T: Clone + Send + 'static,
    {
        selector.get(&self.state())
    }

    /// Call `callback` whenever the selected value changes.
    ///
    /// The value at subscription time is the baseline; the callback is not
    /// called for it.
    pub fn watch<T, F>(&self, selector: Selector<S, T>, callback: F) -> Subscription
    where
        T: Clone + PartialEq + Send + 'static,
        F: Fn(&T) + Send + Sync + 'static,
    {
        let last = Mutex::new(self.select(&selector));
        self.subscribe(move |state| {
            let value = selector.get(state);
            {
                let mut last = last.lock();
                if *last == value {
                    return;
                }
                *last = value.clone();
            }
            callback(&value);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Inventory {
        items: Vec<(String, u32)>,
    }

    fn inventory() -> Arc<Inventory> {
        Arc::new(Inventory {
            items: vec![("apple".to_string(), 3), ("pear".to_string(), 0)],
        })
    }

    #[test]
    fn memoizes_on_state_identity() {
        let in_stock = Selector::new(|inv: &Inventory| {
            inv.items.iter().filter(|(_, n)| *n > 0).count()
        });
        let state = inventory();

        assert_eq!(in_stock.get(&state), 1);
        assert_eq!(in_stock.get(&state), 1);
        assert_eq!(in_stock.recomputations(), 1);

        // Equal value, different Arc: recomputed.
        let copy = Arc::new(Inventory::clone(&state));
        assert_eq!(in_stock.get(&copy), 1);
        assert_eq!(in_stock.recomputations(), 2);
    }

    #[test]
    fn clones_share_cache() {
        let names = Selector::new(|inv: &Inventory| {
            inv.items.iter().map(|(name, _)| name.clone()).collect::<Vec<_>>()
        });
        let other = names.clone();
        let state = inventory();

        names.get(&state);
        other.get(&state);
        assert_eq!(names.recomputations(), 1);
    }

    #[test]
    fn map_builds_on_parent() {
        let total = Selector::new(|inv: &Inventory| inv.items.iter().map(|(_, n)| n).sum::<u32>());
        let doubled = total.map(|n| n * 2);
        let state = inventory();

        assert_eq!(doubled.get(&state), 6);
        assert_eq!(doubled.get(&state), 6);
        assert_eq!(total.recomputations(), 1);
        assert_eq!(doubled.recomputations(), 1);
    }
}
