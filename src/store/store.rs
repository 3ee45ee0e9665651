use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::hook::DispatchHook;
use super::subscription::{Registry, Subscribers, Subscription};
use crate::config::{NotifyPolicy, StoreConfig};
use crate::error::DispatchError;
use crate::reducer::{Action, Reducer};
use crate::runtime::{catch_panic, next_store_id, DispatchFrame};

type SharedReducer<S, A> = Arc<dyn Reducer<State = S, Action = A>>;

struct Inner<S, A> {
    id: usize,
    config: StoreConfig,
    state: RwLock<Arc<S>>,
    reducer: RwLock<SharedReducer<S, A>>,
    subscribers: Arc<Subscribers<S>>,
    hooks: Vec<Box<dyn DispatchHook<S, A>>>,
    // Held for the whole reduce-commit-notify sequence.
    dispatch_lock: Mutex<()>,
}

/// A thread-safe, single-writer state container.
///
/// The store holds one immutable state value behind an `Arc`. The only way
/// to change it is [`dispatch`](Store::dispatch), which runs the reducer,
/// commits the result and notifies subscribers. Cloning a store yields
/// another handle to the same container.
///
/// ```
/// use std::sync::Arc;
/// use reducto::{from_fn, Action, Store};
///
/// #[derive(Debug)]
/// enum CounterAction { Increment }
///
/// impl Action for CounterAction {
///     fn kind(&self) -> &'static str { "counter/increment" }
/// }
///
/// let store = Store::new(
///     from_fn(|n: &Arc<u32>, _: &CounterAction| Arc::new(**n + 1)),
///     0,
/// );
///
/// store.dispatch(CounterAction::Increment).unwrap();
/// assert_eq!(*store.state(), 1);
/// ```
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    /// Create a store with default configuration.
    pub fn new<R>(reducer: R, initial: S) -> Self
    where
        R: Reducer<State = S, Action = A>,
    {
        Self::builder(reducer, initial).build()
    }

    /// Create a store starting from `S::default()`.
    pub fn with_default<R>(reducer: R) -> Self
    where
        R: Reducer<State = S, Action = A>,
        S: Default,
    {
        Self::new(reducer, S::default())
    }

    /// Start configuring a store.
    pub fn builder<R>(reducer: R, initial: S) -> StoreBuilder<S, A>
    where
        R: Reducer<State = S, Action = A>,
    {
        StoreBuilder {
            reducer: Arc::new(reducer),
            initial,
            config: StoreConfig::default(),
            hooks: Vec::new(),
        }
    }

    /// Name from the store's config, used in logs and errors.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// The store's configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Get the current state.
    pub fn state(&self) -> Arc<S> {
        Arc::clone(&self.inner.state.read())
    }

    /// Read the current state through a borrow.
    ///
    /// No lock is held while `f` runs, so `f` may dispatch to this store;
    /// it keeps seeing the state as it was when `read` was called.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.state();
        f(&state)
    }

    /// Apply `action` and return the resulting state.
    ///
    /// The reducer runs against the current state; its result is committed
    /// and then every subscriber registered at that point is called once,
    /// in registration order. Concurrent callers are serialized.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::Reentrant`] if this thread is already dispatching
    ///   to this store, i.e. the call comes from the reducer, a hook or a
    ///   subscriber.
    /// - [`DispatchError::ReducerPanicked`] if the reducer panicked. The
    ///   previous state stays current.
    ///
    /// A panicking subscriber or hook is not caught; it unwinds out of
    /// `dispatch` after the store's locks are released.
    ///
    /// Dispatching to another store from a subscriber holds this store's
    /// dispatch lock while waiting for the other one. Two threads doing
    /// A→B and B→A at the same time deadlock.
    pub fn dispatch(&self, action: A) -> Result<Arc<S>, DispatchError> {
        let inner = &*self.inner;
        let kind = action.kind();

        let Some(_frame) = DispatchFrame::enter(inner.id) else {
            tracing::warn!(
                store = %inner.config.name,
                action = kind,
                "Reentrant dispatch rejected"
            );
            return Err(DispatchError::Reentrant {
                store: inner.config.name.clone(),
                action: kind,
            });
        };
        let _serial = inner.dispatch_lock.lock();

        let reducer = Arc::clone(&inner.reducer.read());
        let previous = self.state();

        for hook in &inner.hooks {
            hook.before(&action, &previous);
        }

        let next = match catch_panic(|| reducer.reduce(&previous, &action)) {
            Ok(next) => next,
            Err(message) => {
                tracing::error!(
                    store = %inner.config.name,
                    action = kind,
                    error = %message,
                    "Reducer panicked, state left unchanged"
                );
                let error = DispatchError::ReducerPanicked {
                    store: inner.config.name.clone(),
                    action: kind,
                    message,
                };
                for hook in &inner.hooks {
                    hook.failed(&action, &error);
                }
                return Err(error);
            }
        };

        let changed = !Arc::ptr_eq(&previous, &next);
        if changed {
            *inner.state.write() = Arc::clone(&next);
        }

        if inner.config.log_actions {
            tracing::debug!(store = %inner.config.name, action = ?action, changed, "Dispatched");
        } else {
            tracing::trace!(store = %inner.config.name, action = kind, changed, "Dispatched");
        }

        for hook in &inner.hooks {
            hook.after(&action, &next);
        }

        if changed || inner.config.notify == NotifyPolicy::Always {
            self.notify(&next);
        }

        Ok(next)
    }

    /// Subscribe to state changes.
    ///
    /// The callback is called with the new state after every future
    /// dispatch (see [`NotifyPolicy`]). Registering from inside another
    /// callback takes effect from the next dispatch.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<S>) + Send + Sync + 'static,
    {
        let id = self.inner.subscribers.insert(Arc::new(callback));
        let registry: Arc<dyn Registry> = self.inner.subscribers.clone();
        Subscription::new(id, Arc::downgrade(&registry))
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Swap the reducer used by subsequent dispatches.
    ///
    /// The current state is kept. A dispatch already in flight finishes
    /// with the reducer it started with.
    pub fn replace_reducer<R>(&self, reducer: R)
    where
        R: Reducer<State = S, Action = A>,
    {
        *self.inner.reducer.write() = Arc::new(reducer);
        tracing::debug!(store = %self.inner.config.name, "Reducer replaced");
    }

    /// Notify all subscribers of a state change.
    fn notify(&self, state: &Arc<S>) {
        for subscriber in self.inner.subscribers.snapshot() {
            subscriber(state);
        }
    }
}

/// Builder for a [`Store`] with custom configuration and hooks.
pub struct StoreBuilder<S, A> {
    reducer: SharedReducer<S, A>,
    initial: S,
    config: StoreConfig,
    hooks: Vec<Box<dyn DispatchHook<S, A>>>,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Send + Sync + 'static,
    A: Action,
{
    /// Replace the whole configuration.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the store name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Set when subscribers are notified.
    pub fn notify(mut self, policy: NotifyPolicy) -> Self {
        self.config.notify = policy;
        self
    }

    /// Install a dispatch hook. Hooks run in installation order.
    pub fn hook<H>(mut self, hook: H) -> Self
    where
        H: DispatchHook<S, A>,
    {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Create the store.
    pub fn build(self) -> Store<S, A> {
        let id = next_store_id();
        tracing::debug!(
            store = %self.config.name,
            id,
            hooks = self.hooks.len(),
            "Store created"
        );
        Store {
            inner: Arc::new(Inner {
                id,
                subscribers: Arc::new(Subscribers::new(self.config.name.clone())),
                config: self.config,
                state: RwLock::new(Arc::new(self.initial)),
                reducer: RwLock::new(self.reducer),
                hooks: self.hooks,
                dispatch_lock: Mutex::new(()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::from_fn;
    use crate::store::after_fn;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Debug, PartialEq, Default)]
    struct AppState {
        count: usize,
        name: String,
    }

    #[derive(Debug)]
    enum AppAction {
        Increment,
        Rename(&'static str),
        Unknown,
        Explode,
    }

    impl Action for AppAction {
        fn kind(&self) -> &'static str {
            match self {
                AppAction::Increment => "app/increment",
                AppAction::Rename(_) => "app/rename",
                AppAction::Unknown => "unknown",
                AppAction::Explode => "app/explode",
            }
        }
    }

    fn reducer() -> impl Reducer<State = AppState, Action = AppAction> {
        from_fn(|state: &Arc<AppState>, action: &AppAction| match action {
            AppAction::Increment => Arc::new(AppState {
                count: state.count + 1,
                ..AppState::clone(state)
            }),
            AppAction::Rename(name) => Arc::new(AppState {
                name: name.to_string(),
                ..AppState::clone(state)
            }),
            AppAction::Unknown => Arc::clone(state),
            AppAction::Explode => panic!("reducer exploded"),
        })
    }

    #[test]
    fn store_dispatch_and_state() {
        let store = Store::with_default(reducer());
        assert_eq!(store.state().count, 0);

        let returned = store.dispatch(AppAction::Increment).unwrap();
        assert_eq!(returned.count, 1);
        assert!(Arc::ptr_eq(&returned, &store.state()));

        store.dispatch(AppAction::Rename("updated")).unwrap();
        assert_eq!(store.read(|s| s.name.clone()), "updated");
        assert_eq!(store.state().count, 1);
    }

    #[test]
    fn store_subscribe() {
        let store = Store::with_default(reducer());

        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let _subscription = store.subscribe(move |_state| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(call_count.load(Ordering::SeqCst), 0);

        store.dispatch(AppAction::Increment).unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 1);

        store.dispatch(AppAction::Unknown).unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn on_change_policy_skips_unchanged_dispatch() {
        let store = Store::builder(reducer(), AppState::default())
            .notify(NotifyPolicy::OnChange)
            .build();

        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();
        let _subscription = store.subscribe(move |_| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        store.dispatch(AppAction::Unknown).unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 0);

        store.dispatch(AppAction::Increment).unwrap();
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn reducer_panic_keeps_previous_state() {
        let store = Store::builder(reducer(), AppState::default())
            .name("panicky")
            .build();
        store.dispatch(AppAction::Increment).unwrap();
        let before = store.state();

        let err = store.dispatch(AppAction::Explode).unwrap_err();
        match &err {
            DispatchError::ReducerPanicked {
                store,
                action,
                message,
            } => {
                assert_eq!(store, "panicky");
                assert_eq!(*action, "app/explode");
                assert_eq!(message, "reducer exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(Arc::ptr_eq(&before, &store.state()));

        // Still usable afterwards.
        store.dispatch(AppAction::Increment).unwrap();
        assert_eq!(store.state().count, 2);
    }

    #[test]
    fn hooks_see_action_and_resulting_state() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let store = Store::builder(reducer(), AppState::default())
            .hook(after_fn(move |action: &AppAction, state: &Arc<AppState>| {
                seen_clone.lock().push((action.kind(), state.count));
            }))
            .build();

        store.dispatch(AppAction::Increment).unwrap();
        store.dispatch(AppAction::Unknown).unwrap();
        let _ = store.dispatch(AppAction::Explode);

        assert_eq!(
            *seen.lock(),
            vec![("app/increment", 1), ("unknown", 1)]
        );
    }

    struct RecordingHook {
        log: Arc<Mutex<Vec<String>>>,
    }

    impl DispatchHook<AppState, AppAction> for RecordingHook {
        fn before(&self, action: &AppAction, state: &Arc<AppState>) {
            self.log
                .lock()
                .push(format!("before {} {}", action.kind(), state.count));
        }

        fn after(&self, action: &AppAction, state: &Arc<AppState>) {
            self.log
                .lock()
                .push(format!("after {} {}", action.kind(), state.count));
        }

        fn failed(&self, action: &AppAction, error: &DispatchError) {
            let panicked = matches!(error, DispatchError::ReducerPanicked { .. });
            self.log
                .lock()
                .push(format!("failed {} {}", action.kind(), panicked));
        }
    }

    #[test]
    fn hook_sees_before_after_and_failed() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let store = Store::builder(reducer(), AppState::default())
            .hook(RecordingHook { log: log.clone() })
            .build();

        store.dispatch(AppAction::Increment).unwrap();
        let _ = store.dispatch(AppAction::Explode);

        assert_eq!(
            *log.lock(),
            vec![
                "before app/increment 0".to_string(),
                "after app/increment 1".to_string(),
                "before app/explode 1".to_string(),
                "failed app/explode true".to_string(),
            ]
        );
    }

    #[test]
    fn read_allows_dispatch_inside_callback() {
        let store = Store::with_default(reducer());

        let (seen, result) = store.read(|state| {
            let result = store.dispatch(AppAction::Increment);
            (state.count, result)
        });

        assert_eq!(seen, 0);
        assert_eq!(result.unwrap().count, 1);
        assert_eq!(store.state().count, 1);
    }

    #[test]
    fn replace_reducer_keeps_state() {
        let store = Store::with_default(reducer());
        store.dispatch(AppAction::Increment).unwrap();

        store.replace_reducer(from_fn(|state: &Arc<AppState>, _: &AppAction| {
            Arc::new(AppState {
                count: state.count * 10,
                ..AppState::clone(state)
            })
        }));
        assert_eq!(store.state().count, 1);

        store.dispatch(AppAction::Increment).unwrap();
        assert_eq!(store.state().count, 10);
    }

    #[test]
    fn clones_share_the_container() {
        let store = Store::with_default(reducer());
        let other = store.clone();
        other.dispatch(AppAction::Increment).unwrap();
        assert_eq!(store.state().count, 1);
        assert_eq!(store.name(), "store");
    }
}
