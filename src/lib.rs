//! # Reducto
//!
//! A single-writer state container for Rust.
//!
//! A [`Store`] holds one immutable state value behind an `Arc`. Typed
//! [`Action`]s are applied by a pure [`Reducer`] through
//! [`Store::dispatch`], and subscribers are notified after each committed
//! transition.
//!
//! ## Core
//!
//! - `Store<S, A>` - state container with dispatch, subscribe and hooks
//! - `Reducer` / `Action` - pure transitions over closed action enums
//! - `DispatchHook` - observe every `(action, resulting state)` pair
//!
//! ## Conventions
//!
//! Organizational layers built on the same primitive:
//! - `Slice` - a named partition with its own actions and reducer
//! - `combine` - one root reducer from per-partition reducers, keeping
//!   unchanged partitions pointer-identical
//! - `Selector` - memoized derived values
//! - [`update`] - immutable update helpers
//!
//! ```
//! use std::sync::Arc;
//! use reducto::{from_fn, Action, Store};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter { value: i64 }
//!
//! #[derive(Debug)]
//! enum CounterAction { Increment, Unknown }
//!
//! impl Action for CounterAction {
//!     fn kind(&self) -> &'static str {
//!         match self {
//!             CounterAction::Increment => "counter/increment",
//!             CounterAction::Unknown => "unknown",
//!         }
//!     }
//! }
//!
//! let store = Store::new(
//!     from_fn(|state: &Arc<Counter>, action: &CounterAction| match action {
//!         CounterAction::Increment => Arc::new(Counter { value: state.value + 1 }),
//!         CounterAction::Unknown => Arc::clone(state),
//!     }),
//!     Counter { value: 0 },
//! );
//!
//! store.dispatch(CounterAction::Increment).unwrap();
//! store.dispatch(CounterAction::Increment).unwrap();
//! let before = store.state();
//! store.dispatch(CounterAction::Unknown).unwrap();
//!
//! assert_eq!(store.state().value, 2);
//! assert!(Arc::ptr_eq(&before, &store.state()));
//! ```

pub mod config;
pub mod error;
pub mod reducer;
pub(crate) mod runtime;
pub mod selector;
pub mod store;
pub mod update;

// Re-export main types for convenience
pub use config::{NotifyPolicy, StoreConfig};
pub use error::{ConfigError, DispatchError};
pub use reducer::{combine, from_fn, scope, Action, Combined, Reducer, Slice};
pub use selector::Selector;
pub use store::{after_fn, DispatchHook, Store, StoreBuilder, Subscription, SubscriptionGuard};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Tick;

    impl Action for Tick {
        fn kind(&self) -> &'static str {
            "clock/tick"
        }
    }

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = Store::new(from_fn(|n: &Arc<u64>, _: &Tick| Arc::new(**n + 1)), 0);
        assert_eq!(*store.state(), 0);
        store.dispatch(Tick).unwrap();
        assert_eq!(*store.state(), 1);
    }
}
