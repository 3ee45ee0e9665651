//! The state container.
//!
//! A store owns the current state, applies actions through its reducer,
//! and notifies subscribers after each committed transition.

mod hook;
mod store;
mod subscription;

pub use hook::{after_fn, AfterFn, DispatchHook};
pub use store::{Store, StoreBuilder};
pub use subscription::{Subscription, SubscriptionGuard};
