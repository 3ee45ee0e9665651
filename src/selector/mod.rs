//! Derived values computed from store state.
//!
//! Selectors memoize on the identity of the state `Arc`, so reading the
//! same state twice computes once. Combined with identity-preserving
//! reducers this makes change detection a pointer comparison.

mod selector;

pub use selector::Selector;
