//! Runtime support for the dispatch cycle.
//!
//! Tracks which stores are mid-dispatch on the current thread so a
//! reentrant `dispatch` can be rejected before it blocks on the store's
//! own lock, and hands out unique store ids.

mod context;

pub(crate) use context::{catch_panic, next_store_id, DispatchFrame};
