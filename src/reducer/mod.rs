//! Actions, reducers and the conventions layered on them.
//!
//! - `Action` - closed enums describing what happened
//! - `Reducer` - pure `(state, action) -> state` transitions
//! - `combine` - one root reducer built from named partitions
//! - `Slice` - a partition's initial state and reducer under one name

mod combine;
mod reducer;
mod slice;

pub use combine::{combine, Combined};
pub use reducer::{from_fn, scope, Action, FnReducer, Reducer, Scoped};
pub use slice::{Slice, SliceReducer};
