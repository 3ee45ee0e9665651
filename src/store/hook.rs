use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::DispatchError;

/// Observer of the dispatch sequence.
///
/// Hooks are installed when the store is built and see every action
/// together with the state it produced, which is enough to record or
/// replay a session. They run inside the dispatch, so a hook calling
/// `dispatch` on the same store is rejected as reentrant.
pub trait DispatchHook<S, A>: Send + Sync + 'static {
    /// Before the reducer runs, with the current state.
    fn before(&self, _action: &A, _state: &Arc<S>) {}

    /// After the new state is committed, before subscribers are notified.
    fn after(&self, _action: &A, _state: &Arc<S>) {}

    /// The reducer panicked; nothing was committed.
    fn failed(&self, _action: &A, _error: &DispatchError) {}
}

/// A hook that only implements [`DispatchHook::after`]. See [`after_fn`].
pub struct AfterFn<S, A, F> {
    f: F,
    _marker: PhantomData<fn(&A, &S)>,
}

impl<S, A, F> DispatchHook<S, A> for AfterFn<S, A, F>
where
    S: 'static,
    A: 'static,
    F: Fn(&A, &Arc<S>) + Send + Sync + 'static,
{
    fn after(&self, action: &A, state: &Arc<S>) {
        (self.f)(action, state)
    }
}

/// Build a hook from a closure called with each `(action, resulting state)`.
pub fn after_fn<S, A, F>(f: F) -> AfterFn<S, A, F>
where
    F: Fn(&A, &Arc<S>) + Send + Sync + 'static,
{
    AfterFn {
        f,
        _marker: PhantomData,
    }
}
