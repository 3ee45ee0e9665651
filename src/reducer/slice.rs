use std::marker::PhantomData;
use std::sync::Arc;

use super::reducer::{Action, Reducer};

/// A named partition of application state: its initial value, the actions
/// it owns and the reducer that applies them.
///
/// Slices are plain types implementing this trait, usually unit structs.
/// Their action enum plays the role of action creators.
///
/// ```
/// use std::sync::Arc;
/// use reducto::{Action, Slice, Store};
///
/// #[derive(Debug)]
/// enum TodoAction { Add(String) }
///
/// impl Action for TodoAction {
///     fn kind(&self) -> &'static str { "todos/add" }
/// }
///
/// struct Todos;
///
/// impl Slice for Todos {
///     const NAME: &'static str = "todos";
///     type State = Vec<String>;
///     type Action = TodoAction;
///
///     fn initial_state() -> Vec<String> { Vec::new() }
///
///     fn reduce(state: &Arc<Vec<String>>, action: &TodoAction) -> Arc<Vec<String>> {
///         match action {
///             TodoAction::Add(text) => {
///                 let mut next = Vec::clone(state);
///                 next.push(text.clone());
///                 Arc::new(next)
///             }
///         }
///     }
/// }
///
/// let store = Store::new(Todos::reducer(), Todos::initial_state());
/// store.dispatch(TodoAction::Add("write docs".into())).unwrap();
/// assert_eq!(store.state().len(), 1);
/// ```
pub trait Slice: 'static {
    /// Partition name, the prefix of this slice's action kinds.
    const NAME: &'static str;

    type State: Send + Sync + 'static;

    type Action: Action;

    fn initial_state() -> Self::State;

    /// Apply `action` to this slice's state. Must be pure.
    fn reduce(state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;

    /// This slice's reducer as a value usable by stores and `combine`.
    fn reducer() -> SliceReducer<Self>
    where
        Self: Sized,
    {
        SliceReducer {
            _slice: PhantomData,
        }
    }
}

/// [`Reducer`] adapter for a [`Slice`].
pub struct SliceReducer<T> {
    _slice: PhantomData<fn() -> T>,
}

impl<T: Slice> SliceReducer<T> {
    /// The slice's partition name.
    pub fn name(&self) -> &'static str {
        T::NAME
    }
}

impl<T: Slice> Reducer for SliceReducer<T> {
    type State = T::State;
    type Action = T::Action;

    fn reduce(&self, state: &Arc<T::State>, action: &T::Action) -> Arc<T::State> {
        T::reduce(state, action)
    }
}
