use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// An event dispatched to a store.
///
/// Implement this on a closed enum; `kind` is the discriminant that shows
/// up in logs and errors, conventionally `"<slice>/<verb>"`.
///
/// ```
/// use reducto::Action;
///
/// #[derive(Debug)]
/// enum CounterAction {
///     Increment,
///     AddAmount(i64),
/// }
///
/// impl Action for CounterAction {
///     fn kind(&self) -> &'static str {
///         match self {
///             CounterAction::Increment => "counter/increment",
///             CounterAction::AddAmount(_) => "counter/addAmount",
///         }
///     }
/// }
///
/// assert_eq!(CounterAction::AddAmount(3).kind(), "counter/addAmount");
/// ```
pub trait Action: fmt::Debug + Send + Sync + 'static {
    fn kind(&self) -> &'static str;
}

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen. It must be
/// a pure function of its two arguments. Returning the input `Arc` (via
/// `Arc::clone`) signals "no change" and preserves identity for downstream
/// change detection.
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: Send + Sync + 'static;

    /// The action type this reducer handles.
    type Action: Action;

    /// Process an action and return the next state.
    fn reduce(&self, state: &Arc<Self::State>, action: &Self::Action) -> Arc<Self::State>;

    /// Fold a sequence of actions over `initial`.
    fn replay<'a, I>(&self, initial: Arc<Self::State>, actions: I) -> Arc<Self::State>
    where
        Self: Sized,
        I: IntoIterator<Item = &'a Self::Action>,
    {
        actions
            .into_iter()
            .fold(initial, |state, action| self.reduce(&state, action))
    }
}

/// A reducer backed by a closure. See [`from_fn`].
pub struct FnReducer<S, A, F> {
    f: F,
    _marker: PhantomData<fn(&S, &A)>,
}

impl<S, A, F> Reducer for FnReducer<S, A, F>
where
    S: Send + Sync + 'static,
    A: Action,
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &Arc<S>, action: &A) -> Arc<S> {
        (self.f)(state, action)
    }
}

/// Wrap a closure as a [`Reducer`].
pub fn from_fn<S, A, F>(f: F) -> FnReducer<S, A, F>
where
    S: Send + Sync + 'static,
    A: Action,
    F: Fn(&Arc<S>, &A) -> Arc<S> + Send + Sync + 'static,
{
    FnReducer {
        f,
        _marker: PhantomData,
    }
}

/// A reducer over a narrower action type, lifted to a wider one.
/// See [`scope`].
pub struct Scoped<R, A, F> {
    inner: R,
    project: F,
    _marker: PhantomData<fn(&A)>,
}

impl<R, A, F> Reducer for Scoped<R, A, F>
where
    R: Reducer,
    A: Action,
    F: Fn(&A) -> Option<&R::Action> + Send + Sync + 'static,
{
    type State = R::State;
    type Action = A;

    fn reduce(&self, state: &Arc<R::State>, action: &A) -> Arc<R::State> {
        match (self.project)(action) {
            Some(inner_action) => self.inner.reduce(state, inner_action),
            None => Arc::clone(state),
        }
    }
}

/// Lift `inner` to handle a wider action type.
///
/// `project` picks out the actions `inner` understands; everything else
/// leaves the state untouched.
pub fn scope<R, A, F>(inner: R, project: F) -> Scoped<R, A, F>
where
    R: Reducer,
    A: Action,
    F: Fn(&A) -> Option<&R::Action> + Send + Sync + 'static,
{
    Scoped {
        inner,
        project,
        _marker: PhantomData,
    }
}
