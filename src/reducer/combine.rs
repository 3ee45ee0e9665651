use std::marker::PhantomData;
use std::sync::Arc;

use super::reducer::{Action, Reducer};

/// One named field of a combined root state.
trait Partition<S, A>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Reduce this partition of `root`, writing into `next` only if it changed.
    fn reduce(&self, root: &S, action: &A, next: &mut Option<S>) -> bool;
}

struct Field<R, G, W> {
    name: &'static str,
    get: G,
    set: W,
    reducer: R,
}

impl<S, A, R, G, W> Partition<S, A> for Field<R, G, W>
where
    S: Clone,
    R: Reducer<Action = A>,
    G: Fn(&S) -> &Arc<R::State> + Send + Sync,
    W: Fn(&mut S, Arc<R::State>) + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn reduce(&self, root: &S, action: &A, next: &mut Option<S>) -> bool {
        let current = (self.get)(root);
        let updated = self.reducer.reduce(current, action);
        if Arc::ptr_eq(current, &updated) {
            return false;
        }
        let draft = next.get_or_insert_with(|| root.clone());
        (self.set)(draft, updated);
        true
    }
}

/// A root reducer that delegates each named field to its own reducer.
///
/// The root state is a plain struct whose partition fields are `Arc`s.
/// Only partitions whose reducer returned a new `Arc` are replaced; the
/// rest keep their identity. When nothing changed the root `Arc` itself
/// is returned.
///
/// ```
/// use std::sync::Arc;
/// use reducto::{combine, from_fn, Action, Reducer};
///
/// #[derive(Debug)]
/// enum Msg { Bump, Rename(String) }
///
/// impl Action for Msg {
///     fn kind(&self) -> &'static str {
///         match self { Msg::Bump => "count/bump", Msg::Rename(_) => "name/rename" }
///     }
/// }
///
/// #[derive(Clone)]
/// struct Root { count: Arc<u32>, name: Arc<String> }
///
/// let root = combine::<Root, Msg>()
///     .partition(
///         "count",
///         |s: &Root| &s.count,
///         |s: &mut Root, v| s.count = v,
///         from_fn(|n: &Arc<u32>, m: &Msg| match m {
///             Msg::Bump => Arc::new(**n + 1),
///             _ => Arc::clone(n),
///         }),
///     )
///     .partition(
///         "name",
///         |s: &Root| &s.name,
///         |s: &mut Root, v| s.name = v,
///         from_fn(|n: &Arc<String>, m: &Msg| match m {
///             Msg::Rename(to) => Arc::new(to.clone()),
///             _ => Arc::clone(n),
///         }),
///     );
///
/// let before = Arc::new(Root { count: Arc::new(0), name: Arc::new("a".into()) });
/// let after = root.reduce(&before, &Msg::Bump);
///
/// assert_eq!(*after.count, 1);
/// assert!(Arc::ptr_eq(&before.name, &after.name));
/// ```
pub struct Combined<S, A> {
    partitions: Vec<Box<dyn Partition<S, A>>>,
    _marker: PhantomData<fn(&A)>,
}

/// Start building a [`Combined`] reducer for root state `S`.
pub fn combine<S, A>() -> Combined<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    Combined {
        partitions: Vec::new(),
        _marker: PhantomData,
    }
}

impl<S, A> Combined<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    /// Register a partition.
    ///
    /// `get` and `set` read and replace the partition's field on the root
    /// state. Partitions are reduced in registration order.
    ///
    /// # Panics
    ///
    /// Panics if a partition named `name` is already registered.
    pub fn partition<R, G, W>(mut self, name: &'static str, get: G, set: W, reducer: R) -> Self
    where
        R: Reducer<Action = A>,
        G: Fn(&S) -> &Arc<R::State> + Send + Sync + 'static,
        W: Fn(&mut S, Arc<R::State>) + Send + Sync + 'static,
    {
        assert!(
            self.partitions.iter().all(|p| p.name() != name),
            "partition '{name}' registered twice"
        );
        self.partitions.push(Box::new(Field {
            name,
            get,
            set,
            reducer,
        }));
        self
    }

    /// Partition names in registration order.
    pub fn partition_names(&self) -> Vec<&'static str> {
        self.partitions.iter().map(|p| p.name()).collect()
    }
}

impl<S, A> Reducer for Combined<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
{
    type State = S;
    type Action = A;

    fn reduce(&self, state: &Arc<S>, action: &A) -> Arc<S> {
        let mut next = None;
        let mut changed = 0usize;
        for partition in &self.partitions {
            if partition.reduce(state, action, &mut next) {
                tracing::trace!(
                    partition = partition.name(),
                    action = action.kind(),
                    "Partition changed"
                );
                changed += 1;
            }
        }

        match next {
            Some(root) => {
                tracing::trace!(changed, action = action.kind(), "Root state rebuilt");
                Arc::new(root)
            }
            None => Arc::clone(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::from_fn;

    #[derive(Debug)]
    enum Msg {
        Increment,
        Push(&'static str),
        Ignored,
    }

    impl Action for Msg {
        fn kind(&self) -> &'static str {
            match self {
                Msg::Increment => "counter/increment",
                Msg::Push(_) => "log/push",
                Msg::Ignored => "other/ignored",
            }
        }
    }

    #[derive(Debug, Clone)]
    struct Root {
        counter: Arc<i32>,
        log: Arc<Vec<&'static str>>,
    }

    fn root_reducer() -> Combined<Root, Msg> {
        combine::<Root, Msg>()
            .partition(
                "counter",
                |s: &Root| &s.counter,
                |s: &mut Root, v| s.counter = v,
                from_fn(|n: &Arc<i32>, m: &Msg| match m {
                    Msg::Increment => Arc::new(**n + 1),
                    _ => Arc::clone(n),
                }),
            )
            .partition(
                "log",
                |s: &Root| &s.log,
                |s: &mut Root, v| s.log = v,
                from_fn(|log: &Arc<Vec<&'static str>>, m: &Msg| match m {
                    Msg::Push(entry) => {
                        let mut next = Vec::clone(log);
                        next.push(entry);
                        Arc::new(next)
                    }
                    _ => Arc::clone(log),
                }),
            )
    }

    fn initial() -> Arc<Root> {
        Arc::new(Root {
            counter: Arc::new(0),
            log: Arc::new(Vec::new()),
        })
    }

    #[test]
    fn only_changed_partition_is_replaced() {
        let reducer = root_reducer();
        let before = initial();

        let after = reducer.reduce(&before, &Msg::Increment);
        assert_eq!(*after.counter, 1);
        assert!(!Arc::ptr_eq(&before, &after));
        assert!(!Arc::ptr_eq(&before.counter, &after.counter));
        assert!(Arc::ptr_eq(&before.log, &after.log));

        let pushed = reducer.reduce(&after, &Msg::Push("hello"));
        assert_eq!(*pushed.log, vec!["hello"]);
        assert!(Arc::ptr_eq(&after.counter, &pushed.counter));
    }

    #[test]
    fn unrecognized_action_returns_same_root() {
        let reducer = root_reducer();
        let before = initial();
        let after = reducer.reduce(&before, &Msg::Ignored);
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn lists_partitions_in_order() {
        assert_eq!(root_reducer().partition_names(), vec!["counter", "log"]);
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_partition_panics() {
        let _ = root_reducer().partition(
            "counter",
            |s: &Root| &s.counter,
            |s: &mut Root, v| s.counter = v,
            from_fn(|n: &Arc<i32>, _: &Msg| Arc::clone(n)),
        );
    }
}
