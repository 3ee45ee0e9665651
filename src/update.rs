//! Immutable update helpers.
//!
//! State lives behind `Arc`s and is never mutated in place. These helpers
//! build the next value from a copy and, where the type allows comparison,
//! hand back the original `Arc` when nothing actually changed.

use std::sync::Arc;

/// Copy `state`, let `recipe` modify the copy, and return it as a new `Arc`.
///
/// The value behind `state` is never touched.
///
/// ```
/// use std::sync::Arc;
/// use reducto::update::produce;
///
/// let before = Arc::new(vec![1, 2]);
/// let after = produce(&before, |v| v.push(3));
/// assert_eq!(*before, vec![1, 2]);
/// assert_eq!(*after, vec![1, 2, 3]);
/// ```
pub fn produce<S, F>(state: &Arc<S>, recipe: F) -> Arc<S>
where
    S: Clone,
    F: FnOnce(&mut S),
{
    let mut draft = S::clone(state);
    recipe(&mut draft);
    Arc::new(draft)
}

/// Like [`produce`], but returns `state` itself when the draft ends up equal
/// to the original.
pub fn produce_if_changed<S, F>(state: &Arc<S>, recipe: F) -> Arc<S>
where
    S: Clone + PartialEq,
    F: FnOnce(&mut S),
{
    let mut draft = S::clone(state);
    recipe(&mut draft);
    if draft == **state {
        Arc::clone(state)
    } else {
        Arc::new(draft)
    }
}

/// Replace `current` with `value` unless they are equal.
pub fn set_if_changed<T>(current: &Arc<T>, value: T) -> Arc<T>
where
    T: PartialEq,
{
    if **current == value {
        Arc::clone(current)
    } else {
        Arc::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        name: String,
        visits: u32,
    }

    fn profile() -> Arc<Profile> {
        Arc::new(Profile {
            name: "ada".to_string(),
            visits: 0,
        })
    }

    #[test]
    fn produce_always_allocates() {
        let before = profile();
        let after = produce(&before, |_| {});
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before, after);
    }

    #[test]
    fn produce_if_changed_keeps_identity_on_noop() {
        let before = profile();
        let same = produce_if_changed(&before, |p| p.name = "ada".to_string());
        assert!(Arc::ptr_eq(&before, &same));

        let changed = produce_if_changed(&before, |p| p.visits += 1);
        assert_eq!(changed.visits, 1);
        assert_eq!(before.visits, 0);
    }

    #[test]
    fn set_if_changed_compares_by_value() {
        let current = Arc::new(5);
        assert!(Arc::ptr_eq(&current, &set_if_changed(&current, 5)));
        assert_eq!(*set_if_changed(&current, 6), 6);
    }
}
