use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_STORE_ID: AtomicUsize = AtomicUsize::new(0);

// Ids of the stores currently dispatching on this thread, innermost last.
thread_local! {
    static DISPATCH_STACK: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Generate the next unique store id.
pub(crate) fn next_store_id() -> usize {
    NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed)
}

/// RAII marker for an in-flight dispatch on the current thread.
///
/// Dropping the frame (normally or while unwinding) removes it from the
/// thread's dispatch stack.
pub(crate) struct DispatchFrame {
    store_id: usize,
}

impl DispatchFrame {
    /// Push a frame for `store_id`.
    ///
    /// Returns `None` if this thread is already dispatching that store.
    /// Other stores may nest freely.
    pub(crate) fn enter(store_id: usize) -> Option<Self> {
        DISPATCH_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&store_id) {
                return None;
            }
            stack.push(store_id);
            Some(DispatchFrame { store_id })
        })
    }

    /// Whether this thread is currently dispatching `store_id`.
    #[cfg(test)]
    pub(crate) fn is_active(store_id: usize) -> bool {
        DISPATCH_STACK.with(|stack| stack.borrow().contains(&store_id))
    }
}

impl Drop for DispatchFrame {
    fn drop(&mut self) {
        // try_with: the thread-local may already be gone during thread teardown.
        let _ = DISPATCH_STACK.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|id| *id == self.store_id) {
                stack.remove(pos);
            }
        });
    }
}

/// Run `f`, converting a panic into its message.
pub(crate) fn catch_panic<F, R>(f: F) -> Result<R, String>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(&*payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
