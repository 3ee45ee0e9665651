//! Error types for dispatch and configuration.

use thiserror::Error;

/// Errors returned by [`Store::dispatch`](crate::Store::dispatch).
///
/// Neither variant is transient. A rejected or failed dispatch leaves the
/// store's state exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// `dispatch` was called while the same store was already dispatching on
    /// this thread (from the reducer, a hook, or a subscriber).
    #[error("Reentrant dispatch of '{action}' rejected by store '{store}'")]
    Reentrant { store: String, action: &'static str },

    /// The reducer panicked while handling the action.
    #[error("Reducer panicked in store '{store}' on '{action}': {message}")]
    ReducerPanicked {
        store: String,
        action: &'static str,
        message: String,
    },
}

impl DispatchError {
    /// Kind of the action that failed.
    pub fn action(&self) -> &'static str {
        match self {
            DispatchError::Reentrant { action, .. } => action,
            DispatchError::ReducerPanicked { action, .. } => action,
        }
    }
}

/// Errors that can occur when loading a [`StoreConfig`](crate::StoreConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse store config: {source}")]
    ParseError {
        #[source]
        source: toml::de::Error,
    },

    #[error("Store config validation failed: {message}")]
    ValidationError { message: String },
}
