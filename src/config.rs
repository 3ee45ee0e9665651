//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// When subscribers are notified after a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// After every successful dispatch, changed or not.
    #[default]
    Always,
    /// Only when the reducer returned a different state `Arc`.
    OnChange,
}

/// Per-store settings.
///
/// ```
/// use reducto::{NotifyPolicy, StoreConfig};
///
/// let config = StoreConfig::from_toml_str(r#"
///     name = "todos"
///     notify = "on_change"
/// "#).unwrap();
///
/// assert_eq!(config.name, "todos");
/// assert_eq!(config.notify, NotifyPolicy::OnChange);
/// assert!(!config.log_actions);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name used in log events and errors.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub notify: NotifyPolicy,
    /// Emit each dispatched action at `debug` level instead of `trace`.
    #[serde(default)]
    pub log_actions: bool,
}

fn default_name() -> String {
    "store".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            notify: NotifyPolicy::default(),
            log_actions: false,
        }
    }
}

impl StoreConfig {
    /// Config with the given name and default settings otherwise.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Parses a TOML document and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError { source: e })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the store name is usable in log output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Store name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
