use std::collections::HashMap;

use toml::{Table, Value};

use super::ConfigError;

/// Produces the structured value of a named configuration group.
///
/// Loaders are consulted at most once per group by a [`ConfigStore`](super::ConfigStore);
/// they do not cache.
pub trait GroupLoader: Send + Sync + std::fmt::Debug {
    /// Loads `group`, failing with [`ConfigError::GroupNotFound`] if it has
    /// no backing resource.
    fn load(&self, group: &str) -> Result<Value, ConfigError>;

    /// Names the resource `group` would be loaded from, for diagnostics.
    fn resource(&self, group: &str) -> String;
}

/// Serves groups from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    groups: HashMap<String, Value>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a group.
    pub fn with_group(mut self, group: impl Into<String>, table: Table) -> Self {
        self.groups.insert(group.into(), Value::Table(table));
        self
    }

    /// Parses `contents` as TOML and adds it as `group`.
    pub fn with_toml(self, group: impl Into<String>, contents: &str) -> Result<Self, ConfigError> {
        let group = group.into();
        let table = toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: format!("memory:{group}").into(),
            source: e,
        })?;
        Ok(self.with_group(group, table))
    }
}

impl GroupLoader for MemoryLoader {
    fn load(&self, group: &str) -> Result<Value, ConfigError> {
        self.groups
            .get(group)
            .cloned()
            .ok_or_else(|| ConfigError::GroupNotFound {
                group: group.to_string(),
                resource: self.resource(group),
            })
    }

    fn resource(&self, group: &str) -> String {
        format!("memory:{group}")
    }
}

/// Placeholder loader used when a store is built without one.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NoLoader;

impl GroupLoader for NoLoader {
    fn load(&self, group: &str) -> Result<Value, ConfigError> {
        Err(ConfigError::GroupNotFound {
            group: group.to_string(),
            resource: self.resource(group),
        })
    }

    fn resource(&self, _group: &str) -> String {
        "<no loader configured>".to_string()
    }
}
