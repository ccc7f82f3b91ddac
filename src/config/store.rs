use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use toml::Value;

use super::builder::ConfigStoreBuilder;
use super::loader::GroupLoader;
use super::path;
use super::ConfigError;
use crate::cache::Cache;
use crate::factory::{Instance, ObjectFactory};
use crate::handle::{ConfigHandle, Configuration, DATABASE_GROUP};
use crate::Error;

/// Lazily loads configuration groups and serves dot-path lookups into them.
///
/// Each group is loaded at most once; later lookups are answered from the
/// in-memory copy. The store also constructs registered types, handing
/// itself to those that are [`Configurable`](crate::Configurable).
///
/// Stores are always shared: [`ConfigStore::builder`] produces an
/// `Arc<ConfigStore>`.
pub struct ConfigStore {
    loader: Box<dyn GroupLoader>,
    groups: RwLock<HashMap<String, Arc<Value>>>,
    cache: Arc<dyn Cache>,
    types: ObjectFactory,
    this: Weak<ConfigStore>,
}

impl ConfigStore {
    /// Creates a new store builder.
    pub fn builder() -> ConfigStoreBuilder {
        ConfigStoreBuilder::new()
    }

    pub(crate) fn new(
        loader: Box<dyn GroupLoader>,
        cache: Arc<dyn Cache>,
        types: ObjectFactory,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            loader,
            groups: RwLock::new(HashMap::new()),
            cache,
            types,
            this: this.clone(),
        })
    }

    /// Returns the value at `path` in `group`, loading the group on first use.
    ///
    /// The empty path returns the whole group.
    pub fn get_configuration(&self, group: &str, path: &str) -> Result<Value, ConfigError> {
        let loaded = self.group(group)?;
        path::resolve(path, &loaded)
            .cloned()
            .map_err(|_| ConfigError::ValueNotFound {
                path: path.to_string(),
                group: group.to_string(),
            })
    }

    /// Returns a profile from the `database` group.
    pub fn get_database_config(&self, profile: &str) -> Result<Value, ConfigError> {
        self.get_configuration(DATABASE_GROUP, profile)
    }

    /// The cache collaborator this store was built with.
    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    /// The types this store can construct.
    pub fn types(&self) -> &ObjectFactory {
        &self.types
    }

    /// Whether `group` has been loaded.
    pub fn is_loaded(&self, group: &str) -> bool {
        self.groups.read().contains_key(group)
    }

    /// Names of all loaded groups, sorted.
    pub fn loaded_groups(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Loads every group in `groups`, stopping at the first failure.
    pub fn preload<I, S>(&self, groups: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for group in groups {
            self.group(group.as_ref())?;
        }
        Ok(())
    }

    /// Builds a new instance of `type_name`, configured with this store.
    pub fn get_instance(&self, type_name: &str) -> Result<Instance, Error> {
        Ok(self.types.instantiate(type_name, || self.handle())?)
    }

    /// This store as a [`ConfigHandle`].
    ///
    /// Returns `None` once the store has been taken out of its `Arc`
    /// (for example with [`Arc::into_inner`]).
    pub fn handle(&self) -> Option<ConfigHandle> {
        self.this.upgrade().map(|store| store as ConfigHandle)
    }

    fn group(&self, group: &str) -> Result<Arc<Value>, ConfigError> {
        if let Some(loaded) = self.groups.read().get(group) {
            tracing::trace!(group, "config group cache hit");
            return Ok(Arc::clone(loaded));
        }

        // Loading happens outside the lock. Two racing first requests may
        // both load; the first insert wins and is never replaced.
        let value = Arc::new(self.loader.load(group)?);
        tracing::debug!(group, resource = %self.loader.resource(group), "loaded config group");

        let mut groups = self.groups.write();
        Ok(Arc::clone(groups.entry(group.to_string()).or_insert(value)))
    }
}

impl Configuration for ConfigStore {
    fn configuration(&self, group: &str, path: &str) -> Result<Value, Error> {
        Ok(self.get_configuration(group, path)?)
    }

    fn instance(&self, type_name: &str) -> Result<Instance, Error> {
        self.get_instance(type_name)
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("loader", &self.loader)
            .field("loaded_groups", &self.loaded_groups())
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}
