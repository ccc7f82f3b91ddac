//! Test double that serves mocked configuration groups and objects.
//!
//! A [`MockingFacade`] wraps a real [`ConfigStore`] but, by default, never
//! touches it: every group and every object a test needs must be registered
//! up front, and anything else fails loudly. Two switches relax this:
//!
//! - `allow_real_configs` sends every configuration lookup to the real store,
//!   ignoring mocked groups.
//! - `allow_unmocked_objects` lets types without a mock instance be built by
//!   the real store's factory. Those instances receive the facade, not the
//!   store, as their configuration handle.
//!
//! ```
//! use dragon_conf::{Configuration, ConfigStore, MockingFacade};
//!
//! let facade = MockingFacade::new(ConfigStore::builder().build());
//! assert!(facade.database_config("test").is_err());
//!
//! let mut database = toml::Table::new();
//! database.insert("test".into(), toml::Value::Table(toml::Table::new()));
//! facade.set_configuration("database", toml::Value::Table(database));
//! assert!(facade.database_config("test").is_ok());
//! ```

mod error;

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use toml::Value;

use crate::config::{path, ConfigStore};
use crate::factory::Instance;
use crate::handle::{ConfigHandle, Configuration};
use crate::Error;

pub use error::MockError;

pub struct MockingFacade {
    real: Arc<ConfigStore>,
    groups: RwLock<HashMap<String, Value>>,
    instances: RwLock<HashMap<String, Instance>>,
    allow_real_configs: AtomicBool,
    allow_unmocked_objects: AtomicBool,
    this: Weak<MockingFacade>,
}

impl MockingFacade {
    /// Wraps `real` with both switches off.
    pub fn new(real: Arc<ConfigStore>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            real,
            groups: RwLock::new(HashMap::new()),
            instances: RwLock::new(HashMap::new()),
            allow_real_configs: AtomicBool::new(false),
            allow_unmocked_objects: AtomicBool::new(false),
            this: this.clone(),
        })
    }

    /// The wrapped store.
    pub fn real(&self) -> &Arc<ConfigStore> {
        &self.real
    }

    pub fn allow_real_configs(&self) -> bool {
        self.allow_real_configs.load(Ordering::SeqCst)
    }

    pub fn set_allow_real_configs(&self, allow: bool) {
        self.allow_real_configs.store(allow, Ordering::SeqCst);
    }

    pub fn allow_unmocked_objects(&self) -> bool {
        self.allow_unmocked_objects.load(Ordering::SeqCst)
    }

    pub fn set_allow_unmocked_objects(&self, allow: bool) {
        self.allow_unmocked_objects.store(allow, Ordering::SeqCst);
    }

    /// Mocks `group` with `value`, replacing any earlier mock of it.
    pub fn set_configuration(&self, group: impl Into<String>, value: Value) {
        self.groups.write().insert(group.into(), value);
    }

    /// Registers `instance` as the object returned for `type_name`.
    pub fn set_instance(&self, type_name: impl Into<String>, instance: Instance) {
        self.instances.write().insert(type_name.into(), instance);
    }

    /// Removes every mocked group and instance. The switches are kept.
    pub fn clear_mocks(&self) {
        self.groups.write().clear();
        self.instances.write().clear();
    }

    /// Returns the value at `path` in `group` under the current policy.
    pub fn get_configuration(&self, group: &str, path: &str) -> Result<Value, Error> {
        if self.allow_real_configs() {
            tracing::debug!(group, path, "serving real configuration");
            return Ok(self.real.get_configuration(group, path)?);
        }

        let groups = self.groups.read();
        let mocked = groups
            .get(group)
            .ok_or_else(|| MockError::GroupNotMocked(group.to_string()))?;

        let value = path::resolve(path, mocked).map_err(|_| MockError::ValueNotMocked {
            path: path.to_string(),
            group: group.to_string(),
        })?;
        Ok(value.clone())
    }

    /// Returns the mock instance for `type_name`, or builds a real one if
    /// unmocked objects are allowed.
    pub fn get_instance(&self, type_name: &str) -> Result<Instance, Error> {
        if let Some(instance) = self.instances.read().get(type_name) {
            return Ok(Arc::clone(instance));
        }

        if !self.allow_unmocked_objects() {
            return Err(MockError::UnmockedTypeRequested(type_name.to_string()).into());
        }

        tracing::debug!(type_name, "constructing unmocked instance");
        Ok(self.real.types().instantiate(type_name, || self.handle())?)
    }

    /// This facade as a [`ConfigHandle`].
    ///
    /// Returns `None` once the facade has been taken out of its `Arc`.
    pub fn handle(&self) -> Option<ConfigHandle> {
        self.this.upgrade().map(|facade| facade as ConfigHandle)
    }
}

impl Configuration for MockingFacade {
    fn configuration(&self, group: &str, path: &str) -> Result<Value, Error> {
        self.get_configuration(group, path)
    }

    fn instance(&self, type_name: &str) -> Result<Instance, Error> {
        self.get_instance(type_name)
    }
}

impl std::fmt::Debug for MockingFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut groups: Vec<String> = self.groups.read().keys().cloned().collect();
        groups.sort_unstable();
        let mut instances: Vec<String> = self.instances.read().keys().cloned().collect();
        instances.sort_unstable();

        f.debug_struct("MockingFacade")
            .field("real", &self.real)
            .field("mocked_groups", &groups)
            .field("mocked_instances", &instances)
            .field("allow_real_configs", &self.allow_real_configs())
            .field("allow_unmocked_objects", &self.allow_unmocked_objects())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryLoader;
    use crate::factory::{FactoryError, ObjectFactory};
    use crate::handle::instance_as;
    use crate::Configurable;
    use crate::ConfigError;

    #[derive(Debug, Default)]
    struct Widget;

    #[derive(Debug, Default)]
    struct Mailer {
        config: Option<ConfigHandle>,
        relay: Option<String>,
    }

    impl Configurable for Mailer {
        fn set_config(&mut self, handle: ConfigHandle) {
            self.config = Some(handle);
        }

        fn configured(&mut self) {
            self.relay = self
                .config
                .as_ref()
                .and_then(|c| c.configuration("mail", "relay").ok())
                .and_then(|v| v.as_str().map(str::to_string));
        }
    }

    fn table(toml_str: &str) -> Value {
        Value::Table(toml::from_str(toml_str).unwrap())
    }

    fn facade() -> Arc<MockingFacade> {
        let loader = MemoryLoader::new()
            .with_toml("database", "[test]\nhost = \"real-db\"\n")
            .unwrap()
            .with_toml("mail", r#"relay = "real-relay""#)
            .unwrap();
        let store = ConfigStore::builder()
            .with_loader(loader)
            .with_types(
                ObjectFactory::new()
                    .register("Widget", || Widget)
                    .register_configurable("Mailer", Mailer::default),
            )
            .build();
        MockingFacade::new(store)
    }

    #[test]
    fn test_switches_default_to_strict() {
        let facade = facade();
        assert!(!facade.allow_real_configs());
        assert!(!facade.allow_unmocked_objects());
    }

    #[test]
    fn test_unmocked_group_fails_without_touching_real_store() {
        let facade = facade();
        let result = facade.get_configuration("database", "test");

        assert!(matches!(
            result,
            Err(Error::Mock(MockError::GroupNotMocked(group))) if group == "database"
        ));
        assert!(!facade.real().is_loaded("database"));
    }

    #[test]
    fn test_mocked_group_is_served() {
        let facade = facade();
        facade.set_configuration("database", table("[test]\nhost = \"x\"\n"));

        let value = facade.get_configuration("database", "test").unwrap();
        assert_eq!(value, table("host = \"x\""));
        assert_eq!(facade.database_config("test").unwrap(), value);
        assert!(!facade.real().is_loaded("database"));
    }

    #[test]
    fn test_missing_mocked_value() {
        let facade = facade();
        facade.set_configuration("database", table("[test]\nhost = \"x\"\n"));

        match facade.get_configuration("database", "test.port") {
            Err(Error::Mock(MockError::ValueNotMocked { path, group })) => {
                assert_eq!(path, "test.port");
                assert_eq!(group, "database");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_set_configuration_replaces_without_merge() {
        let facade = facade();
        facade.set_configuration("app", table("first = 1"));
        facade.set_configuration("app", table("second = 2"));

        assert_eq!(facade.get_configuration("app", "").unwrap(), table("second = 2"));
        assert!(facade.get_configuration("app", "first").is_err());
    }

    #[test]
    fn test_allow_real_configs_bypasses_mocks() {
        let facade = facade();
        facade.set_configuration("database", table("[test]\nhost = \"mock-db\"\n"));
        facade.set_allow_real_configs(true);

        let host = facade.get_configuration("database", "test.host").unwrap();
        assert_eq!(host.as_str(), Some("real-db"));

        assert!(matches!(
            facade.get_configuration("cache", ""),
            Err(Error::Config(ConfigError::GroupNotFound { .. }))
        ));
        assert!(matches!(
            facade.get_configuration("database", "test.port"),
            Err(Error::Config(ConfigError::ValueNotFound { .. }))
        ));
    }

    #[test]
    fn test_unmocked_instance_fails() {
        let facade = facade();
        assert!(matches!(
            facade.get_instance("Widget"),
            Err(Error::Mock(MockError::UnmockedTypeRequested(name))) if name == "Widget"
        ));
    }

    #[test]
    fn test_mock_instance_identity() {
        let facade = facade();
        let widget: Instance = Arc::new(Widget);
        facade.set_instance("Widget", Arc::clone(&widget));

        let first = facade.get_instance("Widget").unwrap();
        let second = facade.get_instance("Widget").unwrap();
        assert!(Arc::ptr_eq(&first, &widget));
        assert!(Arc::ptr_eq(&second, &widget));
    }

    #[test]
    fn test_mock_instance_is_preferred_over_real() {
        let facade = facade();
        facade.set_allow_unmocked_objects(true);
        let widget: Instance = Arc::new(Widget);
        facade.set_instance("Widget", Arc::clone(&widget));

        assert!(Arc::ptr_eq(&facade.get_instance("Widget").unwrap(), &widget));
    }

    #[test]
    fn test_unmocked_objects_get_facade_handle() {
        let facade = facade();
        facade.set_allow_unmocked_objects(true);
        facade.set_configuration("mail", table(r#"relay = "mock-relay""#));

        let mailer: Arc<Mailer> = instance_as(&*facade, "Mailer").unwrap();
        assert_eq!(mailer.relay.as_deref(), Some("mock-relay"));
        assert!(!facade.real().is_loaded("mail"));

        let a = facade.get_instance("Widget").unwrap();
        let b = facade.get_instance("Widget").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));

        assert!(matches!(
            facade.get_instance("Gadget"),
            Err(Error::Factory(FactoryError::TypeNotFound(_)))
        ));
    }

    #[test]
    fn test_clear_mocks() {
        let facade = facade();
        facade.set_configuration("app", table("a = 1"));
        facade.set_instance("Widget", Arc::new(Widget));
        facade.set_allow_unmocked_objects(true);

        facade.clear_mocks();

        assert!(matches!(
            facade.get_configuration("app", ""),
            Err(Error::Mock(MockError::GroupNotMocked(_)))
        ));
        assert!(facade.allow_unmocked_objects());
    }

    #[test]
    fn test_facade_out_of_arc_returns_errors() {
        let facade = Arc::into_inner(facade()).unwrap();
        facade.set_allow_unmocked_objects(true);

        assert!(facade.handle().is_none());
        assert!(matches!(
            facade.get_instance("Mailer"),
            Err(Error::Factory(FactoryError::HandleUnavailable(_)))
        ));
        assert!(matches!(
            facade.get_instance("Gadget"),
            Err(Error::Factory(FactoryError::TypeNotFound(_)))
        ));
        assert!(facade.get_instance("Widget").is_ok());
    }
}
