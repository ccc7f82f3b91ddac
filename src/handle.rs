//! The configuration handle shared by the real store and the mocking facade.

use std::any::Any;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use toml::Value;

use crate::config::ConfigError;
use crate::factory::{FactoryError, Instance};
use crate::Error;

/// Group holding database connection profiles.
pub const DATABASE_GROUP: &str = "database";

/// Access to configuration groups and configured objects.
///
/// Implemented by [`ConfigStore`](crate::ConfigStore) and
/// [`MockingFacade`](crate::MockingFacade); objects that declare the
/// [`Configurable`](crate::Configurable) capability receive one of them as a
/// [`ConfigHandle`].
pub trait Configuration: Send + Sync + std::fmt::Debug {
    /// Returns the value at the dotted `path` inside `group`.
    ///
    /// An empty path returns the whole group.
    fn configuration(&self, group: &str, path: &str) -> Result<Value, Error>;

    /// Returns a database profile; shorthand for the `database` group.
    fn database_config(&self, profile: &str) -> Result<Value, Error> {
        self.configuration(DATABASE_GROUP, profile)
    }

    /// Returns an instance of the type registered under `type_name`.
    fn instance(&self, type_name: &str) -> Result<Instance, Error>;
}

/// A shared handle to a [`Configuration`].
pub type ConfigHandle = Arc<dyn Configuration>;

/// Looks up `group`/`path` and deserializes it into `T`.
///
/// ```no_run
/// use dragon_conf::{configuration_as, ConfigStore};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Database {
///     host: String,
///     port: u16,
/// }
///
/// let store = ConfigStore::builder().with_directory("config").build();
/// let db: Database = configuration_as(&*store, "database", "production")?;
/// # Ok::<(), dragon_conf::Error>(())
/// ```
pub fn configuration_as<T, C>(config: &C, group: &str, path: &str) -> Result<T, Error>
where
    T: DeserializeOwned,
    C: Configuration + ?Sized,
{
    let value = config.configuration(group, path)?;
    value.try_into().map_err(|source| {
        ConfigError::DeserializeError {
            group: group.to_string(),
            path: path.to_string(),
            source,
        }
        .into()
    })
}

/// Fetches the instance registered under `type_name` as a concrete `T`.
pub fn instance_as<T, C>(config: &C, type_name: &str) -> Result<Arc<T>, Error>
where
    T: Any + Send + Sync,
    C: Configuration + ?Sized,
{
    config.instance(type_name)?.downcast::<T>().map_err(|_| {
        FactoryError::TypeMismatch {
            type_name: type_name.to_string(),
            expected: std::any::type_name::<T>(),
        }
        .into()
    })
}
