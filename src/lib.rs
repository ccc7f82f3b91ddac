//! Process-wide access to named configuration groups.
//!
//! A [`ConfigStore`] loads each group (by default `<dir>/<group>.config.toml`)
//! the first time it is asked for, keeps it, and answers dot-path lookups
//! such as `database.production.host`. The same store constructs registered
//! types and hands itself to the ones that are [`Configurable`].
//!
//! For unit tests, a [`MockingFacade`] stands in for the store and serves only
//! what the test registered.

pub mod cache;
pub mod config;
pub mod factory;
mod error;
mod handle;
pub mod mock;

pub use cache::{Cache, MemoryCache};
pub use config::{ConfigError, ConfigStore, ConfigStoreBuilder, FileLoader, GroupLoader, MemoryLoader};
pub use error::Error;
pub use factory::{Configurable, FactoryError, Instance, ObjectFactory};
pub use handle::{configuration_as, instance_as, ConfigHandle, Configuration, DATABASE_GROUP};
pub use mock::{MockError, MockingFacade};
