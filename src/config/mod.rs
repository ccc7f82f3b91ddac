//! Configuration groups: loading, caching and dot-path lookup.

mod builder;
mod error;
mod file;
mod loader;
pub mod path;
mod store;

pub use builder::ConfigStoreBuilder;
pub use error::ConfigError;
pub use file::{FileLoader, FILE_SUFFIX};
pub use loader::{GroupLoader, MemoryLoader};
pub use store::ConfigStore;
