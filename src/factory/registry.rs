use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use super::{Configurable, FactoryError, Instance};
use crate::handle::ConfigHandle;

enum Registration {
    Plain(Box<dyn Fn() -> Instance + Send + Sync>),
    Configurable(Box<dyn Fn(ConfigHandle) -> Instance + Send + Sync>),
}

/// Constructs registered types by name.
///
/// Whether a type receives a configuration handle is decided when it is
/// registered: [`register`](Self::register) for plain types,
/// [`register_configurable`](Self::register_configurable) for types
/// implementing [`Configurable`]. Every call to
/// [`instantiate`](Self::instantiate) builds a fresh instance.
#[derive(Default)]
pub struct ObjectFactory {
    types: HashMap<String, Registration>,
}

impl ObjectFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type that is built without configuration.
    pub fn register<T, F>(mut self, type_name: impl Into<String>, construct: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.types.insert(
            type_name.into(),
            Registration::Plain(Box::new(move || Arc::new(construct()) as Instance)),
        );
        self
    }

    /// Registers a type that receives a configuration handle after construction.
    pub fn register_configurable<T, F>(mut self, type_name: impl Into<String>, construct: F) -> Self
    where
        T: Configurable,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.types.insert(
            type_name.into(),
            Registration::Configurable(Box::new(move |handle: ConfigHandle| {
                let mut instance = construct();
                instance.set_config(handle);
                instance.configured();
                Arc::new(instance) as Instance
            })),
        );
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Whether `type_name` declares the [`Configurable`] capability.
    ///
    /// Returns `None` for unknown types.
    pub fn is_configurable(&self, type_name: &str) -> Option<bool> {
        self.types
            .get(type_name)
            .map(|r| matches!(r, Registration::Configurable(_)))
    }

    /// Registered type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Builds a new instance of `type_name`.
    ///
    /// `handle` is only called for configurable types. If it yields `None`
    /// the instance is not built.
    pub fn instantiate<H>(&self, type_name: &str, handle: H) -> Result<Instance, FactoryError>
    where
        H: FnOnce() -> Option<ConfigHandle>,
    {
        let registration = self
            .types
            .get(type_name)
            .ok_or_else(|| FactoryError::TypeNotFound(type_name.to_string()))?;

        match registration {
            Registration::Plain(construct) => Ok(construct()),
            Registration::Configurable(construct) => {
                let handle = handle()
                    .ok_or_else(|| FactoryError::HandleUnavailable(type_name.to_string()))?;
                tracing::debug!(type_name, "injecting configuration");
                Ok(construct(handle))
            }
        }
    }
}

impl std::fmt::Debug for ObjectFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectFactory")
            .field("types", &self.type_names())
            .finish()
    }
}
