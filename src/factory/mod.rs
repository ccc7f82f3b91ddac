//! Object construction with configuration injection.

mod error;
mod registry;

use std::any::Any;
use std::sync::Arc;

use crate::handle::ConfigHandle;

pub use error::FactoryError;
pub use registry::ObjectFactory;

/// A constructed object, shared and type-erased.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Capability for types that want a configuration handle.
///
/// Construction happens before any handle exists, so a type that needs
/// configuration to finish initializing does that work in
/// [`configured`](Self::configured), which runs once, after
/// [`set_config`](Self::set_config).
///
/// ```
/// use dragon_conf::{ConfigHandle, Configurable, Configuration};
///
/// #[derive(Default)]
/// struct Mailer {
///     config: Option<ConfigHandle>,
///     relay: Option<String>,
/// }
///
/// impl Configurable for Mailer {
///     fn set_config(&mut self, handle: ConfigHandle) {
///         self.config = Some(handle);
///     }
///
///     fn configured(&mut self) {
///         self.relay = self
///             .config
///             .as_ref()
///             .and_then(|c| c.configuration("mail", "relay").ok())
///             .and_then(|v| v.as_str().map(str::to_string));
///     }
/// }
/// ```
pub trait Configurable: Any + Send + Sync {
    fn set_config(&mut self, handle: ConfigHandle);

    /// Post-injection hook. The default does nothing.
    fn configured(&mut self) {}
}
