use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::file::FileLoader;
use super::loader::{GroupLoader, NoLoader};
use super::store::ConfigStore;
use crate::cache::{Cache, MemoryCache};
use crate::factory::ObjectFactory;

/// Where groups come from.
#[derive(Debug)]
enum LoaderSource {
    None,
    Directory {
        path: PathBuf,
        overrides: Option<PathBuf>,
    },
    Custom(Box<dyn GroupLoader>),
}

/// Builder for a [`ConfigStore`].
///
/// Groups are read from `<directory>/<group>.config.toml` by default; any
/// other [`GroupLoader`] can be installed with
/// [`with_loader`](Self::with_loader).
///
/// ## Example
///
/// ```no_run
/// use dragon_conf::{ConfigStore, Configuration};
///
/// let store = ConfigStore::builder()
///     .with_directory("config")
///     .with_overrides("config/local")
///     .build();
///
/// let host = store.configuration("database", "production.host")?;
/// # Ok::<(), dragon_conf::Error>(())
/// ```
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigStoreBuilder {
    loader: LoaderSource,
    cache: Option<Arc<dyn Cache>>,
    types: ObjectFactory,
}

impl ConfigStoreBuilder {
    pub(crate) fn new() -> Self {
        Self {
            loader: LoaderSource::None,
            cache: None,
            types: ObjectFactory::new(),
        }
    }

    /// Loads groups from TOML files in `path`.
    pub fn with_directory(mut self, path: impl AsRef<Path>) -> Self {
        let overrides = match self.loader {
            LoaderSource::Directory { overrides, .. } => overrides,
            _ => None,
        };
        self.loader = LoaderSource::Directory {
            path: path.as_ref().to_path_buf(),
            overrides,
        };
        self
    }

    /// Adds an override directory whose files are merged over the base files.
    ///
    /// Only takes effect together with [`with_directory`](Self::with_directory).
    pub fn with_overrides(mut self, path: impl AsRef<Path>) -> Self {
        if let LoaderSource::Directory { overrides, .. } = &mut self.loader {
            *overrides = Some(path.as_ref().to_path_buf());
        } else {
            tracing::warn!(
                path = %path.as_ref().display(),
                "config overrides ignored: no config directory set"
            );
        }
        self
    }

    /// Installs a custom group loader, replacing any directory.
    pub fn with_loader(mut self, loader: impl GroupLoader + 'static) -> Self {
        self.loader = LoaderSource::Custom(Box::new(loader));
        self
    }

    /// Installs the cache handed out by [`ConfigStore::cache`].
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Installs the types the store can construct.
    pub fn with_types(mut self, types: ObjectFactory) -> Self {
        self.types = types;
        self
    }

    pub fn build(self) -> Arc<ConfigStore> {
        let loader: Box<dyn GroupLoader> = match self.loader {
            LoaderSource::None => Box::new(NoLoader),
            LoaderSource::Directory { path, overrides } => {
                let loader = FileLoader::new(path);
                Box::new(match overrides {
                    Some(overrides) => loader.with_overrides(overrides),
                    None => loader,
                })
            }
            LoaderSource::Custom(loader) => loader,
        };
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryCache::new()));

        ConfigStore::new(loader, cache, self.types)
    }
}
