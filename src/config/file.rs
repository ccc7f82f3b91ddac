//! File-based group loader.

use std::path::{Path, PathBuf};

use toml::{Table, Value};

use super::loader::GroupLoader;
use super::ConfigError;

/// Suffix appended to a group name to form its file name.
pub const FILE_SUFFIX: &str = ".config.toml";

/// Loads each group from `<directory>/<group>.config.toml`.
///
/// An optional override directory may hold files with the same names. When
/// present, an override file is deep-merged over the base file: nested
/// tables merge recursively, other values (including arrays) are replaced.
/// Override files alone never make a group exist.
#[derive(Debug, Clone)]
pub struct FileLoader {
    directory: PathBuf,
    overrides: Option<PathBuf>,
}

impl FileLoader {
    /// Creates a loader reading from `directory`.
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            overrides: None,
        }
    }

    /// Adds an override directory consulted after the base file.
    pub fn with_overrides(mut self, directory: impl AsRef<Path>) -> Self {
        self.overrides = Some(directory.as_ref().to_path_buf());
        self
    }

    /// The directory configuration files are loaded from.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The override directory, if any.
    pub fn overrides(&self) -> Option<&Path> {
        self.overrides.as_deref()
    }

    /// The file `group` is loaded from.
    pub fn path_for(&self, group: &str) -> PathBuf {
        self.directory.join(file_name(group))
    }
}

impl GroupLoader for FileLoader {
    fn load(&self, group: &str) -> Result<Value, ConfigError> {
        let path = self.path_for(group);
        let mut table = load_config_file(&path)?.ok_or_else(|| ConfigError::GroupNotFound {
            group: group.to_string(),
            resource: path.display().to_string(),
        })?;

        if let Some(overrides) = &self.overrides {
            let override_path = overrides.join(file_name(group));
            if let Some(overlay) = load_config_file(&override_path)? {
                tracing::debug!(group, path = %override_path.display(), "applying config overrides");
                deep_merge(&mut table, overlay);
            }
        }

        Ok(Value::Table(table))
    }

    fn resource(&self, group: &str) -> String {
        self.path_for(group).display().to_string()
    }
}

fn file_name(group: &str) -> String {
    format!("{group}{FILE_SUFFIX}")
}

/// Loads and parses a TOML config file.
///
/// Returns `Ok(None)` if the file doesn't exist.
fn load_config_file(path: &Path) -> Result<Option<Table>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(base_table)), Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, group: &str, contents: &str) {
        std::fs::write(dir.join(file_name(group)), contents).unwrap();
    }

    #[test]
    fn test_file_loader_loads_group() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "database", "[test]\nhost = \"x\"\n");

        let loader = FileLoader::new(dir.path());
        assert_eq!(loader.overrides(), None);
        let value = loader.load("database").unwrap();

        assert_eq!(value["test"]["host"].as_str(), Some("x"));
    }

    #[test]
    fn test_file_loader_missing_group_names_file() {
        let dir = TempDir::new().unwrap();
        let loader = FileLoader::new(dir.path());

        match loader.load("database") {
            Err(ConfigError::GroupNotFound { group, resource }) => {
                assert_eq!(group, "database");
                assert!(resource.ends_with("database.config.toml"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_file_loader_parse_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "broken", "key = ");

        let result = FileLoader::new(dir.path()).load("broken");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_overrides_merge_nested_tables() {
        let base = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        write(
            base.path(),
            "database",
            r#"
            [test]
            host = "localhost"
            port = 5432
            replicas = ["a", "b"]
            "#,
        );
        write(
            local.path(),
            "database",
            r#"
            [test]
            host = "10.0.0.1"
            replicas = ["c"]
            "#,
        );

        let loader = FileLoader::new(base.path()).with_overrides(local.path());
        assert_eq!(loader.directory(), base.path());
        assert_eq!(loader.overrides(), Some(local.path()));
        let value = loader.load("database").unwrap();

        assert_eq!(value["test"]["host"].as_str(), Some("10.0.0.1"));
        assert_eq!(value["test"]["port"].as_integer(), Some(5432));
        assert_eq!(value["test"]["replicas"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_override_alone_does_not_create_group() {
        let base = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        write(local.path(), "cache", "ttl = 30");

        let loader = FileLoader::new(base.path()).with_overrides(local.path());
        assert!(matches!(
            loader.load("cache"),
            Err(ConfigError::GroupNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_override_file_is_skipped() {
        let base = TempDir::new().unwrap();
        let local = TempDir::new().unwrap();
        write(base.path(), "app", r#"name = "dragon""#);

        let loader = FileLoader::new(base.path()).with_overrides(local.path());
        let value = loader.load("app").unwrap();
        assert_eq!(value["name"].as_str(), Some("dragon"));
    }
}
