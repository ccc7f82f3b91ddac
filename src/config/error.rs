use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config group '{group}' not found: {resource}")]
    GroupNotFound { group: String, resource: String },

    #[error("the value \"{path}\" was not found in the config group \"{group}\"")]
    ValueNotFound { path: String, group: String },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to deserialize \"{path}\" in config group \"{group}\": {source}")]
    DeserializeError {
        group: String,
        path: String,
        source: toml::de::Error,
    },
}
