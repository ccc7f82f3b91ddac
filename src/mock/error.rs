use thiserror::Error;

/// Missing test setup detected by the [`MockingFacade`](super::MockingFacade).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MockError {
    #[error("the configuration group \"{0}\" was not mocked")]
    GroupNotMocked(String),

    #[error("the configuration value \"{path}\" in the group \"{group}\" was not mocked")]
    ValueNotMocked { path: String, group: String },

    #[error("no mock instance registered for type \"{0}\" and unmocked objects are not allowed")]
    UnmockedTypeRequested(String),
}
