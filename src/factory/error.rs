use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FactoryError {
    #[error("the type \"{0}\" was not found")]
    TypeNotFound(String),

    #[error("the type \"{0}\" needs a configuration handle but its store is no longer shared")]
    HandleUnavailable(String),

    #[error("the instance registered as \"{type_name}\" is not a {expected}")]
    TypeMismatch {
        type_name: String,
        expected: &'static str,
    },
}
