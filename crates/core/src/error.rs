use thiserror::Error;

pub type AdTagResult<T> = Result<T, AdTagError>;

/// Validation failures raised by the registrar. All are synchronous and
/// fail-fast: a call that returns an error has not touched the registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdTagError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("size mapping '{0}' already defined")]
    DuplicateMapping(String),

    #[error("size mapping '{0}' not defined; size mappings must be added before use")]
    UndefinedMapping(String),
}
