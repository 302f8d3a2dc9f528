use thiserror::Error;

use medprocure_core::DomainError;

pub type AdminResult<T> = Result<T, AdminError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("`{0}` is not registered in the admin")]
    UnknownModel(String),

    #[error("{model} cannot be filtered by `{field}`")]
    UnknownFilter { model: String, field: String },

    /// A registration does not match the schema.
    #[error("invalid admin registration: {0}")]
    Config(String),
}
