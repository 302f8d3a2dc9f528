//! Domain error model.

use serde::Serialize;
use thiserror::Error;

use crate::id::RecordId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Field name used for errors that do not belong to a single field.
pub const NON_FIELD: &str = "__all__";

/// A record that prevents a protected delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingRecord {
    pub entity: String,
    pub id: RecordId,
    pub field: String,
}

impl core::fmt::Display for BlockingRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} #{} (via `{}`)", self.entity, self.id, self.field)
    }
}

/// Domain-level error.
///
/// Every failure is reported synchronously to the caller of the operation that
/// caused it; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A written value is missing, malformed, out of range or points at a
    /// record that does not exist.
    #[error("validation failed on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// A delete was blocked by records still referencing the target through a
    /// protect-on-delete relation.
    #[error("cannot delete {entity} #{id}: still referenced by {}", describe_blockers(.blocked_by))]
    ReferentialIntegrity {
        entity: String,
        id: RecordId,
        blocked_by: Vec<BlockingRecord>,
    },

    /// A requested record does not exist.
    #[error("{entity} #{id} not found")]
    NotFound { entity: String, id: RecordId },

    /// The entity name is not part of the schema.
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    /// The backing storage failed to load or persist.
    #[error("storage failure: {0}")]
    Storage(String),
}

fn describe_blockers(blocked_by: &[BlockingRecord]) -> String {
    blocked_by
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl DomainError {
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: msg.into(),
        }
    }

    /// A validation failure not tied to one field.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::validation(NON_FIELD, msg)
    }

    pub fn not_found(entity: impl Into<String>, id: RecordId) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}
