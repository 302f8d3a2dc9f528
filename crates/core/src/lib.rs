//! `medprocure-core`: record-keeping building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! record identifiers, field metadata, choice enums, the tri-state flag and the
//! error model shared by every layer.

pub mod choice;
pub mod country;
pub mod entity;
pub mod error;
pub mod field;
pub mod id;

pub use choice::{Choice, TriState};
pub use country::CountryCode;
pub use entity::{Entity, EntityDescriptor, Labels, Relation, Row, Schema, Stored, WriteMode};
pub use error::{BlockingRecord, DomainError, DomainResult};
pub use field::{Field, FieldKind, OnDelete};
pub use id::RecordId;
