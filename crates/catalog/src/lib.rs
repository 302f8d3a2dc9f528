//! Lookup entities referenced by procurement processes.
//!
//! Everything here is plain reference data: people and places the workflow
//! points at, the equipment being procured and the suppliers offering it.

pub mod equipment;
pub mod identity;
pub mod lookup;
pub mod supplier;

pub use equipment::{Equipment, ProductType};
pub use identity::User;
pub use lookup::{Distributor, DocumentType, HealthProfessional, HealthUnit, Manufacturer, Warehouse};
pub use supplier::Supplier;
