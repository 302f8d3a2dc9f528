//! Procurement workflow records.
//!
//! A [`Process`] is the root of one procurement case. Everything else in this
//! crate hangs off a process and disappears with it: the request that opened
//! it, the offers collected, the validation, the purchase order, the stock
//! received and its distribution.

pub mod logistics;
pub mod procurement;
pub mod process;
pub mod purchasing;
pub mod request;
pub mod schema;

pub use logistics::{Distribution, Stock};
pub use procurement::{Currency, Procurement, ProcurementDocument, ProcurementType};
pub use process::Process;
pub use purchasing::{PurchaseOrder, PurchaseValidation};
pub use request::Request;
pub use schema::schema;
