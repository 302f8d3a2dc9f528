//! Generic administrative interface over the record store.
//!
//! Each entity is registered with a [`ModelAdmin`] describing its list
//! columns, filters, ordering and inline children; [`AdminSite`] turns those
//! registrations into list, detail, add, change and delete operations.

pub mod config;
pub mod error;
pub mod registry;
pub mod render;
pub mod site;

pub use config::{Inline, ListFilter, ModelAdmin};
pub use error::{AdminError, AdminResult};
pub use site::{
    AdminSite, ChangeForm, ChangeList, ChangeListRow, Column, DeletePreview, DeletedGroup, Detail,
    DisplayField, FilterChoice, FilterSidebar, InlineForm, InlineRecords, ModelSummary,
    ProtectedRecord, RecordView, ORDER_PARAM,
};
