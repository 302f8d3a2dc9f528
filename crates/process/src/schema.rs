use medprocure_catalog::{
    Distributor, DocumentType, Equipment, HealthProfessional, HealthUnit, Manufacturer, Supplier,
    User, Warehouse,
};
use medprocure_core::Schema;

use crate::{
    Distribution, Procurement, ProcurementDocument, Process, PurchaseOrder, PurchaseValidation,
    Request, Stock,
};

/// Every entity of the application, lookups first.
pub fn schema() -> Schema {
    Schema::new()
        .with::<User>()
        .with::<HealthUnit>()
        .with::<HealthProfessional>()
        .with::<Manufacturer>()
        .with::<Warehouse>()
        .with::<Distributor>()
        .with::<DocumentType>()
        .with::<Equipment>()
        .with::<Supplier>()
        .with::<Process>()
        .with::<Request>()
        .with::<Procurement>()
        .with::<ProcurementDocument>()
        .with::<PurchaseValidation>()
        .with::<PurchaseOrder>()
        .with::<Stock>()
        .with::<Distribution>()
}
