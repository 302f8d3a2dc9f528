//! The application's admin registrations.

use medprocure_catalog::{
    Distributor, DocumentType, Equipment, HealthProfessional, HealthUnit, Manufacturer, Supplier,
    User, Warehouse,
};
use medprocure_core::Entity;
use medprocure_process::{
    Distribution, Procurement, ProcurementDocument, Process, PurchaseOrder, PurchaseValidation,
    Request, Stock,
};

use crate::config::{Inline, ListFilter, ModelAdmin};

const PROCESS_INLINES: &[Inline] = &[
    Inline::single(Request::NAME, "process"),
    Inline::single(Procurement::NAME, "process"),
    Inline::single(PurchaseValidation::NAME, "process"),
    Inline::single(Stock::NAME, "process"),
];

/// Every registered model, in index order.
pub fn registrations() -> Vec<ModelAdmin> {
    vec![
        ModelAdmin::new(Process::NAME)
            .list_display(&["code", "creation_date"])
            .inlines(PROCESS_INLINES),
        ModelAdmin::new(Request::NAME)
            .list_display(&[
                "process",
                "owner",
                "health_unit",
                "health_professional",
                "equipment",
                "quantity",
                "maximum_available",
            ])
            .list_filter(&[
                ListFilter::Field("owner"),
                ListFilter::Field("health_unit"),
                ListFilter::Field("health_professional"),
                ListFilter::Field("equipment"),
            ]),
        ModelAdmin::new(Equipment::NAME)
            .list_display(&["name", "product_type", "manufacturer", "model", "manufacturer_reference"])
            .list_filter(&[ListFilter::Field("product_type"), ListFilter::Field("manufacturer")]),
        ModelAdmin::new(Procurement::NAME)
            .list_display(&[
                "process",
                "procurement_type",
                "owner",
                "equipment",
                "supplier",
                "availability",
                "min_order_quantity",
                "price_per_unit",
                "currency",
                "payment_terms",
                "delivery_time",
                "ce_certified",
                "fda_certified",
            ])
            .list_filter(&[
                ListFilter::Field("procurement_type"),
                ListFilter::Field("owner"),
                ListFilter::Field("equipment"),
                ListFilter::Field("supplier"),
            ]),
        ModelAdmin::new(ProcurementDocument::NAME),
        ModelAdmin::new(Supplier::NAME)
            .list_display(&["name", "email", "phone", "lead", "origin"])
            .list_filter(&[ListFilter::Country("origin")]),
        ModelAdmin::new(PurchaseValidation::NAME),
        ModelAdmin::new(PurchaseOrder::NAME)
            .list_display(&["process", "code", "creation_date", "payment_method", "payment_date"])
            .list_filter(&[ListFilter::Field("payment_method")]),
        ModelAdmin::new(Stock::NAME).list_display(&[
            "process",
            "owner",
            "loading_point",
            "creation_date",
            "quantity",
            "warehouse",
        ]),
        ModelAdmin::new(Distribution::NAME)
            .list_display(&["process", "distributor", "location"])
            .list_filter(&[ListFilter::Field("location")]),
        ModelAdmin::new(User::NAME),
        ModelAdmin::new(HealthUnit::NAME),
        ModelAdmin::new(HealthProfessional::NAME),
        ModelAdmin::new(Manufacturer::NAME),
        ModelAdmin::new(DocumentType::NAME),
        ModelAdmin::new(Warehouse::NAME),
        ModelAdmin::new(Distributor::NAME),
    ]
}
