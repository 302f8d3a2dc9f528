//! Offers collected for a process and their supporting documents.

use serde::{Deserialize, Serialize};

use medprocure_catalog::{DocumentType, Equipment, Supplier, User};
use medprocure_core::{
    choice_enum, Choice, Entity, Field, Labels, OnDelete, RecordId, TriState,
};

use crate::process::Process;

/// Upload namespace of procurement pictures.
pub const IMAGES: &str = "images";
/// Upload namespace of procurement documents.
pub const FILES: &str = "files";

choice_enum! {
    pub enum ProcurementType {
        Donation = ("D", "Donation"),
        Commercial = ("C", "Commercial"),
    }
}

choice_enum! {
    pub enum Currency {
        Dollar = ("D", "dollar"),
        Euro = ("E", "euro"),
    }
}

/// A supply offer for the equipment of a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procurement {
    pub process: RecordId,
    pub procurement_type: ProcurementType,
    #[serde(default)]
    pub owner: Option<RecordId>,
    pub equipment: RecordId,
    #[serde(default)]
    pub supplier: Option<RecordId>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub min_order_quantity: Option<i64>,
    /// Stored upload path, under `images/`.
    pub picture: String,
    #[serde(default)]
    pub price_per_unit: Option<i64>,
    #[serde(default)]
    pub price_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<Currency>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub delivery_time: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub ce_certified: TriState,
    #[serde(default)]
    pub fda_certified: TriState,
}

impl Procurement {
    pub fn new(
        process: RecordId,
        procurement_type: ProcurementType,
        equipment: RecordId,
        picture: impl Into<String>,
    ) -> Self {
        Self {
            process,
            procurement_type,
            owner: None,
            equipment,
            supplier: None,
            availability: None,
            min_order_quantity: None,
            picture: picture.into(),
            price_per_unit: None,
            price_total: None,
            currency: None,
            payment_terms: None,
            delivery_time: None,
            comments: None,
            ce_certified: TriState::Unknown,
            fda_certified: TriState::Unknown,
        }
    }
}

impl Entity for Procurement {
    const NAME: &'static str = "procurement";
    const VERBOSE_NAME: &'static str = "Procurement";
    const FIELDS: &'static [Field] = &[
        Field::foreign_key("process", Process::NAME, OnDelete::Cascade).required(),
        Field::choice("procurement_type", ProcurementType::CHOICES).required(),
        Field::foreign_key("owner", User::NAME, OnDelete::SetNull),
        Field::foreign_key("equipment", Equipment::NAME, OnDelete::Protect).required(),
        Field::foreign_key("supplier", Supplier::NAME, OnDelete::Protect),
        Field::text("availability", 100),
        Field::integer("min_order_quantity"),
        Field::upload("picture", IMAGES).required(),
        Field::integer("price_per_unit"),
        Field::integer("price_total"),
        Field::choice("currency", Currency::CHOICES),
        Field::text("payment_terms", 200),
        Field::text("delivery_time", 50),
        Field::long_text("comments"),
        Field::tri_state("ce_certified"),
        Field::tri_state("fda_certified"),
    ];

    fn label(&self, labels: &dyn Labels) -> String {
        format!(
            "{} / {} / {}",
            labels.label_or_dash(Process::NAME, Some(self.process)),
            labels
                .text_field(Equipment::NAME, self.equipment, "name")
                .unwrap_or_else(|| "-".to_string()),
            labels.label_or_dash(Supplier::NAME, self.supplier),
        )
    }
}

/// A file supporting a procurement (certificate, quotation, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementDocument {
    pub procurement: RecordId,
    #[serde(default)]
    pub file_type: Option<RecordId>,
    /// Stored upload path, under `files/`.
    pub file: String,
}

impl ProcurementDocument {
    pub fn new(procurement: RecordId, file: impl Into<String>) -> Self {
        Self {
            procurement,
            file_type: None,
            file: file.into(),
        }
    }
}

impl Entity for ProcurementDocument {
    const NAME: &'static str = "procurement_document";
    const VERBOSE_NAME: &'static str = "Procurement document";
    const FIELDS: &'static [Field] = &[
        Field::foreign_key("procurement", Procurement::NAME, OnDelete::Cascade).required(),
        Field::foreign_key("file_type", DocumentType::NAME, OnDelete::Protect),
        Field::upload("file", FILES).required(),
    ];

    fn label(&self, labels: &dyn Labels) -> String {
        format!(
            "{} / {}",
            labels.label_or_dash(Procurement::NAME, Some(self.procurement)),
            labels.label_or_dash(DocumentType::NAME, self.file_type),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medprocure_core::{DomainError, DomainResult, EntityDescriptor, WriteMode};
    use serde_json::json;

    fn decode(value: serde_json::Value) -> DomainResult<Procurement> {
        let row = EntityDescriptor::of::<Procurement>()
            .decode(value.as_object().cloned().unwrap(), WriteMode::Update)?;
        Ok(serde_json::from_value(serde_json::Value::Object(row)).unwrap())
    }

    #[test]
    fn certifications_default_to_unknown() {
        let procurement = decode(json!({
            "process": 1,
            "procurement_type": "C",
            "equipment": 2,
            "picture": "images/mask.png",
            "currency": "D",
        }))
        .unwrap();

        assert_eq!(procurement.currency, Some(Currency::Dollar));
        assert_eq!(procurement.ce_certified, TriState::Unknown);
        assert_eq!(procurement.fda_certified, TriState::Unknown);
    }

    #[test]
    fn picture_is_required_and_must_be_an_image_upload() {
        let missing = decode(json!({"process": 1, "procurement_type": "D", "equipment": 2}));
        assert_eq!(
            missing.unwrap_err(),
            DomainError::validation("picture", "this field is required")
        );

        let wrong_namespace = decode(json!({
            "process": 1,
            "procurement_type": "D",
            "equipment": 2,
            "picture": "files/quote.pdf",
        }));
        assert!(wrong_namespace.is_err());
    }

    #[test]
    fn amounts_are_plain_integers() {
        let credit = decode(json!({
            "process": 1,
            "procurement_type": "C",
            "equipment": 2,
            "picture": "images/mask.png",
            "price_per_unit": -1,
        }))
        .unwrap();
        assert_eq!(credit.price_per_unit, Some(-1));

        let err = decode(json!({
            "process": 1,
            "procurement_type": "C",
            "equipment": 2,
            "picture": "images/mask.png",
            "price_per_unit": "five",
        }))
        .unwrap_err();
        assert_eq!(err, DomainError::validation("price_per_unit", "expected an integer"));
    }
}
