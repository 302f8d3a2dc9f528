use serde::{Deserialize, Serialize};

use medprocure_core::{choice_enum, Choice, Entity, Field, Labels, OnDelete, RecordId};

use crate::lookup::Manufacturer;

choice_enum! {
    /// Broad family of a piece of equipment.
    pub enum ProductType {
        ProtectiveEquipment = ("E", "Personal protective equipment"),
        Ventilator = ("V", "Ventilator"),
        TestKit = ("T", "Test kit"),
        Other = ("O", "Other"),
    }
}

/// A model of equipment that can be requested and procured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub product_type: ProductType,
    #[serde(default)]
    pub manufacturer: Option<RecordId>,
    pub model: String,
    pub manufacturer_reference: String,
}

impl Equipment {
    pub fn new(
        name: impl Into<String>,
        product_type: ProductType,
        model: impl Into<String>,
        manufacturer_reference: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            product_type,
            manufacturer: None,
            model: model.into(),
            manufacturer_reference: manufacturer_reference.into(),
        }
    }

    pub fn made_by(mut self, manufacturer: RecordId) -> Self {
        self.manufacturer = Some(manufacturer);
        self
    }
}

impl Entity for Equipment {
    const NAME: &'static str = "equipment";
    const VERBOSE_NAME: &'static str = "Equipment";
    const FIELDS: &'static [Field] = &[
        Field::text("name", 200).required(),
        Field::choice("product_type", ProductType::CHOICES).required(),
        Field::foreign_key("manufacturer", Manufacturer::NAME, OnDelete::Protect),
        Field::text("model", 100).required(),
        Field::text("manufacturer_reference", 100).required(),
    ];

    fn label(&self, _labels: &dyn Labels) -> String {
        format!("{} / {}", self.name, self.product_type.label())
    }
}
