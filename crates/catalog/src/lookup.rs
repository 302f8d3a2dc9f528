//! Named reference entities.

use serde::{Deserialize, Serialize};

use medprocure_core::{Entity, Field, Labels};

/// Declare a lookup entity that only carries a bounded `name`.
macro_rules! named_lookup {
    ($(#[$meta:meta])* $ty:ident, $name:literal, $verbose:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $ty {
            pub name: String,
        }

        impl $ty {
            pub fn new(name: impl Into<String>) -> Self {
                Self { name: name.into() }
            }
        }

        impl Entity for $ty {
            const NAME: &'static str = $name;
            const VERBOSE_NAME: &'static str = $verbose;
            const FIELDS: &'static [Field] = &[Field::text("name", 100).required()];

            fn label(&self, _labels: &dyn Labels) -> String {
                self.name.clone()
            }
        }
    };
}

named_lookup!(
    /// Hospital, clinic or care unit raising requests.
    HealthUnit,
    "health_unit",
    "Health unit"
);

named_lookup!(
    /// Clinician attached to a request or a purchase validation.
    HealthProfessional,
    "health_professional",
    "Health professional"
);

named_lookup!(Manufacturer, "manufacturer", "Manufacturer");

named_lookup!(
    /// Place where received stock is kept.
    Warehouse,
    "warehouse",
    "Warehouse"
);

/// Carrier delivering stock to its final location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distributor {
    pub name: String,
    pub contact: String,
}

impl Distributor {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contact: contact.into(),
        }
    }
}

impl Entity for Distributor {
    const NAME: &'static str = "distributor";
    const VERBOSE_NAME: &'static str = "Distributor";
    const FIELDS: &'static [Field] = &[
        Field::text("name", 100).required(),
        Field::text("contact", 300).required(),
    ];

    fn label(&self, _labels: &dyn Labels) -> String {
        self.name.clone()
    }
}

/// Kind of supporting document attached to a procurement (certificate, quote, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentType {
    pub file_type: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl DocumentType {
    pub fn new(file_type: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            description: None,
        }
    }
}

impl Entity for DocumentType {
    const NAME: &'static str = "document_type";
    const VERBOSE_NAME: &'static str = "Document type";
    const FIELDS: &'static [Field] = &[
        Field::text("file_type", 100).required(),
        Field::text("description", 200),
    ];

    fn label(&self, _labels: &dyn Labels) -> String {
        self.file_type.clone()
    }
}
