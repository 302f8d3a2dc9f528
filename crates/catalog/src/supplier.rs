use serde::{Deserialize, Serialize};

use medprocure_core::{CountryCode, Entity, Field, Labels};

/// A party offering equipment, by donation or commercially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Lead time as quoted by the supplier.
    #[serde(default)]
    pub lead: Option<String>,
    #[serde(default)]
    pub origin: Option<CountryCode>,
}

impl Supplier {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            phone: None,
            lead: None,
            origin: None,
        }
    }

    pub fn from_country(mut self, origin: CountryCode) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl Entity for Supplier {
    const NAME: &'static str = "supplier";
    const VERBOSE_NAME: &'static str = "Supplier";
    const FIELDS: &'static [Field] = &[
        Field::text("name", 200).required(),
        Field::email("email", 254),
        Field::text("phone", 32),
        Field::text("lead", 32),
        Field::country("origin"),
    ];

    fn label(&self, _labels: &dyn Labels) -> String {
        self.name.clone()
    }
}
