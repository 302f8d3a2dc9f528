use serde::{Deserialize, Serialize};

use medprocure_catalog::{Equipment, HealthProfessional, HealthUnit, User};
use medprocure_core::{Entity, Field, Labels, OnDelete, RecordId};

use crate::process::Process;

/// Demand for equipment raised by a health unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub process: RecordId,
    #[serde(default)]
    pub owner: Option<RecordId>,
    #[serde(default)]
    pub health_unit: Option<RecordId>,
    #[serde(default)]
    pub health_professional: Option<RecordId>,
    pub equipment: RecordId,
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Ask for as many units as can be supplied rather than `quantity`.
    #[serde(default)]
    pub maximum_available: bool,
}

impl Request {
    pub fn new(process: RecordId, equipment: RecordId) -> Self {
        Self {
            process,
            owner: None,
            health_unit: None,
            health_professional: None,
            equipment,
            quantity: None,
            maximum_available: false,
        }
    }
}

impl Entity for Request {
    const NAME: &'static str = "request";
    const VERBOSE_NAME: &'static str = "Request";
    const FIELDS: &'static [Field] = &[
        Field::foreign_key("process", Process::NAME, OnDelete::Cascade).required(),
        Field::foreign_key("owner", User::NAME, OnDelete::SetNull),
        Field::foreign_key("health_unit", HealthUnit::NAME, OnDelete::SetNull),
        Field::foreign_key("health_professional", HealthProfessional::NAME, OnDelete::SetNull),
        Field::foreign_key("equipment", Equipment::NAME, OnDelete::Protect).required(),
        Field::integer("quantity"),
        Field::boolean("maximum_available"),
    ];

    fn label(&self, labels: &dyn Labels) -> String {
        format!(
            "{} / {}",
            labels.label_or_dash(Process::NAME, Some(self.process)),
            labels
                .text_field(Equipment::NAME, self.equipment, "name")
                .unwrap_or_else(|| "-".to_string())
        )
    }
}
