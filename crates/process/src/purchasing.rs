//! Validation and purchase of a procurement offer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use medprocure_catalog::{HealthProfessional, User};
use medprocure_core::{Entity, Field, Labels, OnDelete, RecordId};

use crate::process::Process;

/// Sign-off that the offer may be purchased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseValidation {
    pub process: RecordId,
    #[serde(default)]
    pub owner: Option<RecordId>,
    #[serde(default)]
    pub health_professional: Option<RecordId>,
}

impl PurchaseValidation {
    pub fn new(process: RecordId) -> Self {
        Self {
            process,
            owner: None,
            health_professional: None,
        }
    }
}

impl Entity for PurchaseValidation {
    const NAME: &'static str = "purchase_validation";
    const VERBOSE_NAME: &'static str = "Purchase validation";
    const FIELDS: &'static [Field] = &[
        Field::foreign_key("process", Process::NAME, OnDelete::Cascade).required(),
        Field::foreign_key("owner", User::NAME, OnDelete::SetNull),
        Field::foreign_key("health_professional", HealthProfessional::NAME, OnDelete::SetNull),
    ];

    fn label(&self, labels: &dyn Labels) -> String {
        labels.label_or_dash(Process::NAME, Some(self.process))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub process: RecordId,
    #[serde(default)]
    pub owner: Option<RecordId>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub creation_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl PurchaseOrder {
    pub fn new(process: RecordId) -> Self {
        Self {
            process,
            owner: None,
            code: None,
            creation_date: None,
            payment_method: None,
            payment_date: None,
        }
    }
}

impl Entity for PurchaseOrder {
    const NAME: &'static str = "purchase_order";
    const VERBOSE_NAME: &'static str = "Purchase order";
    const FIELDS: &'static [Field] = &[
        Field::foreign_key("process", Process::NAME, OnDelete::Cascade).required(),
        Field::foreign_key("owner", User::NAME, OnDelete::SetNull),
        Field::text("code", 30),
        Field::date_time("creation_date"),
        Field::text("payment_method", 30),
        Field::date("payment_date"),
    ];

    fn label(&self, labels: &dyn Labels) -> String {
        format!(
            "{} / {}",
            labels.label_or_dash(Process::NAME, Some(self.process)),
            self.code.as_deref().unwrap_or("-"),
        )
    }
}
