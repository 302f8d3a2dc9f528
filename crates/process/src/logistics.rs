//! Receiving purchased equipment into stock and sending it out.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use medprocure_catalog::{Distributor, User, Warehouse};
use medprocure_core::{Entity, Field, Labels, OnDelete, RecordId};

use crate::process::Process;

/// Equipment received for a process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub process: RecordId,
    #[serde(default)]
    pub owner: Option<RecordId>,
    #[serde(default)]
    pub loading_point: Option<String>,
    #[serde(default)]
    pub creation_date: Option<NaiveDate>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub warehouse: Option<RecordId>,
}

impl Stock {
    pub fn new(process: RecordId) -> Self {
        Self {
            process,
            owner: None,
            loading_point: None,
            creation_date: None,
            quantity: None,
            warehouse: None,
        }
    }
}

impl Entity for Stock {
    const NAME: &'static str = "stock";
    const VERBOSE_NAME: &'static str = "Stock";
    const FIELDS: &'static [Field] = &[
        Field::foreign_key("process", Process::NAME, OnDelete::Cascade).required(),
        Field::foreign_key("owner", User::NAME, OnDelete::SetNull),
        Field::text("loading_point", 100),
        Field::date("creation_date"),
        Field::integer("quantity"),
        Field::foreign_key("warehouse", Warehouse::NAME, OnDelete::Protect),
    ];

    fn label(&self, labels: &dyn Labels) -> String {
        labels.label_or_dash(Process::NAME, Some(self.process))
    }
}

/// Delivery of a process' stock to its end location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distribution {
    pub process: RecordId,
    #[serde(default)]
    pub distributor: Option<RecordId>,
    #[serde(default)]
    pub location: Option<String>,
}

impl Distribution {
    pub fn new(process: RecordId) -> Self {
        Self {
            process,
            distributor: None,
            location: None,
        }
    }
}

impl Entity for Distribution {
    const NAME: &'static str = "distribution";
    const VERBOSE_NAME: &'static str = "Distribution";
    const FIELDS: &'static [Field] = &[
        Field::foreign_key("process", Process::NAME, OnDelete::Cascade).required(),
        Field::foreign_key("distributor", Distributor::NAME, OnDelete::Protect),
        Field::text("location", 100),
    ];

    fn label(&self, labels: &dyn Labels) -> String {
        labels.label_or_dash(Process::NAME, Some(self.process))
    }
}
