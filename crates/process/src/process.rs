use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use medprocure_core::{Entity, Field, Labels};

/// Root of a procurement case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    #[serde(default)]
    pub code: Option<i64>,
    /// Set once by the store when the process is first saved.
    #[serde(default = "Utc::now")]
    pub creation_date: DateTime<Utc>,
}

impl Process {
    pub fn new(code: Option<i64>) -> Self {
        Self {
            code,
            creation_date: Utc::now(),
        }
    }
}

impl Entity for Process {
    const NAME: &'static str = "process";
    const VERBOSE_NAME: &'static str = "Process";
    const FIELDS: &'static [Field] = &[
        Field::integer("code"),
        Field::date_time("creation_date").auto(),
    ];

    fn on_create(&mut self, now: DateTime<Utc>) {
        self.creation_date = now;
    }

    fn label(&self, _labels: &dyn Labels) -> String {
        match self.code {
            Some(code) => code.to_string(),
            None => "-".to_string(),
        }
    }
}
