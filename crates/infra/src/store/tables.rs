use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use medprocure_core::{RecordId, Row};

/// Rows of one entity plus its id counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Highest id ever assigned; ids are not reused after a delete.
    pub last_id: u64,
    pub rows: BTreeMap<RecordId, Row>,
}

impl Table {
    pub(crate) fn next_id(&mut self) -> RecordId {
        self.last_id += 1;
        RecordId::new(self.last_id)
    }
}

/// Complete store contents; the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    tables: BTreeMap<String, Table>,
}

impl Tables {
    pub fn table(&self, entity: &str) -> Option<&Table> {
        self.tables.get(entity)
    }

    pub(crate) fn table_mut(&mut self, entity: &str) -> &mut Table {
        self.tables.entry(entity.to_string()).or_default()
    }

    pub fn row(&self, entity: &str, id: RecordId) -> Option<&Row> {
        self.table(entity)?.rows.get(&id)
    }

    pub fn len(&self, entity: &str) -> usize {
        self.table(entity).map_or(0, |t| t.rows.len())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(|t| t.rows.is_empty())
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}
