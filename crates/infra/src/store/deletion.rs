//! Deletion collector.
//!
//! Starting from one record, walk every relation pointing at it:
//! - `Cascade` dependents are collected for deletion and walked in turn,
//! - `SetNull` dependents are detached (their reference is cleared),
//! - `Protect` dependents block the whole delete.
//!
//! Collection never mutates anything; [`super::Transaction::delete`] applies
//! the result.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use medprocure_core::{BlockingRecord, DomainError, DomainResult, OnDelete, RecordId};

use super::Reader;

/// A reference that will be cleared by a delete.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Detached {
    pub entity: String,
    pub id: RecordId,
    pub field: String,
}

/// Outcome (or preview) of deleting one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Deletion {
    /// Deleted ids per entity, the requested record included.
    pub deleted: BTreeMap<String, Vec<RecordId>>,
    pub detached: Vec<Detached>,
}

impl Deletion {
    pub fn count(&self, entity: &str) -> usize {
        self.deleted.get(entity).map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.deleted.values().map(Vec::len).sum()
    }

    pub fn contains(&self, entity: &str, id: RecordId) -> bool {
        self.deleted
            .get(entity)
            .is_some_and(|ids| ids.contains(&id))
    }
}

pub(crate) fn collect(reader: &Reader<'_>, entity: &str, id: RecordId) -> DomainResult<Deletion> {
    let root = reader.schema.entity(entity)?;
    reader.row(root.name, id)?;

    let mut seen: BTreeSet<(&'static str, RecordId)> = BTreeSet::new();
    let mut queue = VecDeque::from([(root.name, id)]);
    let mut blocked: BTreeSet<(String, RecordId, String)> = BTreeSet::new();
    let mut detached: BTreeSet<Detached> = BTreeSet::new();

    while let Some((current, current_id)) = queue.pop_front() {
        if !seen.insert((current, current_id)) {
            continue;
        }

        for relation in reader.schema.relations_to(current) {
            let Some(table) = reader.tables.table(relation.entity) else {
                continue;
            };
            let wanted = Value::from(current_id.get());
            let dependents = table
                .rows
                .iter()
                .filter(|(_, row)| row.get(relation.field) == Some(&wanted))
                .map(|(dep_id, _)| *dep_id);

            for dep_id in dependents {
                match relation.on_delete {
                    OnDelete::Cascade => queue.push_back((relation.entity, dep_id)),
                    OnDelete::Protect => {
                        blocked.insert((relation.entity.to_string(), dep_id, relation.field.to_string()));
                    }
                    OnDelete::SetNull => {
                        detached.insert(Detached {
                            entity: relation.entity.to_string(),
                            id: dep_id,
                            field: relation.field.to_string(),
                        });
                    }
                }
            }
        }
    }

    if !blocked.is_empty() {
        debug!(entity, %id, blockers = blocked.len(), "delete blocked by protected references");
        return Err(DomainError::ReferentialIntegrity {
            entity: entity.to_string(),
            id,
            blocked_by: blocked
                .into_iter()
                .map(|(entity, id, field)| BlockingRecord { entity, id, field })
                .collect(),
        });
    }

    let mut deletion = Deletion::default();
    for (name, dead) in seen {
        deletion.deleted.entry(name.to_string()).or_default().push(dead);
    }
    // Records deleted anyway need no detaching.
    deletion.detached = detached
        .into_iter()
        .filter(|d| !deletion.contains(&d.entity, d.id))
        .collect();

    debug!(
        entity,
        %id,
        deleted = deletion.total(),
        detached = deletion.detached.len(),
        "deletion collected"
    );
    Ok(deletion)
}
