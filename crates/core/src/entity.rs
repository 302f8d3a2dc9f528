//! Entities, their type-erased descriptors, and the schema that groups them.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{DomainError, DomainResult};
use crate::field::{Field, OnDelete};
use crate::id::RecordId;

/// A stored row: field name to JSON value, without the id.
pub type Row = Map<String, Value>;

/// Resolves display labels of stored records.
pub trait Labels {
    /// Label of `entity #id`, or `None` when the record does not exist.
    fn label(&self, entity: &str, id: RecordId) -> Option<String>;

    /// A single text field of `entity #id`.
    fn text_field(&self, _entity: &str, _id: RecordId, _field: &str) -> Option<String> {
        None
    }

    /// Label of an optional reference, `-` when unset or dangling.
    fn label_or_dash(&self, entity: &str, id: Option<RecordId>) -> String {
        id.and_then(|id| self.label(entity, id))
            .unwrap_or_else(|| "-".to_string())
    }
}

/// A record type managed by the store.
///
/// The serde representation of an entity is its stored row, so field names in
/// [`Entity::FIELDS`] must match the serialized keys.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Stable snake_case name, used as table name and in admin URLs.
    const NAME: &'static str;
    const VERBOSE_NAME: &'static str;
    const FIELDS: &'static [Field];

    /// Cross-field checks, run after every field passed [`Field::clean`].
    fn validate(&self) -> DomainResult<()> {
        Ok(())
    }

    /// Hook run once, before the first insert.
    fn on_create(&mut self, _now: DateTime<Utc>) {}

    fn label(&self, labels: &dyn Labels) -> String;
}

/// A typed record together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub id: RecordId,
    pub record: T,
}

/// A foreign key seen from the schema: `entity.field -> target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub entity: &'static str,
    pub field: &'static str,
    pub target: &'static str,
    pub on_delete: OnDelete,
    pub required: bool,
}

/// Whether a row is being written for the first time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create(DateTime<Utc>),
    Update,
}

type DecodeFn = fn(Row, WriteMode) -> DomainResult<Row>;
type LabelFn = fn(&Row, &dyn Labels) -> DomainResult<String>;

/// Type-erased handle on an [`Entity`] implementation.
#[derive(Clone, Copy)]
pub struct EntityDescriptor {
    pub name: &'static str,
    pub verbose_name: &'static str,
    pub fields: &'static [Field],
    decode: DecodeFn,
    label: LabelFn,
}

impl core::fmt::Debug for EntityDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntityDescriptor")
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .finish()
    }
}

impl EntityDescriptor {
    pub fn of<T: Entity>() -> Self {
        Self {
            name: T::NAME,
            verbose_name: T::VERBOSE_NAME,
            fields: T::FIELDS,
            decode: decode_row::<T>,
            label: label_row::<T>,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Foreign keys declared by this entity.
    pub fn relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.fields.iter().filter_map(move |f| {
            f.reference().map(|(target, on_delete)| Relation {
                entity: self.name,
                field: f.name,
                target,
                on_delete,
                required: f.required,
            })
        })
    }

    /// Validate a complete row and return its canonical form.
    ///
    /// Unknown keys are rejected; every declared field is cleaned, the row is
    /// decoded through the entity type and re-encoded, so defaults and
    /// normalizations end up stored.
    pub fn decode(&self, row: Row, mode: WriteMode) -> DomainResult<Row> {
        (self.decode)(row, mode)
    }

    pub fn label(&self, row: &Row, labels: &dyn Labels) -> DomainResult<String> {
        (self.label)(row, labels)
    }
}

fn decode_row<T: Entity>(mut row: Row, mode: WriteMode) -> DomainResult<Row> {
    if let Some(unknown) = row.keys().find(|k| !T::FIELDS.iter().any(|f| f.name == k.as_str())) {
        return Err(DomainError::validation(
            unknown.clone(),
            format!("{} has no field named `{unknown}`", T::VERBOSE_NAME),
        ));
    }

    let mut cleaned = Row::new();
    for field in T::FIELDS {
        let raw = row.remove(field.name);
        // Non-editable values are produced by the entity; only check them when present.
        if !field.editable && raw.is_none() {
            continue;
        }
        cleaned.insert(field.name.to_string(), field.clean(raw)?);
    }

    let mut record: T = serde_json::from_value(Value::Object(cleaned))
        .map_err(|e| DomainError::invalid(format!("{}: {e}", T::VERBOSE_NAME)))?;
    if let WriteMode::Create(now) = mode {
        record.on_create(now);
    }
    record.validate()?;

    match serde_json::to_value(&record) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(_) => Err(DomainError::invalid(format!(
            "{} does not serialize to an object",
            T::VERBOSE_NAME
        ))),
        Err(e) => Err(DomainError::invalid(e.to_string())),
    }
}

fn label_row<T: Entity>(row: &Row, labels: &dyn Labels) -> DomainResult<String> {
    let record: T = serde_json::from_value(Value::Object(row.clone()))
        .map_err(|e| DomainError::storage(format!("corrupt {} row: {e}", T::NAME)))?;
    Ok(record.label(labels))
}

/// The set of entities a store manages.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entities: Vec<EntityDescriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity. Later registrations with the same name replace earlier ones.
    pub fn with<T: Entity>(mut self) -> Self {
        self.entities.retain(|e| e.name != T::NAME);
        self.entities.push(EntityDescriptor::of::<T>());
        self
    }

    pub fn entity(&self, name: &str) -> DomainResult<&EntityDescriptor> {
        self.entities
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| DomainError::UnknownEntity(name.to_string()))
    }

    pub fn entities(&self) -> &[EntityDescriptor] {
        &self.entities
    }

    /// Every relation pointing at `target`.
    pub fn relations_to<'a>(&'a self, target: &'a str) -> impl Iterator<Item = Relation> + 'a {
        self.entities
            .iter()
            .flat_map(EntityDescriptor::relations)
            .filter(move |r| r.target == target)
    }

    /// Check that every foreign key targets a registered entity and that
    /// set-null keys are nullable.
    pub fn check(&self) -> DomainResult<()> {
        for relation in self.entities.iter().flat_map(EntityDescriptor::relations) {
            self.entity(relation.target).map_err(|_| {
                DomainError::invalid(format!(
                    "{}.{} references unregistered entity `{}`",
                    relation.entity, relation.field, relation.target
                ))
            })?;
            if relation.on_delete == OnDelete::SetNull && relation.required {
                return Err(DomainError::invalid(format!(
                    "{}.{} is cleared on delete and cannot be required",
                    relation.entity, relation.field
                )));
            }
        }
        Ok(())
    }
}
