//! The generic admin site.
//!
//! Everything here is driven by [`ModelAdmin`] registrations and the field
//! metadata of the schema; no entity is special-cased.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use medprocure_core::{
    BlockingRecord, CountryCode, DomainError, DomainResult, EntityDescriptor, FieldKind, RecordId,
    Row,
};
use medprocure_infra::{
    Deletion, Detached, FileStorage, OrderBy, Query, Reader, Store, StoredRecord, Transaction,
};

use crate::config::{Inline, ListFilter, ModelAdmin};
use crate::error::{AdminError, AdminResult};
use crate::registry;
use crate::render::{cell, parse_lookup};

/// Query parameter carrying the changelist ordering.
pub const ORDER_PARAM: &str = "o";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub name: &'static str,
    pub verbose_name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeListRow {
    pub id: RecordId,
    pub label: String,
    pub cells: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterChoice {
    /// Query value selecting this choice.
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSidebar {
    pub field: &'static str,
    pub title: String,
    pub choices: Vec<FilterChoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeList {
    pub model: &'static str,
    pub verbose_name: &'static str,
    pub columns: Vec<Column>,
    pub rows: Vec<ChangeListRow>,
    pub filters: Vec<FilterSidebar>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayField {
    pub field: &'static str,
    pub value: String,
}

/// A record with its raw fields and their rendered form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub id: RecordId,
    pub label: String,
    pub fields: Row,
    pub display: Vec<DisplayField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineRecords {
    pub entity: &'static str,
    pub verbose_name: &'static str,
    pub fk_field: &'static str,
    pub min_num: usize,
    pub max_num: usize,
    pub extra: usize,
    pub records: Vec<RecordView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub model: &'static str,
    pub verbose_name: &'static str,
    pub record: RecordView,
    pub inlines: Vec<InlineRecords>,
}

/// Submitted add/change form.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChangeForm {
    #[serde(default)]
    pub fields: Row,
    /// Child forms keyed by inline entity name.
    #[serde(default)]
    pub inlines: BTreeMap<String, Vec<InlineForm>>,
}

/// One child row of an inline.
///
/// Without an id the row is created; with an id it is updated, or deleted
/// when `delete` is set.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InlineForm {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub fields: Row,
    #[serde(default)]
    pub delete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedGroup {
    pub entity: String,
    pub verbose_name: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtectedRecord {
    pub entity: String,
    pub id: RecordId,
    pub field: String,
    pub label: String,
}

/// Delete confirmation page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletePreview {
    pub model: &'static str,
    pub id: RecordId,
    pub label: String,
    /// False when protected records block the delete.
    pub deletable: bool,
    pub deleted: Vec<DeletedGroup>,
    pub detached: Vec<Detached>,
    pub protected: Vec<ProtectedRecord>,
}

/// Registered models over one store.
#[derive(Clone)]
pub struct AdminSite {
    store: Arc<Store>,
    models: Vec<ModelAdmin>,
    /// Where upload fields must point, when set.
    files: Option<Arc<dyn FileStorage>>,
}

impl core::fmt::Debug for AdminSite {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminSite")
            .field("store", &self.store)
            .field("models", &self.models.len())
            .field("checks_uploads", &self.files.is_some())
            .finish()
    }
}

impl AdminSite {
    /// Check `models` against the store schema and build the site.
    pub fn new(store: Arc<Store>, models: Vec<ModelAdmin>) -> AdminResult<Self> {
        let mut seen = BTreeSet::new();
        for model in &models {
            if !seen.insert(model.entity) {
                return Err(AdminError::Config(format!("`{}` registered twice", model.entity)));
            }
            check_registration(&store, model)?;
        }
        info!(models = models.len(), "admin site ready");
        Ok(Self {
            store,
            models,
            files: None,
        })
    }

    /// Require every upload field written through the site to name a file
    /// present in `files`.
    pub fn with_files(mut self, files: Arc<dyn FileStorage>) -> Self {
        self.files = Some(files);
        self
    }

    /// Site with the application's registrations.
    pub fn with_defaults(store: Arc<Store>) -> AdminResult<Self> {
        Self::new(store, registry::registrations())
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn models(&self) -> &[ModelAdmin] {
        &self.models
    }

    pub fn model(&self, entity: &str) -> AdminResult<&ModelAdmin> {
        self.models
            .iter()
            .find(|m| m.entity == entity)
            .ok_or_else(|| AdminError::UnknownModel(entity.to_string()))
    }

    fn descriptor(&self, model: &ModelAdmin) -> AdminResult<&EntityDescriptor> {
        Ok(self.store.schema().entity(model.entity)?)
    }

    pub fn index(&self) -> AdminResult<Vec<ModelSummary>> {
        self.models
            .iter()
            .map(|model| {
                let descriptor = self.descriptor(model)?;
                Ok(ModelSummary {
                    name: descriptor.name,
                    verbose_name: descriptor.verbose_name,
                    count: self.store.count(descriptor.name)?,
                })
            })
            .collect()
    }

    /// List page. `params` are raw query pairs: field filters plus [`ORDER_PARAM`].
    pub fn changelist(&self, entity: &str, params: &[(String, String)]) -> AdminResult<ChangeList> {
        let model = self.model(entity)?;
        let descriptor = self.descriptor(model)?;

        let mut query = Query::new();
        let mut ordering = model.ordering.map(OrderBy::parse);
        for (key, raw) in params {
            if key == ORDER_PARAM {
                if !raw.is_empty() {
                    ordering = Some(OrderBy::parse(raw));
                }
                continue;
            }
            let field = descriptor.field(key).ok_or_else(|| AdminError::UnknownFilter {
                model: model.entity.to_string(),
                field: key.clone(),
            })?;
            query = query.filter(key.clone(), parse_lookup(field, raw)?);
        }
        if let Some(order) = ordering {
            query = query.order_by(order);
        }

        let changelist = self.store.read(|reader| {
            let records = reader.list(descriptor.name, &query)?;
            let rows = records
                .iter()
                .map(|record| {
                    let label = descriptor.label(&record.fields, reader)?;
                    let cells = if model.list_display.is_empty() {
                        vec![label.clone()]
                    } else {
                        model
                            .list_display
                            .iter()
                            .filter_map(|name| descriptor.field(name))
                            .map(|field| cell(field, record.get(field.name), reader))
                            .collect()
                    };
                    Ok(ChangeListRow {
                        id: record.id,
                        label,
                        cells,
                    })
                })
                .collect::<DomainResult<Vec<_>>>()?;

            let filters = model
                .list_filter
                .iter()
                .map(|filter| sidebar(reader, descriptor, *filter, &query))
                .collect::<DomainResult<Vec<_>>>()?;

            Ok(ChangeList {
                model: descriptor.name,
                verbose_name: descriptor.verbose_name,
                columns: columns(model, descriptor),
                count: rows.len(),
                rows,
                filters,
            })
        })?;
        Ok(changelist)
    }

    pub fn detail(&self, entity: &str, id: RecordId) -> AdminResult<Detail> {
        let model = self.model(entity)?;
        let descriptor = self.descriptor(model)?;

        let detail = self.store.read(|reader| {
            let record = record_view(reader, descriptor, reader.get(descriptor.name, id)?)?;
            let inlines = model
                .inlines
                .iter()
                .map(|inline| {
                    let child = reader.schema().entity(inline.entity)?;
                    let records = reader
                        .list(child.name, &children_of(inline, id))?
                        .into_iter()
                        .map(|r| record_view(reader, child, r))
                        .collect::<DomainResult<Vec<_>>>()?;
                    Ok(InlineRecords {
                        entity: child.name,
                        verbose_name: child.verbose_name,
                        fk_field: inline.fk_field,
                        min_num: inline.min_num,
                        max_num: inline.max_num,
                        extra: inline.extra,
                        records,
                    })
                })
                .collect::<DomainResult<Vec<_>>>()?;

            Ok(Detail {
                model: descriptor.name,
                verbose_name: descriptor.verbose_name,
                record,
                inlines,
            })
        })?;
        Ok(detail)
    }

    /// Create a record and its inline children in one transaction.
    pub fn add(&self, entity: &str, form: ChangeForm) -> AdminResult<Detail> {
        let model = self.model(entity)?;
        let descriptor = self.descriptor(model)?;
        let ChangeForm { fields, inlines } = form;

        let id = self
            .store
            .atomic(|tx| {
                let parent = tx.create(model.entity, fields)?;
                self.check_uploads(descriptor, &parent.fields)?;
                self.apply_inlines(tx, model, parent.id, inlines)?;
                Ok(parent.id)
            })
            .inspect_err(|e| warn!(model = model.entity, error = %e, "admin add rejected"))?;

        info!(model = model.entity, %id, "admin add");
        self.detail(entity, id)
    }

    /// Update a record and its inline children in one transaction.
    pub fn change(&self, entity: &str, id: RecordId, form: ChangeForm) -> AdminResult<Detail> {
        let model = self.model(entity)?;
        let descriptor = self.descriptor(model)?;
        let ChangeForm { fields, inlines } = form;

        self.store
            .atomic(|tx| {
                let parent = tx.update(model.entity, id, fields)?;
                self.check_uploads(descriptor, &parent.fields)?;
                self.apply_inlines(tx, model, id, inlines)
            })
            .inspect_err(|e| warn!(model = model.entity, %id, error = %e, "admin change rejected"))?;

        info!(model = model.entity, %id, "admin change");
        self.detail(entity, id)
    }

    pub fn delete_preview(&self, entity: &str, id: RecordId) -> AdminResult<DeletePreview> {
        let model = self.model(entity)?;
        let descriptor = self.descriptor(model)?;

        let preview = self.store.read(|reader| {
            let label = reader.label_of(descriptor.name, id)?;
            let (deletion, blocked_by) = match reader.collect_deletion(descriptor.name, id) {
                Ok(deletion) => (deletion, Vec::new()),
                Err(DomainError::ReferentialIntegrity { blocked_by, .. }) => (Deletion::default(), blocked_by),
                Err(e) => return Err(e),
            };

            Ok(DeletePreview {
                model: descriptor.name,
                id,
                label,
                deletable: blocked_by.is_empty(),
                deleted: deleted_groups(reader, &deletion),
                detached: deletion.detached,
                protected: blocked_by
                    .into_iter()
                    .map(|b| protected_record(reader, b))
                    .collect(),
            })
        })?;
        Ok(preview)
    }

    pub fn delete(&self, entity: &str, id: RecordId) -> AdminResult<Deletion> {
        let model = self.model(entity)?;
        let deletion = self
            .store
            .delete(model.entity, id)
            .inspect_err(|e| warn!(model = model.entity, %id, error = %e, "admin delete rejected"))?;
        info!(model = model.entity, %id, deleted = deletion.total(), "admin delete");
        Ok(deletion)
    }

    /// Apply inline child forms under `parent`, then enforce each inline's bounds.
    fn apply_inlines(
        &self,
        tx: &mut Transaction<'_>,
        model: &ModelAdmin,
        parent: RecordId,
        mut forms: BTreeMap<String, Vec<InlineForm>>,
    ) -> DomainResult<()> {
        if let Some(unknown) = forms.keys().find(|name| model.inline(name).is_none()) {
            return Err(DomainError::validation(
                unknown.clone(),
                format!("{} has no inline `{unknown}`", model.entity),
            ));
        }

        let parent_ref = Value::from(parent.get());
        for inline in model.inlines {
            let child_descriptor = self.store.schema().entity(inline.entity)?;
            let verbose = child_descriptor.verbose_name;

            for (index, form) in forms.remove(inline.entity).unwrap_or_default().into_iter().enumerate() {
                let mut fields = form.fields;
                fields.insert(inline.fk_field.to_string(), parent_ref.clone());

                let applied = match form.id {
                    Some(child) => {
                        let belongs = tx.reader().row(inline.entity, child)?.get(inline.fk_field) == Some(&parent_ref);
                        if !belongs {
                            return Err(DomainError::validation(
                                inline.entity,
                                format!("{verbose} #{child} does not belong to {} #{parent}", model.entity),
                            ));
                        }
                        if form.delete {
                            tx.delete(inline.entity, child).map(|_| None)
                        } else {
                            tx.update(inline.entity, child, fields).map(Some)
                        }
                    }
                    None if form.delete => Ok(None),
                    None => tx.create(inline.entity, fields).map(Some),
                };
                let written = applied.and_then(|record| match record {
                    Some(record) => self.check_uploads(child_descriptor, &record.fields),
                    None => Ok(()),
                });
                written.map_err(|e| prefixed(e, inline.entity, index))?;
            }

            let count = tx.reader().list(inline.entity, &children_of(inline, parent))?.len();
            if count < inline.min_num {
                return Err(DomainError::validation(
                    inline.entity,
                    format!("at least {} {verbose} required, got {count}", inline.min_num),
                ));
            }
            if count > inline.max_num {
                return Err(DomainError::validation(
                    inline.entity,
                    format!("at most {} {verbose} allowed, got {count}", inline.max_num),
                ));
            }
        }
        Ok(())
    }

    /// Upload fields of `row` must name files already in storage.
    fn check_uploads(&self, descriptor: &EntityDescriptor, row: &Row) -> DomainResult<()> {
        let Some(files) = &self.files else {
            return Ok(());
        };
        for field in descriptor.fields {
            if !matches!(field.kind, FieldKind::Upload { .. }) {
                continue;
            }
            if let Some(path) = row.get(field.name).and_then(Value::as_str) {
                if !files.exists(path) {
                    return Err(DomainError::validation(
                        field.name,
                        format!("`{path}` has not been uploaded"),
                    ));
                }
            }
        }
        Ok(())
    }
}

fn check_registration(store: &Store, model: &ModelAdmin) -> AdminResult<()> {
    let config = |msg: String| AdminError::Config(format!("{}: {msg}", model.entity));
    let schema = store.schema();
    let descriptor = schema
        .entity(model.entity)
        .map_err(|_| config("not part of the schema".into()))?;

    for name in model.list_display {
        if descriptor.field(name).is_none() {
            return Err(config(format!("list_display names unknown field `{name}`")));
        }
    }
    for filter in model.list_filter {
        match (filter, descriptor.field(filter.field()).map(|f| f.kind)) {
            (_, None) => return Err(config(format!("list_filter names unknown field `{}`", filter.field()))),
            (ListFilter::Country(name), Some(kind)) if kind != FieldKind::Country => {
                return Err(config(format!("`{name}` is not a country field")));
            }
            _ => {}
        }
    }
    if let Some(ordering) = model.ordering {
        let field = OrderBy::parse(ordering).field;
        if field != "id" && descriptor.field(&field).is_none() {
            return Err(config(format!("ordering names unknown field `{field}`")));
        }
    }
    for inline in model.inlines {
        let child = schema
            .entity(inline.entity)
            .map_err(|_| config(format!("inline `{}` is not part of the schema", inline.entity)))?;
        let points_back = child
            .field(inline.fk_field)
            .and_then(|f| f.reference())
            .is_some_and(|(target, _)| target == model.entity);
        if !points_back {
            return Err(config(format!(
                "inline {}.{} does not reference {}",
                inline.entity, inline.fk_field, model.entity
            )));
        }
        if inline.min_num > inline.max_num {
            return Err(config(format!("inline `{}` has min_num above max_num", inline.entity)));
        }
    }
    Ok(())
}

fn children_of(inline: &Inline, parent: RecordId) -> Query {
    Query::new().filter(inline.fk_field, parent.get())
}

/// Qualify child validation errors with their form position: `request-0-equipment`.
fn prefixed(err: DomainError, entity: &str, index: usize) -> DomainError {
    match err {
        DomainError::Validation { field, message } => DomainError::Validation {
            field: format!("{entity}-{index}-{field}"),
            message,
        },
        other => other,
    }
}

/// `health_unit` -> `Health unit`
fn humanize(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn columns(model: &ModelAdmin, descriptor: &EntityDescriptor) -> Vec<Column> {
    if model.list_display.is_empty() {
        return vec![Column {
            name: "__str__",
            title: descriptor.verbose_name.to_string(),
        }];
    }
    model
        .list_display
        .iter()
        .map(|&name| Column {
            name,
            title: humanize(name),
        })
        .collect()
}

fn record_view(reader: &Reader<'_>, descriptor: &EntityDescriptor, record: StoredRecord) -> DomainResult<RecordView> {
    let label = descriptor.label(&record.fields, reader)?;
    let display = descriptor
        .fields
        .iter()
        .map(|field| DisplayField {
            field: field.name,
            value: cell(field, record.get(field.name), reader),
        })
        .collect();
    Ok(RecordView {
        id: record.id,
        label,
        fields: record.fields,
        display,
    })
}

fn sidebar(
    reader: &Reader<'_>,
    descriptor: &EntityDescriptor,
    filter: ListFilter,
    query: &Query,
) -> DomainResult<FilterSidebar> {
    let name = filter.field();
    let field = descriptor
        .field(name)
        .ok_or_else(|| DomainError::validation(name, "unknown filter field"))?;

    let mut options: Vec<(String, String)> = match (filter, field.kind) {
        (ListFilter::Country(_), _) => distinct_values(reader, descriptor, name)?
            .into_iter()
            .filter_map(|code| CountryCode::lookup(&code))
            .map(|c| (c.code().to_string(), c.name().to_string()))
            .collect(),
        (_, FieldKind::ForeignKey { target, .. }) => reader
            .list(target, &Query::new())?
            .into_iter()
            .map(|r| -> DomainResult<(String, String)> { Ok((r.id.to_string(), reader.label_of(target, r.id)?)) })
            .collect::<DomainResult<_>>()?,
        (_, FieldKind::Choice(choices)) => choices
            .iter()
            .map(|(code, label)| (code.to_string(), label.to_string()))
            .collect(),
        (_, FieldKind::Boolean) => vec![("true".into(), "yes".into()), ("false".into(), "no".into())],
        (_, FieldKind::TriState) => vec![
            ("true".into(), "yes".into()),
            ("false".into(), "no".into()),
            ("unknown".into(), "unknown".into()),
        ],
        _ => distinct_values(reader, descriptor, name)?
            .into_iter()
            .map(|v| (v.clone(), v))
            .collect(),
    };
    if matches!(filter, ListFilter::Country(_)) {
        options.sort_by(|a, b| a.1.cmp(&b.1));
    }
    if !field.required && !matches!(field.kind, FieldKind::Boolean | FieldKind::TriState) {
        options.push((String::new(), "-".into()));
    }

    let active = query
        .filters
        .iter()
        .find(|(f, _)| f == name)
        .map(|(_, v)| v);
    let choices = options
        .into_iter()
        .map(|(value, label)| {
            let selected = active.is_some_and(|wanted| parse_lookup(field, &value).ok().as_ref() == Some(wanted));
            FilterChoice { value, label, selected }
        })
        .collect();

    Ok(FilterSidebar {
        field: name,
        title: humanize(name),
        choices,
    })
}

/// Distinct non-empty string values of `field` across the entity, sorted.
fn distinct_values(reader: &Reader<'_>, descriptor: &EntityDescriptor, field: &str) -> DomainResult<BTreeSet<String>> {
    Ok(reader
        .list(descriptor.name, &Query::new())?
        .iter()
        .filter_map(|r| r.get(field).as_str().map(str::to_string))
        .filter(|s| !s.is_empty())
        .collect())
}

fn deleted_groups(reader: &Reader<'_>, deletion: &Deletion) -> Vec<DeletedGroup> {
    deletion
        .deleted
        .iter()
        .map(|(entity, ids)| DeletedGroup {
            verbose_name: reader
                .schema()
                .entity(entity)
                .map_or("", |e| e.verbose_name),
            entity: entity.clone(),
            count: ids.len(),
        })
        .collect()
}

fn protected_record(reader: &Reader<'_>, blocker: BlockingRecord) -> ProtectedRecord {
    ProtectedRecord {
        label: reader
            .label_of(&blocker.entity, blocker.id)
            .unwrap_or_else(|_| "-".to_string()),
        entity: blocker.entity,
        id: blocker.id,
        field: blocker.field,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medprocure_catalog::{Equipment, ProductType, Supplier, User};
    use medprocure_core::Entity;
    use medprocure_infra::{InMemoryFileStorage, Namespace};
    use medprocure_process::{schema, Process, Request};
    use proptest::prelude::*;
    use serde_json::json;

    fn site() -> AdminSite {
        let store = Arc::new(Store::in_memory(schema()).unwrap());
        AdminSite::with_defaults(store).unwrap()
    }

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn mask(site: &AdminSite) -> RecordId {
        site.store()
            .insert(&Equipment::new("FFP2 mask", ProductType::ProtectiveEquipment, "9320+", "3M-9320"))
            .unwrap()
            .id
    }

    fn process_form(equipment: RecordId, requests: usize) -> ChangeForm {
        let request = InlineForm {
            fields: row(json!({"equipment": equipment.get(), "quantity": 5})),
            ..InlineForm::default()
        };
        let single = |fields: Value| vec![InlineForm { fields: row(fields), ..InlineForm::default() }];

        ChangeForm {
            fields: row(json!({"code": 2020})),
            inlines: BTreeMap::from([
                ("request".to_string(), vec![request; requests]),
                (
                    "procurement".to_string(),
                    single(json!({
                        "procurement_type": "C",
                        "equipment": equipment.get(),
                        "picture": "images/mask.png",
                        "currency": "D",
                    })),
                ),
                ("purchase_validation".to_string(), single(json!({}))),
                ("stock".to_string(), single(json!({"quantity": 5}))),
            ]),
        }
    }

    #[test]
    fn default_registrations_match_the_schema() {
        let site = site();
        let index = site.index().unwrap();
        assert_eq!(index.len(), 17);
        assert_eq!(index[0].name, "process");
        assert!(index.iter().all(|m| m.count == 0));
    }

    #[test]
    fn registrations_are_checked() {
        let store = Arc::new(Store::in_memory(schema()).unwrap());
        let bad_column = ModelAdmin::new("request").list_display(&["colour"]);
        assert!(matches!(
            AdminSite::new(store.clone(), vec![bad_column]),
            Err(AdminError::Config(_))
        ));

        const MISPLACED: &[Inline] = &[Inline::single("request", "process")];
        let bad_inline = ModelAdmin::new("equipment").inlines(MISPLACED);
        assert!(matches!(AdminSite::new(store, vec![bad_inline]), Err(AdminError::Config(_))));
    }

    #[test]
    fn changelist_renders_labels_and_flags() {
        let site = site();
        let equipment = mask(&site);
        let process = site.store().insert(&Process::new(Some(7))).unwrap();
        site.store().insert(&Request::new(process.id, equipment)).unwrap();

        let list = site.changelist("request", &[]).unwrap();
        assert_eq!(list.columns[0].title, "Process");
        assert_eq!(list.columns[3].title, "Health professional");
        assert_eq!(
            list.rows[0].cells,
            vec!["7", "-", "-", "-", "FFP2 mask / Personal protective equipment", "-", "no"]
        );

        let equipment_filter = list.filters.iter().find(|f| f.field == "equipment").unwrap();
        assert_eq!(equipment_filter.choices.len(), 1);
        assert_eq!(equipment_filter.choices[0].value, equipment.to_string());
    }

    #[test]
    fn models_without_columns_list_their_label() {
        let site = site();
        site.store().insert(&User::new("ana")).unwrap();
        let list = site.changelist("user", &[]).unwrap();
        assert_eq!(list.columns[0].name, "__str__");
        assert_eq!(list.rows[0].cells, vec!["ana"]);
    }

    #[test]
    fn suppliers_filter_by_country_code_or_name() {
        let site = site();
        let pt = CountryCode::parse("PT").unwrap();
        let cn = CountryCode::parse("CN").unwrap();
        site.store().insert(&Supplier::new("Lusa").from_country(pt)).unwrap();
        site.store().insert(&Supplier::new("Shenzhen Med").from_country(cn)).unwrap();
        site.store().insert(&Supplier::new("Nowhere")).unwrap();

        let by_code = site.changelist("supplier", &params(&[("origin", "PT")])).unwrap();
        let by_name = site.changelist("supplier", &params(&[("origin", "portugal")])).unwrap();
        assert_eq!(by_code.rows, by_name.rows);
        assert_eq!(by_code.count, 1);
        assert_eq!(by_code.rows[0].cells[4], "Portugal");

        let origin = &by_code.filters[0];
        let labels: Vec<_> = origin.choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["China", "Portugal", "-"]);
        assert!(origin.choices.iter().any(|c| c.label == "Portugal" && c.selected));

        let unset = site.changelist("supplier", &params(&[("origin", "")])).unwrap();
        assert_eq!(unset.rows[0].label, "Nowhere");
    }

    #[test]
    fn bad_filters_are_reported() {
        let site = site();
        assert_eq!(
            site.changelist("supplier", &params(&[("colour", "red")])).unwrap_err(),
            AdminError::UnknownFilter {
                model: "supplier".into(),
                field: "colour".into(),
            }
        );
        assert!(matches!(
            site.changelist("supplier", &params(&[("origin", "Atlantis")])),
            Err(AdminError::Domain(DomainError::Validation { .. }))
        ));
        assert_eq!(
            site.changelist("invoice", &[]).unwrap_err(),
            AdminError::UnknownModel("invoice".into())
        );
    }

    #[test]
    fn changelist_honours_ordering_param() {
        let site = site();
        for code in [1, 3, 2] {
            site.store().insert(&Process::new(Some(code))).unwrap();
        }
        let list = site.changelist("process", &params(&[("o", "-code")])).unwrap();
        let codes: Vec<_> = list.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(codes, vec!["3", "2", "1"]);
    }

    #[test]
    fn process_form_creates_one_of_each_inline() {
        let site = site();
        let equipment = mask(&site);

        let detail = site.add("process", process_form(equipment, 1)).unwrap();
        assert_eq!(detail.record.label, "2020");
        let counts: Vec<_> = detail.inlines.iter().map(|i| (i.entity, i.records.len())).collect();
        assert_eq!(
            counts,
            vec![("request", 1), ("procurement", 1), ("purchase_validation", 1), ("stock", 1)]
        );
        let procurement = &detail.inlines[1].records[0];
        assert!(procurement
            .display
            .iter()
            .any(|d| d.field == "ce_certified" && d.value == "unknown"));
    }

    #[test]
    fn process_form_with_two_requests_leaves_nothing_behind() {
        let site = site();
        let equipment = mask(&site);

        let err = site.add("process", process_form(equipment, 2)).unwrap_err();
        assert!(matches!(err, AdminError::Domain(DomainError::Validation { ref field, .. }) if field == "request"));
        assert_eq!(site.store().count(Process::NAME).unwrap(), 0);
        assert_eq!(site.store().count(Request::NAME).unwrap(), 0);
    }

    #[test]
    fn process_form_requires_every_inline() {
        let site = site();
        let equipment = mask(&site);
        let mut form = process_form(equipment, 1);
        form.inlines.remove("stock");

        assert!(site.add("process", form).is_err());
        assert_eq!(site.store().count(Process::NAME).unwrap(), 0);
    }

    #[test]
    fn inline_errors_point_at_the_child_form() {
        let site = site();
        let equipment = mask(&site);
        let mut form = process_form(equipment, 1);
        form.inlines.get_mut("request").unwrap()[0]
            .fields
            .insert("quantity".into(), json!("five"));

        assert_eq!(
            site.add("process", form).unwrap_err(),
            AdminError::Domain(DomainError::validation("request-0-quantity", "expected an integer"))
        );
    }

    #[test]
    fn change_updates_children_in_place() {
        let site = site();
        let equipment = mask(&site);
        let created = site.add("process", process_form(equipment, 1)).unwrap();
        let request_id = created.inlines[0].records[0].id;

        let form = ChangeForm {
            fields: row(json!({"code": 2021})),
            inlines: BTreeMap::from([(
                "request".to_string(),
                vec![InlineForm {
                    id: Some(request_id),
                    fields: row(json!({"quantity": 50})),
                    delete: false,
                }],
            )]),
        };
        let changed = site.change("process", created.record.id, form).unwrap();
        assert_eq!(changed.record.label, "2021");
        assert_eq!(changed.inlines[0].records[0].fields["quantity"], json!(50));

        let remove_only_request = ChangeForm {
            inlines: BTreeMap::from([(
                "request".to_string(),
                vec![InlineForm {
                    id: Some(request_id),
                    delete: true,
                    ..InlineForm::default()
                }],
            )]),
            ..ChangeForm::default()
        };
        assert!(site.change("process", created.record.id, remove_only_request).is_err());
        assert!(site.store().get("request", request_id).is_ok());
    }

    #[test]
    fn delete_preview_lists_protected_records() {
        let site = site();
        let equipment = mask(&site);
        let process = site.store().insert(&Process::new(Some(1))).unwrap();
        let request = site.store().insert(&Request::new(process.id, equipment)).unwrap();

        let preview = site.delete_preview("equipment", equipment).unwrap();
        assert!(!preview.deletable);
        assert_eq!(preview.protected[0].entity, "request");
        assert_eq!(preview.protected[0].id, request.id);
        assert_eq!(preview.protected[0].label, "1 / FFP2 mask");
        assert!(matches!(
            site.delete("equipment", equipment),
            Err(AdminError::Domain(DomainError::ReferentialIntegrity { .. }))
        ));

        let cascade = site.delete_preview("process", process.id).unwrap();
        assert!(cascade.deletable);
        let groups: Vec<_> = cascade.deleted.iter().map(|g| (g.entity.as_str(), g.count)).collect();
        assert_eq!(groups, vec![("process", 1), ("request", 1)]);
        assert_eq!(site.store().count("request").unwrap(), 1);

        site.delete("process", process.id).unwrap();
        assert_eq!(site.store().count("request").unwrap(), 0);
    }

    #[test]
    fn upload_fields_must_name_stored_files() {
        const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
        let files = Arc::new(InMemoryFileStorage::new());
        let store = Arc::new(Store::in_memory(schema()).unwrap());
        let site = AdminSite::with_defaults(store).unwrap().with_files(files.clone());
        let equipment = mask(&site);

        assert_eq!(
            site.add("process", process_form(equipment, 1)).unwrap_err(),
            AdminError::Domain(DomainError::validation(
                "procurement-0-picture",
                "`images/mask.png` has not been uploaded"
            ))
        );
        assert_eq!(site.store().count(Process::NAME).unwrap(), 0);

        files.save(Namespace::Images, "mask.png", PNG).unwrap();
        let detail = site.add("process", process_form(equipment, 1)).unwrap();
        assert_eq!(detail.inlines[1].records[0].fields["picture"], json!("images/mask.png"));
    }

    #[test]
    fn blank_text_is_listed_as_unset() {
        let site = site();
        let process = site.store().insert(&Process::new(Some(1))).unwrap();
        site.add(
            "distribution",
            ChangeForm {
                fields: row(json!({"process": process.id.get(), "location": ""})),
                ..ChangeForm::default()
            },
        )
        .unwrap();

        let unset = site.changelist("distribution", &params(&[("location", "")])).unwrap();
        assert_eq!(unset.count, 1);
        assert_eq!(unset.rows[0].cells, vec!["1", "-", "-"]);
    }

    proptest! {
        #[test]
        fn country_lookups_by_code_and_name_agree(index in 0usize..249) {
            let site = site();
            let Some(country) = CountryCode::all().nth(index) else {
                return Ok(());
            };
            site.store().insert(&Supplier::new("S").from_country(country)).unwrap();

            for raw in [country.code().to_string(), country.name().to_ascii_lowercase()] {
                let list = site.changelist("supplier", &params(&[("origin", &raw)])).unwrap();
                prop_assert_eq!(list.count, 1);
            }
        }
    }
}
