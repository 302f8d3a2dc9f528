//! The record store.
//!
//! Rows live in memory as JSON maps keyed by entity name and id, and every
//! write goes through [`Store::atomic`]: the closure works on a private copy
//! of the tables, which is persisted and swapped in only when the closure and
//! the save both succeed. A failed write therefore leaves no trace.

mod deletion;
mod query;
mod tables;

use std::sync::{RwLock, RwLockReadGuard};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use medprocure_core::{
    DomainError, DomainResult, Entity, EntityDescriptor, Labels, RecordId, Row, Schema, Stored,
    WriteMode,
};

use crate::persistence::{MemoryPersistence, Persistence};

pub use deletion::{Deletion, Detached};
pub use query::{OrderBy, Query};
pub use tables::{Table, Tables};

/// A stored row together with its id, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: Row,
}

impl StoredRecord {
    /// Decode into the typed entity.
    pub fn decode<T: Entity>(self) -> DomainResult<Stored<T>> {
        let record = serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| DomainError::storage(format!("corrupt {} #{}: {e}", T::NAME, self.id)))?;
        Ok(Stored { id: self.id, record })
    }

    pub fn get(&self, field: &str) -> &Value {
        self.fields.get(field).unwrap_or(&Value::Null)
    }
}

/// Thread-safe store over a [`Schema`].
pub struct Store {
    schema: Schema,
    tables: RwLock<Tables>,
    persistence: Box<dyn Persistence>,
}

impl core::fmt::Debug for Store {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Store")
            .field("entities", &self.schema.entities().len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Volatile store, for tests and throwaway instances.
    pub fn in_memory(schema: Schema) -> DomainResult<Self> {
        Self::open(schema, MemoryPersistence::default())
    }

    /// Open a store, loading whatever `persistence` already holds.
    pub fn open(schema: Schema, persistence: impl Persistence + 'static) -> DomainResult<Self> {
        schema.check()?;
        let tables = persistence.load()?.unwrap_or_default();

        for name in tables.entity_names() {
            if schema.entity(name).is_err() {
                warn!(entity = name, "stored table has no matching entity; keeping it untouched");
            }
        }
        info!(
            entities = schema.entities().len(),
            empty = tables.is_empty(),
            "record store opened"
        );

        Ok(Self {
            schema,
            tables: RwLock::new(tables),
            persistence: Box::new(persistence),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    fn read_guard(&self) -> DomainResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| DomainError::storage("store lock poisoned"))
    }

    /// Run `f` against a consistent view of the store.
    pub fn read<R>(&self, f: impl FnOnce(&Reader<'_>) -> DomainResult<R>) -> DomainResult<R> {
        let tables = self.read_guard()?;
        f(&Reader {
            schema: &self.schema,
            tables: &tables,
        })
    }

    /// Run `f` as one all-or-nothing write.
    pub fn atomic<R>(&self, f: impl FnOnce(&mut Transaction<'_>) -> DomainResult<R>) -> DomainResult<R> {
        let mut guard = self
            .tables
            .write()
            .map_err(|_| DomainError::storage("store lock poisoned"))?;

        let mut tx = Transaction {
            schema: &self.schema,
            tables: (*guard).clone(),
        };
        let out = f(&mut tx)?;

        self.persistence.save(&tx.tables)?;
        *guard = tx.tables;
        Ok(out)
    }

    pub fn create(&self, entity: &str, row: Row) -> DomainResult<StoredRecord> {
        self.atomic(|tx| tx.create(entity, row))
    }

    pub fn update(&self, entity: &str, id: RecordId, patch: Row) -> DomainResult<StoredRecord> {
        self.atomic(|tx| tx.update(entity, id, patch))
    }

    /// Delete a record with its cascade.
    pub fn delete(&self, entity: &str, id: RecordId) -> DomainResult<Deletion> {
        self.atomic(|tx| tx.delete(entity, id))
    }

    /// What [`Store::delete`] would do, without doing it.
    pub fn collect_deletion(&self, entity: &str, id: RecordId) -> DomainResult<Deletion> {
        self.read(|r| r.collect_deletion(entity, id))
    }

    pub fn get(&self, entity: &str, id: RecordId) -> DomainResult<StoredRecord> {
        self.read(|r| r.get(entity, id))
    }

    pub fn list(&self, entity: &str, query: &Query) -> DomainResult<Vec<StoredRecord>> {
        self.read(|r| r.list(entity, query))
    }

    pub fn count(&self, entity: &str) -> DomainResult<usize> {
        self.read(|r| {
            let descriptor = r.schema.entity(entity)?;
            Ok(r.tables.len(descriptor.name))
        })
    }

    /// Display label of a record.
    pub fn label(&self, entity: &str, id: RecordId) -> DomainResult<String> {
        self.read(|r| r.label_of(entity, id))
    }

    pub fn insert<T: Entity>(&self, record: &T) -> DomainResult<Stored<T>> {
        self.create(T::NAME, to_row(record)?)?.decode()
    }

    pub fn fetch<T: Entity>(&self, id: RecordId) -> DomainResult<Stored<T>> {
        self.get(T::NAME, id)?.decode()
    }

    /// Overwrite every editable field of `T #id`.
    pub fn replace<T: Entity>(&self, id: RecordId, record: &T) -> DomainResult<Stored<T>> {
        self.update(T::NAME, id, to_row(record)?)?.decode()
    }

    pub fn all<T: Entity>(&self) -> DomainResult<Vec<Stored<T>>> {
        self.list(T::NAME, &Query::new())?
            .into_iter()
            .map(StoredRecord::decode)
            .collect()
    }
}

fn to_row<T: Entity>(record: &T) -> DomainResult<Row> {
    match serde_json::to_value(record) {
        Ok(Value::Object(row)) => Ok(row),
        Ok(_) => Err(DomainError::invalid(format!("{} does not serialize to an object", T::NAME))),
        Err(e) => Err(DomainError::invalid(e.to_string())),
    }
}

/// Read-only view of the store, also resolving record labels.
pub struct Reader<'a> {
    schema: &'a Schema,
    tables: &'a Tables,
}

impl<'a> Reader<'a> {
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn row(&self, entity: &str, id: RecordId) -> DomainResult<&'a Row> {
        let descriptor = self.schema.entity(entity)?;
        self.tables
            .row(descriptor.name, id)
            .ok_or_else(|| DomainError::not_found(descriptor.name, id))
    }

    pub fn get(&self, entity: &str, id: RecordId) -> DomainResult<StoredRecord> {
        Ok(StoredRecord {
            id,
            fields: self.row(entity, id)?.clone(),
        })
    }

    pub fn exists(&self, entity: &str, id: RecordId) -> bool {
        self.tables.row(entity, id).is_some()
    }

    pub fn list(&self, entity: &str, query: &Query) -> DomainResult<Vec<StoredRecord>> {
        let descriptor = self.schema.entity(entity)?;
        query.check(descriptor)?;

        let Some(table) = self.tables.table(descriptor.name) else {
            return Ok(Vec::new());
        };
        let mut rows: Vec<(RecordId, &Row)> = table
            .rows
            .iter()
            .filter(|(id, row)| query.matches(**id, row))
            .map(|(id, row)| (*id, row))
            .collect();
        query.sort(&mut rows);

        Ok(rows
            .into_iter()
            .map(|(id, row)| StoredRecord {
                id,
                fields: row.clone(),
            })
            .collect())
    }

    pub fn label_of(&self, entity: &str, id: RecordId) -> DomainResult<String> {
        let descriptor = self.schema.entity(entity)?;
        descriptor.label(self.row(entity, id)?, self)
    }

    pub fn collect_deletion(&self, entity: &str, id: RecordId) -> DomainResult<Deletion> {
        deletion::collect(self, entity, id)
    }
}

impl Labels for Reader<'_> {
    fn label(&self, entity: &str, id: RecordId) -> Option<String> {
        self.label_of(entity, id).ok()
    }

    fn text_field(&self, entity: &str, id: RecordId, field: &str) -> Option<String> {
        self.tables
            .row(entity, id)?
            .get(field)?
            .as_str()
            .map(str::to_string)
    }
}

/// Pending write, see [`Store::atomic`].
pub struct Transaction<'a> {
    schema: &'a Schema,
    tables: Tables,
}

impl Transaction<'_> {
    /// View of the tables including this transaction's own writes.
    pub fn reader(&self) -> Reader<'_> {
        Reader {
            schema: self.schema,
            tables: &self.tables,
        }
    }

    pub fn create(&mut self, entity: &str, mut row: Row) -> DomainResult<StoredRecord> {
        let descriptor = self.schema.entity(entity)?;
        row.remove("id");
        row.retain(|key, _| descriptor.field(key).is_none_or(|f| f.editable));

        let row = descriptor.decode(row, WriteMode::Create(Utc::now()))?;
        self.check_references(descriptor, &row)?;

        let table = self.tables.table_mut(descriptor.name);
        let id = table.next_id();
        table.rows.insert(id, row.clone());

        info!(entity = descriptor.name, %id, "record created");
        Ok(StoredRecord { id, fields: row })
    }

    /// Apply `patch` over the stored row. Keys left out keep their value.
    pub fn update(&mut self, entity: &str, id: RecordId, patch: Row) -> DomainResult<StoredRecord> {
        let descriptor = self.schema.entity(entity)?;
        let mut merged = self.reader().row(descriptor.name, id)?.clone();

        for (key, value) in patch {
            if key == "id" || descriptor.field(&key).is_some_and(|f| !f.editable) {
                continue;
            }
            merged.insert(key, value);
        }

        let row = descriptor.decode(merged, WriteMode::Update)?;
        self.check_references(descriptor, &row)?;
        self.tables
            .table_mut(descriptor.name)
            .rows
            .insert(id, row.clone());

        info!(entity = descriptor.name, %id, "record updated");
        Ok(StoredRecord { id, fields: row })
    }

    pub fn delete(&mut self, entity: &str, id: RecordId) -> DomainResult<Deletion> {
        let deletion = self.reader().collect_deletion(entity, id)?;

        for detached in &deletion.detached {
            if let Some(row) = self
                .tables
                .table_mut(&detached.entity)
                .rows
                .get_mut(&detached.id)
            {
                row.insert(detached.field.clone(), Value::Null);
            }
        }
        for (name, ids) in &deletion.deleted {
            let table = self.tables.table_mut(name);
            for dead in ids {
                table.rows.remove(dead);
            }
        }

        info!(
            entity,
            %id,
            deleted = deletion.total(),
            detached = deletion.detached.len(),
            "record deleted"
        );
        Ok(deletion)
    }

    pub fn insert<T: Entity>(&mut self, record: &T) -> DomainResult<Stored<T>> {
        self.create(T::NAME, to_row(record)?)?.decode()
    }

    fn check_references(&self, descriptor: &EntityDescriptor, row: &Row) -> DomainResult<()> {
        for relation in descriptor.relations() {
            let Some(target) = row.get(relation.field).and_then(Value::as_u64) else {
                continue;
            };
            let target_id = RecordId::new(target);
            if !self.reader().exists(relation.target, target_id) {
                let verbose = self
                    .schema
                    .entity(relation.target)
                    .map_or(relation.target, |e| e.verbose_name);
                return Err(DomainError::validation(
                    relation.field,
                    format!("{verbose} #{target_id} does not exist"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medprocure_catalog::{
        Distributor, DocumentType, Equipment, Manufacturer, ProductType, Supplier, User, Warehouse,
    };
    use medprocure_core::{BlockingRecord, TriState};
    use medprocure_process::{
        schema, Distribution, Procurement, ProcurementDocument, ProcurementType, Process,
        PurchaseOrder, PurchaseValidation, Request, Stock,
    };
    use proptest::prelude::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn store() -> Store {
        Store::in_memory(schema()).unwrap()
    }

    fn mask(store: &Store) -> Stored<Equipment> {
        store
            .insert(&Equipment::new("FFP2 mask", ProductType::ProtectiveEquipment, "9320+", "3M-9320"))
            .unwrap()
    }

    fn offer(process: RecordId, equipment: RecordId) -> Procurement {
        Procurement::new(process, ProcurementType::Commercial, equipment, "images/mask.png")
    }

    #[test]
    fn ids_are_assigned_per_entity_starting_at_one() {
        let store = store();
        let first = store.insert(&Process::new(Some(10))).unwrap();
        let second = store.insert(&Process::new(Some(11))).unwrap();
        let warehouse = store.insert(&Warehouse::new("Porto")).unwrap();

        assert_eq!(first.id, RecordId::new(1));
        assert_eq!(second.id, RecordId::new(2));
        assert_eq!(warehouse.id, RecordId::new(1));
    }

    #[test]
    fn process_creation_date_is_set_by_the_store_and_never_edited() {
        let store = store();
        let before = Utc::now();
        let created = store
            .create("process", row(json!({"code": 7, "creation_date": "1999-01-01T00:00:00Z"})))
            .unwrap()
            .decode::<Process>()
            .unwrap();
        assert!(created.record.creation_date >= before);

        let updated = store
            .update(
                "process",
                created.id,
                row(json!({"code": 8, "creation_date": "1999-01-01T00:00:00Z"})),
            )
            .unwrap()
            .decode::<Process>()
            .unwrap();
        assert_eq!(updated.record.code, Some(8));
        assert_eq!(updated.record.creation_date, created.record.creation_date);
    }

    #[test]
    fn partial_updates_keep_untouched_fields() {
        let store = store();
        let process = store.insert(&Process::new(None)).unwrap();
        let equipment = mask(&store);
        let mut request = Request::new(process.id, equipment.id);
        request.quantity = Some(100);
        let request = store.insert(&request).unwrap();

        let updated = store
            .update("request", request.id, row(json!({"maximum_available": true})))
            .unwrap();
        assert_eq!(updated.get("quantity"), &json!(100));
        assert_eq!(updated.get("maximum_available"), &json!(true));
    }

    #[test]
    fn references_must_point_at_existing_records() {
        let store = store();
        let process = store.insert(&Process::new(None)).unwrap();
        let err = store.insert(&Request::new(process.id, RecordId::new(42))).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("equipment", "Equipment #42 does not exist")
        );
        assert_eq!(store.count("request").unwrap(), 0);
    }

    #[test]
    fn request_round_trips_with_quantity_flag_and_links() {
        let store = store();
        let process = store.insert(&Process::new(Some(1))).unwrap();
        let equipment = mask(&store);
        let owner = store.insert(&User::new("ana")).unwrap();

        let mut request = Request::new(process.id, equipment.id);
        request.owner = Some(owner.id);
        request.quantity = Some(500);
        request.maximum_available = true;
        let stored = store.insert(&request).unwrap();

        assert_eq!(store.fetch::<Request>(stored.id).unwrap().record, request);
        assert_eq!(store.label("request", stored.id).unwrap(), "1 / FFP2 mask");
    }

    #[test]
    fn unknown_certifications_are_not_stored_as_false() {
        let store = store();
        let process = store.insert(&Process::new(None)).unwrap();
        let equipment = mask(&store);
        let mut procurement = offer(process.id, equipment.id);
        procurement.ce_certified = TriState::True;
        let stored = store.insert(&procurement).unwrap();

        let raw = store.get("procurement", stored.id).unwrap();
        assert_eq!(raw.get("ce_certified"), &json!(true));
        assert_eq!(raw.get("fda_certified"), &json!(null));
        assert_eq!(
            store.fetch::<Procurement>(stored.id).unwrap().record.fda_certified,
            TriState::Unknown
        );
    }

    #[test]
    fn deleting_a_process_cascades_to_everything_hanging_off_it() {
        let store = store();
        let process = store.insert(&Process::new(Some(1))).unwrap();
        let other = store.insert(&Process::new(Some(2))).unwrap();
        let equipment = mask(&store);

        store.insert(&Request::new(process.id, equipment.id)).unwrap();
        let procurement = store.insert(&offer(process.id, equipment.id)).unwrap();
        store
            .insert(&ProcurementDocument::new(procurement.id, "files/quote.pdf"))
            .unwrap();
        store.insert(&Stock::new(process.id)).unwrap();
        store.insert(&PurchaseValidation::new(process.id)).unwrap();
        store.insert(&PurchaseOrder::new(process.id)).unwrap();
        store.insert(&Distribution::new(process.id)).unwrap();
        let kept = store.insert(&Request::new(other.id, equipment.id)).unwrap();
        let kept_order = store.insert(&PurchaseOrder::new(other.id)).unwrap();

        let deletion = store.delete("process", process.id).unwrap();
        for entity in [
            "process",
            "request",
            "procurement",
            "procurement_document",
            "stock",
            "purchase_validation",
            "purchase_order",
            "distribution",
        ] {
            assert_eq!(deletion.count(entity), 1, "{entity}");
        }

        assert_eq!(store.count("procurement_document").unwrap(), 0);
        assert_eq!(store.count("purchase_validation").unwrap(), 0);
        assert_eq!(store.count("distribution").unwrap(), 0);
        assert!(store.get("purchase_order", kept_order.id).is_ok());
        assert!(store.get("request", kept.id).is_ok());
        assert!(store.fetch::<Equipment>(equipment.id).is_ok());
    }

    #[test]
    fn protected_equipment_cannot_be_deleted_while_requested() {
        let store = store();
        let process = store.insert(&Process::new(None)).unwrap();
        let equipment = mask(&store);
        let request = store.insert(&Request::new(process.id, equipment.id)).unwrap();

        let err = store.delete("equipment", equipment.id).unwrap_err();
        assert_eq!(
            err,
            DomainError::ReferentialIntegrity {
                entity: "equipment".into(),
                id: equipment.id,
                blocked_by: vec![BlockingRecord {
                    entity: "request".into(),
                    id: request.id,
                    field: "equipment".into(),
                }],
            }
        );
        assert!(store.get("equipment", equipment.id).is_ok());

        store.delete("request", request.id).unwrap();
        store.delete("equipment", equipment.id).unwrap();
        assert_eq!(store.count("equipment").unwrap(), 0);
    }

    #[test]
    fn protection_is_checked_through_the_cascade() {
        let store = store();
        let process = store.insert(&Process::new(None)).unwrap();
        let equipment = mask(&store);
        let supplier = store.insert(&Supplier::new("Acme")).unwrap();
        let mut procurement = offer(process.id, equipment.id);
        procurement.supplier = Some(supplier.id);
        store.insert(&procurement).unwrap();

        assert!(matches!(
            store.delete("supplier", supplier.id),
            Err(DomainError::ReferentialIntegrity { .. })
        ));
        // The offer goes away with its process, which frees the supplier.
        store.delete("process", process.id).unwrap();
        store.delete("supplier", supplier.id).unwrap();
    }

    #[test]
    fn lookups_in_use_cannot_be_deleted() {
        let store = store();
        let process = store.insert(&Process::new(None)).unwrap();
        let equipment = mask(&store);

        let warehouse = store.insert(&Warehouse::new("Porto")).unwrap();
        let mut stock = Stock::new(process.id);
        stock.warehouse = Some(warehouse.id);
        let stock = store.insert(&stock).unwrap();

        let distributor = store.insert(&Distributor::new("Norte Log", "geral@norte.pt")).unwrap();
        let mut distribution = Distribution::new(process.id);
        distribution.distributor = Some(distributor.id);
        let distribution = store.insert(&distribution).unwrap();

        let pdf = store.insert(&DocumentType::new("PDF")).unwrap();
        let procurement = store.insert(&offer(process.id, equipment.id)).unwrap();
        let mut document = ProcurementDocument::new(procurement.id, "files/quote.pdf");
        document.file_type = Some(pdf.id);
        let document = store.insert(&document).unwrap();

        let blocked = [
            ("warehouse", warehouse.id, "stock", stock.id, "warehouse"),
            ("distributor", distributor.id, "distribution", distribution.id, "distributor"),
            ("document_type", pdf.id, "procurement_document", document.id, "file_type"),
        ];
        for (entity, id, by, by_id, field) in blocked {
            assert_eq!(
                store.delete(entity, id).unwrap_err(),
                DomainError::ReferentialIntegrity {
                    entity: entity.into(),
                    id,
                    blocked_by: vec![BlockingRecord {
                        entity: by.into(),
                        id: by_id,
                        field: field.into(),
                    }],
                }
            );
            assert!(store.get(entity, id).is_ok());
            assert!(store.get(by, by_id).is_ok());
        }

        // Dropping the process releases all three.
        store.delete("process", process.id).unwrap();
        for (entity, id, ..) in blocked {
            store.delete(entity, id).unwrap();
        }
    }

    #[test]
    fn manufacturers_are_protected_by_their_equipment() {
        let store = store();
        let maker = store.insert(&Manufacturer::new("3M")).unwrap();
        store
            .insert(&Equipment::new("Mask", ProductType::ProtectiveEquipment, "x", "y").made_by(maker.id))
            .unwrap();

        let err = store.collect_deletion("manufacturer", maker.id).unwrap_err();
        assert!(matches!(err, DomainError::ReferentialIntegrity { ref blocked_by, .. } if blocked_by.len() == 1));
    }

    #[test]
    fn deleting_a_user_detaches_their_records() {
        let store = store();
        let owner = store.insert(&User::new("ana")).unwrap();
        let process = store.insert(&Process::new(None)).unwrap();
        let equipment = mask(&store);
        let mut request = Request::new(process.id, equipment.id);
        request.owner = Some(owner.id);
        let request = store.insert(&request).unwrap();

        let deletion = store.delete("user", owner.id).unwrap();
        assert_eq!(
            deletion.detached,
            vec![Detached {
                entity: "request".into(),
                id: request.id,
                field: "owner".into(),
            }]
        );
        assert_eq!(store.fetch::<Request>(request.id).unwrap().record.owner, None);
    }

    #[test]
    fn a_failed_transaction_leaves_no_trace() {
        let store = store();
        let result = store.atomic(|tx| {
            tx.insert(&Process::new(Some(1)))?;
            tx.create("request", row(json!({"process": 1})))
        });

        assert!(result.unwrap_err().is_validation());
        assert_eq!(store.count("process").unwrap(), 0);
        // The id handed out inside the failed transaction is free again.
        assert_eq!(store.insert(&Process::new(None)).unwrap().id, RecordId::new(1));
    }

    #[test]
    fn lists_filter_and_order() {
        let store = store();
        for code in [3, 1, 2] {
            store.insert(&Process::new(Some(code))).unwrap();
        }
        store.insert(&Process::new(None)).unwrap();

        let codes = |query: Query| -> Vec<Value> {
            store
                .list("process", &query)
                .unwrap()
                .iter()
                .map(|r| r.get("code").clone())
                .collect()
        };

        assert_eq!(codes(Query::new()), vec![json!(3), json!(1), json!(2), json!(null)]);
        assert_eq!(
            codes(Query::new().order_by(OrderBy::desc("code"))),
            vec![json!(3), json!(2), json!(1), json!(null)]
        );
        assert_eq!(codes(Query::new().filter("code", Value::Null)), vec![json!(null)]);
        assert!(store
            .list("process", &Query::new().filter("colour", "red"))
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn unknown_entities_are_reported() {
        let store = store();
        assert_eq!(
            store.list("invoice", &Query::new()).unwrap_err(),
            DomainError::UnknownEntity("invoice".into())
        );
    }

    proptest! {
        #[test]
        fn deleting_a_process_never_leaves_orphans(
            requests in 0usize..5,
            offers in 0usize..5,
            documents in 0usize..3,
            stocks in 0usize..4,
            paperwork in 0usize..3,
        ) {
            let store = store();
            let doomed = store.insert(&Process::new(Some(1))).unwrap();
            let survivor = store.insert(&Process::new(Some(2))).unwrap();
            let equipment = mask(&store);

            for process in [doomed.id, survivor.id] {
                for _ in 0..requests {
                    store.insert(&Request::new(process, equipment.id)).unwrap();
                }
                for _ in 0..offers {
                    let offer = store.insert(&offer(process, equipment.id)).unwrap();
                    for _ in 0..documents {
                        store.insert(&ProcurementDocument::new(offer.id, "files/quote.pdf")).unwrap();
                    }
                }
                for _ in 0..stocks {
                    store.insert(&Stock::new(process)).unwrap();
                }
                for _ in 0..paperwork {
                    store.insert(&PurchaseValidation::new(process)).unwrap();
                    store.insert(&PurchaseOrder::new(process)).unwrap();
                    store.insert(&Distribution::new(process)).unwrap();
                }
            }

            store.delete("process", doomed.id).unwrap();

            prop_assert_eq!(store.count("request").unwrap(), requests);
            prop_assert_eq!(store.count("procurement").unwrap(), offers);
            prop_assert_eq!(store.count("procurement_document").unwrap(), offers * documents);
            prop_assert_eq!(store.count("stock").unwrap(), stocks);
            prop_assert_eq!(store.count("purchase_validation").unwrap(), paperwork);
            prop_assert_eq!(store.count("purchase_order").unwrap(), paperwork);
            prop_assert_eq!(store.count("distribution").unwrap(), paperwork);
            for order in store.all::<PurchaseOrder>().unwrap() {
                prop_assert_eq!(order.record.process, survivor.id);
            }
            for request in store.all::<Request>().unwrap() {
                prop_assert_eq!(request.record.process, survivor.id);
            }
            for document in store.all::<ProcurementDocument>().unwrap() {
                prop_assert!(store.get("procurement", document.record.procurement).is_ok());
            }
        }
    }
}
