//! List queries: exact-match filters and ordering.

use std::cmp::Ordering;

use serde_json::Value;

use medprocure_core::{DomainError, DomainResult, EntityDescriptor, RecordId, Row};

/// Sort key of a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }

    /// Parse `field` / `-field`.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(field) => Self::desc(field),
            None => Self::asc(raw),
        }
    }
}

/// Filters and ordering for [`crate::Store::list`].
///
/// Without an ordering, records come back in insertion (id) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filters: Vec<(String, Value)>,
    pub order_by: Option<OrderBy>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep records whose `field` equals `value` (`Value::Null` matches unset fields).
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = Some(order);
        self
    }

    /// Reject filters and sort keys that are not fields of `entity`.
    pub(crate) fn check(&self, entity: &EntityDescriptor) -> DomainResult<()> {
        let known = |name: &str| name == "id" || entity.field(name).is_some();
        for (field, _) in &self.filters {
            if !known(field) {
                return Err(DomainError::validation(
                    field.clone(),
                    format!("cannot filter {} by unknown field `{field}`", entity.name),
                ));
            }
        }
        if let Some(order) = &self.order_by {
            if !known(&order.field) {
                return Err(DomainError::validation(
                    order.field.clone(),
                    format!("cannot order {} by unknown field `{}`", entity.name, order.field),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn matches(&self, id: RecordId, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|(field, wanted)| same_value(&lookup(id, row, field), wanted))
    }

    /// Stable sort of `(id, row)` pairs already in id order.
    pub(crate) fn sort(&self, rows: &mut [(RecordId, &Row)]) {
        if let Some(order) = &self.order_by {
            rows.sort_by(|(a_id, a), (b_id, b)| {
                let ord = compare(&lookup(*a_id, a, &order.field), &lookup(*b_id, b, &order.field));
                if order.descending { ord.reverse() } else { ord }
            });
        }
    }
}

fn lookup(id: RecordId, row: &Row, field: &str) -> Value {
    if field == "id" {
        return Value::from(id.get());
    }
    row.get(field).cloned().unwrap_or(Value::Null)
}

fn same_value(stored: &Value, wanted: &Value) -> bool {
    match (stored, wanted) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => stored == wanted,
    }
}

/// Total order over stored values: null < bool < number < string < anything else.
fn compare(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 4,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
