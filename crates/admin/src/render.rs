//! Display values and filter lookups.

use serde_json::Value;

use medprocure_core::choice::label_for;
use medprocure_core::{CountryCode, DomainError, DomainResult, Field, FieldKind, Labels, RecordId};

const EMPTY: &str = "-";

/// Human-readable form of a stored value.
pub fn cell(field: &Field, value: &Value, labels: &dyn Labels) -> String {
    if value.is_null() {
        return match field.kind {
            FieldKind::TriState => "unknown".to_string(),
            _ => EMPTY.to_string(),
        };
    }

    match (field.kind, value) {
        (FieldKind::Boolean | FieldKind::TriState, Value::Bool(b)) => yes_no(*b).to_string(),
        (FieldKind::Choice(choices), Value::String(code)) => {
            label_for(choices, code).unwrap_or(code.as_str()).to_string()
        }
        (FieldKind::Country, Value::String(code)) => CountryCode::lookup(code)
            .map_or_else(|| code.clone(), |c| c.name().to_string()),
        (FieldKind::ForeignKey { target, .. }, _) => value
            .as_u64()
            .and_then(|id| labels.label(target, RecordId::new(id)))
            .unwrap_or_else(|| EMPTY.to_string()),
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

/// Turn a changelist query value into the stored value it selects.
///
/// An empty value selects records where the field is unset; so does `null`,
/// except on free-text fields where it is an ordinary value.
pub fn parse_lookup(field: &Field, raw: &str) -> DomainResult<Value> {
    let raw = raw.trim();
    let free_text = matches!(
        field.kind,
        FieldKind::Text { .. } | FieldKind::Email { .. } | FieldKind::Upload { .. }
    );
    if raw.is_empty() || (raw == "null" && !free_text) {
        return Ok(Value::Null);
    }
    let invalid = |what: &str| DomainError::validation(field.name, format!("`{raw}` is not {what}"));

    match field.kind {
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("an integer")),
        FieldKind::ForeignKey { .. } => raw
            .parse::<RecordId>()
            .map(|id| Value::from(id.get()))
            .map_err(|_| invalid("a record id")),
        FieldKind::Boolean | FieldKind::TriState => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Value::Bool(true)),
            "false" | "0" | "no" => Ok(Value::Bool(false)),
            "unknown" if field.kind == FieldKind::TriState => Ok(Value::Null),
            _ => Err(invalid("yes or no")),
        },
        FieldKind::Choice(choices) => choices
            .iter()
            .find(|(code, label)| *code == raw || label.eq_ignore_ascii_case(raw))
            .map(|(code, _)| Value::from(*code))
            .ok_or_else(|| invalid("one of the available choices")),
        FieldKind::Country => CountryCode::lookup(raw)
            .map(|c| Value::from(c.code()))
            .ok_or_else(|| invalid("a known country code or name")),
        FieldKind::Text { .. }
        | FieldKind::Email { .. }
        | FieldKind::Date
        | FieldKind::DateTime
        | FieldKind::Upload { .. } => Ok(Value::from(raw)),
    }
}
