//! Field metadata.
//!
//! Every entity declares its fields once, as a `const` slice of [`Field`].
//! The store validates incoming rows against it and the admin layer reads it
//! to render columns and filters; nothing inspects entity types at runtime.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;
use validator::ValidateEmail;

use crate::country::CountryCode;
use crate::error::{DomainError, DomainResult};

/// What happens to a referencing record when its target is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnDelete {
    /// Delete the referencing record too.
    Cascade,
    /// Refuse to delete the target while referencing records exist.
    Protect,
    /// Clear the reference and keep the referencing record.
    SetNull,
}

/// Storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Boolean,
    TriState,
    /// Free text, optionally bounded (in characters).
    Text { max_len: Option<usize> },
    Email { max_len: usize },
    /// One code out of a fixed `(code, label)` table.
    Choice(&'static [(&'static str, &'static str)]),
    /// ISO 3166-1 alpha-2 code.
    Country,
    /// Calendar date, `YYYY-MM-DD`.
    Date,
    /// RFC 3339 timestamp.
    DateTime,
    /// Path of an uploaded file, always under `namespace/`.
    Upload { namespace: &'static str },
    /// Many-to-one reference to another entity.
    ForeignKey {
        target: &'static str,
        on_delete: OnDelete,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Must be present and non-empty on every write.
    pub required: bool,
    /// Accepted from callers. Non-editable fields are maintained by the entity.
    pub editable: bool,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            editable: true,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub const fn tri_state(name: &'static str) -> Self {
        Self::new(name, FieldKind::TriState)
    }

    pub const fn text(name: &'static str, max_len: usize) -> Self {
        Self::new(name, FieldKind::Text { max_len: Some(max_len) })
    }

    pub const fn long_text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text { max_len: None })
    }

    pub const fn email(name: &'static str, max_len: usize) -> Self {
        Self::new(name, FieldKind::Email { max_len })
    }

    pub const fn choice(name: &'static str, choices: &'static [(&'static str, &'static str)]) -> Self {
        Self::new(name, FieldKind::Choice(choices))
    }

    pub const fn country(name: &'static str) -> Self {
        Self::new(name, FieldKind::Country)
    }

    pub const fn date(name: &'static str) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub const fn date_time(name: &'static str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    pub const fn upload(name: &'static str, namespace: &'static str) -> Self {
        Self::new(name, FieldKind::Upload { namespace })
    }

    pub const fn foreign_key(name: &'static str, target: &'static str, on_delete: OnDelete) -> Self {
        Self::new(name, FieldKind::ForeignKey { target, on_delete })
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Maintained by the entity itself (e.g. creation timestamps).
    pub const fn auto(mut self) -> Self {
        self.editable = false;
        self
    }

    /// Target entity and policy, for foreign keys.
    pub fn reference(&self) -> Option<(&'static str, OnDelete)> {
        match self.kind {
            FieldKind::ForeignKey { target, on_delete } => Some((target, on_delete)),
            _ => None,
        }
    }

    /// Check a raw value against this field and return its normalized form.
    ///
    /// `None` means the key was absent. Blank strings are treated as null;
    /// country codes are uppercased.
    pub fn clean(&self, value: Option<Value>) -> DomainResult<Value> {
        let value = match value {
            Some(Value::String(s)) if s.trim().is_empty() => Value::Null,
            Some(v) => v,
            None => Value::Null,
        };

        if value.is_null() {
            return match self.kind {
                _ if self.required => Err(self.error("this field is required")),
                FieldKind::Boolean => Ok(Value::Bool(false)),
                _ => Ok(Value::Null),
            };
        }

        match self.kind {
            FieldKind::Integer => match value.as_i64() {
                Some(n) if i32::try_from(n).is_ok() => Ok(value),
                Some(n) => Err(self.error(format!(
                    "{n} is outside the integer range {}..={}",
                    i32::MIN,
                    i32::MAX
                ))),
                None => Err(self.error("expected an integer")),
            },
            FieldKind::Boolean | FieldKind::TriState => match value {
                Value::Bool(_) => Ok(value),
                _ => Err(self.error("expected true or false")),
            },
            FieldKind::Text { max_len } => {
                let text = self.as_text(&value)?;
                self.check_len(text, max_len)?;
                Ok(value)
            }
            FieldKind::Email { max_len } => {
                let text = self.as_text(&value)?;
                self.check_len(text, Some(max_len))?;
                if !text.validate_email() {
                    return Err(self.error(format!("`{text}` is not a valid email address")));
                }
                Ok(value)
            }
            FieldKind::Choice(choices) => {
                let code = self.as_text(&value)?;
                if choices.iter().any(|(c, _)| *c == code) {
                    Ok(value)
                } else {
                    let valid = choices.iter().map(|(c, _)| *c).collect::<Vec<_>>().join(", ");
                    Err(self.error(format!("`{code}` is not one of the available choices ({valid})")))
                }
            }
            FieldKind::Country => {
                let code = self.as_text(&value)?;
                CountryCode::parse(code)
                    .map(|c| Value::String(c.code().to_string()))
                    .map_err(|_| self.error(format!("`{code}` is not a valid country code")))
            }
            FieldKind::Date => {
                let text = self.as_text(&value)?;
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .map(|_| value.clone())
                    .map_err(|_| self.error(format!("`{text}` is not a YYYY-MM-DD date")))
            }
            FieldKind::DateTime => {
                let text = self.as_text(&value)?;
                DateTime::parse_from_rfc3339(text)
                    .map(|_| value.clone())
                    .map_err(|_| self.error(format!("`{text}` is not an RFC 3339 timestamp")))
            }
            FieldKind::Upload { namespace } => {
                let path = self.as_text(&value)?;
                let name = path
                    .strip_prefix(namespace)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .unwrap_or_default();
                if name.is_empty() || name.contains('/') || name.contains("..") {
                    return Err(self.error(format!("expected an upload stored under `{namespace}/`")));
                }
                Ok(value)
            }
            FieldKind::ForeignKey { target, .. } => match value.as_u64() {
                Some(id) if id > 0 => Ok(value),
                _ => Err(self.error(format!("expected the id of a {target}"))),
            },
        }
    }

    fn as_text<'v>(&self, value: &'v Value) -> DomainResult<&'v str> {
        value.as_str().ok_or_else(|| self.error("expected a string"))
    }

    fn check_len(&self, text: &str, max_len: Option<usize>) -> DomainResult<()> {
        match max_len {
            Some(max) if text.chars().count() > max => Err(self.error(format!(
                "ensure this value has at most {max} characters (it has {})",
                text.chars().count()
            ))),
            _ => Ok(()),
        }
    }

    fn error(&self, message: impl Into<String>) -> DomainError {
        DomainError::validation(self.name, message)
    }
}
