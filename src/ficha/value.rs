//! Runtime form values.
//!
//! A form's state is a tree of [`Value`]s rooted at a record. Values are
//! deliberately loose: a numeric field may momentarily hold raw text the
//! operator typed (validation flags it), and any field may be [`Value::Absent`]
//! — an empty input is *no value*, never zero.
//!
//! Drafts persist the tree as JSON. JSON is not type-preserving for dates
//! (they come back as strings), so restoring a draft is always directed by
//! the schema: [`Value::restore`] walks the schema and re-hydrates each
//! date-kind path from its string or epoch-milliseconds form.

use crate::error::{FichaError, Result};
use crate::path::{FieldPath, Segment};
use crate::schema::{FieldKind, FormSchema};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// A single form value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No value. Distinct from zero and from the empty string.
    Absent,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

static ABSENT: Value = Value::Absent;

impl Value {
    pub fn record() -> Self {
        Value::Record(BTreeMap::new())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Record(fields) => Some(fields),
            _ => None,
        }
    }

    /// Reads the value at `path`, or `Absent` for a path that resolves to
    /// nothing in this tree.
    pub fn at(&self, path: &FieldPath) -> &Value {
        let mut current = self;
        for segment in path.segments() {
            current = match (current, segment) {
                (Value::Record(fields), Segment::Name(name)) => {
                    fields.get(name).unwrap_or(&ABSENT)
                }
                (Value::List(items), Segment::Index(i)) => items.get(*i).unwrap_or(&ABSENT),
                _ => &ABSENT,
            };
        }
        current
    }

    /// Writes `value` at `path`, creating intermediate records as needed.
    ///
    /// List segments must already exist: record-array elements are created
    /// through the record-array controller, never implicitly by a write.
    pub fn set_at(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        let mut current = self;
        let segments = path.segments();
        for (pos, segment) in segments.iter().enumerate() {
            let last = pos == segments.len() - 1;
            match segment {
                Segment::Name(name) => {
                    let fields = match current {
                        Value::Record(fields) => fields,
                        _ => return Err(FichaError::UnknownPath(path.to_string())),
                    };
                    if last {
                        fields.insert(name.clone(), value);
                        return Ok(());
                    }
                    current = fields.entry(name.clone()).or_insert_with(Value::record);
                }
                Segment::Index(i) => {
                    let items = match current {
                        Value::List(items) => items,
                        _ => return Err(FichaError::UnknownPath(path.to_string())),
                    };
                    let slot = items
                        .get_mut(*i)
                        .ok_or_else(|| FichaError::UnknownPath(path.to_string()))?;
                    if last {
                        *slot = value;
                        return Ok(());
                    }
                    current = slot;
                }
            }
        }
        // Only reachable for the root path.
        *current = value;
        Ok(())
    }

    /// Projects the tree into JSON for draft storage. Dates become RFC 3339
    /// strings, `Absent` becomes `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Absent => Json::Null,
            Value::Text(s) => Json::String(s.clone()),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::Bool(b) => Json::Bool(*b),
            Value::Date(d) => Json::String(d.to_rfc3339()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Record(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect(),
            ),
        }
    }

    /// Rebuilds a typed tree from a stored draft, directed by `schema`.
    ///
    /// Restore is per-field lenient: unknown stored keys are ignored, and a
    /// missing or wrong-typed stored value falls back to the field's
    /// default. A record array restores at least its schema minimum, topped
    /// up from element defaults.
    pub fn restore(schema: &FormSchema, stored: &Json) -> Value {
        let fields = match stored {
            Json::Object(map) => map,
            _ => return schema.defaults(),
        };
        let mut record = BTreeMap::new();
        for (name, field) in schema.iter() {
            let restored = match fields.get(name) {
                Some(json) => restore_field(&field.kind, json)
                    .unwrap_or_else(|| schema.default_for(name)),
                None => schema.default_for(name),
            };
            record.insert(name.to_string(), restored);
        }
        Value::Record(record)
    }
}

fn restore_field(kind: &FieldKind, stored: &Json) -> Option<Value> {
    if stored.is_null() {
        return Some(Value::Absent);
    }
    match kind {
        FieldKind::Text { .. } => stored.as_str().map(|s| Value::Text(s.to_string())),
        FieldKind::Number { .. } => match stored {
            Json::Number(n) => n.as_f64().map(Value::Number),
            // A numeric field can legitimately hold raw, unparseable input;
            // it round-trips as a string and validation flags it again.
            Json::String(s) => Some(Value::Text(s.clone())),
            _ => None,
        },
        FieldKind::Bool => stored.as_bool().map(Value::Bool),
        FieldKind::Date => restore_date(stored),
        FieldKind::StringList { .. } => stored.as_array().map(|items| {
            Value::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str())
                    .map(|s| Value::Text(s.to_string()))
                    .collect(),
            )
        }),
        FieldKind::Record(inner) => Some(Value::restore(inner, stored)),
        FieldKind::RecordArray { element, min_len } => {
            let items = stored.as_array()?;
            let mut restored: Vec<Value> = items
                .iter()
                .map(|item| Value::restore(element, item))
                .collect();
            while restored.len() < *min_len {
                restored.push(element.defaults());
            }
            Some(Value::List(restored))
        }
    }
}

/// Dates survive serialization as RFC 3339 strings; older drafts may carry
/// epoch milliseconds. Anything else restores as absent.
fn restore_date(stored: &Json) -> Option<Value> {
    match stored {
        Json::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|d| Value::Date(d.with_timezone(&Utc))),
        Json::Number(n) => {
            let millis = n.as_i64()?;
            Utc.timestamp_millis_opt(millis).single().map(Value::Date)
        }
        _ => None,
    }
}
