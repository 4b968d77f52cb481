//! Declarative form schemas.
//!
//! A [`FormSchema`] describes one screen's data shape: every field's kind,
//! whether it is required, numeric bounds, nested records, and record
//! arrays ("one row per drum"). Schemas are plain data built with the
//! constructors below; the form model interprets them for coercion and
//! validation, and draft restore uses them to re-type stored JSON.
//!
//! Field order is declaration order, which is also render order.

use crate::error::{FichaError, Result};
use crate::path::{FieldPath, Segment};
use crate::value::Value;

/// Inclusive numeric bounds; either side may be open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// What a field holds and which constraints apply to it.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text { min_chars: Option<usize> },
    Number { range: NumericRange },
    Bool,
    Date,
    StringList { min_len: usize },
    Record(FormSchema),
    RecordArray { element: FormSchema, min_len: usize },
}

impl FieldKind {
    /// The value a field of this kind starts from when no explicit default
    /// is declared.
    fn seed(&self) -> Value {
        match self {
            FieldKind::StringList { .. } => Value::List(Vec::new()),
            FieldKind::Record(inner) => inner.defaults(),
            FieldKind::RecordArray { element, min_len } => {
                Value::List((0..*min_len).map(|_| element.defaults()).collect())
            }
            _ => Value::Absent,
        }
    }
}

/// One field's declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub kind: FieldKind,
    pub required: bool,
    pub default: Option<Value>,
    /// Validate this field only when the named sibling holds this value.
    pub only_when: Option<(String, Value)>,
    /// Overrides the generated message for required/minimum failures.
    pub message: Option<String>,
}

impl FieldSchema {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            default: None,
            only_when: None,
            message: None,
        }
    }

    pub fn text() -> Self {
        Self::of(FieldKind::Text { min_chars: None })
    }

    pub fn text_min(min_chars: usize) -> Self {
        Self::of(FieldKind::Text {
            min_chars: Some(min_chars),
        })
    }

    pub fn number() -> Self {
        Self::of(FieldKind::Number {
            range: NumericRange::any(),
        })
    }

    pub fn number_at_least(min: f64) -> Self {
        Self::of(FieldKind::Number {
            range: NumericRange::at_least(min),
        })
    }

    pub fn number_at_most(max: f64) -> Self {
        Self::of(FieldKind::Number {
            range: NumericRange::at_most(max),
        })
    }

    pub fn number_between(min: f64, max: f64) -> Self {
        Self::of(FieldKind::Number {
            range: NumericRange::between(min, max),
        })
    }

    pub fn boolean() -> Self {
        Self::of(FieldKind::Bool)
    }

    pub fn date() -> Self {
        Self::of(FieldKind::Date)
    }

    pub fn string_list(min_len: usize) -> Self {
        Self::of(FieldKind::StringList { min_len })
    }

    pub fn record(inner: FormSchema) -> Self {
        Self::of(FieldKind::Record(inner))
    }

    pub fn record_array(element: FormSchema, min_len: usize) -> Self {
        Self::of(FieldKind::RecordArray { element, min_len })
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field required with a custom failure message.
    pub fn required_msg(mut self, message: &str) -> Self {
        self.required = true;
        self.message = Some(message.to_string());
        self
    }

    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn only_when(mut self, sibling: &str, value: Value) -> Self {
        self.only_when = Some((sibling.to_string(), value));
        self
    }
}

/// An ordered set of named fields: one screen's shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSchema {
    fields: Vec<(String, FieldSchema)>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, schema: FieldSchema) -> Self {
        debug_assert!(
            self.get(name).is_none(),
            "duplicate field name in schema: {}",
            name
        );
        self.fields.push((name.to_string(), schema));
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|(field_name, _)| field_name == name)
            .map(|(_, schema)| schema)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Walks `path` through nested records and record arrays down to one
    /// field declaration.
    pub fn resolve(&self, path: &FieldPath) -> Result<&FieldSchema> {
        let unknown = || FichaError::UnknownPath(path.to_string());
        let mut segments = path.segments().iter();
        let first = match segments.next() {
            Some(Segment::Name(name)) => name,
            _ => return Err(unknown()),
        };
        let mut current = self.get(first).ok_or_else(unknown)?;
        while let Some(segment) = segments.next() {
            current = match (&current.kind, segment) {
                (FieldKind::Record(inner), Segment::Name(name)) => {
                    inner.get(name).ok_or_else(unknown)?
                }
                (FieldKind::RecordArray { element, .. }, Segment::Index(_)) => {
                    match segments.next() {
                        Some(Segment::Name(name)) => element.get(name).ok_or_else(unknown)?,
                        // A bare `array.N` path addresses the element record
                        // itself, which is not a field declaration.
                        _ => return Err(unknown()),
                    }
                }
                _ => return Err(unknown()),
            };
        }
        Ok(current)
    }

    /// The initial state for this schema: declared defaults where present,
    /// kind-appropriate seeds everywhere else.
    pub fn defaults(&self) -> Value {
        let record = self
            .fields
            .iter()
            .map(|(name, _)| (name.clone(), self.default_for(name)))
            .collect();
        Value::Record(record)
    }

    pub fn default_for(&self, name: &str) -> Value {
        match self.get(name) {
            Some(field) => field
                .default
                .clone()
                .unwrap_or_else(|| field.kind.seed()),
            None => Value::Absent,
        }
    }
}
