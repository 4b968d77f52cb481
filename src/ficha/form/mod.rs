//! # Validated Form Model
//!
//! [`FormModel`] owns one screen's live state: the typed value tree, the
//! per-path validation errors, and the entry identities of every record
//! array. It is deliberately UI-free — a field binding is just a pure
//! function of `(path, model)`, so any presentation layer can render
//! [`FieldView`]s and feed edits back through [`FormModel::input`] and
//! [`FormModel::set_value`]. No ambient or global form instance exists.
//!
//! Coercion happens on interactive input, per field kind. The one rule
//! worth stating twice: an empty numeric input is **no value**, never zero
//! — an untouched measurement must validate as missing, not as a real
//! reading of 0.
//!
//! Validation is incremental (the edited field's error appears or clears
//! on every write) and total at submit time via [`FormModel::validate_all`].

use crate::error::{FichaError, Result};
use crate::path::FieldPath;
use crate::schema::{FieldKind, FormSchema};
use crate::value::Value;
use std::collections::BTreeMap;

mod records;
pub(crate) mod validate;

pub use records::EntryId;

/// Everything a widget needs to render one field.
#[derive(Debug)]
pub struct FieldView<'a> {
    pub value: &'a Value,
    pub error: Option<&'a str>,
}

/// The submit-time verdict: either all constraints pass or a map of
/// path -> operator-facing message.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: BTreeMap<FieldPath, String>,
}

#[derive(Debug)]
pub struct FormModel {
    schema: FormSchema,
    values: Value,
    errors: BTreeMap<FieldPath, String>,
    identities: BTreeMap<FieldPath, Vec<EntryId>>,
    generation: u64,
}

impl FormModel {
    /// Starts a model from the schema's defaults.
    pub fn new(schema: FormSchema) -> Self {
        let values = schema.defaults();
        let mut model = Self {
            schema,
            values,
            errors: BTreeMap::new(),
            identities: BTreeMap::new(),
            generation: 0,
        };
        model.reseed_identities();
        model
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Replaces the entire state (restored draft or fresh defaults), clears
    /// all errors, and issues fresh entry identities.
    pub fn reset(&mut self, state: Value) {
        self.values = state;
        self.errors.clear();
        self.generation += 1;
        self.reseed_identities();
    }

    /// Monotonic marker bumped by every [`reset`](Self::reset); lets an
    /// observer tell a restored state from the one it saw before.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current value at `path` (`Absent` when nothing is there).
    pub fn value(&self, path: &FieldPath) -> &Value {
        self.values.at(path)
    }

    /// A full snapshot of the current state, the feed for draft autosave.
    pub fn snapshot(&self) -> Value {
        self.values.clone()
    }

    pub fn errors(&self) -> &BTreeMap<FieldPath, String> {
        &self.errors
    }

    pub fn error(&self, path: &FieldPath) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// The read side of a field binding.
    pub fn field(&self, path: &FieldPath) -> Result<FieldView<'_>> {
        self.schema.resolve(path)?;
        Ok(FieldView {
            value: self.values.at(path),
            error: self.error(path),
        })
    }

    /// Programmatic write from a picker, scanner, or computed default.
    /// Re-validates the field so its error tracks the edit.
    pub fn set_value(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        self.schema.resolve(path)?;
        self.values.set_at(path, value)?;
        self.revalidate(path);
        Ok(())
    }

    /// Interactive text input with kind-appropriate coercion.
    ///
    /// Empty or whitespace-only input coerces to `Absent` for every kind
    /// except plain text (which keeps what the operator typed). Numeric
    /// text that does not parse is kept raw and flagged by validation.
    pub fn input(&mut self, path: &FieldPath, raw: &str) -> Result<()> {
        let field = self.schema.resolve(path)?;
        let value = match &field.kind {
            FieldKind::Text { .. } => Value::Text(raw.to_string()),
            FieldKind::Number { .. } => coerce_number(raw),
            FieldKind::Date => coerce_date(raw),
            FieldKind::Bool => match raw.trim() {
                "" => Value::Absent,
                t => match t.parse::<bool>() {
                    Ok(b) => Value::Bool(b),
                    Err(_) => Value::Text(raw.to_string()),
                },
            },
            FieldKind::StringList { .. } => {
                return Err(FichaError::KindMismatch {
                    path: path.to_string(),
                    expected: "text input",
                })
            }
            FieldKind::Record(_) | FieldKind::RecordArray { .. } => {
                return Err(FichaError::KindMismatch {
                    path: path.to_string(),
                    expected: "text input",
                })
            }
        };
        self.values.set_at(path, value)?;
        self.revalidate(path);
        Ok(())
    }

    /// Blur hook for a field binding: re-validates without changing the
    /// value, so leaving an untouched required field surfaces its error.
    pub fn blur(&mut self, path: &FieldPath) -> Result<()> {
        self.schema.resolve(path)?;
        self.revalidate(path);
        Ok(())
    }

    /// Adds `option` to a string-list field, or removes it when already
    /// selected — the multi-select chip behavior.
    pub fn toggle_choice(&mut self, path: &FieldPath, option: &str) -> Result<()> {
        let field = self.schema.resolve(path)?;
        if !matches!(field.kind, FieldKind::StringList { .. }) {
            return Err(FichaError::KindMismatch {
                path: path.to_string(),
                expected: "string-list",
            });
        }
        let mut items = self
            .values
            .at(path)
            .as_list()
            .map(<[Value]>::to_vec)
            .unwrap_or_default();
        match items.iter().position(|item| item.as_str() == Some(option)) {
            Some(i) => {
                items.remove(i);
            }
            None => items.push(Value::Text(option.to_string())),
        }
        self.values.set_at(path, Value::List(items))?;
        self.revalidate(path);
        Ok(())
    }

    /// Runs every constraint and replaces the error map with the outcome.
    pub fn validate_all(&mut self) -> ValidationReport {
        let mut errors = validate::ErrorMap::new();
        validate::validate_schema(&self.schema, &self.values, &FieldPath::root(), &mut errors);
        self.errors = errors.clone();
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Re-validates a single field in place after an edit.
    fn revalidate(&mut self, path: &FieldPath) {
        let Ok(field) = self.schema.resolve(path) else {
            return;
        };
        let siblings = parent_record(&self.values, path);
        let mut fresh = validate::ErrorMap::new();
        validate::validate_field(field, self.values.at(path), &siblings, path, &mut fresh);
        self.errors.remove(path);
        self.errors.extend(fresh);
    }
}

/// The record containing the field at `path`, for `only_when` lookups.
fn parent_record(values: &Value, path: &FieldPath) -> Value {
    let segments = path.segments();
    if segments.len() <= 1 {
        return values.clone();
    }
    let mut parent = FieldPath::root();
    for segment in &segments[..segments.len() - 1] {
        parent = match segment {
            crate::path::Segment::Name(name) => parent.child(name),
            crate::path::Segment::Index(i) => parent.index(*i),
        };
    }
    values.at(&parent).clone()
}

fn coerce_number(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Absent;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Value::Number(n),
        _ => Value::Text(raw.to_string()),
    }
}

fn coerce_date(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Absent;
    }
    match chrono::DateTime::parse_from_rfc3339(trimmed) {
        Ok(d) => Value::Date(d.with_timezone(&chrono::Utc)),
        Err(_) => Value::Text(raw.to_string()),
    }
}
