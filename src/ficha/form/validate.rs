//! Validation walk.
//!
//! Validation never throws and never blocks editing: it produces a map of
//! path -> operator-facing message, and `validate_all` is the only point
//! that turns that map into a submit-blocking verdict. Messages default to
//! the generated Portuguese strings the screens show; a schema may override
//! them per field.

use crate::path::FieldPath;
use crate::schema::{FieldKind, FieldSchema, FormSchema};
use crate::value::Value;
use std::collections::BTreeMap;

pub(crate) type ErrorMap = BTreeMap<FieldPath, String>;

/// Validates every field of `schema` against the record at `base`,
/// recursing through nested records and record-array elements.
pub(crate) fn validate_schema(
    schema: &FormSchema,
    record: &Value,
    base: &FieldPath,
    errors: &mut ErrorMap,
) {
    for (name, field) in schema.iter() {
        let path = base.child(name);
        let value = record.at(&name.into());
        validate_field(field, value, record, &path, errors);
    }
}

/// Validates a single field in the context of its sibling record.
pub(crate) fn validate_field(
    field: &FieldSchema,
    value: &Value,
    siblings: &Value,
    path: &FieldPath,
    errors: &mut ErrorMap,
) {
    if !is_relevant(field, siblings) {
        return;
    }

    match &field.kind {
        FieldKind::Text { min_chars } => {
            let text = value.as_str().map(str::trim);
            match value {
                Value::Absent => {
                    if field.required {
                        errors.insert(path.clone(), required_message(field));
                    }
                }
                Value::Text(_) => {
                    let text = text.unwrap_or("");
                    if text.is_empty() {
                        if field.required {
                            errors.insert(path.clone(), required_message(field));
                        }
                    } else if let Some(min) = min_chars {
                        if text.chars().count() < *min {
                            errors.insert(
                                path.clone(),
                                field
                                    .message
                                    .clone()
                                    .unwrap_or_else(|| format!("Mínimo de {} caracteres", min)),
                            );
                        }
                    }
                }
                _ => {
                    errors.insert(path.clone(), "Valor inválido".to_string());
                }
            }
        }
        FieldKind::Number { range } => match value {
            Value::Absent => {
                if field.required {
                    errors.insert(path.clone(), required_message(field));
                }
            }
            Value::Number(n) if n.is_finite() => {
                if let Some(min) = range.min {
                    if *n < min {
                        errors.insert(path.clone(), format!("Valor mínimo: {}", min));
                        return;
                    }
                }
                if let Some(max) = range.max {
                    if *n > max {
                        errors.insert(path.clone(), format!("Valor máximo: {}", max));
                    }
                }
            }
            // Raw text the coercion could not parse, or a non-finite number.
            _ => {
                errors.insert(path.clone(), "Informe um número válido".to_string());
            }
        },
        FieldKind::Bool => match value {
            Value::Absent => {
                if field.required {
                    errors.insert(path.clone(), required_message(field));
                }
            }
            Value::Bool(_) => {}
            _ => {
                errors.insert(path.clone(), "Valor inválido".to_string());
            }
        },
        FieldKind::Date => match value {
            Value::Absent => {
                if field.required {
                    errors.insert(path.clone(), required_message(field));
                }
            }
            Value::Date(_) => {}
            _ => {
                errors.insert(path.clone(), "Data inválida".to_string());
            }
        },
        FieldKind::StringList { min_len } => {
            let len = value.as_list().map(<[Value]>::len).unwrap_or(0);
            if len < *min_len {
                errors.insert(
                    path.clone(),
                    field
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("Selecione pelo menos {}", min_len)),
                );
            } else if field.required && len == 0 {
                errors.insert(path.clone(), required_message(field));
            }
        }
        FieldKind::Record(inner) => {
            let empty = Value::record();
            let record = if value.as_record().is_some() {
                value
            } else {
                &empty
            };
            validate_schema(inner, record, path, errors);
        }
        FieldKind::RecordArray { element, min_len } => {
            let items: &[Value] = value.as_list().unwrap_or(&[]);
            if items.len() < *min_len {
                errors.insert(
                    path.clone(),
                    field
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("Inclua pelo menos {} registro(s)", min_len)),
                );
            }
            for (i, item) in items.iter().enumerate() {
                validate_schema(element, item, &path.index(i), errors);
            }
        }
    }
}

/// Conditional relevance: a field guarded by `only_when` is validated only
/// while its sibling discriminant holds the expected value.
fn is_relevant(field: &FieldSchema, siblings: &Value) -> bool {
    match &field.only_when {
        Some((sibling, expected)) => siblings.at(&sibling.as_str().into()) == expected,
        None => true,
    }
}

fn required_message(field: &FieldSchema) -> String {
    field
        .message
        .clone()
        .unwrap_or_else(|| "Obrigatório".to_string())
}
