//! Qualidade da água — morning and afternoon measurement rounds.

use super::ScreenForm;
use crate::draft::draft_key;
use crate::schema::{FieldSchema, FormSchema};
use crate::value::Value;
use chrono::Utc;

/// pH, chlorine, and turbidity are sampled at fixed points (01/02/03);
/// every measurement is optional — operators fill what the round covers —
/// but a filled value must sit inside its control limits.
pub fn water_quality() -> ScreenForm {
    let schema = FormSchema::new()
        .field(
            "data",
            FieldSchema::date()
                .required()
                .default_value(Value::Date(Utc::now())),
        )
        .field(
            "responsavel",
            FieldSchema::text().required_msg("Assinatura/Responsável é obrigatória"),
        );
    let schema = round_fields(schema, "manha");
    let schema = round_fields(schema, "tarde");

    ScreenForm {
        key: draft_key("water_quality"),
        schema,
    }
}

fn round_fields(schema: FormSchema, turno: &str) -> FormSchema {
    schema
        .field(&format!("{}_hora", turno), FieldSchema::text())
        .field(&format!("{}_ph_01", turno), FieldSchema::number_between(6.0, 9.5))
        .field(&format!("{}_ph_03", turno), FieldSchema::number_between(6.0, 9.5))
        .field(&format!("{}_cloro_02", turno), FieldSchema::number_between(0.2, 5.0))
        .field(&format!("{}_cloro_03", turno), FieldSchema::number_between(0.2, 5.0))
        .field(&format!("{}_turbidez_01", turno), FieldSchema::number_at_most(5.0))
        .field(&format!("{}_turbidez_03", turno), FieldSchema::number_at_most(5.0))
        .field(&format!("{}_obs", turno), FieldSchema::text())
}
