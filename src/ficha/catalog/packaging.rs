//! Monitoramento de envase — equipment readings, one row per reading.

use super::ScreenForm;
use crate::draft::draft_key;
use crate::schema::{FieldSchema, FormSchema};
use crate::value::Value;
use chrono::Utc;

pub fn packaging_monitoring() -> ScreenForm {
    let registro = FormSchema::new()
        .field("horario", FieldSchema::text())
        .field("past_pressao", FieldSchema::number())
        .field("past_temp_agua", FieldSchema::number())
        .field("past_temp_suco", FieldSchema::number())
        .field("lav_temp", FieldSchema::number())
        .field("envase_bomba_hz", FieldSchema::number())
        .field("envase_temp_atual", FieldSchema::number())
        .field("envase_temp_garrafa", FieldSchema::number())
        .field("tamp_vazao", FieldSchema::number())
        .field("tamp_perda", FieldSchema::number_at_least(0.0))
        .field("observacao", FieldSchema::text())
        .field("modelo_garrafa", FieldSchema::text())
        .field("jornada_inicio", FieldSchema::text())
        .field("jornada_almoco_ini", FieldSchema::text())
        .field("jornada_almoco_fim", FieldSchema::text())
        .field("jornada_fim", FieldSchema::text());

    let schema = FormSchema::new()
        .field(
            "data",
            FieldSchema::date()
                .required()
                .default_value(Value::Date(Utc::now())),
        )
        .field("lote", FieldSchema::text().required_msg("Obrigatório"))
        .field("registros", FieldSchema::record_array(registro, 1))
        .field(
            "assinatura_operador",
            FieldSchema::text().required_msg("Assinatura obrigatória"),
        );

    ScreenForm {
        key: draft_key("packaging_monitoring"),
        schema,
    }
}
