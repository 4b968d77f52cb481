//! Registro de limpeza — one draft per cleaned area.

use super::ScreenForm;
use crate::draft::draft_key_for;
use crate::schema::{FieldSchema, FormSchema};
use crate::value::Value;
use chrono::Utc;

/// The cleaning log is subject-parametrized: the same screen type serves
/// every area, each with its own draft.
pub fn cleaning_log(area: &str) -> ScreenForm {
    let schema = FormSchema::new()
        .field(
            "area",
            FieldSchema::text()
                .required()
                .default_value(Value::Text(area.to_string())),
        )
        .field(
            "data",
            FieldSchema::date()
                .required()
                .default_value(Value::Date(Utc::now())),
        )
        .field("ph_agua_inicial", FieldSchema::number_between(0.0, 14.0).required())
        .field(
            "tipo_solucao",
            FieldSchema::string_list(1).message("Selecione pelo menos uma solução"),
        )
        .field(
            "hora_inicio_limpeza",
            FieldSchema::text_min(4).required_msg("Hora obrigatória"),
        )
        .field(
            "hora_fim_limpeza",
            FieldSchema::text_min(4).required_msg("Hora obrigatória"),
        )
        .field("concentracao_pct", FieldSchema::number_at_least(0.0).required())
        .field("temperatura_c", FieldSchema::number().required())
        .field(
            "hora_inicio_enxague",
            FieldSchema::text_min(4).required_msg("Hora obrigatória"),
        )
        .field(
            "hora_fim_enxague",
            FieldSchema::text_min(4).required_msg("Hora obrigatória"),
        )
        .field("ph_agua_enxague", FieldSchema::number_between(0.0, 14.0).required())
        .field("observacao", FieldSchema::text())
        .field(
            "operador",
            FieldSchema::text().required_msg("Nome do operador obrigatório"),
        )
        .field(
            "responsavel_analista",
            FieldSchema::text().required_msg("Assinatura obrigatória"),
        )
        .field("responsavel_gerencia", FieldSchema::text());

    ScreenForm {
        key: draft_key_for("cleaning", area),
        schema,
    }
}
