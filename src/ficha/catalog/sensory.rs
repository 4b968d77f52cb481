//! Análise sensorial — juice or jam/sweet, scored 1 to 9.
//!
//! The analysis subtype is the discriminant: aroma and color are scored
//! for juice only, texture for jam only. Relevance is structural
//! (`only_when`), not a pile of flat optionals.

use super::ScreenForm;
use crate::draft::draft_key;
use crate::schema::{FieldSchema, FormSchema};
use crate::value::Value;
use chrono::Utc;

pub const TIPO_SUCO: &str = "Suco";
pub const TIPO_GELEIA: &str = "Geleia_Doce";

pub fn sensory_analysis() -> ScreenForm {
    let schema = FormSchema::new()
        .field(
            "tipo_analise",
            FieldSchema::text()
                .required()
                .default_value(Value::Text(TIPO_SUCO.to_string())),
        )
        .field(
            "data",
            FieldSchema::date()
                .required()
                .default_value(Value::Date(Utc::now())),
        )
        .field("lote", FieldSchema::text().required_msg("Obrigatório informar o lote"))
        .field("comentarios", FieldSchema::text())
        .field(
            "aparencia",
            FieldSchema::number_between(1.0, 9.0).required_msg("Avalie a aparência"),
        )
        .field(
            "sabor",
            FieldSchema::number_between(1.0, 9.0).required_msg("Avalie o sabor"),
        )
        .field(
            "acidez",
            FieldSchema::number_between(1.0, 9.0).required_msg("Avalie a acidez"),
        )
        .field(
            "docura",
            FieldSchema::number_between(1.0, 9.0).required_msg("Avalie a doçura"),
        )
        .field(
            "avaliacao_global",
            FieldSchema::number_between(1.0, 9.0).required_msg("Faça a avaliação global"),
        )
        .field(
            "aroma",
            FieldSchema::number_between(1.0, 9.0)
                .required()
                .only_when("tipo_analise", Value::Text(TIPO_SUCO.to_string())),
        )
        .field(
            "cor",
            FieldSchema::number_between(1.0, 9.0)
                .required()
                .only_when("tipo_analise", Value::Text(TIPO_SUCO.to_string())),
        )
        .field(
            "textura",
            FieldSchema::number_between(1.0, 9.0)
                .required()
                .only_when("tipo_analise", Value::Text(TIPO_GELEIA.to_string())),
        );

    ScreenForm {
        key: draft_key("sensory_analysis"),
        schema,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormModel;

    fn fill_shared(form: &mut FormModel) {
        form.input(&"lote".into(), "L-09").unwrap();
        for field in ["aparencia", "sabor", "acidez", "docura", "avaliacao_global"] {
            form.input(&field.into(), "7").unwrap();
        }
    }

    #[test]
    fn juice_demands_aroma_and_color_but_not_texture() {
        let mut form = FormModel::new(sensory_analysis().schema);
        fill_shared(&mut form);
        let report = form.validate_all();
        assert!(report.errors.contains_key(&"aroma".into()));
        assert!(report.errors.contains_key(&"cor".into()));
        assert!(!report.errors.contains_key(&"textura".into()));

        form.input(&"aroma".into(), "8").unwrap();
        form.input(&"cor".into(), "6").unwrap();
        assert!(form.validate_all().valid);
    }

    #[test]
    fn jam_flips_the_conditional_fields() {
        let mut form = FormModel::new(sensory_analysis().schema);
        fill_shared(&mut form);
        form.set_value(&"tipo_analise".into(), Value::Text(TIPO_GELEIA.into()))
            .unwrap();

        let report = form.validate_all();
        assert!(!report.errors.contains_key(&"aroma".into()));
        assert!(report.errors.contains_key(&"textura".into()));
    }

    #[test]
    fn scores_stay_on_the_nine_point_scale() {
        let mut form = FormModel::new(sensory_analysis().schema);
        form.input(&"sabor".into(), "10").unwrap();
        assert!(form.error(&"sabor".into()).is_some());
        form.input(&"sabor".into(), "9").unwrap();
        assert!(form.error(&"sabor".into()).is_none());
    }
}
