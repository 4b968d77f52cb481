//! Controle de garrafas e controle de envase/rotulagem.

use super::ScreenForm;
use crate::draft::draft_key;
use crate::schema::{FieldSchema, FormSchema};
use crate::value::Value;
use chrono::Utc;

/// Per-batch bottle supply check. `insumos` is the record array the
/// barcode scanner writes into: one card per supply line, at least one.
pub fn bottle_control() -> ScreenForm {
    let insumo = FormSchema::new()
        .field("modelo_garrafa", FieldSchema::text())
        .field("fornecedor", FieldSchema::text())
        .field("lote_garrafa", FieldSchema::text())
        .field("codigo_barras", FieldSchema::text());

    let schema = FormSchema::new()
        .field("ano_mes", FieldSchema::text_min(4).required_msg("Obrigatório"))
        .field(
            "data",
            FieldSchema::date()
                .required()
                .default_value(Value::Date(Utc::now())),
        )
        .field("lote_producao", FieldSchema::text().required_msg("Obrigatório"))
        .field("insumos", FieldSchema::record_array(insumo, 1))
        .field("nc_gd", FieldSchema::number_at_least(0.0))
        .field("nc_gc", FieldSchema::number_at_least(0.0))
        .field("nc_perdas", FieldSchema::number_at_least(0.0))
        .field(
            "assinatura_operador",
            FieldSchema::text().required_msg("Assinatura do Operador obrigatória"),
        )
        .field(
            "assinatura_analista",
            FieldSchema::text().required_msg("Assinatura do Analista obrigatória"),
        )
        .field(
            "assinatura_gerencia",
            FieldSchema::text().required_msg("Assinatura da Gerência obrigatória"),
        );

    ScreenForm {
        key: draft_key("bottle_control"),
        schema,
    }
}

/// Envase e rotulagem: line data, lab measurements, one nested record per
/// supply kind (bottle/cap/label), and packaging rows. The screen seeds
/// three packaging rows; the schema floor is one.
pub fn envase_control() -> ScreenForm {
    let embalagem = FormSchema::new()
        .field("data_embalagem", FieldSchema::text())
        .field("garrafas_embaladas", FieldSchema::number())
        .field("total_caixas", FieldSchema::number());
    let embalagem_seed = Value::List(vec![
        embalagem.defaults(),
        embalagem.defaults(),
        embalagem.defaults(),
    ]);

    let schema = FormSchema::new()
        .field("ano_mes", FieldSchema::text_min(4).required_msg("Obrigatório"))
        .field(
            "data",
            FieldSchema::date()
                .required()
                .default_value(Value::Date(Utc::now())),
        )
        .field("lote_numero", FieldSchema::text().required_msg("Obrigatório"))
        .field("modelo_garrafa_tampa", FieldSchema::text())
        .field("temp_envase_c", FieldSchema::number())
        .field("hora_ini", FieldSchema::text())
        .field("hora_fim", FieldSchema::text())
        .field("vol_transferido_l", FieldSchema::number())
        .field("total_garrafas", FieldSchema::number())
        .field("rendimento_liq_pct", FieldSchema::number())
        .field("tambor_bag_numero", FieldSchema::text())
        .field("brix", FieldSchema::number())
        .field("acidez", FieldSchema::number())
        .field("relacao", FieldSchema::number())
        .field("ph", FieldSchema::number())
        .field("densidade", FieldSchema::number())
        .field("cor_520nm", FieldSchema::number())
        .field("perda_gf", FieldSchema::number_at_least(0.0))
        .field("perda_gc", FieldSchema::number_at_least(0.0))
        .field("perda_ga", FieldSchema::number_at_least(0.0))
        .field("perda_gd", FieldSchema::number_at_least(0.0))
        .field("insumo_garrafa", FieldSchema::record(envase_insumo()))
        .field("insumo_tampa", FieldSchema::record(envase_insumo()))
        .field("insumo_rotulo", FieldSchema::record(envase_insumo()))
        .field(
            "embalagens",
            FieldSchema::record_array(embalagem, 1).default_value(embalagem_seed),
        )
        .field("observacao", FieldSchema::text())
        .field(
            "assinatura_operador",
            FieldSchema::text().required_msg("Obrigatório"),
        )
        .field(
            "assinatura_analista",
            FieldSchema::text().required_msg("Obrigatório"),
        )
        .field(
            "assinatura_gerencia",
            FieldSchema::text().required_msg("Obrigatório"),
        );

    ScreenForm {
        key: draft_key("envase_control"),
        schema,
    }
}

fn envase_insumo() -> FormSchema {
    FormSchema::new()
        .field("lote_1", FieldSchema::text())
        .field("lote_2", FieldSchema::text())
        .field("fornecedor", FieldSchema::text())
        .field("nao_conforme", FieldSchema::number_at_least(0.0))
        .field("quebra_estoque", FieldSchema::number_at_least(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormModel;

    #[test]
    fn bottle_control_keeps_at_least_one_insumo() {
        let screen = bottle_control();
        let mut form = FormModel::new(screen.schema);
        assert!(!form.remove_record(&"insumos".into(), 0).unwrap());
        assert_eq!(form.entries(&"insumos".into()).unwrap().len(), 1);
    }

    #[test]
    fn envase_control_seeds_three_packaging_rows() {
        let screen = envase_control();
        let form = FormModel::new(screen.schema);
        assert_eq!(form.entries(&"embalagens".into()).unwrap().len(), 3);
    }

    #[test]
    fn nested_insumo_records_validate_their_counters() {
        let screen = envase_control();
        let mut form = FormModel::new(screen.schema);
        form.input(&"insumo_tampa.nao_conforme".into(), "-1").unwrap();
        assert!(form.error(&"insumo_tampa.nao_conforme".into()).is_some());
    }

    #[test]
    fn packaging_rows_shrink_back_to_the_floor_not_below() {
        let screen = envase_control();
        let mut form = FormModel::new(screen.schema);
        assert!(form.remove_record(&"embalagens".into(), 0).unwrap());
        assert!(form.remove_record(&"embalagens".into(), 0).unwrap());
        assert!(!form.remove_record(&"embalagens".into(), 0).unwrap());
    }
}
