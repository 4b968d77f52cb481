//! Controle de pragas — sighting tallies per area and pest.
//!
//! The original stored tallies as a free-form map of whatever keys had
//! been touched. Here the grid is explicit: the full cross-product of
//! areas × pests, every cell addressable by a deterministic composite key,
//! so iteration and validation enumerate all cells rather than whichever
//! keys happen to exist.

use super::ScreenForm;
use crate::draft::draft_key;
use crate::schema::{FieldSchema, FormSchema};
use crate::value::Value;
use chrono::Utc;

pub const AREAS_PRAGAS: [&str; 5] = [
    "Extração",
    "Área de Produção",
    "Depósito de Produto Acabado",
    "Almoxarifado",
    "Recepção e Depósito de Embalagem",
];

pub const PESTS_LIST: [&str; 8] = [
    "Rato",
    "Aranha",
    "Escorpião",
    "Barata",
    "Grilo",
    "Pássaro",
    "Cobra",
    "Outros",
];

/// The monitored cross-product of areas and pest categories.
#[derive(Debug, Clone)]
pub struct TallyGrid {
    areas: Vec<String>,
    categories: Vec<String>,
}

impl TallyGrid {
    pub fn new<A, C>(areas: A, categories: C) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            areas: areas.into_iter().map(Into::into).collect(),
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    /// The facility's standard monitoring grid.
    pub fn standard() -> Self {
        Self::new(AREAS_PRAGAS, PESTS_LIST)
    }

    /// Deterministic cell address: `<area>_<category>`.
    pub fn cell_key(area: &str, category: &str) -> String {
        format!("{}_{}", area, category)
    }

    /// All cell addresses, in area-major order.
    pub fn cells(&self) -> impl Iterator<Item = String> + '_ {
        self.areas.iter().flat_map(|area| {
            self.categories
                .iter()
                .map(move |category| Self::cell_key(area, category))
        })
    }

    /// A record with one non-negative counter per cell, all starting at
    /// zero — zero sightings is a real reading here, not a missing one.
    pub fn schema(&self) -> FormSchema {
        self.cells().fold(FormSchema::new(), |schema, key| {
            schema.field(
                &key,
                FieldSchema::number_at_least(0.0).default_value(Value::Number(0.0)),
            )
        })
    }
}

pub fn pest_control() -> ScreenForm {
    let schema = FormSchema::new()
        .field(
            "data",
            FieldSchema::date()
                .required()
                .default_value(Value::Date(Utc::now())),
        )
        .field("responsavel", FieldSchema::text())
        .field("observacoes_gerais", FieldSchema::text())
        .field("registros", FieldSchema::record(TallyGrid::standard().schema()));

    ScreenForm {
        key: draft_key("pest_control"),
        schema,
    }
}
