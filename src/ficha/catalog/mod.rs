//! # Form Catalog
//!
//! The concrete screens of the collection app, declared as schema
//! instances of the generic core. This is where the bulk of the product
//! lives: field lists, ranges, and operator-facing messages for the lab,
//! bottling line, water treatment, and pest/cleaning routines.
//!
//! Each builder returns a [`ScreenForm`] — the screen's draft key plus its
//! schema — ready to hand to `DraftSession::open`.

use crate::schema::FormSchema;

pub mod bottling;
pub mod cleaning;
pub mod packaging;
pub mod pests;
pub mod sensory;
pub mod water;

pub use bottling::{bottle_control, envase_control};
pub use cleaning::cleaning_log;
pub use packaging::packaging_monitoring;
pub use pests::{pest_control, TallyGrid, AREAS_PRAGAS, PESTS_LIST};
pub use sensory::sensory_analysis;
pub use water::water_quality;

/// One screen's identity in the draft store plus its declared shape.
#[derive(Debug, Clone)]
pub struct ScreenForm {
    pub key: String,
    pub schema: FormSchema,
}
