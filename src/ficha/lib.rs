//! # Ficha Architecture
//!
//! Ficha is a **UI-agnostic form engine**. This is not a mobile app that
//! happens to have some library code—it's a library the data-collection
//! screens are thin clients of.
//!
//! That distinction drives the entire architecture and should guide all
//! development.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Presentation (out of scope)                                │
//! │  - Renders FieldViews, feeds edits back, owns navigation    │
//! │  - The ONLY place that knows about widgets and styling      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Lifecycle Layer (session.rs)                               │
//! │  - One DraftSession per screen instance                     │
//! │  - Restores the draft before anything saves, autosaves      │
//! │    every change, validates-submits-clears                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Form Layer (form/, schema.rs, value.rs)                    │
//! │  - Declarative schemas, typed values, coercion, validation  │
//! │  - Record arrays with identity-stable entries               │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Draft Layer (draft.rs, store/)                             │
//! │  - Opaque JSON blob per screen key                          │
//! │  - KeyValueStore trait: FileStore (production),             │
//! │    InMemoryStore (testing); SafeStore swallows failures     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Nothing Throws Across the Screen Boundary
//!
//! Storage failures are logged and become benign absences. Corrupt drafts
//! restore as "no draft". Validation failures are data (path → message),
//! surfaced per field. Removing the last record-array entry below the
//! schema minimum is a silent no-op. The only error a screen ever renders
//! is the validation map.
//!
//! ## Key Principle: Restore Before Save
//!
//! Load-on-mount and save-on-change target the same storage key. A
//! [`session::DraftSession`] therefore applies the restored draft before
//! it becomes interactive; the first autosave after mount always carries
//! the restored values, never pre-reset defaults.
//!
//! ## Testing Strategy
//!
//! Every layer tests against `InMemoryStore` — construction is cheap and
//! failure injection is built in. Form and schema logic is pure and
//! carries the lion's share of unit tests; the `tests/` directory holds
//! the end-to-end lifecycle properties (round-trip, restore ordering,
//! submit-clears, identity under shift).
//!
//! ## Module Overview
//!
//! - [`session`]: per-screen lifecycle controller — the entry point
//! - [`form`]: validated form model and record arrays
//! - [`schema`]: declarative field/form schemas
//! - [`value`]: typed runtime values and draft (de)hydration
//! - [`draft`]: draft persistence service and key construction
//! - [`store`]: storage trait and backends
//! - [`catalog`]: the concrete screens as schema instances
//! - [`nav`]: collaborator seams (navigation, scanner, sink)
//! - [`path`]: field paths
//! - [`error`]: error types

pub mod catalog;
pub mod draft;
pub mod error;
pub mod form;
pub mod nav;
pub mod path;
pub mod schema;
pub mod session;
pub mod store;
pub mod value;
