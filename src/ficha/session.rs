//! # Draft Lifecycle Controller
//!
//! [`DraftSession`] orchestrates one screen instance from mount to
//! submit:
//!
//! ```text
//! open()                input()/set_value()/...        submit()
//! Loading ── restore ──▶ Ready ── autosave per change ──▶ Closed
//! ```
//!
//! On open it loads the screen's draft (if any), re-hydrates it through
//! the schema, and resets the form — only then does it become ready.
//! The ordering matters: no autosave may fire before the restore
//! resolves, or the just-restored draft would be clobbered by a save
//! carrying pre-reset defaults. Every mutation routed through the session
//! then persists the full current state, unconditionally — drafts are
//! saved in partially-invalid states by design; the feature is "don't
//! lose work in progress", not "only save valid work".
//!
//! Submission validates, hands the snapshot to the sink, clears the
//! draft, and signals the navigator to go back. After that the session is
//! closed and schedules no further saves.

use crate::draft::DraftService;
use crate::error::Result;
use crate::form::{EntryId, FormModel};
use crate::nav::{BarcodeScanner, Navigator, SubmissionSink};
use crate::path::FieldPath;
use crate::schema::FormSchema;
use crate::store::KeyValueStore;
use crate::value::Value;
use std::collections::BTreeMap;

/// Lifecycle phase of one screen instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Closed,
}

/// Outcome of a submit attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Accepted by the sink; the draft is gone and the screen is done.
    Submitted,
    /// Validation failed; the screen stays interactive and the draft
    /// untouched.
    Rejected(BTreeMap<FieldPath, String>),
}

pub struct DraftSession<S> {
    form: FormModel,
    drafts: DraftService<S>,
    key: String,
    phase: Phase,
}

impl<S: KeyValueStore> DraftSession<S> {
    /// Mounts a screen: loads any existing draft for `key`, re-hydrates it
    /// through `schema` (dates come back typed), and only then becomes
    /// interactive. With no draft present the form starts from schema
    /// defaults.
    pub async fn open(schema: FormSchema, key: impl Into<String>, drafts: DraftService<S>) -> Self {
        let key = key.into();
        let mut form = FormModel::new(schema);
        if let Some(stored) = drafts.get_draft::<serde_json::Value>(&key).await {
            tracing::debug!(key = %key, "restoring draft");
            let restored = Value::restore(form.schema(), &stored);
            form.reset(restored);
        }
        Self {
            form,
            drafts,
            key,
            phase: Phase::Ready,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read access to the form for rendering and assertions. All mutation
    /// goes through the session so every change autosaves.
    pub fn form(&self) -> &FormModel {
        &self.form
    }

    /// Interactive text edit; coerces, re-validates the field, autosaves.
    pub async fn input(&mut self, path: &FieldPath, raw: &str) -> Result<()> {
        self.form.input(path, raw)?;
        self.autosave().await;
        Ok(())
    }

    /// Blur hook: surfaces the field's error without changing state, so it
    /// schedules no save.
    pub fn blur(&mut self, path: &FieldPath) -> Result<()> {
        self.form.blur(path)
    }

    /// Programmatic write (date picker, computed value).
    pub async fn set_value(&mut self, path: &FieldPath, value: Value) -> Result<()> {
        self.form.set_value(path, value)?;
        self.autosave().await;
        Ok(())
    }

    /// Multi-select chip toggle on a string-list field.
    pub async fn toggle_choice(&mut self, path: &FieldPath, option: &str) -> Result<()> {
        self.form.toggle_choice(path, option)?;
        self.autosave().await;
        Ok(())
    }

    /// Appends a record-array entry and autosaves.
    pub async fn append_record(&mut self, array: &FieldPath, default: Value) -> Result<EntryId> {
        let id = self.form.append_record(array, default)?;
        self.autosave().await;
        Ok(id)
    }

    /// Removes the entry at `index` unless the array is at its minimum.
    /// A refused removal changes nothing and therefore saves nothing.
    pub async fn remove_record(&mut self, array: &FieldPath, index: usize) -> Result<bool> {
        let removed = self.form.remove_record(array, index)?;
        if removed {
            self.autosave().await;
        }
        Ok(removed)
    }

    /// Delivers an asynchronous value (a scan result) to the entry
    /// identified by `id`, resolving the position at delivery time.
    pub async fn set_entry_value(
        &mut self,
        array: &FieldPath,
        id: EntryId,
        field: &str,
        value: Value,
    ) -> Result<bool> {
        let landed = self.form.set_entry_value(array, id, field, value)?;
        if landed {
            self.autosave().await;
        }
        Ok(landed)
    }

    /// Runs a one-shot scan session and routes the decoded string to the
    /// given entry's field — by identity, so entries removed while the
    /// camera was open cannot shift the target.
    pub async fn scan_into(
        &mut self,
        scanner: &mut dyn BarcodeScanner,
        array: &FieldPath,
        id: EntryId,
        field: &str,
    ) -> Result<bool> {
        if !scanner.has_permission() && !scanner.request_permission().await {
            return Ok(false);
        }
        match scanner.scan().await {
            Some(code) => self.set_entry_value(array, id, field, Value::Text(code)).await,
            None => Ok(false),
        }
    }

    /// Validates and, if everything passes, hands the snapshot to the
    /// sink, clears the draft, and navigates back. On validation failure
    /// the draft store is not touched and the screen stays interactive.
    pub async fn submit(
        &mut self,
        sink: &mut dyn SubmissionSink,
        nav: &mut dyn Navigator,
    ) -> SubmitOutcome {
        let report = self.form.validate_all();
        if !report.valid {
            return SubmitOutcome::Rejected(report.errors);
        }
        sink.accept(self.form.snapshot()).await;
        self.drafts.clear_draft(&self.key).await;
        self.phase = Phase::Closed;
        tracing::debug!(key = %self.key, "submitted; draft cleared");
        nav.go_back();
        SubmitOutcome::Submitted
    }

    /// Persists the full current state. Fire-and-forget: failures are
    /// logged below this call and the next change's save supersedes them.
    async fn autosave(&self) {
        if self.phase != Phase::Ready {
            return;
        }
        self.drafts
            .save_draft(&self.key, &self.form.snapshot().to_json())
            .await;
    }
}
