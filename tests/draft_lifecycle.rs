//! End-to-end lifecycle tests: a screen session over a real (in-memory)
//! store, using the catalog's own schemas.

use async_trait::async_trait;
use ficha::catalog::{bottle_control, cleaning_log, water_quality};
use ficha::draft::DraftService;
use ficha::nav::{BarcodeScanner, Navigator, SubmissionSink};
use ficha::path::FieldPath;
use ficha::session::{DraftSession, SubmitOutcome};
use ficha::store::memory::InMemoryStore;
use ficha::store::KeyValueStore;
use ficha::value::Value;
use std::sync::Arc;

#[derive(Default)]
struct RecordingSink {
    accepted: Vec<Value>,
}

#[async_trait]
impl SubmissionSink for RecordingSink {
    async fn accept(&mut self, data: Value) {
        self.accepted.push(data);
    }
}

#[derive(Default)]
struct RecordingNav {
    backs: usize,
}

impl Navigator for RecordingNav {
    fn navigate(&mut self, _screen: &str, _params: serde_json::Value) {}
    fn go_back(&mut self) {
        self.backs += 1;
    }
}

/// Scanner double that hands out one queued code.
struct QueuedScanner {
    granted: bool,
    code: Option<String>,
}

#[async_trait]
impl BarcodeScanner for QueuedScanner {
    fn has_permission(&self) -> bool {
        self.granted
    }

    async fn request_permission(&mut self) -> bool {
        self.granted = true;
        self.granted
    }

    async fn scan(&mut self) -> Option<String> {
        self.code.take()
    }
}

fn service(store: &Arc<InMemoryStore>) -> DraftService<Arc<InMemoryStore>> {
    DraftService::new(store.clone())
}

#[tokio::test]
async fn a_draft_survives_screen_reopen_with_typed_dates() {
    let store = Arc::new(InMemoryStore::new());
    let screen = water_quality();

    let mut session =
        DraftSession::open(screen.schema.clone(), screen.key.clone(), service(&store)).await;
    session.input(&"responsavel".into(), "Iara").await.unwrap();
    session.input(&"manha_ph_01".into(), "7.2").await.unwrap();
    let saved_date = session.form().value(&"data".into()).as_date().unwrap();
    drop(session);

    // Same screen type, next mount: the single draft for the key loads.
    let reopened =
        DraftSession::open(screen.schema.clone(), screen.key.clone(), service(&store)).await;
    assert_eq!(
        reopened.form().value(&"responsavel".into()).as_str(),
        Some("Iara")
    );
    assert_eq!(
        reopened.form().value(&"manha_ph_01".into()).as_number(),
        Some(7.2)
    );
    // The date came back as a date, not as its serialized string.
    assert_eq!(
        reopened.form().value(&"data".into()).as_date(),
        Some(saved_date)
    );
}

#[tokio::test]
async fn corrupt_drafts_fall_back_to_defaults() {
    let store = Arc::new(InMemoryStore::new());
    let screen = cleaning_log("Extração");
    store
        .set(&screen.key, "{definitely not json")
        .await
        .unwrap();

    let session =
        DraftSession::open(screen.schema.clone(), screen.key.clone(), service(&store)).await;
    // Restore path did not crash and the form holds the schema defaults.
    assert_eq!(session.form().value(&"area".into()).as_str(), Some("Extração"));
    assert!(session.form().value(&"operador".into()).is_absent() ||
        session.form().value(&"operador".into()).as_str() == Some(""));
}

#[tokio::test]
async fn restored_values_win_over_defaults_in_the_first_save() {
    let store = Arc::new(InMemoryStore::new());
    let screen = cleaning_log("Almoxarifado");
    store
        .set(&screen.key, r#"{"operador":"Beatriz"}"#)
        .await
        .unwrap();

    let mut session =
        DraftSession::open(screen.schema.clone(), screen.key.clone(), service(&store)).await;
    session.input(&"observacao".into(), "piso ok").await.unwrap();

    let blob = store.get(&screen.key).await.unwrap().unwrap();
    let draft: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(draft["operador"], "Beatriz");
    assert_eq!(draft["observacao"], "piso ok");
}

#[tokio::test]
async fn scan_lands_on_the_right_insumo_after_a_removal() {
    let store = Arc::new(InMemoryStore::new());
    let screen = bottle_control();
    let mut session =
        DraftSession::open(screen.schema.clone(), screen.key.clone(), service(&store)).await;

    let array: FieldPath = "insumos".into();
    let element_seed = session.form().value(&"insumos.0".into()).clone();
    let _b = session.append_record(&array, element_seed.clone()).await.unwrap();
    let c = session.append_record(&array, element_seed).await.unwrap();
    session
        .set_entry_value(&array, c, "fornecedor", Value::Text("Vidros Sul".into()))
        .await
        .unwrap();

    // The operator opens the camera for entry C (index 2 right now)...
    let mut scanner = QueuedScanner {
        granted: false,
        code: Some("7891000123456".into()),
    };

    // ...and removes entry B while the camera is open.
    assert!(session.remove_record(&array, 1).await.unwrap());

    // The scan still lands on C, now at index 1.
    let landed = session
        .scan_into(&mut scanner, &array, c, "codigo_barras")
        .await
        .unwrap();
    assert!(landed);
    assert_eq!(
        session
            .form()
            .value(&"insumos.1.codigo_barras".into())
            .as_str(),
        Some("7891000123456")
    );
    assert_eq!(
        session.form().value(&"insumos.1.fornecedor".into()).as_str(),
        Some("Vidros Sul")
    );
}

#[tokio::test]
async fn submit_clears_the_draft_exactly_once() {
    let store = Arc::new(InMemoryStore::new());
    let screen = cleaning_log("Extração");
    let mut session =
        DraftSession::open(screen.schema.clone(), screen.key.clone(), service(&store)).await;

    // Invalid submit first: draft untouched, nothing accepted.
    session.input(&"operador".into(), "Paulo").await.unwrap();
    let before = store.get(&screen.key).await.unwrap();
    let mut sink = RecordingSink::default();
    let mut nav = RecordingNav::default();
    let outcome = session.submit(&mut sink, &mut nav).await;
    assert!(matches!(outcome, SubmitOutcome::Rejected(_)));
    assert!(sink.accepted.is_empty());
    assert_eq!(store.get(&screen.key).await.unwrap(), before);

    // Fill everything in and submit for real.
    session.input(&"ph_agua_inicial".into(), "7").await.unwrap();
    session.toggle_choice(&"tipo_solucao".into(), "NaOH").await.unwrap();
    session.input(&"hora_inicio_limpeza".into(), "08:00").await.unwrap();
    session.input(&"hora_fim_limpeza".into(), "08:40").await.unwrap();
    session.input(&"concentracao_pct".into(), "2").await.unwrap();
    session.input(&"temperatura_c".into(), "60").await.unwrap();
    session.input(&"hora_inicio_enxague".into(), "08:45").await.unwrap();
    session.input(&"hora_fim_enxague".into(), "09:00").await.unwrap();
    session.input(&"ph_agua_enxague".into(), "7").await.unwrap();
    session.input(&"responsavel_analista".into(), "Iara").await.unwrap();

    let outcome = session.submit(&mut sink, &mut nav).await;
    assert!(matches!(outcome, SubmitOutcome::Submitted));
    assert_eq!(sink.accepted.len(), 1);
    assert_eq!(nav.backs, 1);
    assert_eq!(store.get(&screen.key).await.unwrap(), None);

    // The accepted snapshot carries the typed values.
    let snapshot = &sink.accepted[0];
    assert_eq!(snapshot.at(&"operador".into()).as_str(), Some("Paulo"));
    assert_eq!(snapshot.at(&"ph_agua_inicial".into()).as_number(), Some(7.0));
}

#[tokio::test]
async fn parallel_screen_types_never_collide() {
    let store = Arc::new(InMemoryStore::new());
    let cleaning = cleaning_log("Extração");
    let water = water_quality();

    let mut a =
        DraftSession::open(cleaning.schema.clone(), cleaning.key.clone(), service(&store)).await;
    let mut b = DraftSession::open(water.schema.clone(), water.key.clone(), service(&store)).await;

    a.input(&"operador".into(), "Paulo").await.unwrap();
    b.input(&"responsavel".into(), "Iara").await.unwrap();

    let cleaning_draft: serde_json::Value =
        serde_json::from_str(&store.get(&cleaning.key).await.unwrap().unwrap()).unwrap();
    let water_draft: serde_json::Value =
        serde_json::from_str(&store.get(&water.key).await.unwrap().unwrap()).unwrap();
    assert_eq!(cleaning_draft["operador"], "Paulo");
    assert_eq!(water_draft["responsavel"], "Iara");
    assert!(cleaning_draft.get("responsavel").map(|v| v.is_null()).unwrap_or(true));
}

#[tokio::test]
async fn storage_failures_stay_invisible_to_the_operator() {
    let store = Arc::new(InMemoryStore::new());
    let screen = water_quality();
    let mut session =
        DraftSession::open(screen.schema.clone(), screen.key.clone(), service(&store)).await;

    store.fail_next_operations(true);
    // Edits keep working; the save is silently lost.
    session.input(&"responsavel".into(), "Iara").await.unwrap();
    assert_eq!(
        session.form().value(&"responsavel".into()).as_str(),
        Some("Iara")
    );

    // Storage recovers; the next change persists the full, current state.
    store.fail_next_operations(false);
    session.input(&"manha_ph_01".into(), "7.2").await.unwrap();
    let draft: serde_json::Value =
        serde_json::from_str(&store.get(&screen.key).await.unwrap().unwrap()).unwrap();
    assert_eq!(draft["responsavel"], "Iara");
    assert_eq!(draft["manha_ph_01"], 7.2);
}
