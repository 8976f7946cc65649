//! Integration tests for the PPC HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use axum_test::TestServer;
use ppc::api::{
    ApiOptions, AppState, ComponentListResponse, CreateComponentResponse, ErrorResponse,
    HealthResponse, RemoveComponentResponse, RestoreResponse, RulesResponse, ValidationResponse,
    create_router,
};
use ppc::config::AppConfig;
use ppc_core::{ComponentDraft, CurriculumStore, backup_to_json};
use serde_json::{Value, json};
use tower::ServiceExt;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a test server with an empty in-memory working set.
fn create_test_server() -> TestServer {
    let state = AppState::new(CurriculumStore::new());
    TestServer::new(create_router(state)).unwrap()
}

fn nucleus_i(nome: &str, total: u64) -> Value {
    json!({
        "semestre": 1,
        "nome": nome,
        "tipo": "Módulo",
        "ch_total": total,
        "ch_teorica": total,
        "nucleo": "I",
        "temas_nucleo_i": ["a) Princípios, concepções e critérios"]
    })
}

fn nucleus_ii(nome: &str, total: u64) -> Value {
    json!({
        "semestre": 2,
        "nome": nome,
        "tipo": "Módulo",
        "ch_total": total,
        "nucleo": "II",
        "diretrizes_nucleo_ii": "DCN de Ciências Biológicas"
    })
}

fn nucleus_iii(nome: &str, total: u64) -> Value {
    json!({
        "nome": nome,
        "tipo": "Extensão",
        "ch_total": total,
        "ch_extensao": total,
        "nucleo": "III",
        "descricao_extensao": "Projeto Ciência na Escola"
    })
}

fn nucleus_iv(nome: &str, total: u64) -> Value {
    json!({
        "semestre": 5,
        "nome": nome,
        "tipo": "Estágio",
        "ch_total": total,
        "ch_pratica": total,
        "nucleo": "IV",
        "local_realizacao": "Escola X",
        "etapa_estagio": "Observação"
    })
}

/// Create a test server holding a curriculum that meets every minimum.
async fn create_conformant_server() -> TestServer {
    let server = create_test_server();
    for draft in [
        nucleus_i("Fundamentos da Educação", 880),
        nucleus_ii("Biologia Celular", 1600),
        nucleus_iii("Extensão Comunitária", 320),
        nucleus_iv("Estágio Supervisionado", 400),
    ] {
        server
            .post("/components")
            .json(&draft)
            .await
            .assert_status(StatusCode::CREATED);
    }
    server
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// COMPONENT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_list_empty() {
    let server = create_test_server();

    let response = server.get("/components").await;

    response.assert_status_ok();
    let list: ComponentListResponse = response.json();
    assert_eq!(list.count, 0);
    assert_eq!(list.ultimo_id, 0);
    assert!(list.componentes.is_empty());
}

#[tokio::test]
async fn test_create_valid_component() {
    let server = create_test_server();

    let response = server
        .post("/components")
        .json(&nucleus_iv("Estágio I", 400))
        .await;

    response.assert_status(StatusCode::CREATED);
    let result: CreateComponentResponse = response.json();
    assert!(result.success);
    assert_eq!(result.id, Some(1));
    assert!(result.errors.is_empty());

    let list: ComponentListResponse = server.get("/components").await.json();
    assert_eq!(list.count, 1);
    assert_eq!(list.componentes[0].nome, "Estágio I");
}

#[tokio::test]
async fn test_create_discipline_derives_total() {
    let server = create_test_server();

    let draft = json!({
        "semestre": 3,
        "nome": "Didática Geral",
        "tipo": "Disciplina",
        "aulas_semanais": 4,
        "nucleo": "I",
        "temas_nucleo_i": ["c) Observação"]
    });
    server
        .post("/components")
        .json(&draft)
        .await
        .assert_status(StatusCode::CREATED);

    let list: Value = server.get("/components").await.json();
    assert_eq!(list["componentes"][0]["ch_total"], json!(72.0));
}

#[tokio::test]
async fn test_create_rejects_with_every_violation() {
    let server = create_test_server();

    let draft = json!({
        "semestre": 1,
        "nome": "Estágio fora do lugar",
        "tipo": "Estágio",
        "ch_total": 400,
        "nucleo": "I"
    });
    let response = server.post("/components").json(&draft).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let result: CreateComponentResponse = response.json();
    assert!(!result.success);
    assert!(result.id.is_none());
    assert!(
        result
            .errors
            .contains(&"Componentes do tipo Estágio devem pertencer ao Núcleo IV".to_string())
    );
    assert!(
        result
            .errors
            .contains(&"Núcleo I requer seleção de pelo menos um tema do Art. 13".to_string())
    );

    let list: ComponentListResponse = server.get("/components").await.json();
    assert_eq!(list.count, 0);
}

#[tokio::test]
async fn test_create_rejects_out_of_range_semester() {
    let server = create_test_server();

    let mut draft = nucleus_ii("Genética", 60);
    draft["semestre"] = json!(21);
    let response = server.post("/components").json(&draft).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let result: CreateComponentResponse = response.json();
    assert!(!result.success);
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test]
async fn test_delete_component() {
    let server = create_test_server();
    server.post("/components").json(&nucleus_ii("A", 60)).await;
    server.post("/components").json(&nucleus_ii("B", 60)).await;

    let response = server.delete("/components/1").await;

    response.assert_status_ok();
    let result: RemoveComponentResponse = response.json();
    assert!(result.success);
    assert_eq!(result.removed.as_deref(), Some("A"));

    let list: ComponentListResponse = server.get("/components").await.json();
    assert_eq!(list.count, 1);
    assert_eq!(list.componentes[0].nome, "B");

    // Ids are never reused after removal.
    let created: CreateComponentResponse =
        server.post("/components").json(&nucleus_ii("C", 60)).await.json();
    assert_eq!(created.id, Some(3));
}

#[tokio::test]
async fn test_delete_missing_component() {
    let server = create_test_server();

    let response = server.delete("/components/99").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let error: ErrorResponse = response.json();
    assert!(!error.success);
}

// =============================================================================
// CONFORMITY ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_validation_empty_course() {
    let server = create_test_server();

    let response = server.get("/validation").await;

    response.assert_status_ok();
    let report: ValidationResponse = response.json();
    assert!(!report.valido);
    assert!(!report.erros.is_empty());
    assert!(report.avisos.is_empty());
}

#[tokio::test]
async fn test_validation_conformant_course() {
    let server = create_conformant_server().await;

    let report: ValidationResponse = server.get("/validation").await.json();

    assert!(report.valido);
    assert!(report.erros.is_empty());
}

#[tokio::test]
async fn test_summary_dashboard() {
    let server = create_conformant_server().await;

    let response = server.get("/summary").await;

    response.assert_status_ok();
    let dashboard: Value = response.json();
    assert_eq!(dashboard["component_count"], json!(4));
    assert_eq!(dashboard["ch_total"], json!(3200.0));
    assert_eq!(dashboard["percentual_extensao"], json!(10.0));
    assert_eq!(dashboard["nucleos"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_reports() {
    let server = create_conformant_server().await;

    let matrix: Vec<Value> = server.get("/reports/matrix").await.json();
    assert!(matrix.iter().any(|row| row["linha"] == "period_total"));

    let summary: Vec<Value> = server.get("/reports/nucleus").await.json();
    let total = summary.last().unwrap();
    assert_eq!(total["semestre"], "TOTAL");
    assert_eq!(total["total"], json!(3200.0));
}

// =============================================================================
// EXPORT & BACKUP ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_export_csv() {
    let server = create_conformant_server().await;

    let response = server.get("/export/csv").await;

    response.assert_status_ok();
    let content_type = response.header(header::CONTENT_TYPE);
    assert!(content_type.to_str().unwrap().starts_with("text/csv"));
    let text = response.text();
    assert!(text.starts_with('\u{feff}'));
    assert_eq!(text.lines().count(), 5);
}

#[tokio::test]
async fn test_backup_and_restore() {
    let source = create_conformant_server().await;
    let backup = source.get("/backup").await.text();
    assert!(backup.contains("\"versao\": \"1.0\""));

    let target = create_test_server();
    let response = target
        .post("/backup/restore")
        .bytes(backup.into_bytes().into())
        .await;

    response.assert_status_ok();
    let result: RestoreResponse = response.json();
    assert!(result.success);
    assert_eq!(result.count, 4);
    assert_eq!(result.ultimo_id, 4);

    let report: ValidationResponse = target.get("/validation").await.json();
    assert!(report.valido);
}

#[tokio::test]
async fn test_restore_advances_counter() {
    let server = create_test_server();
    let backup = backup_to_json(&ppc_core::Backup::new(Vec::new(), 5, String::new())).unwrap();

    server
        .post("/backup/restore")
        .bytes(backup.into_bytes().into())
        .await
        .assert_status_ok();

    let created: CreateComponentResponse =
        server.post("/components").json(&nucleus_ii("A", 60)).await.json();
    assert_eq!(created.id, Some(6));
}

#[tokio::test]
async fn test_restore_rejects_malformed_backup() {
    let server = create_conformant_server().await;

    let response = server
        .post("/backup/restore")
        .bytes(br#"{"componentes": "x", "ultimo_id": 1}"#.to_vec().into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: ErrorResponse = response.json();
    assert!(!error.success);

    let list: ComponentListResponse = server.get("/components").await.json();
    assert_eq!(list.count, 4);
}

// =============================================================================
// RULES ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_rules() {
    let server = create_test_server();

    let rules: RulesResponse = server.get("/rules").await.json();

    assert_eq!(rules.ch_por_aula_semanal, 18);
    assert_eq!(rules.ch_minima_curso.hundredths(), 320_000);
    assert_eq!(rules.nucleos.len(), 4);
    assert_eq!(rules.temas_art13.len(), 9);
}

// =============================================================================
// MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_rate_limit_exceeded() {
    let state = AppState::new(CurriculumStore::new()).options(ApiOptions {
        rate_limit: 1,
        cors_origins: None,
    });
    let server = TestServer::new(create_router(state)).unwrap();

    server.get("/health").await.assert_status_ok();
    server
        .get("/health")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_cors_preflight_allows_delete_from_localhost() {
    let router = create_router(AppState::new(CurriculumStore::new()));

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/components/1")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "http://localhost:3000"
    );
}

// =============================================================================
// PERSISTENCE TESTS
// =============================================================================

#[tokio::test]
async fn test_mutations_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        data_file: dir.path().join("curriculo.json"),
        ..AppConfig::default()
    };
    let state = AppState::with_config(CurriculumStore::new(), &config);
    let server = TestServer::new(create_router(state)).unwrap();

    server
        .post("/components")
        .json(&nucleus_ii("Genética", 60))
        .await
        .assert_status(StatusCode::CREATED);

    let saved = ppc::datafile::load_or_create_store(&config.data_file).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved.components()[0].nome, "Genética");
}

/// Server backed by a data file whose directory does not exist, so every save fails.
fn create_unwritable_server(dir: &tempfile::TempDir, store: CurriculumStore) -> TestServer {
    let config = AppConfig {
        data_file: dir.path().join("missing").join("curriculo.json"),
        ..AppConfig::default()
    };
    let state = AppState::with_config(store, &config);
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_failed_save_discards_insert() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_unwritable_server(&dir, CurriculumStore::new());

    for _ in 0..2 {
        server
            .post("/components")
            .json(&nucleus_ii("Genética", 60))
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let list: ComponentListResponse = server.get("/components").await.json();
    assert_eq!(list.count, 0);
    assert_eq!(list.ultimo_id, 0);
}

#[tokio::test]
async fn test_failed_save_discards_remove_and_restore() {
    let mut store = CurriculumStore::new();
    let draft: ComponentDraft = serde_json::from_value(nucleus_ii("Genética", 60)).unwrap();
    store.insert(draft).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let server = create_unwritable_server(&dir, store);

    server
        .delete("/components/1")
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    server
        .post("/backup/restore")
        .bytes(br#"{"componentes": [], "ultimo_id": 7}"#.to_vec().into())
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let list: ComponentListResponse = server.get("/components").await.json();
    assert_eq!(list.count, 1);
    assert_eq!(list.ultimo_id, 1);
    assert_eq!(list.componentes[0].nome, "Genética");
}
