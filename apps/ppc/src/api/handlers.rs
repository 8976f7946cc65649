//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Readers take the store's read lock. Insert, remove and restore take the
//! write lock, apply the change to a copy, and swap the copy in only after it
//! was persisted to the data file (when the server has one).

use super::{
    AppState,
    types::{
        ComponentListResponse, CreateComponentResponse, ErrorResponse, HealthResponse,
        RemoveComponentResponse, RestoreResponse, RulesResponse, ValidationResponse,
    },
};
use crate::{datafile, export};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use ppc_core::{
    ComponentDraft, ComponentId, ConformityDashboard, CurriculumStore, PpcError, parse_backup,
    period_matrix, semester_nucleus_summary,
};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status for an engine error.
pub fn status_for(error: &PpcError) -> StatusCode {
    match error {
        PpcError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PpcError::InvalidField { .. }
        | PpcError::InvalidHours(_)
        | PpcError::InvalidBackup(_)
        | PpcError::SerializationError(_) => StatusCode::BAD_REQUEST,
        PpcError::ComponentNotFound(_) => StatusCode::NOT_FOUND,
        PpcError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &PpcError) -> Response {
    (status_for(error), Json(ErrorResponse::new(error.to_string()))).into_response()
}

/// Make `candidate` the working set.
///
/// With a data file, `candidate` is written on the blocking pool first and
/// only replaces `current` once the write succeeded; on failure `current` is
/// left as it was.
async fn commit(
    state: &AppState,
    current: &mut CurriculumStore,
    candidate: CurriculumStore,
) -> Result<(), PpcError> {
    let candidate = match state.data_file.clone() {
        Some(path) => tokio::task::spawn_blocking(move || {
            datafile::save_store(&candidate, &path).map(|()| candidate)
        })
        .await
        .map_err(|e| PpcError::IoError(format!("Persist task failed: {}", e)))??,
        None => candidate,
    };
    *current = candidate;
    Ok(())
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// COMPONENT HANDLERS
// =============================================================================

/// List every component in insertion order.
pub async fn list_components_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(ComponentListResponse {
        count: store.len(),
        ultimo_id: store.last_id(),
        componentes: store.components().to_vec(),
    })
}

/// Validate and insert a component draft.
pub async fn create_component_handler(
    State(state): State<AppState>,
    Json(draft): Json<ComponentDraft>,
) -> Response {
    let mut store = state.store.write().await;
    let mut candidate = store.clone();
    let nome = draft.nome.clone();

    match candidate.insert(draft) {
        Ok(id) => {
            if let Err(e) = commit(&state, &mut store, candidate).await {
                tracing::error!(nome = %nome, "Persist failed, insert discarded: {}", e);
                return error_response(&e);
            }
            tracing::info!(id = id.0, nome = %nome, "Component inserted");
            (
                StatusCode::CREATED,
                Json(CreateComponentResponse::success(id)),
            )
                .into_response()
        }
        Err(PpcError::Rejected(violations)) => {
            tracing::warn!(
                nome = %nome,
                violations = violations.len(),
                "Component rejected"
            );
            let errors = violations.iter().map(ToString::to_string).collect();
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(CreateComponentResponse::rejected(errors)),
            )
                .into_response()
        }
        Err(e) => {
            tracing::warn!(nome = %nome, "Component not typed: {}", e);
            (
                status_for(&e),
                Json(CreateComponentResponse::rejected(vec![e.to_string()])),
            )
                .into_response()
        }
    }
}

/// Remove a component by id.
pub async fn delete_component_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Response {
    let mut store = state.store.write().await;
    let mut candidate = store.clone();

    match candidate.remove(ComponentId(id)) {
        Some(removed) => {
            if let Err(e) = commit(&state, &mut store, candidate).await {
                tracing::error!(id, "Persist failed, removal discarded: {}", e);
                return error_response(&e);
            }
            tracing::info!(id, nome = %removed.nome, "Component removed");
            Json(RemoveComponentResponse {
                success: true,
                id,
                removed: Some(removed.nome),
            })
            .into_response()
        }
        None => error_response(&PpcError::ComponentNotFound(ComponentId(id))),
    }
}

// =============================================================================
// CONFORMITY HANDLERS
// =============================================================================

/// Conformity dashboard of the current working set.
pub async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(ConformityDashboard::from_components(store.components()))
}

/// Curriculum validation report.
pub async fn validation_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(ValidationResponse::from(&store.report()))
}

/// Period matrix rows.
pub async fn matrix_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(period_matrix(store.components()))
}

/// Semester by nucleus summary rows.
pub async fn nucleus_summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(semester_nucleus_summary(store.components()))
}

// =============================================================================
// EXPORT & BACKUP HANDLERS
// =============================================================================

/// SIGAA CSV sheet.
pub async fn export_csv_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    let csv = export::render_sigaa_csv(store.components());
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"matriz_sigaa.csv\"",
            ),
        ],
        csv,
    )
}

/// Full working-set backup.
pub async fn backup_handler(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store.read().await;
    Json(store.to_backup(datafile::backup_timestamp()))
}

/// Replace the working set with an uploaded backup.
///
/// A malformed backup is rejected with 400 and the working set is unchanged.
pub async fn restore_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let backup = match parse_backup(&body) {
        Ok(b) => b,
        Err(e) => {
            tracing::warn!("Backup rejected: {}", e);
            return error_response(&e);
        }
    };
    let message = backup.restored_message();

    let candidate = CurriculumStore::from_backup(backup);
    let count = candidate.len();

    let mut store = state.store.write().await;
    if let Err(e) = commit(&state, &mut store, candidate).await {
        tracing::error!("Persist failed, restore discarded: {}", e);
        return error_response(&e);
    }
    tracing::info!(count, last_id = store.last_id(), "Working set restored");

    Json(RestoreResponse {
        success: true,
        message,
        count,
        ultimo_id: store.last_id(),
    })
    .into_response()
}

// =============================================================================
// RULES HANDLER
// =============================================================================

/// The fixed regulatory rubric.
pub async fn rules_handler() -> impl IntoResponse {
    Json(RulesResponse::default())
}
