use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::handlers::{artifact_response, parse_kind, run_export, ExportParams};
use crate::models::{DocumentKind, DocumentRow};
use crate::state::AppState;
use crate::validation::{parse_document, validate};

#[derive(Deserialize)]
pub struct DocumentRequest {
    pub kind: String,
    #[serde(default)]
    pub document: Value,
}

/// Validates a write payload. Stored JSON is kept exactly as sent.
fn checked(req: DocumentRequest) -> Result<(DocumentKind, Value), AppError> {
    let kind = parse_kind(&req.kind)?;
    let report = validate(kind, &req.document);
    if !report.ok {
        return Err(AppError::Validation(report.errors));
    }
    Ok((kind, req.document))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Document {id} not found"))
}

/// POST /api/v1/documents
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<DocumentRequest>,
) -> Result<(StatusCode, Json<DocumentRow>), AppError> {
    let (kind, data) = checked(req)?;
    let row = state.store.create(kind, data).await?;
    info!(id = %row.id, kind = kind.as_str(), "document created");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/documents/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentRow>, AppError> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/v1/documents/:id
pub async fn handle_replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DocumentRequest>,
) -> Result<Json<DocumentRow>, AppError> {
    let (kind, data) = checked(req)?;
    let row = state
        .store
        .replace(id, kind, data)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(id = %row.id, kind = kind.as_str(), "document replaced");
    Ok(Json(row))
}

/// DELETE /api/v1/documents/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete(id).await? {
        return Err(not_found(id));
    }
    info!(id = %id, "document deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/documents/:id/export
pub async fn handle_export_stored(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(params): Json<ExportParams>,
) -> Result<Response, AppError> {
    let row = state.store.get(id).await?.ok_or_else(|| not_found(id))?;
    let kind = DocumentKind::parse(&row.kind).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("stored document {id} has unknown kind '{}'", row.kind))
    })?;
    let document = parse_document(kind, row.data)?;
    let artifact = run_export(document, params, state.config.link_display).await?;
    Ok(artifact_response(artifact))
}
