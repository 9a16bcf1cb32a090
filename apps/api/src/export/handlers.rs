use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::export::{export_document, ExportArtifact, ExportFormat};
use crate::models::{Document, DocumentKind};
use crate::state::AppState;
use crate::templates::{LinkDisplay, RenderOptions, TemplateId};
use crate::validation::{parse_document, validate, ValidationReport};

const PAGE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-page-count");
/// Template actually used, which differs from the request after a fallback.
const TEMPLATE_HEADER: HeaderName = HeaderName::from_static("x-template");

/// Export switches shared by ad-hoc and stored-document exports.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
    pub template: Option<String>,
    pub format: Option<String>,
    pub filename: Option<String>,
    pub link_display: Option<String>,
}

#[derive(Deserialize)]
pub struct ExportRequest {
    pub kind: String,
    #[serde(default)]
    pub document: Value,
    #[serde(flatten)]
    pub params: ExportParams,
}

#[derive(Deserialize)]
pub struct ValidateRequest {
    pub kind: String,
    #[serde(default)]
    pub document: Value,
}

#[derive(Serialize)]
pub struct TemplatesResponse {
    pub templates: Vec<&'static str>,
    pub formats: Vec<&'static str>,
    pub default: &'static str,
}

pub(crate) fn parse_kind(raw: &str) -> Result<DocumentKind, AppError> {
    DocumentKind::parse(raw.trim()).ok_or_else(|| {
        AppError::BadRequest(format!(
            "kind must be 'resume' or 'coverLetter', got '{raw}'"
        ))
    })
}

/// GET /api/v1/templates
pub async fn handle_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        templates: TemplateId::ALL.iter().map(TemplateId::as_str).collect(),
        formats: [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Txt]
            .iter()
            .map(ExportFormat::as_str)
            .collect(),
        default: TemplateId::Classic.as_str(),
    })
}

/// POST /api/v1/validate
///
/// Reports structural problems without failing the request.
pub async fn handle_validate(
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationReport>, AppError> {
    let kind = parse_kind(&req.kind)?;
    Ok(Json(validate(kind, &req.document)))
}

/// POST /api/v1/export
pub async fn handle_export(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let kind = parse_kind(&req.kind)?;
    let document = parse_document(kind, req.document)?;
    let artifact = run_export(document, req.params, state.config.link_display).await?;
    Ok(artifact_response(artifact))
}

/// Resolves request switches, then renders on the blocking pool.
pub(crate) async fn run_export(
    document: Document,
    params: ExportParams,
    default_link: LinkDisplay,
) -> Result<ExportArtifact, AppError> {
    let format = match params.format.as_deref() {
        None => return Err(AppError::BadRequest("format is required".to_string())),
        Some(raw) => ExportFormat::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!("format must be pdf, docx or txt, got '{raw}'"))
        })?,
    };
    let link_display = match params.link_display.as_deref() {
        None => default_link,
        Some(raw) => LinkDisplay::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!("linkDisplay must be 'short' or 'full', got '{raw}'"))
        })?,
    };
    let options = RenderOptions { link_display };

    let artifact = tokio::task::spawn_blocking(move || {
        export_document(
            &document,
            params.template.as_deref(),
            format,
            params.filename.as_deref(),
            options,
        )
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    Ok(artifact)
}

pub(crate) fn artifact_response(artifact: ExportArtifact) -> Response {
    // Filenames are already restricted to [A-Za-z0-9._-].
    let disposition = format!("attachment; filename=\"{}\"", artifact.suggested_filename);
    let mut response = (
        [
            (header::CONTENT_TYPE, artifact.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (TEMPLATE_HEADER, artifact.template.as_str().to_string()),
        ],
        artifact.bytes,
    )
        .into_response();
    if let Some(pages) = artifact.page_count {
        response
            .headers_mut()
            .insert(PAGE_COUNT_HEADER, HeaderValue::from(pages));
    }
    response
}
