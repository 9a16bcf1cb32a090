//! Export orchestrator: picks the driver for (kind, template, format) and
//! returns a complete, standalone file.

pub mod handlers;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ExportError;
use crate::models::Document;
use crate::templates::{RenderOptions, TemplateId};
use crate::{docx, pdf, plain};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Txt,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(ExportFormat::Pdf),
            "docx" => Some(ExportFormat::Docx),
            "txt" => Some(ExportFormat::Txt),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Txt => "text/plain; charset=utf-8",
        }
    }
}

/// A finished export, ready to hand to the client.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Bytes,
    pub suggested_filename: String,
    pub content_type: &'static str,
    pub template: TemplateId,
    /// Only known for paginated formats.
    pub page_count: Option<usize>,
}

/// Renders `document` with the requested template and format.
///
/// Unknown template ids fall back to classic. Any failure aborts the whole
/// export; no partial bytes are returned.
pub fn export_document(
    document: &Document,
    template: Option<&str>,
    format: ExportFormat,
    filename_hint: Option<&str>,
    options: RenderOptions,
) -> Result<ExportArtifact, ExportError> {
    let template = TemplateId::resolve(template);
    let theme = template.theme();

    let (bytes, page_count) = match (document, format) {
        (Document::Resume(resume), ExportFormat::Pdf) => {
            let pdf = pdf::render_resume(resume, &theme, options)?;
            (pdf.bytes, Some(pdf.page_count))
        }
        (Document::CoverLetter(letter), ExportFormat::Pdf) => {
            let pdf = pdf::render_cover_letter(letter, &theme, options)?;
            (pdf.bytes, Some(pdf.page_count))
        }
        (Document::Resume(resume), ExportFormat::Docx) => {
            (docx::render_resume(resume, &theme, options)?, None)
        }
        (Document::CoverLetter(letter), ExportFormat::Docx) => {
            (docx::render_cover_letter(letter, &theme, options)?, None)
        }
        (Document::Resume(resume), ExportFormat::Txt) => {
            (plain::render_resume(resume, options), None)
        }
        (Document::CoverLetter(letter), ExportFormat::Txt) => {
            (plain::render_cover_letter(letter), None)
        }
    };

    info!(
        kind = document.kind().as_str(),
        template = template.as_str(),
        format = format.as_str(),
        bytes = bytes.len(),
        pages = ?page_count,
        "document exported"
    );

    Ok(ExportArtifact {
        bytes: Bytes::from(bytes),
        suggested_filename: suggested_filename(filename_hint, document, format),
        content_type: format.content_type(),
        template,
        page_count,
    })
}

/// Download name for an export. A non-blank hint wins; otherwise the owner's
/// name plus the document kind.
pub fn suggested_filename(hint: Option<&str>, document: &Document, format: ExportFormat) -> String {
    let stem = hint
        .map(strip_path_and_extension)
        .map(safe_stem)
        .filter(|stem| !stem.chars().all(|c| c == '.'))
        .unwrap_or_else(|| default_stem(document));
    format!("{stem}.{}", format.extension())
}

fn strip_path_and_extension(hint: &str) -> &str {
    let hint = hint.trim();
    let base = hint.rsplit(['/', '\\']).next().unwrap_or(hint);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

/// Keeps `[A-Za-z0-9._-]`, maps everything else to `_`, collapses runs of
/// `_` and trims them from both ends.
fn safe_stem(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            c
        } else {
            '_'
        };
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('_').to_string()
}

fn default_stem(document: &Document) -> String {
    let suffix = match document {
        Document::Resume(_) => "Resume",
        Document::CoverLetter(_) => "Cover_Letter",
    };
    let name = safe_stem(document.owner_name());
    if name.is_empty() {
        suffix.to_string()
    } else {
        format!("{name}_{suffix}")
    }
}
