use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::cover_letter::CoverLetter;
use crate::models::resume::ResumeData;

/// Which canonical document a JSON payload claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "coverLetter",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "resume" => Some(DocumentKind::Resume),
            "coverLetter" => Some(DocumentKind::CoverLetter),
            _ => None,
        }
    }
}

/// A validated, typed document ready for export. Export only ever borrows it.
#[derive(Debug, Clone)]
pub enum Document {
    Resume(ResumeData),
    CoverLetter(CoverLetter),
}

impl Document {
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Resume(_) => DocumentKind::Resume,
            Document::CoverLetter(_) => DocumentKind::CoverLetter,
        }
    }

    /// The person the document belongs to.
    pub fn owner_name(&self) -> &str {
        match self {
            Document::Resume(resume) => resume.basics.name.trim(),
            Document::CoverLetter(letter) => letter.applicant.name.trim(),
        }
    }
}

/// One piece of a contact row. `url` is set when the segment is clickable.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSegment {
    pub label: String,
    pub url: Option<String>,
}

impl ContactSegment {
    pub fn text(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: None,
        }
    }

    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: Some(url.into()),
        }
    }
}

impl ResumeData {
    /// Header contact row: email, phone, location, LinkedIn, then visible
    /// custom fields in their configured order.
    pub fn contact_segments(&self) -> Vec<ContactSegment> {
        let basics = &self.basics;
        let mut segments = Vec::new();
        let email = basics.email.trim();
        if !email.is_empty() {
            segments.push(ContactSegment::link(email, format!("mailto:{email}")));
        }
        for plain in [basics.phone.trim(), basics.location.trim()] {
            if !plain.is_empty() {
                segments.push(ContactSegment::text(plain));
            }
        }
        let linkedin = basics.linkedin.trim();
        if !linkedin.is_empty() {
            segments.push(ContactSegment::link(linkedin, linkedin));
        }
        for field in self.ordered_custom_fields() {
            let content = field.content.trim();
            if field.link {
                segments.push(ContactSegment::link(content, content));
            } else {
                segments.push(ContactSegment::text(content));
            }
        }
        segments
    }
}

/// Persisted document row. `data` is the raw JSON exactly as validated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub id: Uuid,
    pub kind: String,
    #[serde(rename = "document")]
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
