//! Cover letter document model.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::document::ContactSegment;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetter {
    pub applicant: Applicant,
    #[serde(default)]
    pub recipient: Option<Recipient>,
    pub content: LetterContent,
    #[serde(default)]
    pub formatting: Option<Formatting>,
    // Informational blocks carried for the editor; never rendered.
    #[serde(default)]
    pub qualifications: Option<Value>,
    #[serde(default)]
    pub ats_optimization: Option<Value>,
    #[serde(default)]
    pub customization: Option<Value>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(default)]
    pub tracking: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

/// Addresses arrive either as one flattened line or as structured parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Flat(String),
    Structured(StructuredAddress),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredAddress {
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterContent {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub salutation: Option<String>,
    #[serde(default)]
    pub opening_paragraph: Option<String>,
    #[serde(default)]
    pub body_paragraphs: Vec<BodyParagraph>,
    #[serde(default)]
    pub closing_paragraph: Option<String>,
    #[serde(default)]
    pub complimentary_close: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyParagraph {
    pub text: String,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Formatting {
    #[serde(default)]
    pub font: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub margins: Option<Value>,
    #[serde(default)]
    pub color_scheme: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attachment {
    Name(String),
    Named { name: String },
}

impl Address {
    /// Display lines, skipping blank parts. Structured addresses produce
    /// `street` then `city, state zip` then `country`.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Address::Flat(line) => non_blank_line(line).into_iter().collect(),
            Address::Structured(parts) => {
                let mut lines = Vec::new();
                if let Some(street) = parts.street.as_deref().and_then(non_blank_line) {
                    lines.push(street);
                }
                let city_state = [parts.city.as_deref(), parts.state.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter_map(non_blank_line)
                    .collect::<Vec<_>>()
                    .join(", ");
                let locality = match parts.zip_code.as_deref().and_then(non_blank_line) {
                    Some(zip) if city_state.is_empty() => zip,
                    Some(zip) => format!("{city_state} {zip}"),
                    None => city_state,
                };
                if !locality.is_empty() {
                    lines.push(locality);
                }
                if let Some(country) = parts.country.as_deref().and_then(non_blank_line) {
                    lines.push(country);
                }
                lines
            }
        }
    }

    /// Single-line form used in contact rows.
    pub fn one_line(&self) -> String {
        self.lines().join(", ")
    }
}

impl Attachment {
    pub fn name(&self) -> &str {
        match self {
            Attachment::Name(name) => name,
            Attachment::Named { name } => name,
        }
    }
}

impl CoverLetter {
    /// Contact segments for the sender block, in display order.
    pub fn contact_segments(&self) -> Vec<ContactSegment> {
        let applicant = &self.applicant;
        let mut segments = Vec::new();
        if let Some(address) = &applicant.address {
            let line = address.one_line();
            if !line.is_empty() {
                segments.push(ContactSegment::text(line));
            }
        }
        if let Some(phone) = applicant.phone.as_deref().and_then(non_blank_line) {
            segments.push(ContactSegment::text(phone));
        }
        if let Some(email) = applicant.email.as_deref().and_then(non_blank_line) {
            segments.push(ContactSegment::link(email.clone(), format!("mailto:{email}")));
        }
        if let Some(linkedin) = applicant.linkedin.as_deref().and_then(non_blank_line) {
            segments.push(ContactSegment::link(linkedin.clone(), linkedin));
        }
        if let Some(website) = applicant.website.as_deref().and_then(non_blank_line) {
            segments.push(ContactSegment::link(website.clone(), website));
        }
        segments
    }

    /// Recipient block lines: name, title, company, then address lines.
    pub fn recipient_lines(&self) -> Vec<String> {
        let Some(recipient) = &self.recipient else {
            return Vec::new();
        };
        let mut lines: Vec<String> = [
            recipient.name.as_deref(),
            recipient.title.as_deref(),
            recipient.company.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter_map(non_blank_line)
        .collect();
        if let Some(address) = &recipient.address {
            lines.extend(address.lines());
        }
        lines
    }

    /// Opening, body and closing paragraphs with blanks removed.
    pub fn paragraphs(&self) -> Vec<&str> {
        let content = &self.content;
        content
            .opening_paragraph
            .as_deref()
            .into_iter()
            .chain(content.body_paragraphs.iter().map(|p| p.text.as_str()))
            .chain(content.closing_paragraph.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    pub fn salutation(&self) -> String {
        self.content
            .salutation
            .as_deref()
            .and_then(non_blank_line)
            .unwrap_or_else(|| "Dear Hiring Manager,".to_string())
    }

    pub fn complimentary_close(&self) -> String {
        self.content
            .complimentary_close
            .as_deref()
            .and_then(non_blank_line)
            .unwrap_or_else(|| "Sincerely,".to_string())
    }

    /// Names of listed enclosures, blanks removed.
    pub fn enclosures(&self) -> Vec<&str> {
        self.attachments
            .iter()
            .flatten()
            .map(|a| a.name().trim())
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Body font size requested by the editor, clamped to a printable range.
    pub fn requested_font_size(&self) -> Option<f32> {
        self.formatting
            .as_ref()
            .and_then(|f| f.font_size)
            .filter(|size| size.is_finite())
            .map(|size| size.clamp(9.0, 14.0) as f32)
    }
}

fn non_blank_line(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
