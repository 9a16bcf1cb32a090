//! Resume document model.
//!
//! Section shapes are a closed sum type keyed on the JSON `type` tag, so a
//! renderer is only ever handed the fields valid for its section kind.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeData {
    pub basics: Basics,
    #[serde(default)]
    pub custom: IndexMap<String, CustomField>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Basics {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub summary: String,
}

/// Free-form extra fact shown in the header (date of birth, portfolio URL, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomField {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub hidden: bool,
    /// When set, `content` is rendered as a hyperlink.
    #[serde(default)]
    pub link: bool,
    #[serde(default)]
    pub order: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub order: Option<f64>,
    #[serde(flatten)]
    pub body: SectionBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionBody {
    Education { items: Vec<EducationItem> },
    Experience { items: Vec<ExperienceItem> },
    Projects { items: Vec<ProjectItem> },
    Skills { items: Vec<String> },
    Languages { items: Vec<String> },
    Certifications { items: Vec<String> },
    Custom { content: Vec<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub highlights: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceItem {
    pub company: String,
    pub role: String,
    pub start_date: String,
    /// May be the literal "Present".
    pub end_date: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub achievements: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectItem {
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub description: Option<Vec<String>>,
}

impl SectionBody {
    /// The JSON tag for this section kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SectionBody::Education { .. } => "education",
            SectionBody::Experience { .. } => "experience",
            SectionBody::Projects { .. } => "projects",
            SectionBody::Skills { .. } => "skills",
            SectionBody::Languages { .. } => "languages",
            SectionBody::Certifications { .. } => "certifications",
            SectionBody::Custom { .. } => "custom",
        }
    }

    /// True when at least one item carries visible content.
    ///
    /// Experience and education only count non-blank bullets, so an entry list
    /// with nothing but empty achievements renders no heading at all.
    pub fn has_content(&self) -> bool {
        match self {
            SectionBody::Education { items } => items
                .iter()
                .any(|item| any_non_blank(item.highlights.as_deref().unwrap_or_default())),
            SectionBody::Experience { items } => items
                .iter()
                .any(|item| any_non_blank(item.achievements.as_deref().unwrap_or_default())),
            SectionBody::Projects { items } => items.iter().any(|item| {
                !item.name.trim().is_empty()
                    || any_non_blank(item.description.as_deref().unwrap_or_default())
            }),
            SectionBody::Skills { items }
            | SectionBody::Languages { items }
            | SectionBody::Certifications { items } => any_non_blank(items),
            SectionBody::Custom { content } => any_non_blank(content),
        }
    }
}

impl Section {
    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

impl ResumeData {
    /// Visible sections with content, in render order.
    ///
    /// Sections sort by `order`, falling back to their array position when it
    /// is absent; the sort is stable so equal keys keep document order.
    pub fn ordered_sections(&self) -> Vec<&Section> {
        let mut keyed: Vec<(f64, &Section)> = self
            .sections
            .iter()
            .enumerate()
            .map(|(index, section)| (section.order.unwrap_or(index as f64), section))
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed
            .into_iter()
            .map(|(_, section)| section)
            .filter(|section| !section.is_hidden() && section.body.has_content())
            .collect()
    }

    /// Visible custom fields with non-blank content, in render order.
    pub fn ordered_custom_fields(&self) -> Vec<&CustomField> {
        let mut keyed: Vec<(f64, &CustomField)> = self
            .custom
            .values()
            .enumerate()
            .map(|(index, field)| (field.order.unwrap_or(index as f64), field))
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        keyed
            .into_iter()
            .map(|(_, field)| field)
            .filter(|field| !field.hidden && !field.content.trim().is_empty())
            .collect()
    }
}

pub fn any_non_blank(lines: &[String]) -> bool {
    lines.iter().any(|line| !line.trim().is_empty())
}

/// Iterator over the non-blank entries of an optional bullet list.
pub fn non_blank(lines: Option<&Vec<String>>) -> impl Iterator<Item = &str> {
    lines
        .into_iter()
        .flatten()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
}
