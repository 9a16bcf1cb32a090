//! DOCX template drivers.
//!
//! Emits ordered paragraphs and runs inside a single Letter-sized section.
//! There is no pagination here; the word processor reflows the text.

pub mod markup;
pub mod package;
pub mod sections;

use crate::errors::ExportError;
use crate::models::{CoverLetter, ResumeData};
use crate::pdf::resume::document_title;
use crate::templates::{RenderOptions, Theme};

use markup::{Paragraph, Run};
use sections::{render_section, DocxContext};

/// Blank paragraphs left for a handwritten signature.
const SIGNATURE_LINES: usize = 3;

pub fn render_resume(
    resume: &ResumeData,
    theme: &Theme,
    options: RenderOptions,
) -> Result<Vec<u8>, ExportError> {
    let mut ctx = DocxContext::new(theme, options);
    ctx.masthead(&resume.basics.name, None, &resume.contact_segments());

    let summary = resume.basics.summary.trim();
    if !summary.is_empty() {
        ctx.heading("Summary");
        let style = theme.section;
        ctx.paragraph(summary, style.body_size, style.body_color, 0.0);
    }
    for section in resume.ordered_sections() {
        render_section(&mut ctx, section);
    }

    let title = document_title(&resume.basics.name, "Resume");
    package::package(&ctx.body, theme.family, theme.section.body_size, &title)
}

pub fn render_cover_letter(
    letter: &CoverLetter,
    theme: &Theme,
    options: RenderOptions,
) -> Result<Vec<u8>, ExportError> {
    let size = letter.requested_font_size().unwrap_or(theme.letter_size);
    let color = theme.section.body_color;
    let gap = theme.paragraph_gap;

    let mut ctx = DocxContext::new(theme, options);
    let applicant = &letter.applicant;
    ctx.masthead(&applicant.name, applicant.title.as_deref(), &letter.contact_segments());

    if let Some(date) = letter.content.date.as_deref() {
        ctx.paragraph(date, size, color, gap);
    }
    let recipient = letter.recipient_lines();
    let last = recipient.len().saturating_sub(1);
    for (i, line) in recipient.iter().enumerate() {
        ctx.paragraph(line, size, color, if i == last { gap } else { 0.0 });
    }
    ctx.paragraph(&letter.salutation(), size, color, gap);
    for paragraph in letter.paragraphs() {
        ctx.paragraph(paragraph, size, color, gap);
    }

    ctx.body.push(
        Paragraph::new()
            .keep_next()
            .spacing(0.0, size * 1.3 * SIGNATURE_LINES as f32)
            .run(Run::new(&letter.complimentary_close(), size, color)),
    );
    ctx.body
        .push(Paragraph::new().run(Run::new(applicant.name.trim(), size, color).bold()));

    let enclosures = letter.enclosures();
    if !enclosures.is_empty() {
        ctx.body.push(
            Paragraph::new()
                .spacing(gap, 0.0)
                .run(Run::new(&format!("Enclosures: {}", enclosures.join(", ")), size, color)),
        );
    }

    let title = document_title(&applicant.name, "Cover Letter");
    package::package(&ctx.body, theme.family, size, &title)
}

#[cfg(test)]
mod tests {
    use super::package::test_support::{assert_well_formed, part, part_names};
    use super::*;
    use crate::models::{Document, DocumentKind};
    use crate::templates::{LinkDisplay, TemplateId};
    use crate::validation::parse_document;
    use serde_json::{json, Value};

    fn resume() -> ResumeData {
        serde_json::from_value(resume_value()).unwrap()
    }

    fn resume_value() -> Value {
        json!({
            "basics": {
                "name": "Jane Doe", "email": "jane@example.com", "phone": "555-0100",
                "location": "", "linkedin": "", "summary": "Systems engineer."
            },
            "sections": [
                {
                    "id": "exp", "title": "Experience", "type": "experience",
                    "items": [{
                        "company": "Acme", "role": "Engineer", "startDate": "2020-01",
                        "endDate": "Present", "achievements": ["Shipped X \u{2013} fast"]
                    }]
                },
                {
                    "id": "p", "title": "Projects", "type": "projects",
                    "items": [{ "name": "Tool", "link": "example.com", "description": ["Did a thing"] }]
                },
                {
                    "id": "edu", "title": "Education", "type": "education",
                    "items": [{ "institution": "State U", "degree": "BSc", "highlights": [" "] }]
                }
            ]
        })
    }

    #[test]
    fn test_resume_document_content() {
        let bytes =
            render_resume(&resume(), &TemplateId::Modern.theme(), RenderOptions::default()).unwrap();
        let xml = part(&bytes, "word/document.xml");
        for expected in ["Jane Doe", "Systems engineer.", "Engineer", "2020-01 - Present", "Shipped X - fast"] {
            assert!(xml.contains(expected), "missing {expected}");
        }
        assert!(!xml.contains("State U"), "empty education section rendered");
        assert!(xml.contains(r#"w:pos="9360""#));
        assert!(xml.contains("<w:pgMar"));
    }

    #[test]
    fn test_resume_links_become_relationships() {
        let bytes =
            render_resume(&resume(), &TemplateId::Classic.theme(), RenderOptions::default()).unwrap();
        let rels = part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="mailto:jane@example.com""#));
        assert!(rels.contains(r#"Target="https://example.com""#));
        let xml = part(&bytes, "word/document.xml");
        assert!(xml.contains(">Link</w:t>"));
    }

    #[test]
    fn test_control_characters_never_reach_relationships() {
        let mut value = resume_value();
        value["basics"]["linkedin"] = json!("linkedin.com/in/ja\u{0001}ne");
        value["sections"][1]["items"][0]["repo"] = json!("github.com/jane/\u{0002}tool");
        value["custom"] = json!({
            "c1": { "id": "c1", "title": "Site", "content": "\u{0003}\u{0004}", "hidden": false, "link": true }
        });
        let Document::Resume(resume) = parse_document(DocumentKind::Resume, value).unwrap() else {
            panic!("expected a resume");
        };

        let bytes =
            render_resume(&resume, &TemplateId::Classic.theme(), RenderOptions::default()).unwrap();
        assert_well_formed(&bytes);
        let rels = part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Target="https://linkedin.com/in/jane""#));
        assert!(rels.contains(r#"Target="https://github.com/jane/tool""#));
        // mailto, linkedin, project link and repo; the blank custom link is omitted.
        assert_eq!(rels.matches("TargetMode=\"External\"").count(), 4);
    }

    #[test]
    fn test_full_link_display() {
        let options = RenderOptions {
            link_display: LinkDisplay::Full,
        };
        let bytes = render_resume(&resume(), &TemplateId::Compact.theme(), options).unwrap();
        assert!(part(&bytes, "word/document.xml").contains(">example.com</w:t>"));
    }

    #[test]
    fn test_cover_letter_every_template() {
        let letter: CoverLetter = serde_json::from_value(json!({
            "applicant": { "name": "Jane Doe", "address": { "city": "Springfield", "state": "IL" } },
            "content": {
                "bodyParagraphs": [{ "text": "Body & soul." }],
                "complimentaryClose": "Best,"
            },
            "formatting": { "fontSize": 30 },
            "attachments": ["Resume"]
        }))
        .unwrap();
        for id in TemplateId::ALL {
            let bytes = render_cover_letter(&letter, &id.theme(), RenderOptions::default()).unwrap();
            assert_eq!(part_names(&bytes).len(), 7);
            let xml = part(&bytes, "word/document.xml");
            assert!(xml.contains("Dear Hiring Manager,"));
            assert!(xml.contains("Body &amp; soul."));
            assert!(xml.contains("Best,"));
            assert!(xml.contains("Enclosures: Resume"));
            // fontSize 30 clamps to 14pt.
            assert!(part(&bytes, "word/styles.xml").contains(r#"<w:sz w:val="28"/>"#));
        }
    }
}
