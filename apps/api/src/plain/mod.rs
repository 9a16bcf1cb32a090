//! Plain-text driver: 80-column output for pasting into application forms.
//!
//! Uses the character-count wrap, since there are no font metrics here.

use crate::models::resume::non_blank;
use crate::models::{ContactSegment, CoverLetter, ResumeData, SectionBody};
use crate::pdf::sections::date_range;
use crate::templates::{LinkDisplay, RenderOptions};
use crate::text::{sanitize, wrap_chars};

pub const LINE_WIDTH: usize = 80;
const BULLET_PREFIX: &str = "- ";

#[derive(Default)]
struct TextBuilder {
    out: String,
}

impl TextBuilder {
    fn line(&mut self, text: &str) {
        self.out.push_str(text.trim_end());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn wrapped(&mut self, text: &str) {
        for line in wrap_chars(&sanitize(text), LINE_WIDTH) {
            self.line(&line);
        }
    }

    fn bullet(&mut self, text: &str) {
        let pad = " ".repeat(BULLET_PREFIX.len());
        for (i, line) in wrap_chars(&sanitize(text), LINE_WIDTH - BULLET_PREFIX.len())
            .into_iter()
            .enumerate()
        {
            let prefix = if i == 0 { BULLET_PREFIX } else { pad.as_str() };
            self.line(&format!("{prefix}{line}"));
        }
    }

    /// Left and right parts padded apart to the full width when they fit.
    fn pair(&mut self, left: &str, right: &str) {
        let (left, right) = (sanitize(left.trim()), sanitize(right.trim()));
        if left.is_empty() && right.is_empty() {
            return;
        }
        let used = left.chars().count() + right.chars().count();
        if right.is_empty() {
            self.wrapped(&left);
        } else if used + 2 <= LINE_WIDTH {
            let gap = LINE_WIDTH - used;
            self.line(&format!("{left}{}{right}", " ".repeat(gap)));
        } else {
            self.wrapped(&format!("{left} | {right}"));
        }
    }

    fn heading(&mut self, title: &str) {
        let title = sanitize(title.trim()).to_uppercase();
        self.blank();
        self.line(&title);
        self.line(&"-".repeat(title.chars().count().min(LINE_WIDTH)));
    }

    fn contact(&mut self, segments: &[ContactSegment]) {
        let labels: Vec<&str> = segments.iter().map(|s| s.label.as_str()).collect();
        if !labels.is_empty() {
            self.wrapped(&labels.join(" | "));
        }
    }

    fn finish(self) -> Vec<u8> {
        self.out.into_bytes()
    }
}

pub fn render_resume(resume: &ResumeData, options: RenderOptions) -> Vec<u8> {
    let mut text = TextBuilder::default();
    text.wrapped(&resume.basics.name);
    text.contact(&resume.contact_segments());

    let summary = resume.basics.summary.trim();
    if !summary.is_empty() {
        text.heading("Summary");
        text.wrapped(summary);
    }

    for section in resume.ordered_sections() {
        text.heading(&section.title);
        match &section.body {
            SectionBody::Experience { items } => {
                for item in items {
                    text.pair(&item.role, &date_range(Some(&item.start_date), Some(&item.end_date)));
                    text.pair(&item.company, item.location.as_deref().unwrap_or_default());
                    non_blank(item.achievements.as_ref()).for_each(|a| text.bullet(a));
                    text.blank();
                }
            }
            SectionBody::Education { items } => {
                for item in items {
                    let dates = date_range(item.start_date.as_deref(), item.end_date.as_deref());
                    text.pair(&item.degree, &dates);
                    text.pair(&item.institution, item.location.as_deref().unwrap_or_default());
                    non_blank(item.highlights.as_ref()).for_each(|h| text.bullet(h));
                    text.blank();
                }
            }
            SectionBody::Projects { items } => {
                for item in items {
                    let links: Vec<String> = [("Link", item.link.as_deref()), ("GitHub", item.repo.as_deref())]
                        .into_iter()
                        .filter_map(|(short, raw)| {
                            let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
                            Some(match options.link_display {
                                LinkDisplay::Short => format!("{short}: {raw}"),
                                LinkDisplay::Full => raw.to_string(),
                            })
                        })
                        .collect();
                    let mut title = item.name.trim().to_string();
                    if !links.is_empty() {
                        if !title.is_empty() {
                            title.push_str(" | ");
                        }
                        title.push_str(&links.join(" | "));
                    }
                    if !title.is_empty() {
                        text.wrapped(&title);
                    }
                    non_blank(item.description.as_ref()).for_each(|d| text.bullet(d));
                    text.blank();
                }
            }
            SectionBody::Skills { items }
            | SectionBody::Languages { items }
            | SectionBody::Certifications { items } => {
                let entries: Vec<&str> = non_blank(Some(items)).collect();
                text.wrapped(&entries.join(", "));
            }
            SectionBody::Custom { content } => {
                for paragraph in non_blank(Some(content)) {
                    text.wrapped(paragraph);
                    text.blank();
                }
            }
        }
    }
    text.finish()
}

pub fn render_cover_letter(letter: &CoverLetter) -> Vec<u8> {
    let mut text = TextBuilder::default();
    let applicant = &letter.applicant;
    text.wrapped(&applicant.name);
    if let Some(title) = applicant.title.as_deref().filter(|t| !t.trim().is_empty()) {
        text.wrapped(title);
    }
    text.contact(&letter.contact_segments());
    text.blank();

    if let Some(date) = letter.content.date.as_deref().filter(|d| !d.trim().is_empty()) {
        text.wrapped(date);
        text.blank();
    }
    let recipient = letter.recipient_lines();
    if !recipient.is_empty() {
        recipient.iter().for_each(|line| text.wrapped(line));
        text.blank();
    }
    text.wrapped(&letter.salutation());
    text.blank();
    for paragraph in letter.paragraphs() {
        text.wrapped(paragraph);
        text.blank();
    }
    text.wrapped(&letter.complimentary_close());
    text.blank();
    text.wrapped(&applicant.name);

    let enclosures = letter.enclosures();
    if !enclosures.is_empty() {
        text.blank();
        text.wrapped(&format!("Enclosures: {}", enclosures.join(", ")));
    }
    text.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_resume_text_layout() {
        let resume: ResumeData = serde_json::from_value(json!({
            "basics": {
                "name": "Jane Doe", "email": "jane@example.com", "phone": "555-0100",
                "location": "", "linkedin": "", "summary": ""
            },
            "sections": [{
                "id": "exp", "title": "Experience", "type": "experience",
                "items": [{
                    "company": "Acme", "role": "Engineer", "startDate": "2020-01",
                    "endDate": "Present", "achievements": ["Shipped X"]
                }]
            }, {
                "id": "p", "title": "Projects", "type": "projects",
                "items": [{ "name": "Tool", "link": "example.com" }]
            }]
        }))
        .unwrap();
        let out = as_text(render_resume(&resume, RenderOptions::default()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Jane Doe");
        assert_eq!(lines[1], "jane@example.com | 555-0100");
        assert!(lines.contains(&"EXPERIENCE"));
        assert!(lines.contains(&"- Shipped X"));
        assert!(lines.contains(&"Tool | Link: example.com"));
        let pair = lines.iter().find(|l| l.starts_with("Engineer")).unwrap();
        assert_eq!(pair.chars().count(), LINE_WIDTH);
        assert!(pair.ends_with("2020-01 - Present"));
        assert!(out.lines().all(|l| l.chars().count() <= LINE_WIDTH));
    }

    #[test]
    fn test_long_bullets_wrap_with_hanging_indent() {
        let resume: ResumeData = serde_json::from_value(json!({
            "basics": { "name": "J", "email": "", "phone": "", "location": "", "linkedin": "", "summary": "" },
            "sections": [{
                "id": "c", "title": "Certifications", "type": "certifications",
                "items": ["word ".repeat(40)]
            }, {
                "id": "e", "title": "Experience", "type": "experience",
                "items": [{
                    "company": "Acme", "role": "Engineer", "startDate": "2020", "endDate": "2021",
                    "achievements": ["alpha ".repeat(30)]
                }]
            }]
        }))
        .unwrap();
        let out = as_text(render_resume(&resume, RenderOptions::default()));
        assert!(out.lines().all(|l| l.chars().count() <= LINE_WIDTH));
        assert!(out.lines().any(|l| l.starts_with("  alpha")));
    }

    #[test]
    fn test_cover_letter_text() {
        let letter: CoverLetter = serde_json::from_value(json!({
            "applicant": { "name": "Jane Doe", "email": "jane@example.com" },
            "content": {
                "salutation": "Dear Pat,",
                "bodyParagraphs": [{ "text": "I \u{201C}love\u{201D} Rust." }]
            },
            "attachments": [{ "name": "Resume" }]
        }))
        .unwrap();
        let out = as_text(render_cover_letter(&letter));
        assert!(out.starts_with("Jane Doe\njane@example.com\n\nDear Pat,\n\nI \"love\" Rust.\n\nSincerely,\n\nJane Doe\n"));
        assert!(out.ends_with("Enclosures: Resume\n"));
    }
}
