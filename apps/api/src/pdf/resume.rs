use crate::errors::ExportError;
use crate::models::{ContactSegment, ResumeData};
use crate::pdf::canvas::{PdfCanvas, RenderedPdf};
use crate::pdf::sections::{render_section, LayoutContext};
use crate::templates::{HeaderStyle, RenderOptions, Rgb, Theme};

const BANNER_PADDING: f32 = 12.0;

/// Renders a resume with `theme`. Bytes are produced only after every
/// section has been laid out.
pub fn render_resume(
    resume: &ResumeData,
    theme: &Theme,
    options: RenderOptions,
) -> Result<RenderedPdf, ExportError> {
    let mut canvas = PdfCanvas::for_theme(theme);
    {
        let mut ctx = LayoutContext::new(&mut canvas, theme, options);
        masthead(&mut ctx, &resume.basics.name, None, &resume.contact_segments());

        let summary = resume.basics.summary.trim();
        if !summary.is_empty() {
            ctx.heading("Summary");
            let style = theme.section;
            let (left, width) = (
                ctx.canvas.geometry().left(),
                ctx.canvas.geometry().content_width(),
            );
            ctx.paragraph(
                summary,
                left,
                width,
                theme.family.regular(),
                style.body_size,
                style.body_color,
            );
        }

        for section in resume.ordered_sections() {
            render_section(&mut ctx, section);
        }
    }
    canvas.finish(&document_title(&resume.basics.name, "Resume"))
}

pub(crate) fn document_title(name: &str, kind: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        kind.to_string()
    } else {
        format!("{name} - {kind}")
    }
}

/// Name, optional subtitle and contact row in the theme's header style.
/// Shared by resumes and cover letters.
pub(crate) fn masthead(
    ctx: &mut LayoutContext<'_>,
    name: &str,
    subtitle: Option<&str>,
    segments: &[ContactSegment],
) {
    let theme = *ctx.theme;
    let bold = theme.family.bold();
    let regular = theme.family.regular();
    let name_leading = Theme::leading(theme.name_size);
    let body_color = theme.section.body_color;
    let subtitle = subtitle.map(str::trim).filter(|s| !s.is_empty());
    let geometry = *ctx.canvas.geometry();

    match theme.header {
        HeaderStyle::Banner => {
            let mut band = theme.margin + name_leading + BANNER_PADDING;
            if subtitle.is_some() {
                band += Theme::leading(theme.contact_size);
            }
            ctx.canvas.fill_rect(
                0.0,
                geometry.height - band,
                geometry.width,
                band,
                theme.accent,
            );
            ctx.line(name.trim(), geometry.left(), bold, theme.name_size, theme.name_color);
            if let Some(subtitle) = subtitle {
                ctx.line(subtitle, geometry.left(), regular, theme.contact_size, Rgb::WHITE);
            }
            ctx.gap(BANNER_PADDING + 6.0);
            ctx.contact_row(segments, false, theme.contact_size, body_color);
        }
        HeaderStyle::Left => {
            ctx.line(name.trim(), geometry.left(), bold, theme.name_size, theme.name_color);
            if let Some(subtitle) = subtitle {
                ctx.line(subtitle, geometry.left(), regular, theme.contact_size + 1.0, theme.accent);
            }
            ctx.contact_row(segments, false, theme.contact_size, body_color);
        }
        HeaderStyle::Centered | HeaderStyle::CenteredCaps => {
            let caps = theme.header == HeaderStyle::CenteredCaps;
            let shown = if caps {
                name.trim().to_uppercase()
            } else {
                name.trim().to_string()
            };
            if caps {
                let y = ctx.canvas.y();
                ctx.canvas
                    .draw_rule(geometry.left(), geometry.right(), y, 0.5, theme.accent);
                ctx.gap(6.0);
            }
            centered_line(ctx, &shown, bold, theme.name_size, theme.name_color);
            if let Some(subtitle) = subtitle {
                centered_line(ctx, subtitle, regular, theme.contact_size + 1.0, body_color);
            }
            ctx.contact_row(segments, true, theme.contact_size, body_color);
            if caps {
                ctx.gap(2.0);
                let y = ctx.canvas.y();
                ctx.canvas
                    .draw_rule(geometry.left(), geometry.right(), y, 0.5, theme.accent);
            }
        }
    }
    ctx.gap(4.0);
}

fn centered_line(
    ctx: &mut LayoutContext<'_>,
    text: &str,
    font: crate::text::StandardFont,
    size: f32,
    color: Rgb,
) {
    let width = ctx.canvas.geometry().content_width();
    for line in ctx.canvas.wrap(text, width, font, size) {
        let leading = Theme::leading(size);
        ctx.canvas.ensure_space(leading);
        let baseline = ctx.canvas.y() - size;
        ctx.canvas.draw_text_centered(&line, baseline, font, size, color);
        ctx.canvas.advance(leading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::canvas::test_support::{link_uris, page_count, shown_strings};
    use crate::templates::TemplateId;
    use serde_json::json;

    fn resume(value: serde_json::Value) -> ResumeData {
        serde_json::from_value(value).unwrap()
    }

    fn jane() -> ResumeData {
        resume(json!({
            "basics": {
                "name": "Jane Doe", "email": "jane@example.com", "phone": "555-0100",
                "location": "Springfield", "linkedin": "linkedin.com/in/jane", "summary": ""
            },
            "custom": {},
            "sections": [{
                "id": "exp", "title": "Experience", "type": "experience",
                "items": [{
                    "company": "Acme", "role": "Engineer",
                    "startDate": "2020-01", "endDate": "Present",
                    "achievements": ["Shipped X"]
                }]
            }]
        }))
    }

    #[test]
    fn test_minimal_resume_is_one_page() {
        let pdf = render_resume(&jane(), &TemplateId::Classic.theme(), RenderOptions::default())
            .unwrap();
        assert_eq!(pdf.page_count, 1);
        assert_eq!(page_count(&pdf.bytes), 1);
        let shown = shown_strings(&pdf.bytes).join("\n");
        for expected in ["Jane Doe", "Acme", "Engineer", "Shipped X"] {
            assert!(shown.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn test_contact_links_are_clickable() {
        let pdf = render_resume(&jane(), &TemplateId::Modern.theme(), RenderOptions::default())
            .unwrap();
        assert_eq!(
            link_uris(&pdf.bytes),
            vec!["mailto:jane@example.com", "https://linkedin.com/in/jane"]
        );
    }

    #[test]
    fn test_empty_sections_are_suppressed() {
        let mut data = jane();
        data.sections = resume(json!({
            "basics": data.basics,
            "sections": [
                {
                    "id": "e", "title": "Education", "type": "education",
                    "items": [{ "institution": "State U", "degree": "BSc", "highlights": ["  ", ""] }]
                },
                { "id": "s", "title": "Skills", "type": "skills", "items": ["Rust"], "hidden": true }
            ]
        }))
        .sections;
        let pdf = render_resume(&data, &TemplateId::Modern.theme(), RenderOptions::default())
            .unwrap();
        let shown = shown_strings(&pdf.bytes);
        assert!(!shown.iter().any(|s| s == "Education" || s == "State U" || s == "Skills"));
        assert!(shown.iter().any(|s| s == "Jane Doe"));
    }

    #[test]
    fn test_summary_and_custom_fields() {
        let data = resume(json!({
            "basics": {
                "name": "Jane Doe", "email": "", "phone": "", "location": "",
                "linkedin": "", "summary": "Builder of \u{201C}things\u{201D}."
            },
            "custom": {
                "site": { "id": "site", "title": "Site", "content": "jane.dev", "link": true },
                "dob": { "id": "dob", "title": "DOB", "content": "1990", "hidden": true }
            },
            "sections": []
        }));
        let pdf = render_resume(&data, &TemplateId::Elegant.theme(), RenderOptions::default())
            .unwrap();
        let shown = shown_strings(&pdf.bytes);
        assert!(shown.contains(&"JANE DOE".to_string()));
        assert!(shown.contains(&"Builder of \"things\".".to_string()));
        assert!(!shown.contains(&"1990".to_string()));
        assert_eq!(link_uris(&pdf.bytes), vec!["https://jane.dev"]);
    }

    #[test]
    fn test_long_resume_spills_onto_more_pages() {
        let bullets: Vec<String> = (0..120).map(|i| format!("Achievement number {i}")).collect();
        let mut data = jane();
        data.sections = resume(json!({
            "basics": data.basics,
            "sections": [{
                "id": "exp", "title": "Experience", "type": "experience",
                "items": [{
                    "company": "Acme", "role": "Engineer", "startDate": "2020",
                    "endDate": "2024", "achievements": bullets
                }]
            }]
        }))
        .sections;
        let pdf = render_resume(&data, &TemplateId::Compact.theme(), RenderOptions::default())
            .unwrap();
        assert!(pdf.page_count >= 2);
        assert_eq!(page_count(&pdf.bytes), pdf.page_count);
        // No running header on continuation pages.
        let shown = shown_strings(&pdf.bytes);
        assert_eq!(shown.iter().filter(|s| s.as_str() == "Jane Doe").count(), 1);
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title(" Jane Doe ", "Resume"), "Jane Doe - Resume");
        assert_eq!(document_title("", "Cover Letter"), "Cover Letter");
    }
}
