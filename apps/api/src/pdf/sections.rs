//! Section renderers for the PDF path.
//!
//! Every renderer reserves its own height through the cursor before drawing,
//! so no line is ever split across a page boundary. Renderers assume the
//! document already passed validation; optional fields are treated as empty.

use tracing::debug;

use crate::models::resume::{non_blank, EducationItem, ExperienceItem, ProjectItem};
use crate::models::{ContactSegment, Section, SectionBody};
use crate::pdf::canvas::PdfCanvas;
use crate::pdf::links::normalize_url;
use crate::templates::{LinkDisplay, RenderOptions, Rgb, SectionStyle, Theme};
use crate::text::StandardFont;

/// Horizontal gap between a primary label and its right-aligned partner.
const PAIR_GAP: f32 = 12.0;
/// Gap between a project title and its first link label.
const LINK_GAP: f32 = 8.0;
const HEADING_RULE_SPACE: f32 = 5.0;

/// Layout state shared by the section renderers: the canvas (which owns the
/// cursor and page geometry), the theme and per-call options.
pub struct LayoutContext<'a> {
    pub canvas: &'a mut PdfCanvas,
    pub theme: &'a Theme,
    pub options: RenderOptions,
}

impl<'a> LayoutContext<'a> {
    pub fn new(canvas: &'a mut PdfCanvas, theme: &'a Theme, options: RenderOptions) -> Self {
        Self {
            canvas,
            theme,
            options,
        }
    }

    fn style(&self) -> &SectionStyle {
        &self.theme.section
    }

    fn left(&self) -> f32 {
        self.canvas.geometry().left()
    }

    fn right(&self) -> f32 {
        self.canvas.geometry().right()
    }

    fn content_width(&self) -> f32 {
        self.canvas.geometry().content_width()
    }

    fn regular(&self) -> StandardFont {
        self.theme.family.regular()
    }

    fn bold(&self) -> StandardFont {
        self.theme.family.bold()
    }

    fn date_font(&self) -> StandardFont {
        if self.style().italic_dates {
            self.theme.family.italic()
        } else {
            self.regular()
        }
    }

    /// Draws one line at `x` on its own row; returns the drawn width.
    pub fn line(&mut self, text: &str, x: f32, font: StandardFont, size: f32, color: Rgb) -> f32 {
        let leading = Theme::leading(size);
        self.canvas.ensure_space(leading);
        let baseline = self.canvas.y() - size;
        let width = self.canvas.draw_text(text, x, baseline, font, size, color);
        self.canvas.advance(leading);
        width
    }

    /// Wraps `text` to `width` starting at `x` and draws it line by line.
    pub fn paragraph(
        &mut self,
        text: &str,
        x: f32,
        width: f32,
        font: StandardFont,
        size: f32,
        color: Rgb,
    ) {
        for line in self.canvas.wrap(text, width, font, size) {
            self.line(&line, x, font, size, color);
        }
    }

    pub fn gap(&mut self, dy: f32) {
        self.canvas.advance(dy);
    }

    // ── shared pieces ───────────────────────────────────────────────────────

    /// Section heading, kept on the same page as the first body line.
    pub fn heading(&mut self, title: &str) {
        let style = *self.style();
        let title_leading = Theme::leading(style.title_size);
        let rule_space = if style.heading_rule.is_some() {
            HEADING_RULE_SPACE
        } else {
            0.0
        };
        self.canvas.ensure_space(
            self.theme.section_gap + title_leading + rule_space + Theme::leading(style.body_size),
        );
        self.gap(self.theme.section_gap);

        let title = if style.heading_caps {
            title.trim().to_uppercase()
        } else {
            title.trim().to_string()
        };
        let left = self.left();
        let font = self.bold();
        self.line(&title, left, font, style.title_size, style.title_color);

        if let Some(color) = style.heading_rule {
            let y = self.canvas.y() + style.title_size * 0.15;
            let right = self.right();
            self.canvas.draw_rule(left, right, y, 0.75, color);
            self.gap(rule_space);
        }
    }

    /// Primary label on the left, secondary label right-aligned on the same
    /// row. Skipped entirely when both parts are blank.
    pub fn header_pair(
        &mut self,
        primary: &str,
        secondary: &str,
        primary_font: StandardFont,
        secondary_font: StandardFont,
    ) {
        let (primary, secondary) = (primary.trim(), secondary.trim());
        if primary.is_empty() && secondary.is_empty() {
            return;
        }
        let style = *self.style();
        let size = style.body_size;
        let leading = Theme::leading(size);
        let (left, right) = (self.left(), self.right());

        let secondary_width = self.canvas.measure(secondary, secondary_font, size);
        let primary_room = if secondary.is_empty() {
            self.content_width()
        } else {
            (self.content_width() - secondary_width - PAIR_GAP).max(self.content_width() / 3.0)
        };
        let mut lines = self.canvas.wrap(primary, primary_room, primary_font, size).into_iter();

        self.canvas.ensure_space(leading);
        let baseline = self.canvas.y() - size;
        if let Some(first) = lines.next() {
            self.canvas
                .draw_text(&first, left, baseline, primary_font, size, style.body_color);
        }
        if !secondary.is_empty() {
            self.canvas.draw_text_right(
                secondary,
                right,
                baseline,
                secondary_font,
                size,
                style.body_color,
            );
        }
        self.canvas.advance(leading);
        for rest in lines {
            self.line(&rest, left, primary_font, size, style.body_color);
        }
    }

    /// Bullet list; each entry wraps independently under a hanging indent.
    pub fn bullets<'b>(&mut self, entries: impl IntoIterator<Item = &'b str>) {
        let style = *self.style();
        let size = style.body_size;
        let leading = Theme::leading(size);
        let font = self.regular();
        let bullet_x = self.left() + style.bullet_indent * 0.3;
        let text_x = self.left() + style.bullet_indent;
        let width = self.content_width() - style.bullet_indent;

        for entry in entries {
            for (i, line) in self.canvas.wrap(entry, width, font, size).iter().enumerate() {
                self.canvas.ensure_space(leading);
                let baseline = self.canvas.y() - size;
                if i == 0 {
                    self.canvas
                        .draw_bullet(bullet_x, baseline, font, size, style.body_color);
                }
                self.canvas
                    .draw_text(line, text_x, baseline, font, size, style.body_color);
                self.canvas.advance(leading);
            }
        }
    }

    /// Contact segments separated by a divider, wrapped by whole segment.
    /// Linked segments get a hit-region over their own label.
    pub fn contact_row(&mut self, segments: &[ContactSegment], centered: bool, size: f32, color: Rgb) {
        const DIVIDER: &str = "  |  ";
        let font = self.regular();
        let link_color = self.style().link_color;
        let divider_width = self.canvas.measure(DIVIDER, font, size);
        let max_width = self.content_width();

        let mut rows: Vec<Vec<(&ContactSegment, f32)>> = Vec::new();
        let mut row_width = 0.0;
        for segment in segments {
            let width = self.canvas.measure(&segment.label, font, size);
            if width <= 0.0 {
                continue;
            }
            let fits = row_width + divider_width + width <= max_width;
            match rows.last_mut() {
                Some(row) if fits => {
                    row.push((segment, width));
                    row_width += divider_width + width;
                }
                _ => {
                    rows.push(vec![(segment, width)]);
                    row_width = width;
                }
            }
        }

        let leading = Theme::leading(size);
        for row in rows {
            let total: f32 = row.iter().map(|(_, w)| w).sum::<f32>()
                + divider_width * (row.len().saturating_sub(1)) as f32;
            let mut x = if centered {
                self.canvas.geometry().center() - total / 2.0
            } else {
                self.left()
            };
            self.canvas.ensure_space(leading);
            let baseline = self.canvas.y() - size;
            for (i, (segment, _)) in row.iter().enumerate() {
                if i > 0 {
                    x += self.canvas.draw_text(DIVIDER, x, baseline, font, size, color);
                }
                let url = segment.url.as_deref().and_then(normalize_url);
                let ink = if url.is_some() { link_color } else { color };
                let width = self
                    .canvas
                    .draw_text(&segment.label, x, baseline, font, size, ink);
                if let Some(url) = url {
                    self.canvas
                        .attach_link(x, baseline - size * 0.2, width, size, url);
                }
                x += width;
            }
            self.canvas.advance(leading);
        }
    }
}

/// Renders one resume section. Hidden or empty sections never reach here.
pub fn render_section(ctx: &mut LayoutContext<'_>, section: &Section) {
    debug!(id = %section.id, kind = section.body.kind(), "rendering section");
    ctx.heading(&section.title);
    match &section.body {
        SectionBody::Experience { items } => render_experience(ctx, items),
        SectionBody::Education { items } => render_education(ctx, items),
        SectionBody::Projects { items } => render_projects(ctx, items),
        SectionBody::Skills { items }
        | SectionBody::Languages { items }
        | SectionBody::Certifications { items } => render_list(ctx, items),
        SectionBody::Custom { content } => render_custom(ctx, content),
    }
}

/// "start - end", or whichever part is present.
pub fn date_range(start: Option<&str>, end: Option<&str>) -> String {
    [start, end]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}

fn render_experience(ctx: &mut LayoutContext<'_>, items: &[ExperienceItem]) {
    let (bold, regular, date_font) = (ctx.bold(), ctx.regular(), ctx.date_font());
    for item in items {
        let dates = date_range(Some(&item.start_date), Some(&item.end_date));
        ctx.header_pair(&item.role, &dates, bold, date_font);
        ctx.header_pair(
            &item.company,
            item.location.as_deref().unwrap_or_default(),
            regular,
            date_font,
        );
        ctx.bullets(non_blank(item.achievements.as_ref()));
        ctx.gap(ctx.style().item_spacing);
    }
}

fn render_education(ctx: &mut LayoutContext<'_>, items: &[EducationItem]) {
    let (bold, regular, date_font) = (ctx.bold(), ctx.regular(), ctx.date_font());
    for item in items {
        let dates = date_range(item.start_date.as_deref(), item.end_date.as_deref());
        ctx.header_pair(&item.degree, &dates, bold, date_font);
        ctx.header_pair(
            &item.institution,
            item.location.as_deref().unwrap_or_default(),
            regular,
            date_font,
        );
        ctx.bullets(non_blank(item.highlights.as_ref()));
        ctx.gap(ctx.style().item_spacing);
    }
}

fn render_list(ctx: &mut LayoutContext<'_>, items: &[String]) {
    let style = *ctx.style();
    let (left, width, font) = (ctx.left(), ctx.content_width(), ctx.regular());
    let entries: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    if style.inline_lists {
        ctx.paragraph(&entries.join(", "), left, width, font, style.body_size, style.body_color);
    } else {
        for entry in entries {
            ctx.paragraph(entry, left, width, font, style.body_size, style.body_color);
        }
    }
    ctx.gap(style.item_spacing / 2.0);
}

fn render_projects(ctx: &mut LayoutContext<'_>, items: &[ProjectItem]) {
    for item in items {
        let has_description = item
            .description
            .as_deref()
            .is_some_and(crate::models::resume::any_non_blank);
        if item.name.trim().is_empty() && !has_description {
            continue;
        }
        project_title_row(ctx, item);
        ctx.bullets(non_blank(item.description.as_ref()));
        ctx.gap(ctx.style().item_spacing);
    }
}

/// Title plus clickable link labels on one visual row. Labels that no longer
/// fit move to a continuation row.
fn project_title_row(ctx: &mut LayoutContext<'_>, item: &ProjectItem) {
    let style = *ctx.style();
    let (left, right) = (ctx.left(), ctx.right());
    let (bold, regular) = (ctx.bold(), ctx.regular());
    let size = style.body_size;
    let leading = Theme::leading(size.max(style.link_size));

    let links: Vec<(String, String)> = [("Link", item.link.as_deref()), ("GitHub", item.repo.as_deref())]
        .into_iter()
        .filter_map(|(short, raw)| {
            let raw = raw?;
            let url = normalize_url(raw)?;
            let label = match ctx.options.link_display {
                LinkDisplay::Short => short.to_string(),
                LinkDisplay::Full => raw.trim().to_string(),
            };
            Some((label, url))
        })
        .collect();

    let name = item.name.trim();
    if name.is_empty() && links.is_empty() {
        return;
    }
    let mut title_lines = ctx
        .canvas
        .wrap(name, ctx.content_width(), bold, size)
        .into_iter()
        .peekable();

    ctx.canvas.ensure_space(leading);
    let mut baseline = ctx.canvas.y() - size;
    let mut x = left;
    while let Some(line) = title_lines.next() {
        x = left + ctx
            .canvas
            .draw_text(&line, left, baseline, bold, size, style.body_color);
        if title_lines.peek().is_some() {
            ctx.canvas.advance(leading);
            ctx.canvas.ensure_space(leading);
            baseline = ctx.canvas.y() - size;
        }
    }

    for (label, url) in links {
        let width = ctx.canvas.measure(&label, regular, style.link_size);
        let mut start = if x > left { x + LINK_GAP } else { x };
        if start + width > right && x > left {
            ctx.canvas.advance(leading);
            ctx.canvas.ensure_space(leading);
            baseline = ctx.canvas.y() - size;
            start = left;
        }
        let drawn = ctx.canvas.draw_text(
            &label,
            start,
            baseline,
            regular,
            style.link_size,
            style.link_color,
        );
        ctx.canvas.attach_link(
            start,
            baseline - style.link_size * 0.2,
            drawn,
            style.link_size,
            url,
        );
        x = start + drawn;
    }
    ctx.canvas.advance(leading);
}

fn render_custom(ctx: &mut LayoutContext<'_>, content: &[String]) {
    let style = *ctx.style();
    let (left, width, font) = (ctx.left(), ctx.content_width(), ctx.regular());
    for text in content.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        ctx.paragraph(text, left, width, font, style.body_size, style.body_color);
        ctx.gap(style.item_spacing / 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::canvas::test_support::{link_uris, shown_strings};
    use crate::templates::TemplateId;
    use serde_json::json;

    fn section(value: serde_json::Value) -> Section {
        serde_json::from_value(value).unwrap()
    }

    fn render(template: TemplateId, options: RenderOptions, sections: &[Section]) -> Vec<u8> {
        let theme = template.theme();
        let mut canvas = PdfCanvas::for_theme(&theme);
        {
            let mut ctx = LayoutContext::new(&mut canvas, &theme, options);
            for s in sections {
                render_section(&mut ctx, s);
            }
        }
        canvas.finish("test").unwrap().bytes
    }

    #[test]
    fn test_date_range_joins_present_parts() {
        assert_eq!(date_range(Some("2020-01"), Some("Present")), "2020-01 - Present");
        assert_eq!(date_range(None, Some("2019")), "2019");
        assert_eq!(date_range(Some(" "), None), "");
    }

    #[test]
    fn test_experience_draws_pairs_and_bullets() {
        let s = section(json!({
            "id": "exp", "title": "Experience", "type": "experience",
            "items": [{
                "company": "Acme", "role": "Engineer", "startDate": "2020-01",
                "endDate": "Present", "location": "Remote",
                "achievements": ["Shipped X", "  "]
            }]
        }));
        let bytes = render(TemplateId::Modern, RenderOptions::default(), &[s]);
        let shown = shown_strings(&bytes);
        for expected in ["Experience", "Engineer", "2020-01 - Present", "Acme", "Remote", "Shipped X"] {
            assert!(shown.iter().any(|s| s == expected), "missing {expected}: {shown:?}");
        }
        // One bullet glyph for the single non-blank achievement.
        assert_eq!(shown.iter().filter(|s| s.as_str() == "\u{95}").count(), 1);
    }

    #[test]
    fn test_classic_heading_is_upper_case() {
        let s = section(json!({
            "id": "s", "title": "Skills", "type": "skills", "items": ["Rust"]
        }));
        let shown = shown_strings(&render(TemplateId::Classic, RenderOptions::default(), &[s]));
        assert_eq!(shown, vec!["SKILLS", "Rust"]);
    }

    #[test]
    fn test_compact_lists_flow_inline() {
        let s = section(json!({
            "id": "s", "title": "Skills", "type": "skills", "items": ["Rust", " ", "SQL"]
        }));
        let shown = shown_strings(&render(TemplateId::Compact, RenderOptions::default(), &[s]));
        assert_eq!(shown, vec!["SKILLS", "Rust, SQL"]);
    }

    #[test]
    fn test_project_links_short_labels() {
        let s = section(json!({
            "id": "p", "title": "Projects", "type": "projects",
            "items": [{
                "name": "Tool", "link": "example.com",
                "repo": "https://github.com/jane/tool", "description": ["Did a thing"]
            }]
        }));
        let bytes = render(TemplateId::Creative, RenderOptions::default(), &[s]);
        let shown = shown_strings(&bytes);
        assert!(shown.contains(&"Link".to_string()));
        assert!(shown.contains(&"GitHub".to_string()));
        assert_eq!(
            link_uris(&bytes),
            vec!["https://example.com", "https://github.com/jane/tool"]
        );
    }

    #[test]
    fn test_project_links_full_display_and_blank_link_omitted() {
        let s = section(json!({
            "id": "p", "title": "Projects", "type": "projects",
            "items": [{ "name": "Tool", "link": "example.com", "repo": "  " }]
        }));
        let options = RenderOptions {
            link_display: LinkDisplay::Full,
        };
        let bytes = render(TemplateId::Classic, options, &[s]);
        assert!(shown_strings(&bytes).contains(&"example.com".to_string()));
        assert_eq!(link_uris(&bytes), vec!["https://example.com"]);
    }

    #[test]
    fn test_long_custom_content_paginates() {
        let paragraph = "word ".repeat(400);
        let s = section(json!({
            "id": "c", "title": "Notes", "type": "custom",
            "content": [paragraph.clone(), paragraph.clone(), paragraph]
        }));
        let bytes = render(TemplateId::Elegant, RenderOptions::default(), &[s]);
        assert!(crate::pdf::canvas::test_support::page_count(&bytes) >= 2);
    }
}
