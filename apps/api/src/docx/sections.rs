//! Paragraph builders for the DOCX path.
//!
//! Same reading order and section policy as the PDF renderers. Line breaking
//! and pagination are left to the word processor.

use crate::docx::markup::{DocxBody, Inline, Paragraph, Run};
use crate::models::resume::{non_blank, EducationItem, ExperienceItem, ProjectItem};
use crate::models::{ContactSegment, Section, SectionBody};
use crate::pdf::links::normalize_url;
use crate::pdf::sections::date_range;
use crate::templates::{HeaderStyle, LinkDisplay, RenderOptions, Rgb, Theme};

const DIVIDER: &str = "  |  ";
const BULLET: &str = "\u{2022}";

pub struct DocxContext<'a> {
    pub body: DocxBody,
    pub theme: &'a Theme,
    pub options: RenderOptions,
}

impl<'a> DocxContext<'a> {
    pub fn new(theme: &'a Theme, options: RenderOptions) -> Self {
        Self {
            body: DocxBody::default(),
            theme,
            options,
        }
    }

    fn body_run(&self, text: &str) -> Run {
        let style = &self.theme.section;
        Run::new(text, style.body_size, style.body_color)
    }

    fn date_run(&self, text: &str) -> Run {
        let run = self.body_run(text);
        if self.theme.section.italic_dates {
            run.italic()
        } else {
            run
        }
    }

    fn link_run(&self, label: &str, size: f32) -> Run {
        Run::new(label, size, self.theme.section.link_color).underline()
    }

    /// Adds an external hyperlink inline, or plain text when the URL is blank.
    fn push_link(&mut self, paragraph: &mut Paragraph, label: &str, raw_url: &str, size: f32, fallback: Rgb) {
        match normalize_url(raw_url) {
            Some(url) => {
                let rel_id = self.body.hyperlink(url);
                let run = self.link_run(label, size);
                paragraph.push(Inline::Hyperlink { rel_id, run });
            }
            None => paragraph.push(Inline::Run(Run::new(label, size, fallback))),
        }
    }

    pub fn paragraph(&mut self, text: &str, size: f32, color: Rgb, after: f32) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.body
            .push(Paragraph::new().spacing(0.0, after).run(Run::new(text, size, color)));
    }

    /// Name, optional subtitle and contact row.
    pub fn masthead(&mut self, name: &str, subtitle: Option<&str>, segments: &[ContactSegment]) {
        let theme = *self.theme;
        let centered = matches!(theme.header, HeaderStyle::Centered | HeaderStyle::CenteredCaps);

        let mut name_run = Run::new(name.trim(), theme.name_size, theme.name_color).bold();
        if theme.header == HeaderStyle::CenteredCaps {
            name_run = name_run.caps();
        }
        let mut name_para = Paragraph::new().spacing(0.0, 2.0).run(name_run);
        match theme.header {
            HeaderStyle::Banner => name_para = name_para.shading(theme.accent),
            HeaderStyle::CenteredCaps => name_para = name_para.bottom_border(theme.accent),
            HeaderStyle::Centered | HeaderStyle::Left => {}
        }
        if centered {
            name_para = name_para.centered();
        }
        self.body.push(name_para);

        if let Some(subtitle) = subtitle.map(str::trim).filter(|s| !s.is_empty()) {
            let color = if theme.header == HeaderStyle::Left {
                theme.accent
            } else {
                theme.section.body_color
            };
            let mut para = Paragraph::new()
                .spacing(0.0, 2.0)
                .run(Run::new(subtitle, theme.contact_size + 1.0, color));
            if centered {
                para = para.centered();
            }
            self.body.push(para);
        }

        if !segments.is_empty() {
            let mut row = Paragraph::new().spacing(0.0, 6.0);
            if centered {
                row = row.centered();
            }
            let color = theme.section.body_color;
            for (i, segment) in segments.iter().enumerate() {
                if i > 0 {
                    row.push(Inline::Run(Run::raw(
                        DIVIDER,
                        theme.contact_size,
                        color,
                    )));
                }
                match segment.url.as_deref() {
                    Some(url) => {
                        self.push_link(&mut row, &segment.label, url, theme.contact_size, color)
                    }
                    None => row.push(Inline::Run(Run::new(
                        &segment.label,
                        theme.contact_size,
                        color,
                    ))),
                }
            }
            self.body.push(row);
        }
    }

    pub fn heading(&mut self, title: &str) {
        let style = self.theme.section;
        let mut run = Run::new(title.trim(), style.title_size, style.title_color).bold();
        if style.heading_caps {
            run = run.caps();
        }
        let mut para = Paragraph::new()
            .keep_next()
            .spacing(self.theme.section_gap, 3.0)
            .run(run);
        if let Some(color) = style.heading_rule {
            para = para.bottom_border(color);
        }
        self.body.push(para);
    }

    /// Left label, right tab, right label. Skipped when both are blank.
    pub fn header_pair(&mut self, primary: Run, secondary: Run) {
        let primary_blank = primary.text.trim().is_empty();
        let secondary_blank = secondary.text.trim().is_empty();
        if primary_blank && secondary_blank {
            return;
        }
        let mut para = Paragraph::new().keep_next().with_right_tab();
        if !primary_blank {
            para = para.run(primary);
        }
        if !secondary_blank {
            para = para.tab().run(secondary);
        }
        self.body.push(para);
    }

    pub fn bullets<'b>(&mut self, entries: impl IntoIterator<Item = &'b str>) {
        let style = self.theme.section;
        for entry in entries {
            self.body.push(
                Paragraph::new()
                    .indent(style.bullet_indent + 4.0, style.bullet_indent)
                    .run(Run::raw(BULLET, style.body_size, style.body_color))
                    .tab()
                    .run(Run::new(entry, style.body_size, style.body_color)),
            );
        }
    }

    fn item_gap(&mut self) {
        if let Some(last) = self.body.paragraphs.last_mut() {
            last.after = last.after.max(self.theme.section.item_spacing);
        }
    }
}

pub fn render_section(ctx: &mut DocxContext<'_>, section: &Section) {
    ctx.heading(&section.title);
    match &section.body {
        SectionBody::Experience { items } => experience(ctx, items),
        SectionBody::Education { items } => education(ctx, items),
        SectionBody::Projects { items } => projects(ctx, items),
        SectionBody::Skills { items }
        | SectionBody::Languages { items }
        | SectionBody::Certifications { items } => list(ctx, items),
        SectionBody::Custom { content } => custom(ctx, content),
    }
}

fn experience(ctx: &mut DocxContext<'_>, items: &[ExperienceItem]) {
    for item in items {
        let dates = date_range(Some(&item.start_date), Some(&item.end_date));
        ctx.header_pair(ctx.body_run(&item.role).bold(), ctx.date_run(&dates));
        ctx.header_pair(
            ctx.body_run(&item.company),
            ctx.date_run(item.location.as_deref().unwrap_or_default()),
        );
        ctx.bullets(non_blank(item.achievements.as_ref()));
        ctx.item_gap();
    }
}

fn education(ctx: &mut DocxContext<'_>, items: &[EducationItem]) {
    for item in items {
        let dates = date_range(item.start_date.as_deref(), item.end_date.as_deref());
        ctx.header_pair(ctx.body_run(&item.degree).bold(), ctx.date_run(&dates));
        ctx.header_pair(
            ctx.body_run(&item.institution),
            ctx.date_run(item.location.as_deref().unwrap_or_default()),
        );
        ctx.bullets(non_blank(item.highlights.as_ref()));
        ctx.item_gap();
    }
}

fn list(ctx: &mut DocxContext<'_>, items: &[String]) {
    let style = ctx.theme.section;
    let entries: Vec<&str> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .collect();
    if style.inline_lists {
        ctx.paragraph(&entries.join(", "), style.body_size, style.body_color, 0.0);
    } else {
        for entry in entries {
            ctx.paragraph(entry, style.body_size, style.body_color, 0.0);
        }
    }
    ctx.item_gap();
}

fn projects(ctx: &mut DocxContext<'_>, items: &[ProjectItem]) {
    let style = ctx.theme.section;
    for item in items {
        let name = item.name.trim();
        let links: Vec<(String, &str)> = [("Link", item.link.as_deref()), ("GitHub", item.repo.as_deref())]
            .into_iter()
            .filter_map(|(short, raw)| {
                let raw = raw.filter(|r| !r.trim().is_empty())?;
                let label = match ctx.options.link_display {
                    LinkDisplay::Short => short.to_string(),
                    LinkDisplay::Full => raw.trim().to_string(),
                };
                Some((label, raw))
            })
            .collect();
        let has_description = non_blank(item.description.as_ref()).next().is_some();
        if name.is_empty() && !has_description {
            continue;
        }

        if !name.is_empty() || !links.is_empty() {
            let mut row = Paragraph::new().keep_next();
            if !name.is_empty() {
                row = row.run(ctx.body_run(name).bold());
            }
            for (label, raw) in &links {
                row.push(Inline::Run(Run::raw(
                    "  ",
                    style.link_size,
                    style.body_color,
                )));
                ctx.push_link(&mut row, label, raw, style.link_size, style.body_color);
            }
            ctx.body.push(row);
        }
        ctx.bullets(non_blank(item.description.as_ref()));
        ctx.item_gap();
    }
}

fn custom(ctx: &mut DocxContext<'_>, content: &[String]) {
    let style = ctx.theme.section;
    for text in content {
        ctx.paragraph(text, style.body_size, style.body_color, style.item_spacing / 2.0);
    }
}
