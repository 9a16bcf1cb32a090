//! WordprocessingML body model and its XML writer.
//!
//! The body is a flat list of paragraphs made of runs, tabs and external
//! hyperlinks. Every run's text passes through the sanitizer when the run is
//! built, so the XML never carries control characters.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::templates::Rgb;
use crate::text::{sanitize, FontFamily};

/// Right tab stop for two-part header rows: the full text width of a Letter
/// page with one-inch margins, in twentieths of a point.
pub const RIGHT_TAB_TWIPS: u32 = 9360;
pub const PAGE_WIDTH_TWIPS: u32 = 12240;
pub const PAGE_HEIGHT_TWIPS: u32 = 15840;
pub const MARGIN_TWIPS: u32 = 1440;

pub const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Points to twentieths of a point.
pub fn twips(points: f32) -> u32 {
    (points.max(0.0) * 20.0).round() as u32
}

/// Points to the half-point units used by `w:sz`.
pub fn half_points(points: f32) -> u32 {
    (points.max(1.0) * 2.0).round() as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub size: f32,
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
    pub caps: bool,
    pub underline: bool,
}

impl Run {
    /// A run of user text; sanitized here.
    pub fn new(text: &str, size: f32, color: Rgb) -> Self {
        Self::raw(sanitize(text), size, color)
    }

    /// A run of fixed text that bypasses the sanitizer (the bullet glyph).
    pub fn raw(text: impl Into<String>, size: f32, color: Rgb) -> Self {
        Self {
            text: text.into(),
            size,
            color,
            bold: false,
            italic: false,
            caps: false,
            underline: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn caps(mut self) -> Self {
        self.caps = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Run(Run),
    Tab,
    Hyperlink { rel_id: String, run: Run },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub inlines: Vec<Inline>,
    pub align: Align,
    /// Spacing before and after, in points.
    pub before: f32,
    pub after: f32,
    /// Left indent and hanging indent, in points.
    pub indent: Option<(f32, f32)>,
    pub right_tab: bool,
    pub bottom_border: Option<Rgb>,
    pub shading: Option<Rgb>,
    pub keep_next: bool,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(mut self, run: Run) -> Self {
        self.inlines.push(Inline::Run(run));
        self
    }

    pub fn tab(mut self) -> Self {
        self.inlines.push(Inline::Tab);
        self
    }

    pub fn push(&mut self, inline: Inline) {
        self.inlines.push(inline);
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn spacing(mut self, before: f32, after: f32) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    pub fn indent(mut self, left: f32, hanging: f32) -> Self {
        self.indent = Some((left, hanging));
        self
    }

    pub fn with_right_tab(mut self) -> Self {
        self.right_tab = true;
        self
    }

    pub fn bottom_border(mut self, color: Rgb) -> Self {
        self.bottom_border = Some(color);
        self
    }

    pub fn shading(mut self, fill: Rgb) -> Self {
        self.shading = Some(fill);
        self
    }

    pub fn keep_next(mut self) -> Self {
        self.keep_next = true;
        self
    }
}

#[cfg(test)]
impl Paragraph {
    pub fn link(mut self, rel_id: String, run: Run) -> Self {
        self.inlines.push(Inline::Hyperlink { rel_id, run });
        self
    }

    /// Visible text, with tabs as `\t`.
    pub fn text(&self) -> String {
        self.inlines
            .iter()
            .map(|inline| match inline {
                Inline::Run(run) | Inline::Hyperlink { run, .. } => run.text.as_str(),
                Inline::Tab => "\t",
            })
            .collect()
    }
}

/// Paragraphs plus the external link targets they reference.
#[derive(Debug, Default)]
pub struct DocxBody {
    pub paragraphs: Vec<Paragraph>,
    pub links: Vec<String>,
}

impl DocxBody {
    /// Relationship id reserved for `styles.xml`.
    pub const STYLES_REL_ID: &'static str = "rId1";

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Registers an external hyperlink target and returns its relationship id.
    pub fn hyperlink(&mut self, url: String) -> String {
        self.links.push(url);
        format!("rId{}", self.links.len() + 1)
    }
}

/// Serializes `word/document.xml`.
pub fn write_document(body: &DocxBody, family: FontFamily) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut root = BytesStart::new("w:document");
    root.push_attribute(("xmlns:w", NS_MAIN));
    root.push_attribute(("xmlns:r", NS_REL));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for paragraph in &body.paragraphs {
        write_paragraph(&mut writer, paragraph, family)?;
    }
    write_section_properties(&mut writer)?;

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner())
}

fn write_paragraph(
    writer: &mut Writer<Vec<u8>>,
    paragraph: &Paragraph,
    family: FontFamily,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    writer.write_event(Event::Start(BytesStart::new("w:pPr")))?;

    if paragraph.keep_next {
        writer.write_event(Event::Empty(BytesStart::new("w:keepNext")))?;
    }
    if let Some(color) = paragraph.bottom_border {
        writer.write_event(Event::Start(BytesStart::new("w:pBdr")))?;
        let hex = color.hex();
        writer.write_event(Event::Empty(BytesStart::new("w:bottom").with_attributes([
            ("w:val", "single"),
            ("w:sz", "6"),
            ("w:space", "1"),
            ("w:color", hex.as_str()),
        ])))?;
        writer.write_event(Event::End(BytesEnd::new("w:pBdr")))?;
    }
    if let Some(fill) = paragraph.shading {
        let hex = fill.hex();
        writer.write_event(Event::Empty(BytesStart::new("w:shd").with_attributes([
            ("w:val", "clear"),
            ("w:color", "auto"),
            ("w:fill", hex.as_str()),
        ])))?;
    }
    if paragraph.right_tab {
        let pos = RIGHT_TAB_TWIPS.to_string();
        writer.write_event(Event::Start(BytesStart::new("w:tabs")))?;
        writer.write_event(Event::Empty(
            BytesStart::new("w:tab").with_attributes([("w:val", "right"), ("w:pos", pos.as_str())]),
        ))?;
        writer.write_event(Event::End(BytesEnd::new("w:tabs")))?;
    }
    let (before, after) = (twips(paragraph.before).to_string(), twips(paragraph.after).to_string());
    writer.write_event(Event::Empty(BytesStart::new("w:spacing").with_attributes([
        ("w:before", before.as_str()),
        ("w:after", after.as_str()),
    ])))?;
    if let Some((left, hanging)) = paragraph.indent {
        let (left, hanging) = (twips(left).to_string(), twips(hanging).to_string());
        writer.write_event(Event::Empty(BytesStart::new("w:ind").with_attributes([
            ("w:left", left.as_str()),
            ("w:hanging", hanging.as_str()),
        ])))?;
    }
    if paragraph.align == Align::Center {
        writer.write_event(Event::Empty(
            BytesStart::new("w:jc").with_attributes([("w:val", "center")]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:pPr")))?;

    for inline in &paragraph.inlines {
        match inline {
            Inline::Run(run) => write_run(writer, run, family)?,
            Inline::Tab => {
                writer.write_event(Event::Start(BytesStart::new("w:r")))?;
                writer.write_event(Event::Empty(BytesStart::new("w:tab")))?;
                writer.write_event(Event::End(BytesEnd::new("w:r")))?;
            }
            Inline::Hyperlink { rel_id, run } => {
                writer.write_event(Event::Start(
                    BytesStart::new("w:hyperlink")
                        .with_attributes([("r:id", rel_id.as_str()), ("w:history", "1")]),
                ))?;
                write_run(writer, run, family)?;
                writer.write_event(Event::End(BytesEnd::new("w:hyperlink")))?;
            }
        }
    }

    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_run(writer: &mut Writer<Vec<u8>>, run: &Run, family: FontFamily) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new("w:r")))?;
    writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
    let font = family.office_name();
    writer.write_event(Event::Empty(
        BytesStart::new("w:rFonts").with_attributes([("w:ascii", font), ("w:hAnsi", font)]),
    ))?;
    if run.bold {
        writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
    }
    if run.italic {
        writer.write_event(Event::Empty(BytesStart::new("w:i")))?;
    }
    if run.caps {
        writer.write_event(Event::Empty(BytesStart::new("w:caps")))?;
    }
    let color = run.color.hex();
    writer.write_event(Event::Empty(
        BytesStart::new("w:color").with_attributes([("w:val", color.as_str())]),
    ))?;
    let size = half_points(run.size).to_string();
    writer.write_event(Event::Empty(
        BytesStart::new("w:sz").with_attributes([("w:val", size.as_str())]),
    ))?;
    if run.underline {
        writer.write_event(Event::Empty(
            BytesStart::new("w:u").with_attributes([("w:val", "single")]),
        ))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;

    writer.write_event(Event::Start(
        BytesStart::new("w:t").with_attributes([("xml:space", "preserve")]),
    ))?;
    writer.write_event(Event::Text(BytesText::new(&run.text)))?;
    writer.write_event(Event::End(BytesEnd::new("w:t")))?;
    writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

/// Single section: US Letter with fixed one-inch margins.
fn write_section_properties(writer: &mut Writer<Vec<u8>>) -> Result<(), quick_xml::Error> {
    let (width, height, margin) = (
        PAGE_WIDTH_TWIPS.to_string(),
        PAGE_HEIGHT_TWIPS.to_string(),
        MARGIN_TWIPS.to_string(),
    );
    writer.write_event(Event::Start(BytesStart::new("w:sectPr")))?;
    writer.write_event(Event::Empty(
        BytesStart::new("w:pgSz").with_attributes([("w:w", width.as_str()), ("w:h", height.as_str())]),
    ))?;
    writer.write_event(Event::Empty(BytesStart::new("w:pgMar").with_attributes([
        ("w:top", margin.as_str()),
        ("w:right", margin.as_str()),
        ("w:bottom", margin.as_str()),
        ("w:left", margin.as_str()),
        ("w:header", "720"),
        ("w:footer", "720"),
        ("w:gutter", "0"),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("w:sectPr")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xml(body: &DocxBody) -> String {
        String::from_utf8(write_document(body, FontFamily::Times).unwrap()).unwrap()
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(twips(72.0), 1440);
        assert_eq!(half_points(10.5), 21);
        assert_eq!(half_points(0.0), 2);
    }

    #[test]
    fn test_run_text_is_sanitized_and_escaped() {
        let mut body = DocxBody::default();
        body.push(Paragraph::new().run(Run::new("R&D \u{2014} <lead>\u{0007}", 11.0, Rgb::BLACK)));
        let xml = xml(&body);
        assert!(xml.contains("R&amp;D - &lt;lead&gt;</w:t>"), "{xml}");
        assert!(xml.contains("Times New Roman"));
    }

    #[test]
    fn test_header_row_has_right_tab() {
        let mut body = DocxBody::default();
        body.push(
            Paragraph::new()
                .with_right_tab()
                .run(Run::new("Engineer", 11.0, Rgb::BLACK).bold())
                .tab()
                .run(Run::new("2020 - 2024", 11.0, Rgb::BLACK)),
        );
        assert_eq!(body.paragraphs[0].text(), "Engineer\t2020 - 2024");
        let xml = xml(&body);
        assert!(xml.contains(r#"<w:tab w:val="right" w:pos="9360"/>"#));
        assert!(xml.contains("<w:r><w:tab/></w:r>"));
    }

    #[test]
    fn test_section_uses_one_inch_margins() {
        let xml = xml(&DocxBody::default());
        assert!(xml.contains(r#"<w:pgSz w:w="12240" w:h="15840"/>"#));
        assert!(xml.contains(r#"w:top="1440" w:right="1440" w:bottom="1440" w:left="1440""#));
    }

    #[test]
    fn test_hyperlink_ids_skip_styles() {
        let mut body = DocxBody::default();
        let first = body.hyperlink("https://a.example".into());
        let second = body.hyperlink("https://b.example".into());
        assert_eq!((first.as_str(), second.as_str()), ("rId2", "rId3"));
        body.push(Paragraph::new().link(first, Run::new("a", 10.0, Rgb::BLACK).underline()));
        assert!(xml(&body).contains(r#"<w:hyperlink r:id="rId2" w:history="1">"#));
    }

    #[test]
    fn test_heading_border_and_keep_next() {
        let mut body = DocxBody::default();
        body.push(Paragraph::new().keep_next().bottom_border(Rgb(37, 99, 235)));
        let xml = xml(&body);
        assert!(xml.contains("<w:keepNext/>"));
        assert!(xml.contains(r#"w:color="2563EB""#));
    }
}
