//! Page-oriented drawing surface over lopdf.
//!
//! Drawing calls only record content operations and pending link regions per
//! page. The PDF object graph is assembled and serialized once, in
//! [`PdfCanvas::finish`], after every drawing step has succeeded.

use std::collections::BTreeSet;

use lopdf::content::{Content, Operation};
use lopdf::xref::XrefType;
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

use crate::errors::ExportError;
use crate::pdf::cursor::PageCursor;
use crate::pdf::links::{attach_link, LinkAnnotation};
use crate::templates::{Rgb, Theme};
use crate::text::{sanitize_for_font, winansi, wrap_text, StandardFont};

pub const LETTER_WIDTH: f32 = 612.0;
pub const LETTER_HEIGHT: f32 = 792.0;

const PRODUCER: &str = "folio-api";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub fn letter(margin: f32) -> Self {
        Self {
            width: LETTER_WIDTH,
            height: LETTER_HEIGHT,
            margin,
        }
    }

    pub fn left(&self) -> f32 {
        self.margin
    }

    pub fn right(&self) -> f32 {
        self.width - self.margin
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn center(&self) -> f32 {
        self.width / 2.0
    }
}

#[derive(Default)]
struct PageBuffer {
    operations: Vec<Operation>,
    links: Vec<LinkAnnotation>,
}

/// Result of a finished render.
#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub struct PdfCanvas {
    geometry: PageGeometry,
    cursor: PageCursor,
    pages: Vec<PageBuffer>,
    fonts: BTreeSet<StandardFont>,
}

impl PdfCanvas {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            cursor: PageCursor::new(geometry.height, geometry.margin, geometry.margin),
            pages: vec![PageBuffer::default()],
            fonts: BTreeSet::new(),
        }
    }

    pub fn for_theme(theme: &Theme) -> Self {
        Self::new(PageGeometry::letter(theme.margin))
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn y(&self) -> f32 {
        self.cursor.y()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    // ── pagination ──────────────────────────────────────────────────────────

    /// Starts a new page when an element `height` points tall would cross the
    /// bottom margin.
    pub fn ensure_space(&mut self, height: f32) {
        if self.cursor.ensure_space(height) {
            self.pages.push(PageBuffer::default());
            debug!(page = self.cursor.page_index() + 1, "page break");
        }
    }

    pub fn advance(&mut self, dy: f32) {
        self.cursor.advance(dy);
    }

    // ── measurement ────────────────────────────────────────────────────────

    /// Width of `text` exactly as it will be drawn.
    pub fn measure(&self, text: &str, font: StandardFont, size: f32) -> f32 {
        font.text_width(&sanitize_for_font(text, font), size)
    }

    /// Wraps the drawable form of `text` to `max_width`.
    pub fn wrap(&self, text: &str, max_width: f32, font: StandardFont, size: f32) -> Vec<String> {
        wrap_text(&sanitize_for_font(text, font), max_width, font, size)
    }

    // ── drawing ─────────────────────────────────────────────────────────────

    /// Draws one line of text with its baseline at `y`; returns the drawn width.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: StandardFont,
        size: f32,
        color: Rgb,
    ) -> f32 {
        let safe = sanitize_for_font(text, font);
        if safe.is_empty() {
            return 0.0;
        }
        let bytes: Vec<u8> = safe.chars().filter_map(winansi::encode_char).collect();
        self.push_text(bytes, x, y, font, size, color);
        font.text_width(&safe, size)
    }

    /// Draws text ending at `right`; returns `(x, width)` of the drawn run.
    pub fn draw_text_right(
        &mut self,
        text: &str,
        right: f32,
        y: f32,
        font: StandardFont,
        size: f32,
        color: Rgb,
    ) -> (f32, f32) {
        let x = right - self.measure(text, font, size);
        let width = self.draw_text(text, x, y, font, size, color);
        (x, width)
    }

    /// Draws text centred on the page; returns `(x, width)` of the drawn run.
    pub fn draw_text_centered(
        &mut self,
        text: &str,
        y: f32,
        font: StandardFont,
        size: f32,
        color: Rgb,
    ) -> (f32, f32) {
        let x = self.geometry.center() - self.measure(text, font, size) / 2.0;
        let width = self.draw_text(text, x, y, font, size, color);
        (x, width)
    }

    /// Draws the WinAnsi bullet glyph, which the sanitizer never lets
    /// through from user text.
    pub fn draw_bullet(&mut self, x: f32, y: f32, font: StandardFont, size: f32, color: Rgb) {
        self.push_text(vec![0x95], x, y, font, size, color);
        self.fonts.insert(font);
    }

    pub fn draw_rule(&mut self, x1: f32, x2: f32, y: f32, thickness: f32, color: Rgb) {
        let [r, g, b] = color.components();
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("w", vec![thickness.into()]),
            Operation::new("RG", vec![r.into(), g.into(), b.into()]),
            Operation::new("m", vec![x1.into(), y.into()]),
            Operation::new("l", vec![x2.into(), y.into()]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ];
        self.current_page().operations.extend(ops);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgb) {
        let [r, g, b] = color.components();
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new(
                "re",
                vec![x.into(), y.into(), width.into(), height.into()],
            ),
            Operation::new("f", vec![]),
            Operation::new("Q", vec![]),
        ];
        self.current_page().operations.extend(ops);
    }

    /// Registers a clickable region on the current page. Blank URLs are
    /// dropped by the caller via `normalize_url`.
    pub fn attach_link(&mut self, x: f32, y: f32, width: f32, height: f32, url: String) {
        if width <= 0.0 {
            return;
        }
        self.current_page().links.push(LinkAnnotation {
            x,
            y,
            width,
            height,
            url,
        });
    }

    fn push_text(&mut self, bytes: Vec<u8>, x: f32, y: f32, font: StandardFont, size: f32, color: Rgb) {
        let [r, g, b] = color.components();
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource_name().into(), size.into()]),
            Operation::new("rg", vec![r.into(), g.into(), b.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![Object::String(bytes, StringFormat::Literal)]),
            Operation::new("ET", vec![]),
        ];
        self.fonts.insert(font);
        self.current_page().operations.extend(ops);
    }

    fn current_page(&mut self) -> &mut PageBuffer {
        if self.pages.is_empty() {
            self.pages.push(PageBuffer::default());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    // ── serialization ───────────────────────────────────────────────────────

    /// Builds the object graph and serializes the whole document.
    pub fn finish(self, title: &str) -> Result<RenderedPdf, ExportError> {
        let mut doc = Document::with_version("1.5");
        doc.reference_table.cross_reference_type = XrefType::CrossReferenceTable;

        let pages_id = doc.new_object_id();

        let mut font_refs = Dictionary::new();
        for font in &self.fonts {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            font_refs.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => font_refs,
        });

        let page_count = self.pages.len();
        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for page in self.pages {
            let content = Content {
                operations: page.operations,
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            for link in &page.links {
                attach_link(&mut doc, page_id, link)?;
            }
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    self.geometry.width.into(),
                    self.geometry.height.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let title_bytes: Vec<u8> = sanitize_for_font(title, StandardFont::Helvetica)
            .chars()
            .filter_map(winansi::encode_char)
            .collect();
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(title_bytes, StringFormat::Literal),
            "Producer" => Object::string_literal(PRODUCER),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(RenderedPdf { bytes, page_count })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Helpers for inspecting rendered PDFs in tests.

    use lopdf::content::Content;
    use lopdf::{Document, Object};

    pub fn load(bytes: &[u8]) -> Document {
        Document::load_mem(bytes).expect("rendered PDF should parse")
    }

    pub fn page_count(bytes: &[u8]) -> usize {
        load(bytes).get_pages().len()
    }

    /// URIs of every Link annotation in document order.
    pub fn link_uris(bytes: &[u8]) -> Vec<String> {
        let doc = load(bytes);
        let mut uris = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let page = doc.get_object(page_id).and_then(Object::as_dict).unwrap();
            let Ok(annots) = page.get(b"Annots").and_then(Object::as_array) else {
                continue;
            };
            for annot in annots {
                let id = annot.as_reference().unwrap();
                let dict = doc.get_object(id).and_then(Object::as_dict).unwrap();
                let action = dict.get(b"A").and_then(Object::as_dict).unwrap();
                if let Ok(Object::String(uri, _)) = action.get(b"URI") {
                    uris.push(String::from_utf8_lossy(uri).into_owned());
                }
            }
        }
        uris
    }

    /// Every `Tj` string across all pages, decoded as Latin-1.
    pub fn shown_strings(bytes: &[u8]) -> Vec<String> {
        let doc = load(bytes);
        let mut out = Vec::new();
        for (_, page_id) in doc.get_pages() {
            let raw = doc.get_page_content(page_id).unwrap();
            let content = Content::decode(&raw).unwrap();
            for op in content.operations {
                if op.operator == "Tj" {
                    if let Some(Object::String(s, _)) = op.operands.first() {
                        out.push(s.iter().map(|&b| b as char).collect());
                    }
                }
            }
        }
        out
    }
}
