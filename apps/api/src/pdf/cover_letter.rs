use crate::errors::ExportError;
use crate::models::CoverLetter;
use crate::pdf::canvas::{PdfCanvas, RenderedPdf};
use crate::pdf::resume::{document_title, masthead};
use crate::pdf::sections::LayoutContext;
use crate::templates::{RenderOptions, Theme};

/// Blank lines left for a handwritten signature.
const SIGNATURE_LINES: f32 = 3.0;

/// Renders a cover letter: masthead, date, recipient block, salutation,
/// paragraphs, closing and enclosures.
pub fn render_cover_letter(
    letter: &CoverLetter,
    theme: &Theme,
    options: RenderOptions,
) -> Result<RenderedPdf, ExportError> {
    let mut canvas = PdfCanvas::for_theme(theme);
    {
        let mut ctx = LayoutContext::new(&mut canvas, theme, options);
        let applicant = &letter.applicant;
        masthead(
            &mut ctx,
            &applicant.name,
            applicant.title.as_deref(),
            &letter.contact_segments(),
        );

        let size = letter.requested_font_size().unwrap_or(theme.letter_size);
        let leading = Theme::leading(size);
        let color = theme.section.body_color;
        let regular = theme.family.regular();
        let bold = theme.family.bold();
        let geometry = *ctx.canvas.geometry();
        let (left, width) = (geometry.left(), geometry.content_width());

        ctx.gap(theme.paragraph_gap);
        if let Some(date) = letter.content.date.as_deref().map(str::trim) {
            if !date.is_empty() {
                ctx.line(date, left, regular, size, color);
                ctx.gap(theme.paragraph_gap);
            }
        }

        let recipient = letter.recipient_lines();
        if !recipient.is_empty() {
            for line in &recipient {
                ctx.paragraph(line, left, width, regular, size, color);
            }
            ctx.gap(theme.paragraph_gap);
        }

        ctx.paragraph(&letter.salutation(), left, width, regular, size, color);
        ctx.gap(theme.paragraph_gap);

        for paragraph in letter.paragraphs() {
            ctx.paragraph(paragraph, left, width, regular, size, color);
            ctx.gap(theme.paragraph_gap);
        }

        // Closing, signature space and name stay together.
        ctx.canvas
            .ensure_space(leading * (2.0 + SIGNATURE_LINES));
        ctx.line(&letter.complimentary_close(), left, regular, size, color);
        ctx.gap(leading * SIGNATURE_LINES);
        ctx.line(applicant.name.trim(), left, bold, size, color);

        let enclosures = letter.enclosures();
        if !enclosures.is_empty() {
            ctx.gap(theme.paragraph_gap);
            let line = format!("Enclosures: {}", enclosures.join(", "));
            ctx.paragraph(&line, left, width, regular, size, color);
        }
    }
    canvas.finish(&document_title(&letter.applicant.name, "Cover Letter"))
}
