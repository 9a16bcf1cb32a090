//! Clickable link annotations.

use lopdf::{dictionary, Document, Object, ObjectId, StringFormat};

use crate::text::sanitize::is_stripped;

/// A pending hit-region over drawn label text, in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkAnnotation {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub url: String,
}

/// Normalizes a user-entered URL. Control characters are dropped, blank
/// input yields `None` so the caller omits the link, and input without a
/// scheme gets `https://`.
pub fn normalize_url(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| !is_stripped(*c)).collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    if has_scheme(trimmed) {
        return Some(trimmed.to_string());
    }
    if let Some(rest) = trimmed.strip_prefix("//") {
        return Some(format!("https://{rest}"));
    }
    Some(format!("https://{trimmed}"))
}

fn has_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if ["mailto:", "tel:"].iter().any(|p| lower.starts_with(p)) {
        return true;
    }
    match url.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Adds a Link annotation with a URI action to `page_id`, appending to the
/// page's `/Annots` array or creating it.
pub fn attach_link(
    doc: &mut Document,
    page_id: ObjectId,
    link: &LinkAnnotation,
) -> Result<ObjectId, lopdf::Error> {
    let rect: Vec<Object> = vec![
        link.x.into(),
        link.y.into(),
        (link.x + link.width).into(),
        (link.y + link.height).into(),
    ];
    let annotation_id = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => rect,
        "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
        "A" => dictionary! {
            "Type" => "Action",
            "S" => "URI",
            "URI" => Object::String(link.url.as_bytes().to_vec(), StringFormat::Literal),
        },
    });

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    match page.get_mut(b"Annots").and_then(Object::as_array_mut) {
        Ok(annots) => annots.push(annotation_id.into()),
        Err(_) => page.set("Annots", vec![Object::Reference(annotation_id)]),
    }
    Ok(annotation_id)
}
