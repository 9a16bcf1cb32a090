//! Built-in visual templates.
//!
//! A template is data: fonts, sizes, colours and spacing. The PDF, DOCX and
//! plain-text drivers share one layout algorithm per document kind and read
//! their visual identity from a [`Theme`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::text::FontFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Classic,
    Compact,
    Creative,
    Elegant,
    Modern,
}

impl TemplateId {
    pub const ALL: [TemplateId; 5] = [
        TemplateId::Classic,
        TemplateId::Compact,
        TemplateId::Creative,
        TemplateId::Elegant,
        TemplateId::Modern,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Compact => "compact",
            TemplateId::Creative => "creative",
            TemplateId::Elegant => "elegant",
            TemplateId::Modern => "modern",
        }
    }

    /// Case-insensitive lookup; `None` for unknown ids.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|id| id.as_str() == wanted)
    }

    /// Resolves a requested id, falling back to classic for anything unknown.
    pub fn resolve(raw: Option<&str>) -> Self {
        match raw {
            None => TemplateId::Classic,
            Some(raw) => Self::parse(raw).unwrap_or_else(|| {
                warn!(requested = raw, "unknown template id, using classic");
                TemplateId::Classic
            }),
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            TemplateId::Classic => classic(),
            TemplateId::Compact => compact(),
            TemplateId::Creative => creative(),
            TemplateId::Elegant => elegant(),
            TemplateId::Modern => modern(),
        }
    }
}

/// How project links are labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDisplay {
    /// "Link" / "GitHub"
    #[default]
    Short,
    /// The URL as entered.
    Full,
}

impl LinkDisplay {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" => Some(LinkDisplay::Short),
            "full" => Some(LinkDisplay::Full),
            _ => None,
        }
    }
}

/// Per-call rendering switches that are not part of a template's look.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub link_display: LinkDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Components in 0.0..=1.0 for PDF colour operators.
    pub fn components(&self) -> [f32; 3] {
        [
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        ]
    }

    /// `RRGGBB` for OOXML colour attributes.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Name and contact centred.
    Centered,
    /// Name and contact flush left.
    Left,
    /// Name on a full-width coloured band.
    Banner,
    /// Upper-case centred name between thin rules.
    CenteredCaps,
}

/// Visual parameters handed to the section renderers.
#[derive(Debug, Clone, Copy)]
pub struct SectionStyle {
    pub title_size: f32,
    pub title_color: Rgb,
    pub body_size: f32,
    pub body_color: Rgb,
    pub bullet_indent: f32,
    pub item_spacing: f32,
    pub link_size: f32,
    pub link_color: Rgb,
    /// Rule drawn under section headings.
    pub heading_rule: Option<Rgb>,
    pub heading_caps: bool,
    /// Flat string lists flow as one comma-separated paragraph.
    pub inline_lists: bool,
    pub italic_dates: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub id: TemplateId,
    pub family: FontFamily,
    /// Page margin on every side, in points.
    pub margin: f32,
    pub name_size: f32,
    pub name_color: Rgb,
    pub contact_size: f32,
    pub header: HeaderStyle,
    pub accent: Rgb,
    pub section: SectionStyle,
    /// Vertical gap before each section heading.
    pub section_gap: f32,
    /// Body size for cover-letter paragraphs.
    pub letter_size: f32,
    pub paragraph_gap: f32,
}

impl Theme {
    /// Baseline-to-baseline distance for text at `size`.
    pub fn leading(size: f32) -> f32 {
        size * 1.3
    }
}

fn classic() -> Theme {
    Theme {
        id: TemplateId::Classic,
        family: FontFamily::Times,
        margin: 54.0,
        name_size: 22.0,
        name_color: Rgb::BLACK,
        contact_size: 10.0,
        header: HeaderStyle::Centered,
        accent: Rgb::BLACK,
        section: SectionStyle {
            title_size: 12.0,
            title_color: Rgb::BLACK,
            body_size: 10.5,
            body_color: Rgb::BLACK,
            bullet_indent: 14.0,
            item_spacing: 6.0,
            link_size: 10.5,
            link_color: Rgb(0, 0, 153),
            heading_rule: Some(Rgb::BLACK),
            heading_caps: true,
            inline_lists: false,
            italic_dates: false,
        },
        section_gap: 10.0,
        letter_size: 11.5,
        paragraph_gap: 10.0,
    }
}

fn compact() -> Theme {
    Theme {
        id: TemplateId::Compact,
        family: FontFamily::Helvetica,
        margin: 36.0,
        name_size: 18.0,
        name_color: Rgb(17, 17, 17),
        contact_size: 8.5,
        header: HeaderStyle::Left,
        accent: Rgb(51, 51, 51),
        section: SectionStyle {
            title_size: 10.5,
            title_color: Rgb(51, 51, 51),
            body_size: 9.0,
            body_color: Rgb(17, 17, 17),
            bullet_indent: 10.0,
            item_spacing: 3.0,
            link_size: 9.0,
            link_color: Rgb(29, 78, 216),
            heading_rule: Some(Rgb(153, 153, 153)),
            heading_caps: true,
            inline_lists: true,
            italic_dates: false,
        },
        section_gap: 6.0,
        letter_size: 10.0,
        paragraph_gap: 7.0,
    }
}

fn creative() -> Theme {
    let accent = Rgb(91, 44, 131);
    Theme {
        id: TemplateId::Creative,
        family: FontFamily::Helvetica,
        margin: 48.0,
        name_size: 24.0,
        name_color: Rgb::WHITE,
        contact_size: 9.5,
        header: HeaderStyle::Banner,
        accent,
        section: SectionStyle {
            title_size: 13.0,
            title_color: accent,
            body_size: 10.0,
            body_color: Rgb(34, 34, 34),
            bullet_indent: 12.0,
            item_spacing: 6.0,
            link_size: 10.0,
            link_color: accent,
            heading_rule: None,
            heading_caps: false,
            inline_lists: false,
            italic_dates: false,
        },
        section_gap: 12.0,
        letter_size: 11.0,
        paragraph_gap: 10.0,
    }
}

fn elegant() -> Theme {
    let muted = Rgb(68, 68, 68);
    Theme {
        id: TemplateId::Elegant,
        family: FontFamily::Times,
        margin: 54.0,
        name_size: 24.0,
        name_color: Rgb(34, 34, 34),
        contact_size: 10.0,
        header: HeaderStyle::CenteredCaps,
        accent: muted,
        section: SectionStyle {
            title_size: 11.5,
            title_color: muted,
            body_size: 10.5,
            body_color: Rgb(34, 34, 34),
            bullet_indent: 14.0,
            item_spacing: 7.0,
            link_size: 10.5,
            link_color: muted,
            heading_rule: Some(Rgb(170, 170, 170)),
            heading_caps: true,
            inline_lists: false,
            italic_dates: true,
        },
        section_gap: 12.0,
        letter_size: 11.5,
        paragraph_gap: 11.0,
    }
}

fn modern() -> Theme {
    let accent = Rgb(37, 99, 235);
    Theme {
        id: TemplateId::Modern,
        family: FontFamily::Helvetica,
        margin: 48.0,
        name_size: 22.0,
        name_color: Rgb(31, 41, 55),
        contact_size: 9.5,
        header: HeaderStyle::Left,
        accent,
        section: SectionStyle {
            title_size: 12.0,
            title_color: accent,
            body_size: 10.0,
            body_color: Rgb(31, 41, 55),
            bullet_indent: 12.0,
            item_spacing: 6.0,
            link_size: 10.0,
            link_color: accent,
            heading_rule: Some(accent),
            heading_caps: false,
            inline_lists: false,
            italic_dates: false,
        },
        section_gap: 10.0,
        letter_size: 11.0,
        paragraph_gap: 10.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(TemplateId::parse(" Modern "), Some(TemplateId::Modern));
        assert_eq!(TemplateId::parse("ELEGANT"), Some(TemplateId::Elegant));
        assert_eq!(TemplateId::parse("fancy"), None);
    }

    #[test]
    fn test_unknown_falls_back_to_classic() {
        assert_eq!(TemplateId::resolve(Some("fancy")), TemplateId::Classic);
        assert_eq!(TemplateId::resolve(None), TemplateId::Classic);
        assert_eq!(TemplateId::resolve(Some("compact")), TemplateId::Compact);
    }

    #[test]
    fn test_every_theme_matches_its_id() {
        for id in TemplateId::ALL {
            assert_eq!(id.theme().id, id);
        }
    }

    #[test]
    fn test_rgb_conversions() {
        assert_eq!(Rgb(37, 99, 235).hex(), "2563EB");
        assert_eq!(Rgb::WHITE.components(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_link_display_parse() {
        assert_eq!(LinkDisplay::parse("FULL"), Some(LinkDisplay::Full));
        assert_eq!(LinkDisplay::parse("short"), Some(LinkDisplay::Short));
        assert_eq!(LinkDisplay::parse("long"), None);
    }
}
