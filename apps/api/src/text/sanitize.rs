//! Normalizes user-entered Unicode into text the export fonts can show.
//!
//! Every string from a document passes through here right before it is drawn:
//! the PDF writer rejects glyphs outside WinAnsi, and DOCX parts must not carry
//! XML-illegal control characters.

use tracing::debug;

use crate::text::metrics::StandardFont;
use crate::text::winansi;

/// Replacement for a code point in the substitution table.
fn substitute(c: char) -> Option<&'static str> {
    let replacement = match c {
        // hyphens, dashes, minus
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}'
        | '\u{2212}' => "-",
        // non-breaking and narrow spaces
        '\u{00A0}' | '\u{2007}' | '\u{202F}' | '\u{2009}' | '\u{200A}' => " ",
        // single quotes and primes
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => "'",
        // double quotes
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => "\"",
        // bullet glyphs
        '\u{2022}' | '\u{2023}' | '\u{2043}' | '\u{2219}' | '\u{25A0}' | '\u{25AA}'
        | '\u{25AB}' | '\u{25CF}' | '\u{25E6}' | '\u{27A2}' => "-",
        '\u{2026}' => "...",
        '\u{00B0}' => "deg",
        '\u{00AE}' => "(R)",
        '\u{00A9}' => "(C)",
        '\u{2122}' => "(TM)",
        '\u{FFFD}' => "?",
        // zero-width characters and byte-order marks vanish
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' => "",
        _ => return None,
    };
    Some(replacement)
}

/// C0 and C1 controls plus U+FFFE/U+FFFF, which XML 1.0 forbids.
pub(crate) fn is_stripped(c: char) -> bool {
    matches!(c as u32, 0x00..=0x1F | 0x7F..=0x9F | 0xFFFE | 0xFFFF)
}

/// Table substitution plus control-character removal. Tabs and line breaks
/// become spaces so neighbouring words stay apart. Never fails.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if let Some(replacement) = substitute(c) {
            out.push_str(replacement);
        } else if matches!(c, '\t' | '\n' | '\r') {
            out.push(' ');
        } else if !is_stripped(c) {
            out.push(c);
        }
    }
    out
}

/// Sanitizes, then guarantees the result is encodable with `font`.
///
/// When the whole string does not encode, unencodable characters are dropped
/// one by one instead of failing the export.
pub fn sanitize_for_font(text: &str, font: StandardFont) -> String {
    let cleaned = sanitize(text);
    match winansi::encode(&cleaned) {
        Ok(_) => cleaned,
        Err(err) => {
            debug!(
                font = font.base_font(),
                first = ?err.character,
                "dropping characters the font cannot encode"
            );
            cleaned.chars().filter(|c| winansi::is_encodable(*c)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_smart_quotes_and_dashes() {
        assert_eq!(
            sanitize("\u{201C}Hi\u{201D} \u{2014} it\u{2019}s 9\u{2013}5"),
            "\"Hi\" - it's 9-5"
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(sanitize("Rust\u{2122} \u{00A9} \u{00AE}"), "Rust(TM) (C) (R)");
        assert_eq!(sanitize("90\u{00B0}"), "90deg");
        assert_eq!(sanitize("wait\u{2026}"), "wait...");
    }

    #[test]
    fn test_bullets_become_hyphens() {
        assert_eq!(sanitize("\u{2022} one \u{25CF} two"), "- one - two");
    }

    #[test]
    fn test_controls_stripped_and_breaks_spaced() {
        assert_eq!(sanitize("a\u{0000}b\u{0085}c\nd\te"), "abc d e");
        assert_eq!(sanitize("x\u{FFFE}y\u{FFFF}"), "xy");
    }

    #[test]
    fn test_replacement_character() {
        assert_eq!(sanitize("bad\u{FFFD}byte"), "bad?byte");
    }

    #[test]
    fn test_strict_drops_only_unencodable() {
        let out = sanitize_for_font("Zoë 漢字 Café", StandardFont::Helvetica);
        assert_eq!(out, "Zoë  Café");
        assert!(winansi::encode(&out).is_ok());
    }

    #[test]
    fn test_strict_keeps_encodable_text_untouched() {
        assert_eq!(
            sanitize_for_font("Plain text", StandardFont::TimesRoman),
            "Plain text"
        );
    }

    const TABLE_POINTS: &[char] = &[
        '\u{2011}', '\u{00A0}', '\u{2013}', '\u{2014}', '\u{2018}', '\u{2019}', '\u{201C}',
        '\u{201D}', '\u{2022}', '\u{25CF}', '\u{00B0}', '\u{00AE}', '\u{00A9}', '\u{2122}',
        '\u{FFFD}',
    ];

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(input in any::<String>()) {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn prop_sanitize_output_is_safe(input in any::<String>()) {
            let out = sanitize(&input);
            prop_assert!(!out.chars().any(is_stripped));
            prop_assert!(!out.chars().any(|c| TABLE_POINTS.contains(&c)));
        }

        #[test]
        fn prop_strict_output_always_encodes(input in any::<String>()) {
            let out = sanitize_for_font(&input, StandardFont::HelveticaBold);
            prop_assert!(winansi::encode(&out).is_ok());
        }
    }
}
