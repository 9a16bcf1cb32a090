//! WinAnsiEncoding (PDF 32000-1, Annex D) for the standard Type1 fonts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("character {character:?} at byte {position} has no WinAnsi code")]
pub struct EncodeError {
    pub character: char,
    pub position: usize,
}

/// Code for a single character, or `None` when the font cannot show it.
pub fn encode_char(c: char) -> Option<u8> {
    let code = c as u32;
    match code {
        0x20..=0x7E => Some(code as u8),
        0xA0..=0xFF => Some(code as u8),
        _ => match c {
            '\u{20AC}' => Some(0x80),
            '\u{201A}' => Some(0x82),
            '\u{0192}' => Some(0x83),
            '\u{201E}' => Some(0x84),
            '\u{2026}' => Some(0x85),
            '\u{2020}' => Some(0x86),
            '\u{2021}' => Some(0x87),
            '\u{02C6}' => Some(0x88),
            '\u{2030}' => Some(0x89),
            '\u{0160}' => Some(0x8A),
            '\u{2039}' => Some(0x8B),
            '\u{0152}' => Some(0x8C),
            '\u{017D}' => Some(0x8E),
            '\u{2018}' => Some(0x91),
            '\u{2019}' => Some(0x92),
            '\u{201C}' => Some(0x93),
            '\u{201D}' => Some(0x94),
            '\u{2022}' => Some(0x95),
            '\u{2013}' => Some(0x96),
            '\u{2014}' => Some(0x97),
            '\u{02DC}' => Some(0x98),
            '\u{2122}' => Some(0x99),
            '\u{0161}' => Some(0x9A),
            '\u{203A}' => Some(0x9B),
            '\u{0153}' => Some(0x9C),
            '\u{017E}' => Some(0x9E),
            '\u{0178}' => Some(0x9F),
            _ => None,
        },
    }
}

/// Encodes the whole string, failing on the first unencodable character.
pub fn encode(text: &str) -> Result<Vec<u8>, EncodeError> {
    text.char_indices()
        .map(|(position, character)| {
            encode_char(character).ok_or(EncodeError {
                character,
                position,
            })
        })
        .collect()
}

pub fn is_encodable(c: char) -> bool {
    encode_char(c).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_maps_to_itself() {
        assert_eq!(encode("Jane Doe").unwrap(), b"Jane Doe".to_vec());
    }

    #[test]
    fn test_latin1_and_specials() {
        assert_eq!(encode("é").unwrap(), vec![0xE9]);
        assert_eq!(encode("\u{2022}").unwrap(), vec![0x95]);
        assert_eq!(encode("€").unwrap(), vec![0x80]);
    }

    #[test]
    fn test_reports_first_unencodable_character() {
        let err = encode("ab漢c").unwrap_err();
        assert_eq!(err.character, '漢');
        assert_eq!(err.position, 2);
    }

    #[test]
    fn test_controls_are_not_encodable() {
        assert!(!is_encodable('\n'));
        assert!(!is_encodable('\u{0085}'));
    }
}
