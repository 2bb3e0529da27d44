//! WinAnsi string encoding for standard-font text operators.

use crate::pdf::PdfError;

/// Maps a character to its WinAnsiEncoding (Windows-1252) byte.
///
/// 0x20..=0x7E and 0xA0..=0xFF map to themselves; 0x80..=0x9F hold the
/// typographic extras (smart quotes, dashes, bullet, euro).
pub fn winansi_byte(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    let byte = match cp {
        0x20AC => 0x80,
        0x201A => 0x82,
        0x0192 => 0x83,
        0x201E => 0x84,
        0x2026 => 0x85,
        0x2020 => 0x86,
        0x2021 => 0x87,
        0x02C6 => 0x88,
        0x2030 => 0x89,
        0x0160 => 0x8A,
        0x2039 => 0x8B,
        0x0152 => 0x8C,
        0x017D => 0x8E,
        0x2018 => 0x91,
        0x2019 => 0x92,
        0x201C => 0x93,
        0x201D => 0x94,
        0x2022 => 0x95,
        0x2013 => 0x96,
        0x2014 => 0x97,
        0x02DC => 0x98,
        0x2122 => 0x99,
        0x0161 => 0x9A,
        0x203A => 0x9B,
        0x0153 => 0x9C,
        0x017E => 0x9E,
        0x0178 => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Encodes `text` as the body of a PDF literal string (without the parentheses).
///
/// Tabs become spaces and line breaks are escaped. Any other character with no
/// WinAnsi byte fails the whole string.
pub fn encode_literal(text: &str) -> Result<Vec<u8>, PdfError> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.extend_from_slice(b"\\\\"),
            '(' => out.extend_from_slice(b"\\("),
            ')' => out.extend_from_slice(b"\\)"),
            '\n' => out.extend_from_slice(b"\\n"),
            '\r' => out.extend_from_slice(b"\\r"),
            '\t' => out.push(b' '),
            _ => out.push(winansi_byte(ch).ok_or(PdfError::UnencodableChar { ch })?),
        }
    }
    Ok(out)
}

/// Escapes a metadata string. Metadata is informational, so unencodable characters
/// are replaced with `?` rather than failing the document.
pub fn encode_info_string(text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| match encode_literal(ch.encode_utf8(&mut [0u8; 4])) {
            Ok(bytes) => bytes,
            Err(_) => vec![b'?'],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(encode_literal("Score: 85/100").unwrap(), b"Score: 85/100");
    }

    #[test]
    fn test_escapes_delimiters() {
        assert_eq!(
            encode_literal("Hello (World) \\").unwrap(),
            b"Hello \\(World\\) \\\\".to_vec()
        );
    }

    #[test]
    fn test_bullet_maps_to_0x95() {
        assert_eq!(encode_literal("\u{2022} x").unwrap(), vec![0x95, b' ', b'x']);
    }

    #[test]
    fn test_latin1_maps_directly() {
        assert_eq!(encode_literal("é").unwrap(), vec![0xE9]);
    }

    #[test]
    fn test_unencodable_char_is_an_error() {
        let err = encode_literal("履歴書").unwrap_err();
        assert!(matches!(err, PdfError::UnencodableChar { ch: '履' }));
    }

    #[test]
    fn test_info_string_substitutes_instead_of_failing() {
        assert_eq!(encode_info_string("CV 履"), b"CV ?".to_vec());
    }
}
