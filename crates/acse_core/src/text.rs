//! Fixed-width text fields in the save's own character encodings.
//!
//! The console generations use a single-byte charset padded with spaces, the
//! DS uses its own single-byte charset padded with NULs, and the Wii and 3DS
//! store UTF-16 (big and little endian respectively).
//!
//! Bytes with no known glyph decode to a private-use code point
//! (`U+E000 + byte`) so they survive a decode/encode cycle untouched.

use crate::generation::Platform;

const PRIVATE_USE_BASE: u32 = 0xE000;
const CONSOLE_PAD: u8 = 0x20;
const HANDHELD_PAD: u8 = 0x00;

/// Glyphs for `0x00..0x20` in the console charset; `0x20..0x7F` is ASCII.
const CONSOLE_LOW: [char; 0x20] = [
    '¡', '¿', 'Ä', 'À', 'Á', 'Â', 'Ã', 'Å', 'Ç', 'È', 'É', 'Ê', 'Ë', 'Ì', 'Í', 'Î', 'Ï', 'Đ', 'Ñ',
    'Ò', 'Ó', 'Ô', 'Õ', 'Ö', 'Ø', 'Ù', 'Ú', 'Û', 'Ü', 'ß', 'Þ', 'à',
];

/// Glyphs from `0x3F` up in the DS charset, after the letters and digits.
const HANDHELD_SYMBOLS_START: u8 = 0x3F;
const HANDHELD_SYMBOLS: [char; 24] = [
    ' ', '!', '?', '&', '"', '\'', '-', '.', ',', ':', ';', '(', ')', '/', '~', '+', '=', '#',
    '%', '*', '@', '_', '<', '>',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Charset {
    Console,
    Handheld,
    Utf16Be,
    Utf16Le,
}

impl Charset {
    fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::N64 | Platform::IQue | Platform::Gcn => Self::Console,
            Platform::Nds => Self::Handheld,
            Platform::Wii => Self::Utf16Be,
            Platform::N3ds => Self::Utf16Le,
        }
    }
}

pub fn decode(bytes: &[u8], platform: Platform) -> String {
    match Charset::for_platform(platform) {
        Charset::Console => {
            let text: String = bytes.iter().map(|&b| console_char(b)).collect();
            text.trim_end_matches(CONSOLE_PAD as char).to_string()
        }
        Charset::Handheld => {
            let end = bytes
                .iter()
                .rposition(|&b| b != HANDHELD_PAD)
                .map_or(0, |i| i + 1);
            bytes[..end].iter().map(|&b| handheld_char(b)).collect()
        }
        Charset::Utf16Be => decode_utf16(
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_be_bytes([c[0], c[1]])),
        ),
        Charset::Utf16Le => decode_utf16(
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]])),
        ),
    }
}

/// Encodes `text` into exactly `size` bytes, truncating or padding.
pub fn encode(text: &str, size: usize, platform: Platform) -> Vec<u8> {
    let charset = Charset::for_platform(platform);
    let mut out = Vec::with_capacity(size);

    match charset {
        Charset::Console | Charset::Handheld => {
            for c in text.chars() {
                if out.len() == size {
                    break;
                }
                let byte = if charset == Charset::Console {
                    console_byte(c)
                } else {
                    handheld_byte(c)
                };
                match byte {
                    Some(b) => out.push(b),
                    None => log::warn!("dropping {c:?}: no glyph in the {platform:?} charset"),
                }
            }
            let pad = if charset == Charset::Console {
                CONSOLE_PAD
            } else {
                HANDHELD_PAD
            };
            out.resize(size, pad);
        }
        Charset::Utf16Be | Charset::Utf16Le => {
            let mut units = [0u16; 2];
            for c in text.chars() {
                let encoded = c.encode_utf16(&mut units);
                if out.len() + encoded.len() * 2 > size {
                    break;
                }
                for unit in encoded.iter() {
                    let pair = if charset == Charset::Utf16Be {
                        unit.to_be_bytes()
                    } else {
                        unit.to_le_bytes()
                    };
                    out.extend_from_slice(&pair);
                }
            }
            out.resize(size, 0);
        }
    }

    out
}

fn decode_utf16(units: impl Iterator<Item = u16>) -> String {
    let units: Vec<u16> = units.collect();
    let end = units.iter().rposition(|&u| u != 0).map_or(0, |i| i + 1);
    char::decode_utf16(units[..end].iter().copied())
        .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn private_use(byte: u8) -> char {
    char::from_u32(PRIVATE_USE_BASE + byte as u32).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn from_private_use(c: char) -> Option<u8> {
    let code = c as u32;
    (PRIVATE_USE_BASE..PRIVATE_USE_BASE + 0x100)
        .contains(&code)
        .then(|| (code - PRIVATE_USE_BASE) as u8)
}

fn console_char(byte: u8) -> char {
    match byte {
        0x00..0x20 => CONSOLE_LOW[byte as usize],
        0x20..0x7F => byte as char,
        _ => private_use(byte),
    }
}

fn console_byte(c: char) -> Option<u8> {
    if (' '..='~').contains(&c) {
        return Some(c as u8);
    }
    CONSOLE_LOW
        .iter()
        .position(|&g| g == c)
        .map(|i| i as u8)
        .or_else(|| from_private_use(c))
}

// 0x01..=0x1A A-Z, 0x1B..=0x34 a-z, 0x35..=0x3E 0-9, then the symbol table.
fn handheld_char(byte: u8) -> char {
    match byte {
        0x01..=0x1A => (b'A' + byte - 0x01) as char,
        0x1B..=0x34 => (b'a' + byte - 0x1B) as char,
        0x35..=0x3E => (b'0' + byte - 0x35) as char,
        _ => byte
            .checked_sub(HANDHELD_SYMBOLS_START)
            .and_then(|i| HANDHELD_SYMBOLS.get(i as usize).copied())
            .unwrap_or_else(|| private_use(byte)),
    }
}

fn handheld_byte(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(c as u8 - b'A' + 0x01),
        'a'..='z' => Some(c as u8 - b'a' + 0x1B),
        '0'..='9' => Some(c as u8 - b'0' + 0x35),
        _ => HANDHELD_SYMBOLS
            .iter()
            .position(|&g| g == c)
            .map(|i| HANDHELD_SYMBOLS_START + i as u8)
            .or_else(|| from_private_use(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_text_is_space_padded() {
        let bytes = encode("Bob", 8, Platform::Gcn);
        assert_eq!(bytes, b"Bob     ");
        assert_eq!(decode(&bytes, Platform::Gcn), "Bob");
    }

    #[test]
    fn console_specials_and_unknown_bytes_survive() {
        let raw = [0x12, b'o', 0xC4, b' '];
        let text = decode(&raw, Platform::N64);
        assert!(text.starts_with("Ño"));
        assert_eq!(encode(&text, 4, Platform::N64), raw);
    }

    #[test]
    fn handheld_text_uses_own_charset() {
        let bytes = encode("Ann9", 8, Platform::Nds);
        assert_eq!(bytes, [0x01, 0x28, 0x28, 0x3E, 0, 0, 0, 0]);
        assert_eq!(decode(&bytes, Platform::Nds), "Ann9");
    }

    #[test]
    fn handheld_text_keeps_spaces_and_punctuation() {
        let bytes = encode("Ann B!", 8, Platform::Nds);
        assert_eq!(bytes, [0x01, 0x28, 0x28, 0x3F, 0x02, 0x40, 0, 0]);
        assert_eq!(decode(&bytes, Platform::Nds), "Ann B!");

        let text = "Jo-Jo's (2)";
        assert_eq!(decode(&encode(text, 16, Platform::Nds), Platform::Nds), text);

        // Bytes past the symbol table still survive as private-use code points.
        let raw = [0x01, 0xC0, 0x3F];
        assert_eq!(encode(&decode(&raw, Platform::Nds), 3, Platform::Nds), raw);
    }

    #[test]
    fn utf16_is_truncated_to_size() {
        let bytes = encode("Clementine", 8, Platform::Wii);
        assert_eq!(bytes.len(), 8);
        assert_eq!(decode(&bytes, Platform::Wii), "Clem");

        let bytes = encode("Mo", 6, Platform::N3ds);
        assert_eq!(bytes, [b'M', 0, b'o', 0, 0, 0]);
        assert_eq!(decode(&bytes, Platform::N3ds), "Mo");
    }
}
