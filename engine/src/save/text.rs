//! Proprietary text encodings used inside save files.
//!
//! Generations 1-2 share one character map, Generation 3 uses another; both
//! are ASCII-adjacent but neither is ASCII. Encoding fails closed on
//! characters a generation cannot represent rather than writing garbage.

use crate::error::{EngineError, Result};

/// String terminator / padding byte, Generations 1-2.
pub const GB_TERMINATOR: u8 = 0x50;
/// String terminator / padding byte, Generation 3.
pub const GBA_TERMINATOR: u8 = 0xFF;

fn gb_char(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(0x80 + (c as u8 - b'A')),
        'a'..='z' => Some(0xA0 + (c as u8 - b'a')),
        '0'..='9' => Some(0xF6 + (c as u8 - b'0')),
        ' ' => Some(0x7F),
        _ => None,
    }
}

fn gba_char(c: char) -> Option<u8> {
    match c {
        'A'..='Z' => Some(0xBB + (c as u8 - b'A')),
        'a'..='z' => Some(0xD5 + (c as u8 - b'a')),
        '0'..='9' => Some(0xA1 + (c as u8 - b'0')),
        ' ' => Some(0x00),
        _ => None,
    }
}

fn encode_with(text: &str, width: usize, map: fn(char) -> Option<u8>, terminator: u8) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(width);
    for c in text.chars().take(width) {
        out.push(map(c).ok_or_else(|| EngineError::BadTrainerName(text.to_string()))?);
    }
    while out.len() < width {
        out.push(terminator);
    }
    Ok(out)
}

/// Encodes into the Generation 1-2 character map, terminator-padded to
/// exactly `width` bytes. Anything past `width` is dropped.
pub fn encode_gb(text: &str, width: usize) -> Result<Vec<u8>> {
    encode_with(text, width, gb_char, GB_TERMINATOR)
}

/// Encodes into the Generation 3 character map, terminator-padded to
/// exactly `width` bytes.
pub fn encode_gba(text: &str, width: usize) -> Result<Vec<u8>> {
    encode_with(text, width, gba_char, GBA_TERMINATOR)
}

/// Default nickname for a species: the uppercased name with punctuation and
/// gender marks (Farfetch'd, Mr. Mime, the Nidoran pair) stripped so it fits
/// either character map.
#[must_use]
pub fn default_nickname(species_name: &str) -> String {
    species_name
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .collect()
}

/// Decodes a Generation 1-2 field, stopping at the terminator.
#[must_use]
pub fn decode_gb(raw: &[u8]) -> String {
    raw.iter()
        .take_while(|&&b| b != GB_TERMINATOR)
        .filter_map(|&b| match b {
            0x80..=0x99 => Some((b'A' + (b - 0x80)) as char),
            0xA0..=0xB9 => Some((b'a' + (b - 0xA0)) as char),
            0xF6..=0xFF => Some((b'0' + (b - 0xF6)) as char),
            0x7F => Some(' '),
            _ => None,
        })
        .collect()
}

/// Decodes a Generation 3 field, stopping at the terminator.
#[must_use]
pub fn decode_gba(raw: &[u8]) -> String {
    raw.iter()
        .take_while(|&&b| b != GBA_TERMINATOR)
        .filter_map(|&b| match b {
            0xBB..=0xD4 => Some((b'A' + (b - 0xBB)) as char),
            0xD5..=0xEE => Some((b'a' + (b - 0xD5)) as char),
            0xA1..=0xAA => Some((b'0' + (b - 0xA1)) as char),
            0x00 => Some(' '),
            _ => None,
        })
        .collect()
}
