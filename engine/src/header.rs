//! Cartridge header recognition for the three supported binary families.
//!
//! Real-world ROM headers are inconsistently populated by hobby tooling, so
//! GBA detection accepts any one of three signals (ARM branch opcode, fixed
//! header byte, plausible game code) rather than insisting on a fully valid
//! header. Unrecognized buffers yield `None`, never a panic.

/// First eight bytes of the Nintendo logo bitmap every licensed GB/GBC
/// cartridge carries at 0x104.
pub const NINTENDO_LOGO_PREFIX: [u8; 8] = [0xCE, 0xED, 0x66, 0x66, 0xCC, 0x0D, 0x00, 0x0B];

const GB_MIN_LEN: usize = 0x150;
const GB_LOGO_OFFSET: usize = 0x104;
const GB_TITLE_OFFSET: usize = 0x134;
const GB_TITLE_LEN: usize = 16;
const CGB_FLAG_OFFSET: usize = 0x143;

const GBA_MIN_LEN: usize = 256 * 1024;
const GBA_TITLE_OFFSET: usize = 0xA0;
const GBA_TITLE_LEN: usize = 12;
const GBA_GAME_CODE_OFFSET: usize = 0xAC;
const GBA_GAME_CODE_LEN: usize = 4;
const GBA_FIXED_VALUE_OFFSET: usize = 0xB2;
const GBA_FIXED_VALUE: u8 = 0x96;
/// Top byte of a 32bit ARM unconditional branch, the usual entry-point word.
const ARM_BRANCH_OPCODE: u8 = 0xEA;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbHeader {
    pub title: String,
    /// True when byte 0x143 is 0x80 (CGB enhanced) or 0xC0 (CGB only).
    pub cgb_flag_set: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbaHeader {
    pub title: String,
    pub game_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RomHeader {
    Gb(GbHeader),
    Gba(GbaHeader),
}

/// Recognizes which binary family a buffer belongs to.
///
/// Returns `None` for anything that is not a supported cartridge image.
#[must_use]
pub fn parse_header(data: &[u8]) -> Option<RomHeader> {
    parse_gb(data)
        .map(RomHeader::Gb)
        .or_else(|| parse_gba(data).map(RomHeader::Gba))
}

fn parse_gb(data: &[u8]) -> Option<GbHeader> {
    if data.len() < GB_MIN_LEN {
        return None;
    }
    if data[GB_LOGO_OFFSET..GB_LOGO_OFFSET + NINTENDO_LOGO_PREFIX.len()] != NINTENDO_LOGO_PREFIX {
        return None;
    }

    let title = ascii_field(&data[GB_TITLE_OFFSET..GB_TITLE_OFFSET + GB_TITLE_LEN]);
    let cgb_flag_set = matches!(data[CGB_FLAG_OFFSET], 0x80 | 0xC0);

    Some(GbHeader {
        title,
        cgb_flag_set,
    })
}

fn parse_gba(data: &[u8]) -> Option<GbaHeader> {
    if data.len() < GBA_MIN_LEN {
        return None;
    }

    let entry_point = u32::from_le_bytes(data[0..4].try_into().ok()?);
    let has_branch = (entry_point >> 24) as u8 == ARM_BRANCH_OPCODE;
    let has_fixed_value = data[GBA_FIXED_VALUE_OFFSET] == GBA_FIXED_VALUE;

    let code_raw = &data[GBA_GAME_CODE_OFFSET..GBA_GAME_CODE_OFFSET + GBA_GAME_CODE_LEN];
    let code_plausible = code_raw
        .iter()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

    if !(has_branch || has_fixed_value || code_plausible) {
        return None;
    }

    Some(GbaHeader {
        title: ascii_field(&data[GBA_TITLE_OFFSET..GBA_TITLE_OFFSET + GBA_TITLE_LEN]),
        game_code: ascii_field(code_raw),
    })
}

/// Reads a fixed-width header field: stops at the first byte that is not
/// printable ASCII (covering both null termination and flag bytes packed at
/// the end of the field) and trims trailing whitespace.
fn ascii_field(raw: &[u8]) -> String {
    let text: String = raw
        .iter()
        .take_while(|b| b.is_ascii_graphic() || **b == b' ')
        .map(|&b| b as char)
        .collect();
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn stamped_gb_rom(title: &[u8], cgb_flag: u8) -> Vec<u8> {
        let mut rom = vec![0_u8; 0x8000];
        rom[GB_LOGO_OFFSET..GB_LOGO_OFFSET + 8].copy_from_slice(&NINTENDO_LOGO_PREFIX);
        rom[GB_TITLE_OFFSET..GB_TITLE_OFFSET + title.len()].copy_from_slice(title);
        rom[CGB_FLAG_OFFSET] = cgb_flag;
        rom
    }

    pub(crate) fn stamped_gba_rom(title: &[u8], game_code: &[u8]) -> Vec<u8> {
        let mut rom = vec![0_u8; GBA_MIN_LEN];
        rom[3] = ARM_BRANCH_OPCODE;
        rom[GBA_FIXED_VALUE_OFFSET] = GBA_FIXED_VALUE;
        rom[GBA_TITLE_OFFSET..GBA_TITLE_OFFSET + title.len()].copy_from_slice(title);
        rom[GBA_GAME_CODE_OFFSET..GBA_GAME_CODE_OFFSET + game_code.len()].copy_from_slice(game_code);
        rom
    }

    #[test]
    fn gb_header_title_and_flag() {
        let rom = stamped_gb_rom(b"POKEMON RED", 0x00);
        let Some(RomHeader::Gb(header)) = parse_header(&rom) else {
            panic!("expected a GB header");
        };
        assert_eq!(header.title, "POKEMON RED");
        assert!(!header.cgb_flag_set);
    }

    #[test]
    fn gb_header_cgb_flag_values() {
        for flag in [0x80, 0xC0] {
            let rom = stamped_gb_rom(b"PM_CRYSTAL", flag);
            let Some(RomHeader::Gb(header)) = parse_header(&rom) else {
                panic!("expected a GB header");
            };
            assert!(header.cgb_flag_set, "flag {flag:#x} should be set");
        }
        let rom = stamped_gb_rom(b"PM_CRYSTAL", 0x40);
        let Some(RomHeader::Gb(header)) = parse_header(&rom) else {
            panic!("expected a GB header");
        };
        assert!(!header.cgb_flag_set);
    }

    #[test]
    fn gb_title_trims_trailing_padding() {
        let rom = stamped_gb_rom(b"POKEMON BLUE \0\0", 0x00);
        let Some(RomHeader::Gb(header)) = parse_header(&rom) else {
            panic!("expected a GB header");
        };
        assert_eq!(header.title, "POKEMON BLUE");
    }

    #[test]
    fn corrupted_logo_is_unrecognized() {
        for i in 0..NINTENDO_LOGO_PREFIX.len() {
            let mut rom = stamped_gb_rom(b"POKEMON RED", 0x00);
            rom[GB_LOGO_OFFSET + i] ^= 0xFF;
            assert_eq!(parse_header(&rom), None, "logo byte {i} corrupted");
        }
    }

    #[test]
    fn short_buffer_is_unrecognized() {
        assert_eq!(parse_header(&[0_u8; 0x100]), None);
        assert_eq!(parse_header(&[]), None);
    }

    #[test]
    fn gba_header_title_and_code() {
        let rom = stamped_gba_rom(b"POKEMON EMER", b"BPEE");
        let Some(RomHeader::Gba(header)) = parse_header(&rom) else {
            panic!("expected a GBA header");
        };
        assert_eq!(header.title, "POKEMON EMER");
        assert_eq!(header.game_code, "BPEE");
    }

    #[test]
    fn gba_accepts_game_code_as_last_resort() {
        // Neither the branch opcode nor the fixed byte is present; the
        // four-character uppercase-alphanumeric game code still counts.
        let mut rom = vec![0_u8; GBA_MIN_LEN];
        rom[GBA_GAME_CODE_OFFSET..GBA_GAME_CODE_OFFSET + 4].copy_from_slice(b"AXVE");
        let Some(RomHeader::Gba(header)) = parse_header(&rom) else {
            panic!("expected a GBA header");
        };
        assert_eq!(header.game_code, "AXVE");
    }

    #[test]
    fn gba_rejects_garbage_without_any_signal() {
        let mut rom = vec![0_u8; GBA_MIN_LEN];
        rom[GBA_GAME_CODE_OFFSET..GBA_GAME_CODE_OFFSET + 4].copy_from_slice(b"ax!e");
        assert_eq!(parse_header(&rom), None);
    }

    #[test]
    fn gba_buffer_below_minimum_is_unrecognized() {
        let mut rom = vec![0_u8; GBA_MIN_LEN - 1];
        rom[3] = ARM_BRANCH_OPCODE;
        assert_eq!(parse_header(&rom), None);
    }
}
