//! Generation 3 save synthesis: a 128 KiB flash image of 4 KiB sections,
//! each carrying a validated footer.
//!
//! Only one save slot is populated; the other stays zeroed and fails the
//! game's signature check, so the populated slot always wins slot
//! arbitration. Section ids are laid out in physical order because a fresh
//! save has no rotation to preserve.

use rand::Rng;

use crate::error::{EngineError, Result};
use crate::species;

use super::{NewSaveRequest, record, text};

pub const SAVE_LEN: usize = 0x20000;

const SECTION_LEN: usize = 0x1000;
const SECTION_COUNT: usize = 14;
/// Bytes of each section actually covered by its checksum. Most sections use
/// 3968; the trainer-info and rival-info sections are shorter.
const SECTION_DATA_LEN: [usize; SECTION_COUNT] = [
    3884, 3968, 3968, 3968, 3848, 3968, 3968, 3968, 3968, 3968, 3968, 3968, 3968, 2000,
];

const FOOTER_ID: usize = 0xFF4;
const FOOTER_CHECKSUM: usize = 0xFF6;
const FOOTER_SIGNATURE: usize = 0xFF8;
const FOOTER_SAVE_INDEX: usize = 0xFFC;
const SIGNATURE: u32 = 0x0801_2025;
const FIRST_SAVE_INDEX: u32 = 1;

// Trainer-info section layout.
const OFF_PLAYER_NAME: usize = 0x00;
const OFF_GENDER: usize = 0x08;
const OFF_TRAINER_ID: usize = 0x0A;
const NAME_WIDTH: usize = 7;

const STARTER_LEVEL: u8 = 5;

pub fn build<R: Rng>(request: &NewSaveRequest<'_>, money: u32, rng: &mut R) -> Result<Vec<u8>> {
    let config = request.config;
    let mut save = vec![0_u8; SAVE_LEN];

    let trainer_id: u32 = rng.r#gen();

    // Section 0: trainer info.
    {
        let section = &mut save[0..SECTION_LEN];
        let name = text::encode_gba(request.trainer_name, NAME_WIDTH)?;
        section[OFF_PLAYER_NAME..OFF_PLAYER_NAME + NAME_WIDTH].copy_from_slice(&name);
        section[OFF_PLAYER_NAME + NAME_WIDTH] = text::GBA_TERMINATOR;
        section[OFF_GENDER] = match request.gender {
            super::TrainerGender::Male => 0,
            super::TrainerGender::Female => 1,
        };
        section[OFF_TRAINER_ID..OFF_TRAINER_ID + 4].copy_from_slice(&trainer_id.to_le_bytes());
    }

    // Section 1: team and money.
    {
        let section = &mut save[SECTION_LEN..2 * SECTION_LEN];
        let money_at = config.offset("money")?;
        section[money_at..money_at + 4].copy_from_slice(&money.to_le_bytes());

        let count_at = config.offset("team_count")?;
        let list_at = config.offset("team_list")?;
        if let Some(national_id) = request.starter {
            if national_id == 0 || national_id > config.species_ceiling {
                return Err(EngineError::UnsupportedSpecies(national_id));
            }
            let starter = species::by_national_id(national_id)
                .ok_or(EngineError::UnsupportedSpecies(national_id))?;
            let member = record::build_record(
                starter,
                rng.r#gen(),
                trainer_id,
                STARTER_LEVEL,
                request.trainer_name,
            )?;
            section[count_at..count_at + 4].copy_from_slice(&1_u32.to_le_bytes());
            section[list_at..list_at + record::RECORD_LEN].copy_from_slice(&member);
        } else {
            section[count_at..count_at + 4].copy_from_slice(&0_u32.to_le_bytes());
        }
    }

    for id in 0..SECTION_COUNT {
        write_footer(&mut save, id);
    }
    Ok(save)
}

/// Stamps one section's footer: id, data checksum, signature, save index.
/// The checksum folds a 32-bit little-endian word sum into 16 bits.
fn write_footer(save: &mut [u8], id: usize) {
    let section = &mut save[id * SECTION_LEN..(id + 1) * SECTION_LEN];

    let mut sum: u32 = 0;
    for word in section[..SECTION_DATA_LEN[id]].chunks_exact(4) {
        sum = sum.wrapping_add(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
    }
    let checksum = ((sum >> 16) + (sum & 0xFFFF)) as u16;

    section[FOOTER_ID..FOOTER_ID + 2].copy_from_slice(&(id as u16).to_le_bytes());
    section[FOOTER_CHECKSUM..FOOTER_CHECKSUM + 2].copy_from_slice(&checksum.to_le_bytes());
    section[FOOTER_SIGNATURE..FOOTER_SIGNATURE + 4].copy_from_slice(&SIGNATURE.to_le_bytes());
    section[FOOTER_SAVE_INDEX..FOOTER_SAVE_INDEX + 4]
        .copy_from_slice(&FIRST_SAVE_INDEX.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::tests::{config, request};
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_emerald(starter: Option<u16>, seed: u64) -> Vec<u8> {
        let mut rng = StdRng::seed_from_u64(seed);
        build(&request(config("emerald"), starter), 3000, &mut rng).unwrap()
    }

    fn section(save: &[u8], id: usize) -> &[u8] {
        &save[id * SECTION_LEN..(id + 1) * SECTION_LEN]
    }

    #[test]
    fn every_section_footer_validates() {
        let save = build_emerald(Some(258), 1);
        for id in 0..SECTION_COUNT {
            let section = section(&save, id);
            assert_eq!(
                u16::from_le_bytes([section[FOOTER_ID], section[FOOTER_ID + 1]]),
                id as u16
            );
            assert_eq!(
                u32::from_le_bytes(section[FOOTER_SIGNATURE..FOOTER_SIGNATURE + 4].try_into().unwrap()),
                SIGNATURE
            );
            assert_eq!(
                u32::from_le_bytes(section[FOOTER_SAVE_INDEX..FOOTER_SAVE_INDEX + 4].try_into().unwrap()),
                FIRST_SAVE_INDEX
            );

            let mut sum: u32 = 0;
            for word in section[..SECTION_DATA_LEN[id]].chunks_exact(4) {
                sum = sum.wrapping_add(u32::from_le_bytes([word[0], word[1], word[2], word[3]]));
            }
            let expected = ((sum >> 16) + (sum & 0xFFFF)) as u16;
            assert_eq!(
                u16::from_le_bytes([section[FOOTER_CHECKSUM], section[FOOTER_CHECKSUM + 1]]),
                expected,
                "section {id}"
            );
        }
    }

    #[test]
    fn trainer_info_section_holds_identity() {
        let save = build_emerald(None, 1);
        let info = section(&save, 0);
        assert_eq!(text::decode_gba(&info[0..8]), "RED");
        assert_eq!(info[OFF_GENDER], 0);
    }

    #[test]
    fn money_and_team_land_in_section_one() {
        let save = build_emerald(Some(258), 2);
        let config = config("emerald");
        let team = section(&save, 1);

        let money_at = config.offset("money").unwrap();
        assert_eq!(&team[money_at..money_at + 4], &3000_u32.to_le_bytes());

        let count_at = config.offset("team_count").unwrap();
        assert_eq!(&team[count_at..count_at + 4], &1_u32.to_le_bytes());

        let list_at = config.offset("team_list").unwrap();
        let member: [u8; record::RECORD_LEN] =
            team[list_at..list_at + record::RECORD_LEN].try_into().unwrap();
        let blocks = record::decrypted_blocks(&member);
        assert_eq!(u16::from_le_bytes([blocks[0][0], blocks[0][1]]), 258);

        // The member's trainer id matches the one stamped in section 0.
        let info = section(&save, 0);
        assert_eq!(&member[4..8], &info[OFF_TRAINER_ID..OFF_TRAINER_ID + 4]);
    }

    #[test]
    fn empty_team_has_zero_count() {
        let save = build_emerald(None, 3);
        let count_at = config("emerald").offset("team_count").unwrap();
        assert_eq!(&section(&save, 1)[count_at..count_at + 4], &0_u32.to_le_bytes());
    }

    #[test]
    fn species_above_the_ceiling_are_rejected() {
        let mut rng = StdRng::seed_from_u64(4);
        let err = build(&request(config("emerald"), Some(387)), 3000, &mut rng).unwrap_err();
        assert_eq!(err, EngineError::UnsupportedSpecies(387));
    }
}
