//! Generation 2 save synthesis: a 32 KiB battery image with two 16-bit sum
//! checksums over configuration-defined regions.
//!
//! Unlike Generation 1, the data layout moved between Gold/Silver and
//! Crystal, so every offset comes from the game table instead of constants.

use rand::Rng;

use crate::config::GameConfig;
use crate::error::{EngineError, Result};
use crate::species;

use super::{NewSaveRequest, text, to_packed_bcd};

pub const SAVE_LEN: usize = 0x8000;

const NAME_WIDTH: usize = 11;
const PARTY_CAPACITY: usize = 6;
const PARTY_RECORD_LEN: usize = 48;
const PARTY_RECORDS: usize = 8;
const PARTY_OT_NAMES: usize = PARTY_RECORDS + PARTY_CAPACITY * PARTY_RECORD_LEN;
const PARTY_NICKNAMES: usize = PARTY_OT_NAMES + PARTY_CAPACITY * NAME_WIDTH;
const LIST_TERMINATOR: u8 = 0xFF;

const STARTER_LEVEL: u8 = 5;
const MOVE_TACKLE: u8 = 33;
const TACKLE_PP: u8 = 35;

pub fn build<R: Rng>(request: &NewSaveRequest<'_>, money: u32, rng: &mut R) -> Result<Vec<u8>> {
    let config = request.config;
    let mut save = vec![0_u8; SAVE_LEN];

    let name = text::encode_gb(request.trainer_name, NAME_WIDTH)?;
    let name_at = config.offset("player_name")?;
    save[name_at..name_at + NAME_WIDTH].copy_from_slice(&name);

    let money_at = config.offset("money")?;
    save[money_at..money_at + 3].copy_from_slice(&to_packed_bcd(money, 3));

    let trainer_id: u16 = rng.r#gen();
    let id_at = config.offset("trainer_id")?;
    save[id_at..id_at + 2].copy_from_slice(&trainer_id.to_be_bytes());

    write_party(&mut save, request, trainer_id)?;

    write_checksum(&mut save, config, "main_sum_start", "main_sum_end", "main_sum_addr")?;
    write_checksum(&mut save, config, "box_sum_start", "box_sum_end", "box_sum_addr")?;
    Ok(save)
}

/// 16-bit byte sum over an inclusive region, stored little-endian at the
/// configured address.
fn write_checksum(
    save: &mut [u8],
    config: &GameConfig,
    start_key: &'static str,
    end_key: &'static str,
    addr_key: &'static str,
) -> Result<()> {
    let start = config.offset(start_key)?;
    let end = config.offset(end_key)?;
    let addr = config.offset(addr_key)?;

    let sum = save[start..=end]
        .iter()
        .fold(0_u16, |acc, &b| acc.wrapping_add(u16::from(b)));
    save[addr..addr + 2].copy_from_slice(&sum.to_le_bytes());
    Ok(())
}

fn write_party(save: &mut [u8], request: &NewSaveRequest<'_>, trainer_id: u16) -> Result<()> {
    let party = request.config.offset("party")?;
    save[party] = 0;
    save[party + 1] = LIST_TERMINATOR;

    let Some(national_id) = request.starter else {
        return Ok(());
    };
    if national_id == 0 || national_id > request.config.species_ceiling {
        return Err(EngineError::UnsupportedSpecies(national_id));
    }
    let starter = species::by_national_id(national_id)
        .ok_or(EngineError::UnsupportedSpecies(national_id))?;

    // This generation indexes species by national number directly.
    let species_byte = national_id as u8;
    save[party] = 1;
    save[party + 1] = species_byte;
    save[party + 2] = LIST_TERMINATOR;

    let record = &mut save[party + PARTY_RECORDS..party + PARTY_RECORDS + PARTY_RECORD_LEN];
    let stats = battle_stats(starter);
    record[0] = species_byte;
    record[2] = MOVE_TACKLE;
    record[6..8].copy_from_slice(&trainer_id.to_be_bytes());
    record[10] = 125; // experience, 3 bytes big-endian, fits in the low byte
    record[23] = TACKLE_PP;
    record[27] = 70; // friendship
    record[31] = STARTER_LEVEL;
    record[34..36].copy_from_slice(&stats[0].to_be_bytes()); // current HP
    record[36..38].copy_from_slice(&stats[0].to_be_bytes()); // max HP
    record[38..40].copy_from_slice(&stats[1].to_be_bytes());
    record[40..42].copy_from_slice(&stats[2].to_be_bytes());
    record[42..44].copy_from_slice(&stats[5].to_be_bytes());
    record[44..46].copy_from_slice(&stats[3].to_be_bytes());
    record[46..48].copy_from_slice(&stats[4].to_be_bytes());

    let ot = text::encode_gb(request.trainer_name, NAME_WIDTH)?;
    save[party + PARTY_OT_NAMES..party + PARTY_OT_NAMES + NAME_WIDTH].copy_from_slice(&ot);
    let nickname = text::encode_gb(&text::default_nickname(&starter.name), NAME_WIDTH)?;
    save[party + PARTY_NICKNAMES..party + PARTY_NICKNAMES + NAME_WIDTH]
        .copy_from_slice(&nickname);
    Ok(())
}

/// HP, Attack, Defense, Sp. Attack, Sp. Defense, Speed at the starter level,
/// zero IVs and stat experience.
fn battle_stats(species: &species::SpeciesRecord) -> [u16; 6] {
    let level = u32::from(STARTER_LEVEL);
    let scaled = |base: u16| 2 * u32::from(base) * level / 100;
    [
        (scaled(species.base_stats[0]) + level + 10) as u16,
        (scaled(species.base_stats[1]) + 5) as u16,
        (scaled(species.base_stats[2]) + 5) as u16,
        (scaled(species.base_stats[3]) + 5) as u16,
        (scaled(species.base_stats[4]) + 5) as u16,
        (scaled(species.base_stats[5]) + 5) as u16,
    ]
}
