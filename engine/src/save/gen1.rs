//! Generation 1 save synthesis: a 32 KiB battery image with the main data
//! block's 8-bit complement checksum.
//!
//! Layout constants are fixed across Red, Blue and Yellow (US), so they live
//! here rather than in the game table.

use rand::Rng;

use crate::error::{EngineError, Result};
use crate::species::{self, national_to_internal};

use super::{NewSaveRequest, text, to_packed_bcd};

pub const SAVE_LEN: usize = 0x8000;

const OFF_PLAYER_NAME: usize = 0x2598;
const OFF_MONEY: usize = 0x25F3;
const OFF_TRAINER_ID: usize = 0x2605;
const OFF_PARTY: usize = 0x2F2C;
const OFF_CHECKSUM: usize = 0x3523;
// The checksum covers the main data block, name through checksum byte.
const CHECKSUM_START: usize = 0x2598;
const CHECKSUM_END: usize = 0x3523;

const NAME_WIDTH: usize = 11;
const PARTY_CAPACITY: usize = 6;
const PARTY_RECORD_LEN: usize = 44;
const PARTY_RECORDS: usize = 8;
const PARTY_OT_NAMES: usize = PARTY_RECORDS + PARTY_CAPACITY * PARTY_RECORD_LEN;
const PARTY_NICKNAMES: usize = PARTY_OT_NAMES + PARTY_CAPACITY * NAME_WIDTH;
const LIST_TERMINATOR: u8 = 0xFF;

const STARTER_LEVEL: u8 = 5;
const MOVE_TACKLE: u8 = 33;
const TACKLE_PP: u8 = 35;

pub fn build<R: Rng>(request: &NewSaveRequest<'_>, money: u32, rng: &mut R) -> Result<Vec<u8>> {
    let mut save = vec![0_u8; SAVE_LEN];

    let name = text::encode_gb(request.trainer_name, NAME_WIDTH)?;
    save[OFF_PLAYER_NAME..OFF_PLAYER_NAME + NAME_WIDTH].copy_from_slice(&name);
    save[OFF_MONEY..OFF_MONEY + 3].copy_from_slice(&to_packed_bcd(money, 3));

    let trainer_id: u16 = rng.r#gen();
    save[OFF_TRAINER_ID..OFF_TRAINER_ID + 2].copy_from_slice(&trainer_id.to_be_bytes());

    write_party(&mut save, request, trainer_id)?;

    save[OFF_CHECKSUM] = checksum(&save);
    Ok(save)
}

/// 8-bit complement of the byte sum over the main data block. The game
/// verifies this on load and declares the save corrupted otherwise.
fn checksum(save: &[u8]) -> u8 {
    let sum = save[CHECKSUM_START..CHECKSUM_END]
        .iter()
        .fold(0_u8, |acc, &b| acc.wrapping_add(b));
    !sum
}

/// An empty party is a list with count 0 and an immediate terminator; with a
/// starter it carries one species entry, one stats record, and the matching
/// OT-name and nickname strings.
fn write_party(save: &mut [u8], request: &NewSaveRequest<'_>, trainer_id: u16) -> Result<()> {
    save[OFF_PARTY] = 0;
    save[OFF_PARTY + 1] = LIST_TERMINATOR;

    let Some(national_id) = request.starter else {
        return Ok(());
    };
    let starter = species::by_national_id(national_id)
        .ok_or(EngineError::UnsupportedSpecies(national_id))?;
    let internal =
        national_to_internal(national_id).ok_or(EngineError::UnsupportedSpecies(national_id))?;

    save[OFF_PARTY] = 1;
    save[OFF_PARTY + 1] = internal;
    save[OFF_PARTY + 2] = LIST_TERMINATOR;

    let record = &mut save[OFF_PARTY + PARTY_RECORDS..OFF_PARTY + PARTY_RECORDS + PARTY_RECORD_LEN];
    let stats = battle_stats(starter);
    record[0] = internal;
    record[1..3].copy_from_slice(&stats[0].to_be_bytes()); // current HP
    record[3] = STARTER_LEVEL;
    record[5] = type_id(starter.primary_type);
    record[6] = starter
        .secondary_type
        .map_or_else(|| type_id(starter.primary_type), type_id);
    record[8] = MOVE_TACKLE;
    record[12..14].copy_from_slice(&trainer_id.to_be_bytes());
    record[16] = 125; // experience, 3 bytes big-endian, fits in the low byte
    record[29] = TACKLE_PP;
    record[33] = STARTER_LEVEL;
    record[34..36].copy_from_slice(&stats[0].to_be_bytes());
    record[36..38].copy_from_slice(&stats[1].to_be_bytes());
    record[38..40].copy_from_slice(&stats[2].to_be_bytes());
    record[40..42].copy_from_slice(&stats[3].to_be_bytes());
    record[42..44].copy_from_slice(&stats[4].to_be_bytes());

    let ot = text::encode_gb(request.trainer_name, NAME_WIDTH)?;
    save[OFF_PARTY + PARTY_OT_NAMES..OFF_PARTY + PARTY_OT_NAMES + NAME_WIDTH]
        .copy_from_slice(&ot);
    let nickname = text::encode_gb(&text::default_nickname(&starter.name), NAME_WIDTH)?;
    save[OFF_PARTY + PARTY_NICKNAMES..OFF_PARTY + PARTY_NICKNAMES + NAME_WIDTH]
        .copy_from_slice(&nickname);
    Ok(())
}

/// HP, Attack, Defense, Speed, Special for a fresh level-5 member with zero
/// IVs and stat experience. Special collapses the modern Sp. Attack and
/// Sp. Defense pair; the table stores the Sp. Attack value for it.
fn battle_stats(species: &species::SpeciesRecord) -> [u16; 5] {
    let level = u32::from(STARTER_LEVEL);
    let scaled = |base: u16| 2 * u32::from(base) * level / 100;
    [
        (scaled(species.base_stats[0]) + level + 10) as u16,
        (scaled(species.base_stats[1]) + 5) as u16,
        (scaled(species.base_stats[2]) + 5) as u16,
        (scaled(species.base_stats[5]) + 5) as u16,
        (scaled(species.base_stats[3]) + 5) as u16,
    ]
}

/// In-game type identifiers. Steel and Dark postdate this generation; a
/// species carrying one is written as Normal, which the games accept.
fn type_id(t: species::Type) -> u8 {
    match t {
        species::Type::Normal | species::Type::Steel | species::Type::Dark => 0,
        species::Type::Fighting => 1,
        species::Type::Flying => 2,
        species::Type::Poison => 3,
        species::Type::Ground => 4,
        species::Type::Rock => 5,
        species::Type::Bug => 7,
        species::Type::Ghost => 8,
        species::Type::Fire => 20,
        species::Type::Water => 21,
        species::Type::Grass => 22,
        species::Type::Electric => 23,
        species::Type::Psychic => 24,
        species::Type::Ice => 25,
        species::Type::Dragon => 26,
    }
}
