//! Generation 3 party-member records.
//!
//! The interesting part of the 100-byte record is the 48-byte substructure:
//! four 12-byte blocks whose order is a permutation selected by the
//! personality value, XOR-encrypted word-by-word with a key derived from the
//! personality value and trainer id, and covered by a 16-bit checksum the
//! game verifies on load. Any of the three being wrong turns the member into
//! a Bad Egg, so all three are built here together.

use crate::error::Result;
use crate::species::SpeciesRecord;

use super::text;

pub const RECORD_LEN: usize = 100;

const OFF_PERSONALITY: usize = 0x00;
const OFF_OT_ID: usize = 0x04;
const OFF_NICKNAME: usize = 0x08;
const OFF_LANGUAGE: usize = 0x12;
const OFF_OT_NAME: usize = 0x14;
const OFF_CHECKSUM: usize = 0x1C;
const OFF_SUBSTRUCT: usize = 0x20;
const SUBSTRUCT_LEN: usize = 48;
const BLOCK_LEN: usize = 12;

const OFF_LEVEL: usize = 0x54;
const OFF_CURRENT_HP: usize = 0x56;
const OFF_TOTAL_HP: usize = 0x58;
const OFF_ATTACK: usize = 0x5A;
const OFF_DEFENSE: usize = 0x5C;
const OFF_SPEED: usize = 0x5E;
const OFF_SP_ATTACK: usize = 0x60;
const OFF_SP_DEFENSE: usize = 0x62;

const LANGUAGE_ENGLISH: u8 = 0x02;
const NICKNAME_WIDTH: usize = 10;
const OT_NAME_WIDTH: usize = 7;

const MOVE_TACKLE: u16 = 33;
const TACKLE_PP: u8 = 35;
const STARTER_EXPERIENCE: u32 = 125;
const BASE_FRIENDSHIP: u8 = 70;

/// Substructure block ids: Growth, Attacks, EVs, Misc.
const GROWTH: usize = 0;
const ATTACKS: usize = 1;

/// The 24 substructure orderings, indexed by `personality % 24`. The
/// canonical table is exactly the permutations of (G, A, E, M) in
/// lexicographic order.
#[rustfmt::skip]
const BLOCK_ORDERS: [[usize; 4]; 24] = [
    [0, 1, 2, 3], [0, 1, 3, 2], [0, 2, 1, 3], [0, 2, 3, 1], [0, 3, 1, 2], [0, 3, 2, 1],
    [1, 0, 2, 3], [1, 0, 3, 2], [1, 2, 0, 3], [1, 2, 3, 0], [1, 3, 0, 2], [1, 3, 2, 0],
    [2, 0, 1, 3], [2, 0, 3, 1], [2, 1, 0, 3], [2, 1, 3, 0], [2, 3, 0, 1], [2, 3, 1, 0],
    [3, 0, 1, 2], [3, 0, 2, 1], [3, 1, 0, 2], [3, 1, 2, 0], [3, 2, 0, 1], [3, 2, 1, 0],
];

/// Which block id occupies each of the four substructure positions for this
/// personality value.
#[must_use]
pub fn block_order(personality: u32) -> [usize; 4] {
    BLOCK_ORDERS[(personality % 24) as usize]
}

/// Builds a complete, encrypted, checksummed party record for one species at
/// the given level, owned by the given trainer.
///
/// # Errors
///
/// Fails when the species name or trainer name cannot be encoded.
pub fn build_record(
    species: &SpeciesRecord,
    personality: u32,
    ot_id: u32,
    level: u8,
    ot_name: &str,
) -> Result<[u8; RECORD_LEN]> {
    let mut record = [0_u8; RECORD_LEN];

    record[OFF_PERSONALITY..OFF_PERSONALITY + 4].copy_from_slice(&personality.to_le_bytes());
    record[OFF_OT_ID..OFF_OT_ID + 4].copy_from_slice(&ot_id.to_le_bytes());

    let nickname = text::encode_gba(&text::default_nickname(&species.name), NICKNAME_WIDTH)?;
    record[OFF_NICKNAME..OFF_NICKNAME + NICKNAME_WIDTH].copy_from_slice(&nickname);
    record[OFF_LANGUAGE] = LANGUAGE_ENGLISH;
    let ot = text::encode_gba(ot_name, OT_NAME_WIDTH)?;
    record[OFF_OT_NAME..OFF_OT_NAME + OT_NAME_WIDTH].copy_from_slice(&ot);

    // Blocks are built in id order, then placed per the personality's
    // ordering before encryption.
    let mut blocks = [[0_u8; BLOCK_LEN]; 4];
    blocks[GROWTH][0..2].copy_from_slice(&species.national_id.to_le_bytes());
    blocks[GROWTH][4..8].copy_from_slice(&STARTER_EXPERIENCE.to_le_bytes());
    blocks[GROWTH][9] = BASE_FRIENDSHIP;
    blocks[ATTACKS][0..2].copy_from_slice(&MOVE_TACKLE.to_le_bytes());
    blocks[ATTACKS][8] = TACKLE_PP;

    let order = block_order(personality);
    let mut substruct = [0_u8; SUBSTRUCT_LEN];
    for (position, &block_id) in order.iter().enumerate() {
        substruct[position * BLOCK_LEN..(position + 1) * BLOCK_LEN]
            .copy_from_slice(&blocks[block_id]);
    }

    let mut checksum: u16 = 0;
    for word in substruct.chunks_exact(2) {
        checksum = checksum.wrapping_add(u16::from_le_bytes([word[0], word[1]]));
    }
    record[OFF_CHECKSUM..OFF_CHECKSUM + 2].copy_from_slice(&checksum.to_le_bytes());

    let key = personality ^ ot_id;
    for (chunk, target) in substruct
        .chunks_exact(4)
        .zip(record[OFF_SUBSTRUCT..OFF_SUBSTRUCT + SUBSTRUCT_LEN].chunks_exact_mut(4))
    {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ key;
        target.copy_from_slice(&word.to_le_bytes());
    }

    let stats = battle_stats(species, level);
    record[OFF_LEVEL] = level;
    record[OFF_CURRENT_HP..OFF_CURRENT_HP + 2].copy_from_slice(&stats[0].to_le_bytes());
    record[OFF_TOTAL_HP..OFF_TOTAL_HP + 2].copy_from_slice(&stats[0].to_le_bytes());
    record[OFF_ATTACK..OFF_ATTACK + 2].copy_from_slice(&stats[1].to_le_bytes());
    record[OFF_DEFENSE..OFF_DEFENSE + 2].copy_from_slice(&stats[2].to_le_bytes());
    record[OFF_SP_ATTACK..OFF_SP_ATTACK + 2].copy_from_slice(&stats[3].to_le_bytes());
    record[OFF_SP_DEFENSE..OFF_SP_DEFENSE + 2].copy_from_slice(&stats[4].to_le_bytes());
    record[OFF_SPEED..OFF_SPEED + 2].copy_from_slice(&stats[5].to_le_bytes());

    Ok(record)
}

/// Battle stats for a fresh member with zero IVs and EVs: HP is
/// `2 * base * level / 100 + level + 10`, everything else
/// `2 * base * level / 100 + 5`. Returned as HP, Atk, Def, SpA, SpD, Spe.
fn battle_stats(species: &SpeciesRecord, level: u8) -> [u16; 6] {
    let level = u32::from(level);
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

/// Decrypts a record's substructure and returns the four blocks in id order
/// (Growth, Attacks, EVs, Misc). Test support.
#[cfg(test)]
pub(crate) fn decrypted_blocks(record: &[u8; RECORD_LEN]) -> [[u8; BLOCK_LEN]; 4] {
    let personality = u32::from_le_bytes(record[0..4].try_into().unwrap());
    let ot_id = u32::from_le_bytes(record[4..8].try_into().unwrap());
    let key = personality ^ ot_id;

    let mut substruct = [0_u8; SUBSTRUCT_LEN];
    for (chunk, target) in record[OFF_SUBSTRUCT..OFF_SUBSTRUCT + SUBSTRUCT_LEN]
        .chunks_exact(4)
        .zip(substruct.chunks_exact_mut(4))
    {
        let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ key;
        target.copy_from_slice(&word.to_le_bytes());
    }

    let order = block_order(personality);
    let mut blocks = [[0_u8; BLOCK_LEN]; 4];
    for (position, &block_id) in order.iter().enumerate() {
        blocks[block_id]
            .copy_from_slice(&substruct[position * BLOCK_LEN..(position + 1) * BLOCK_LEN]);
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species;
    use pretty_assertions::assert_eq;

    fn mudkip() -> &'static SpeciesRecord {
        species::by_national_id(258).unwrap()
    }

    #[test]
    fn block_orders_cover_all_permutations_exactly_once() {
        let mut seen = std::collections::BTreeSet::new();
        for order in BLOCK_ORDERS {
            let mut sorted = order;
            sorted.sort_unstable();
            assert_eq!(sorted, [0, 1, 2, 3]);
            assert!(seen.insert(order), "{order:?} appears twice");
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn growth_block_survives_encryption_for_every_ordering() {
        // 24 personalities, one per block ordering.
        for residue in 0..24_u32 {
            let personality = 0x1200 + residue;
            let record = build_record(mudkip(), personality, 0xDEAD_BEEF, 5, "MAY").unwrap();
            let blocks = decrypted_blocks(&record);
            let species_id = u16::from_le_bytes([blocks[GROWTH][0], blocks[GROWTH][1]]);
            assert_eq!(species_id, 258, "ordering {}", personality % 24);
            assert_eq!(blocks[GROWTH][9], BASE_FRIENDSHIP);
            assert_eq!(
                u16::from_le_bytes([blocks[ATTACKS][0], blocks[ATTACKS][1]]),
                MOVE_TACKLE
            );
        }
    }

    #[test]
    fn checksum_matches_decrypted_substructure() {
        let record = build_record(mudkip(), 0x0BAD_F00D, 0x1234_5678, 5, "MAY").unwrap();
        let blocks = decrypted_blocks(&record);

        let order = block_order(0x0BAD_F00D);
        let mut expected: u16 = 0;
        for &block_id in &order {
            for word in blocks[block_id].chunks_exact(2) {
                expected = expected.wrapping_add(u16::from_le_bytes([word[0], word[1]]));
            }
        }
        let stored = u16::from_le_bytes([record[OFF_CHECKSUM], record[OFF_CHECKSUM + 1]]);
        assert_eq!(stored, expected);
    }

    #[test]
    fn party_stats_follow_the_level_formula() {
        // Mudkip base stats: 50/70/50/50/50/40.
        let record = build_record(mudkip(), 1, 2, 5, "MAY").unwrap();
        assert_eq!(record[OFF_LEVEL], 5);
        let hp = u16::from_le_bytes([record[OFF_TOTAL_HP], record[OFF_TOTAL_HP + 1]]);
        assert_eq!(hp, 2 * 50 * 5 / 100 + 5 + 10);
        let current = u16::from_le_bytes([record[OFF_CURRENT_HP], record[OFF_CURRENT_HP + 1]]);
        assert_eq!(current, hp, "starter spawns at full health");
        let attack = u16::from_le_bytes([record[OFF_ATTACK], record[OFF_ATTACK + 1]]);
        assert_eq!(attack, 2 * 70 * 5 / 100 + 5);
    }

    #[test]
    fn identity_fields_are_stored_plaintext() {
        let record = build_record(mudkip(), 0xAABB_CCDD, 0x1122_3344, 5, "MAY").unwrap();
        assert_eq!(&record[0..4], &0xAABB_CCDD_u32.to_le_bytes());
        assert_eq!(&record[4..8], &0x1122_3344_u32.to_le_bytes());
        assert_eq!(text::decode_gba(&record[OFF_NICKNAME..OFF_NICKNAME + 10]), "MUDKIP");
        assert_eq!(text::decode_gba(&record[OFF_OT_NAME..OFF_OT_NAME + 7]), "MAY");
        assert_eq!(record[OFF_LANGUAGE], LANGUAGE_ENGLISH);
    }
}
