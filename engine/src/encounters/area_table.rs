//! GB/GBC encounter locator: a fixed-size array of areas at a known offset.
//!
//! Each area is 20 bytes, ten slots of `(level, species)`. The area count is
//! a documented approximation of "every area in the game" and comes from the
//! game configuration. The walk stops early rather than read past the end of
//! the buffer.

use crate::config::GameConfig;
use crate::error::{EngineError, Result};
use crate::species::{internal_to_national, national_to_internal};

use super::{Slot, SlotLocator};

const SLOTS_PER_AREA: usize = 10;
const SLOT_LEN: usize = 2;
const AREA_LEN: usize = SLOTS_PER_AREA * SLOT_LEN;

pub struct AreaTable;

impl SlotLocator for AreaTable {
    fn locate(&self, rom: &[u8], config: &GameConfig) -> Result<Vec<Slot>> {
        let table = config.offset("wild_table")?;
        let area_count = config.size("wild_area_count")?;

        let mut slots = Vec::new();
        for area in 0..area_count {
            let start = table + area * AREA_LEN;
            if start + AREA_LEN > rom.len() {
                break;
            }
            for slot in 0..SLOTS_PER_AREA {
                let at = start + slot * SLOT_LEN;
                let level = rom[at];
                let raw_species = rom[at + 1];
                if level == 0 || raw_species == 0 {
                    continue;
                }
                let national_id = if config.generation == 1 {
                    // An unassigned internal byte is an unsupported species;
                    // skip the slot rather than corrupt it.
                    match internal_to_national(raw_species) {
                        Some(id) => id,
                        None => continue,
                    }
                } else {
                    u16::from(raw_species)
                };
                slots.push(Slot {
                    species_offset: at + 1,
                    national_id,
                });
            }
        }
        Ok(slots)
    }

    fn write(&self, rom: &mut [u8], config: &GameConfig, slot: Slot, national_id: u16) -> Result<()> {
        let byte = if config.generation == 1 {
            national_to_internal(national_id)
                .ok_or(EngineError::UnsupportedSpecies(national_id))?
        } else {
            // Generation 2 stores national numbers natively; ids above 255
            // cannot occur because the pool is capped by the generation.
            national_id as u8
        };
        rom[slot.species_offset] = byte;
        Ok(())
    }
}
