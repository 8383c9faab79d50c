//! GBA encounter locator: a heuristic scan for windows shaped like
//! encounter slots.
//!
//! GBA games have no fixed area table the engine can walk, so 4-byte-aligned
//! windows across a large address range are pattern-matched against the slot
//! shape `(min_level, max_level, species:u16le)`. This is a best-effort
//! match: it can miss real slots and can, rarely, rewrite coincidental data
//! that happens to look like one. Callers and testers should treat its
//! output accordingly. The thresholds are empirical constants, kept
//! configurable rather than baked in.

use crate::config::GameConfig;
use crate::error::Result;

use super::{Slot, SlotLocator};

const WINDOW_LEN: usize = 4;

/// Empirical scan constants. Defaults cover the address range where the
/// supported games keep their encounter data; per-game overrides come from
/// the configuration's `scan_start`/`scan_end` offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanParams {
    pub range_start: usize,
    pub range_end: usize,
    pub min_level: u8,
    pub max_level: u8,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            range_start: 0x0004_0000,
            range_end: 0x00A0_0000,
            min_level: 2,
            max_level: 100,
        }
    }
}

pub struct HeuristicScan {
    params: ScanParams,
}

impl HeuristicScan {
    #[must_use]
    pub const fn new(params: ScanParams) -> Self {
        Self { params }
    }

    /// Builds a scanner from a game configuration, falling back to the
    /// default range where the config is silent.
    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        let defaults = ScanParams::default();
        Self {
            params: ScanParams {
                range_start: config
                    .offsets
                    .get("scan_start")
                    .map_or(defaults.range_start, |&v| v as usize),
                range_end: config
                    .offsets
                    .get("scan_end")
                    .map_or(defaults.range_end, |&v| v as usize),
                ..defaults
            },
        }
    }

    fn window_species(&self, window: &[u8], ceiling: u16) -> Option<u16> {
        let min_level = window[0];
        let max_level = window[1];
        if min_level < self.params.min_level || min_level > self.params.max_level {
            return None;
        }
        if max_level < min_level || max_level > self.params.max_level {
            return None;
        }
        let species = u16::from_le_bytes([window[2], window[3]]);
        if species == 0 || species > ceiling {
            return None;
        }
        Some(species)
    }
}

impl SlotLocator for HeuristicScan {
    fn locate(&self, rom: &[u8], config: &GameConfig) -> Result<Vec<Slot>> {
        let start = self.params.range_start.min(rom.len());
        let end = self.params.range_end.min(rom.len());

        let mut slots = Vec::new();
        let mut at = start;
        while at + WINDOW_LEN <= end {
            if let Some(species) = self.window_species(&rom[at..at + WINDOW_LEN], config.species_ceiling)
            {
                slots.push(Slot {
                    species_offset: at + 2,
                    national_id: species,
                });
            }
            at += WINDOW_LEN;
        }
        Ok(slots)
    }

    fn write(&self, rom: &mut [u8], _config: &GameConfig, slot: Slot, national_id: u16)
    -> Result<()> {
        rom[slot.species_offset..slot.species_offset + 2]
            .copy_from_slice(&national_id.to_le_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin_configs;
    use pretty_assertions::assert_eq;

    fn config() -> &'static GameConfig {
        builtin_configs()
            .iter()
            .find(|c| c.game_id == "emerald")
            .unwrap()
    }

    fn scanner() -> HeuristicScan {
        HeuristicScan::new(ScanParams {
            range_start: 0,
            range_end: 0x100,
            ..ScanParams::default()
        })
    }

    #[test]
    fn accepts_a_well_formed_window() {
        let mut rom = vec![0_u8; 0x100];
        rom[0..4].copy_from_slice(&[5, 8, 0x19, 0x01]); // levels 5-8, species 281
        let slots = scanner().locate(&rom, config()).unwrap();
        assert_eq!(slots, vec![Slot { species_offset: 2, national_id: 281 }]);
    }

    #[test]
    fn rejects_malformed_windows() {
        let cases: [[u8; 4]; 5] = [
            [1, 8, 0x19, 0x01],   // min level below threshold
            [5, 4, 0x19, 0x01],   // max below min
            [5, 101, 0x19, 0x01], // max above 100
            [5, 8, 0x00, 0x00],   // species zero
            [5, 8, 0x83, 0x01],   // species 387, past the ceiling
        ];
        for case in cases {
            let mut rom = vec![0_u8; 0x100];
            rom[0..4].copy_from_slice(&case);
            let slots = scanner().locate(&rom, config()).unwrap();
            assert_eq!(slots, vec![], "{case:?} should not match");
        }
    }

    #[test]
    fn range_is_clamped_to_the_buffer() {
        let rom = vec![0_u8; 0x40]; // shorter than the configured range
        let slots = HeuristicScan::from_config(config()).locate(&rom, config()).unwrap();
        assert_eq!(slots, vec![]);
    }

    #[test]
    fn config_overrides_take_effect() {
        let scan = HeuristicScan::from_config(config());
        assert_eq!(scan.params.range_start, 0x40000);
        assert_eq!(scan.params.range_end, 0xA0_0000);
    }

    #[test]
    fn write_touches_only_the_species_field() {
        let mut rom = vec![0_u8; 0x100];
        rom[0..4].copy_from_slice(&[5, 8, 0x19, 0x01]);
        let scan = scanner();
        let slots = scan.locate(&rom, config()).unwrap();
        scan.write(&mut rom, config(), slots[0], 386).unwrap();
        assert_eq!(&rom[0..4], &[5, 8, 0x82, 0x01]);
    }
}
