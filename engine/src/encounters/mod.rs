//! Wild-encounter randomization.
//!
//! Two structurally different table-location strategies sit behind the
//! [`SlotLocator`] trait: GB/GBC games carry a fixed array of areas at a
//! known offset, while GBA games are pattern-matched with a heuristic scan.
//! Replacement selection is shared and independent of where slots came from.

mod area_table;
mod scan;

pub use area_table::AreaTable;
pub use scan::{HeuristicScan, ScanParams};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GameConfig, Platform};
use crate::error::{EngineError, Result};
use crate::species::{self, SpeciesRecord};

/// Player-chosen constraints for one randomization run. Passed fresh per
/// call; the engine keeps no state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomizeOptions {
    /// Prefer replacements sharing at least one type with the original.
    pub same_type: bool,
    /// Prefer replacements whose base-stat total is close to the original's.
    pub match_bst: bool,
    /// Allowed distance from the original's base-stat total.
    pub bst_variance: u16,
    pub include_legendaries: bool,
}

impl Default for RandomizeOptions {
    fn default() -> Self {
        Self {
            same_type: false,
            match_bst: false,
            bst_variance: 50,
            include_legendaries: false,
        }
    }
}

/// One rewritten slot, recorded by name for observability and testing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotChange {
    pub original: String,
    pub replacement: String,
}

#[derive(Debug, Default, Serialize)]
pub struct RandomizeReport {
    pub total_changes: usize,
    pub changes: Vec<SlotChange>,
}

/// A located encounter slot: where its species field lives in the buffer and
/// the National dex number currently stored there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Slot {
    pub species_offset: usize,
    pub national_id: u16,
}

/// Finds encounter slots in a ROM image and writes species back into them.
///
/// The GBA implementation is a best-effort pattern match, so this seam is
/// kept swappable: a future precise table-offset strategy can replace it
/// without touching the GB/GBC path or the selection policy.
pub(crate) trait SlotLocator {
    fn locate(&self, rom: &[u8], config: &GameConfig) -> Result<Vec<Slot>>;
    fn write(&self, rom: &mut [u8], config: &GameConfig, slot: Slot, national_id: u16)
    -> Result<()>;
}

/// Rewrites species bytes inside the buffer's encounter tables in place,
/// subject to `options`. Levels are never touched.
///
/// # Errors
///
/// Fails before mutating anything if the candidate pool is empty or the
/// configuration lacks the offsets its platform strategy needs.
pub fn randomize_wild_encounters<R: Rng>(
    rom: &mut [u8],
    config: &GameConfig,
    options: &RandomizeOptions,
    rng: &mut R,
) -> Result<RandomizeReport> {
    let pool = species::pool(config.generation, options.include_legendaries);
    if pool.is_empty() {
        return Err(EngineError::EmptyPool);
    }

    let locator: Box<dyn SlotLocator> = match config.platform {
        Platform::Gba => Box::new(HeuristicScan::from_config(config)),
        Platform::Gb | Platform::Gbc => Box::new(AreaTable),
    };

    let slots = locator.locate(rom, config)?;
    debug!(game = %config.game_id, slots = slots.len(), "located encounter slots");

    let mut report = RandomizeReport::default();
    for slot in slots {
        // A species id outside the reference table short-circuits this one
        // slot; neighbouring bytes are left alone.
        let Some(original) = species::by_national_id(slot.national_id) else {
            continue;
        };
        let replacement = select_replacement(original, &pool, options, rng);
        locator.write(rom, config, slot, replacement.national_id)?;
        report.changes.push(SlotChange {
            original: original.name.clone(),
            replacement: replacement.name.clone(),
        });
    }
    report.total_changes = report.changes.len();
    debug!(game = %config.game_id, changes = report.total_changes, "randomized encounters");
    Ok(report)
}

/// Selection policy, tried in order, first success wins: same-type, then
/// BST-within-variance, then uniform over the whole pool.
fn select_replacement<'a, R: Rng>(
    original: &SpeciesRecord,
    pool: &[&'a SpeciesRecord],
    options: &RandomizeOptions,
    rng: &mut R,
) -> &'a SpeciesRecord {
    if options.same_type {
        let candidates: Vec<&SpeciesRecord> = pool
            .iter()
            .copied()
            .filter(|s| s.shares_type(original))
            .collect();
        if !candidates.is_empty() {
            return candidates[rng.gen_range(0..candidates.len())];
        }
    }

    if options.match_bst {
        let target = i32::from(original.base_stat_total());
        let variance = i32::from(options.bst_variance);
        let candidates: Vec<&SpeciesRecord> = pool
            .iter()
            .copied()
            .filter(|s| (i32::from(s.base_stat_total()) - target).abs() <= variance)
            .collect();
        if !candidates.is_empty() {
            return candidates[rng.gen_range(0..candidates.len())];
        }
    }

    pool[rng.gen_range(0..pool.len())]
}
