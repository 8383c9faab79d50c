//! Known-game configurations and the three-tier matcher that pairs a parsed
//! header (or bare filename) with one of them.
//!
//! Matching is deliberately three discrete, ordered strategies rather than a
//! single scoring function: exact GBA game code, then title containment for
//! GB/GBC, then a filename word-count fallback. Determinism matters more
//! than marginal recall here, so the first hit wins and ties are not ranked.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::header::RomHeader;

/// Minimum number of display-name words that must appear in a filename for
/// the last-resort heuristic to accept a configuration.
const FILENAME_WORD_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Gb,
    Gbc,
    Gba,
}

/// Immutable descriptor of one supported game: generation, platform and the
/// per-game byte offsets and structure sizes every mutating operation keys
/// off. Loaded once from a static table and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Stable identifier, e.g. `"emerald"`.
    pub game_id: String,
    /// Display name, e.g. `"Pokemon Emerald"`.
    pub name: String,
    /// GBA 4-character game code; absent for GB/GBC entries.
    #[serde(default)]
    pub game_code: Option<String>,
    pub platform: Platform,
    pub generation: u8,
    pub region: String,
    /// Highest species id valid for this game.
    pub species_ceiling: u16,
    /// Named byte offsets into ROM or save images.
    #[serde(default)]
    pub offsets: BTreeMap<String, u32>,
    /// Named structure sizes and counts.
    #[serde(default)]
    pub sizes: BTreeMap<String, u32>,
}

impl GameConfig {
    /// Looks up a named byte offset, failing with enough detail to tell a
    /// bad table apart from an unsupported game.
    pub fn offset(&self, name: &'static str) -> Result<usize> {
        self.offsets
            .get(name)
            .map(|&value| value as usize)
            .ok_or_else(|| EngineError::MissingOffset {
                game: self.game_id.clone(),
                name,
            })
    }

    /// Looks up a named structure size or count.
    pub fn size(&self, name: &'static str) -> Result<usize> {
        self.sizes
            .get(name)
            .map(|&value| value as usize)
            .ok_or_else(|| EngineError::MissingSize {
                game: self.game_id.clone(),
                name,
            })
    }

    #[must_use]
    pub fn info(&self) -> GameInfo {
        GameInfo {
            game_id: self.game_id.clone(),
            name: self.name.clone(),
            platform: self.platform,
            generation: self.generation,
            region: self.region.clone(),
        }
    }
}

/// Summary descriptor handed to the surrounding application once a buffer
/// has been matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    pub game_id: String,
    pub name: String,
    pub platform: Platform,
    pub generation: u8,
    pub region: String,
}

#[derive(Deserialize)]
struct ConfigTable {
    game: Vec<GameConfig>,
}

/// Parses and validates a game-configuration table from TOML.
pub fn load_configs(toml_src: &str) -> Result<Vec<GameConfig>> {
    let table: ConfigTable =
        toml::from_str(toml_src).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

    let mut seen = std::collections::BTreeSet::new();
    for config in &table.game {
        if !(1..=3).contains(&config.generation) {
            return Err(EngineError::InvalidConfig(format!(
                "{}: generation {} out of range",
                config.game_id, config.generation
            )));
        }
        if config.platform == Platform::Gba && config.game_code.is_none() {
            return Err(EngineError::InvalidConfig(format!(
                "{}: GBA entry without a game code",
                config.game_id
            )));
        }
        if !seen.insert(config.game_id.clone()) {
            return Err(EngineError::InvalidConfig(format!(
                "duplicate game_id {}",
                config.game_id
            )));
        }
        check_required_keys(config)?;
    }
    Ok(table.game)
}

/// Offsets and sizes every operation on the entry's generation keys off.
/// Missing ones fail here at load time instead of mid-operation.
fn check_required_keys(config: &GameConfig) -> Result<()> {
    let (offsets, sizes): (&[&str], &[&str]) = match config.generation {
        1 => (&["wild_table"], &["wild_area_count"]),
        2 => (
            &[
                "wild_table",
                "player_name",
                "trainer_id",
                "money",
                "party",
                "main_sum_start",
                "main_sum_end",
                "main_sum_addr",
                "box_sum_start",
                "box_sum_end",
                "box_sum_addr",
            ],
            &["wild_area_count"],
        ),
        _ => (&["money", "team_count", "team_list"], &[]),
    };

    for &key in offsets {
        if !config.offsets.contains_key(key) {
            return Err(EngineError::InvalidConfig(format!(
                "{}: missing required offset `{key}`",
                config.game_id
            )));
        }
    }
    for &key in sizes {
        if !config.sizes.contains_key(key) {
            return Err(EngineError::InvalidConfig(format!(
                "{}: missing required size `{key}`",
                config.game_id
            )));
        }
    }
    Ok(())
}

static BUILTIN: Lazy<Vec<GameConfig>> = Lazy::new(|| {
    load_configs(include_str!("../data/games.toml")).expect("embedded game table is valid")
});

/// The game table shipped with the engine. Callers may also load their own
/// via [`load_configs`].
#[must_use]
pub fn builtin_configs() -> &'static [GameConfig] {
    &BUILTIN
}

/// Maps a parsed header (plus filename fallback) to a known configuration.
///
/// Strategies are tried in strict priority order; `None` means the file is
/// unsupported or corrupted and callers must not guess.
#[must_use]
pub fn find_config<'a>(
    header: Option<&RomHeader>,
    file_name: &str,
    configs: &'a [GameConfig],
) -> Option<&'a GameConfig> {
    let matched = match header {
        Some(RomHeader::Gba(h)) => match_game_code(&h.game_code, configs),
        Some(RomHeader::Gb(h)) => match_title(&h.title, configs),
        None => None,
    };

    let matched = matched.or_else(|| match_file_name(file_name, configs));
    match matched {
        Some(config) => debug!(game = %config.game_id, "matched configuration"),
        None => debug!(file_name, "no configuration matched"),
    }
    matched
}

/// Tier 1: exact case-insensitive GBA game-code match.
fn match_game_code<'a>(game_code: &str, configs: &'a [GameConfig]) -> Option<&'a GameConfig> {
    if game_code.is_empty() {
        return None;
    }
    configs
        .iter()
        .filter(|c| c.platform == Platform::Gba)
        .find(|c| {
            c.game_code
                .as_deref()
                .is_some_and(|code| code.eq_ignore_ascii_case(game_code))
        })
}

/// Tier 2: three alternative containment tests between the ROM title and the
/// configured display name, first match wins.
fn match_title<'a>(title: &str, configs: &'a [GameConfig]) -> Option<&'a GameConfig> {
    let title = title.trim().to_uppercase();
    if title.is_empty() {
        return None;
    }
    configs.iter().filter(|c| c.platform != Platform::Gba).find(|c| {
        let raw = c.name.to_uppercase();
        let stripped = raw.replace("POKEMON ", "");
        title.contains(&stripped) || stripped.contains(&title) || raw.contains(&title)
    })
}

/// Tier 3: count how many words of each display name appear in the filename;
/// accept the first configuration with at least two hits.
fn match_file_name<'a>(file_name: &str, configs: &'a [GameConfig]) -> Option<&'a GameConfig> {
    let file_name = file_name.to_lowercase();
    configs.iter().find(|c| {
        let hits = c
            .name
            .split_whitespace()
            .filter(|word| file_name.contains(&word.to_lowercase()))
            .count();
        hits >= FILENAME_WORD_THRESHOLD
    })
}
