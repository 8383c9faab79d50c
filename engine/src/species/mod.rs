//! Species reference data.
//!
//! The full table (386 entries, Generations 1-3) is embedded as CSV and
//! parsed once at first use. It is read-only after that; randomization pools
//! are filtered views over it.

mod gen1_index;

pub use gen1_index::{internal_to_national, national_to_internal};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
}

impl Type {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "Normal" => Self::Normal,
            "Fighting" => Self::Fighting,
            "Flying" => Self::Flying,
            "Poison" => Self::Poison,
            "Ground" => Self::Ground,
            "Rock" => Self::Rock,
            "Bug" => Self::Bug,
            "Ghost" => Self::Ghost,
            "Steel" => Self::Steel,
            "Fire" => Self::Fire,
            "Water" => Self::Water,
            "Grass" => Self::Grass,
            "Electric" => Self::Electric,
            "Psychic" => Self::Psychic,
            "Ice" => Self::Ice,
            "Dragon" => Self::Dragon,
            "Dark" => Self::Dark,
            _ => return None,
        })
    }
}

/// One row of species metadata. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesRecord {
    pub national_id: u16,
    pub name: String,
    pub primary_type: Type,
    pub secondary_type: Option<Type>,
    /// HP, Attack, Defense, Sp. Attack, Sp. Defense, Speed.
    pub base_stats: [u16; 6],
    pub legendary: bool,
    /// Generation this species was introduced in.
    pub generation: u8,
}

impl SpeciesRecord {
    /// Base Stat Total, the similarity metric for balanced randomization.
    #[must_use]
    pub fn base_stat_total(&self) -> u16 {
        self.base_stats.iter().sum()
    }

    /// True when the two species share at least one type.
    #[must_use]
    pub fn shares_type(&self, other: &Self) -> bool {
        let mine = [Some(self.primary_type), self.secondary_type];
        let theirs = [Some(other.primary_type), other.secondary_type];
        mine.iter()
            .flatten()
            .any(|t| theirs.iter().flatten().any(|u| t == u))
    }
}

static TABLE: Lazy<Vec<SpeciesRecord>> = Lazy::new(|| {
    parse_table(include_str!("../../data/species.csv")).expect("embedded species table is valid")
});

fn parse_table(csv: &str) -> Result<Vec<SpeciesRecord>, String> {
    let mut records = Vec::with_capacity(386);
    for (line_no, line) in csv.lines().enumerate() {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 12 {
            return Err(format!("line {}: expected 12 fields", line_no + 1));
        }
        let parse_num = |s: &str| s.parse::<u16>().map_err(|e| format!("line {}: {e}", line_no + 1));

        let mut base_stats = [0_u16; 6];
        for (slot, field) in base_stats.iter_mut().zip(&fields[4..10]) {
            *slot = parse_num(field)?;
        }

        records.push(SpeciesRecord {
            national_id: parse_num(fields[0])?,
            name: fields[1].to_string(),
            base_stats,
            primary_type: Type::from_name(fields[2])
                .ok_or_else(|| format!("line {}: unknown type {}", line_no + 1, fields[2]))?,
            secondary_type: if fields[3].is_empty() {
                None
            } else {
                Some(Type::from_name(fields[3]).ok_or_else(|| {
                    format!("line {}: unknown type {}", line_no + 1, fields[3])
                })?)
            },
            legendary: fields[10] == "1",
            generation: parse_num(fields[11])? as u8,
        });
    }
    // Rows are ordered by national id starting at 1; lookups index on that.
    for (i, record) in records.iter().enumerate() {
        if record.national_id as usize != i + 1 {
            return Err(format!("row {} out of order", record.national_id));
        }
    }
    Ok(records)
}

/// The full species table, ordered by national id.
#[must_use]
pub fn all() -> &'static [SpeciesRecord] {
    &TABLE
}

/// Looks up one species by national dex number. Fails closed outside the
/// table's domain.
#[must_use]
pub fn by_national_id(id: u16) -> Option<&'static SpeciesRecord> {
    let index = (id as usize).checked_sub(1)?;
    TABLE.get(index)
}

/// Builds a randomization candidate pool: every species introduced up to and
/// including `max_generation`, optionally excluding legendaries.
#[must_use]
pub fn pool(max_generation: u8, include_legendaries: bool) -> Vec<&'static SpeciesRecord> {
    TABLE
        .iter()
        .filter(|s| s.generation <= max_generation)
        .filter(|s| include_legendaries || !s.legendary)
        .collect()
}
