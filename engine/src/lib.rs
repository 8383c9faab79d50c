//! Cartridge binary engine.
//!
//! A pure, stateless library over byte buffers: it fingerprints GB/GBC/GBA
//! ROM images, maps them to known game configurations, rewrites
//! wild-encounter tables in place, and synthesizes new save files with valid
//! checksums. It performs no I/O; callers own every buffer that crosses the
//! boundary.

#[allow(clippy::unreadable_literal)]
pub mod config;

pub mod encounters;
pub mod error;
pub mod header;

#[allow(clippy::unreadable_literal)]
pub mod save;

pub mod species;

pub use config::{GameConfig, GameInfo, Platform, builtin_configs, find_config, load_configs};
pub use encounters::{RandomizeOptions, RandomizeReport, SlotChange, randomize_wild_encounters};
pub use error::{EngineError, Result};
pub use header::{GbHeader, GbaHeader, RomHeader, parse_header};
pub use save::{NewSaveRequest, SaveImage, TrainerGender, synthesize_save};
