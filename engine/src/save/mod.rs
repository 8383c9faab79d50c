//! Save-file synthesis.
//!
//! Builds new, minimum-valid save images for a chosen game template with the
//! correct per-generation layout, text encoding, money representation and
//! checksums. A save with a stale or missing checksum is rejected by the
//! game, so checksum computation lives here, not in post-processing.

mod gen1;
mod gen2;
mod gen3;
pub mod record;
pub mod text;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameConfig;
use crate::error::{EngineError, Result};

/// Upper bound the games themselves enforce on the money counter.
pub const MONEY_CAP: u32 = 999_999;
/// Longest trainer name any supported generation accepts.
pub const TRAINER_NAME_MAX: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainerGender {
    Male,
    Female,
}

/// Everything needed to synthesize one save image. Borrowed per call; the
/// engine holds no state between calls.
#[derive(Debug, Clone)]
pub struct NewSaveRequest<'a> {
    pub config: &'a GameConfig,
    pub trainer_name: &'a str,
    pub gender: TrainerGender,
    pub money: u32,
    /// National dex number of an optional starter.
    pub starter: Option<u16>,
}

/// A freshly synthesized save image plus the file extension the surrounding
/// application should offer it under.
///
/// Both the download-only path (`into_vec`) and the continue-editing path
/// (`as_mut_slice`) operate on the identical synthesized bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveImage {
    bytes: Vec<u8>,
    extension: &'static str,
}

impl SaveImage {
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn extension(&self) -> &'static str {
        self.extension
    }
}

/// Builds a new, well-formed save image for the requested template.
///
/// Names longer than [`TRAINER_NAME_MAX`] characters are rejected rather
/// than silently truncated; money is clamped to [`MONEY_CAP`]. The rng
/// supplies the trainer id (and, for Generation 3, the personality value of
/// the starter).
///
/// # Errors
///
/// Fails on unencodable names, generations outside 1-3, and configurations
/// missing the offsets their generation's layout requires.
pub fn synthesize_save<R: Rng>(request: &NewSaveRequest<'_>, rng: &mut R) -> Result<SaveImage> {
    if request.trainer_name.chars().count() > TRAINER_NAME_MAX {
        return Err(EngineError::BadTrainerName(request.trainer_name.to_string()));
    }
    let money = request.money.min(MONEY_CAP);

    let bytes = match request.config.generation {
        1 => gen1::build(request, money, rng)?,
        2 => gen2::build(request, money, rng)?,
        3 => gen3::build(request, money, rng)?,
        other => return Err(EngineError::UnsupportedGeneration(other)),
    };

    debug!(
        game = %request.config.game_id,
        len = bytes.len(),
        "synthesized save image"
    );
    Ok(SaveImage {
        bytes,
        extension: extension_for_generation(request.config.generation),
    })
}

/// Extension choice is driven by generation; every supported generation
/// uses raw battery/flash dumps.
const fn extension_for_generation(_generation: u8) -> &'static str {
    ".sav"
}

/// Packs a value as big-endian binary-coded decimal, two digits per byte,
/// most significant first. Values too large for `width` bytes are capped at
/// all-nines rather than wrapped.
pub(crate) fn to_packed_bcd(value: u32, width: usize) -> Vec<u8> {
    let max: u32 = 10_u32.pow(2 * width as u32) - 1;
    let mut value = value.min(max);
    let mut out = vec![0_u8; width];
    for byte in out.iter_mut().rev() {
        *byte = ((value % 10) | ((value / 10 % 10) << 4)) as u8;
        value /= 100;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builtin_configs;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    pub(crate) fn config(game_id: &str) -> &'static GameConfig {
        builtin_configs()
            .iter()
            .find(|c| c.game_id == game_id)
            .unwrap()
    }

    pub(crate) fn request<'a>(config: &'a GameConfig, starter: Option<u16>) -> NewSaveRequest<'a> {
        NewSaveRequest {
            config,
            trainer_name: "RED",
            gender: TrainerGender::Male,
            money: 3000,
            starter,
        }
    }

    #[test]
    fn packed_bcd_is_big_endian_two_digits_per_byte() {
        assert_eq!(to_packed_bcd(3000, 3), vec![0x00, 0x30, 0x00]);
        assert_eq!(to_packed_bcd(999_999, 3), vec![0x99, 0x99, 0x99]);
        assert_eq!(to_packed_bcd(123_456, 3), vec![0x12, 0x34, 0x56]);
        assert_eq!(to_packed_bcd(7, 3), vec![0x00, 0x00, 0x07]);
        // Caps instead of wrapping.
        assert_eq!(to_packed_bcd(1_000_000, 3), vec![0x99, 0x99, 0x99]);
    }

    #[test]
    fn image_sizes_are_exact_per_generation() {
        let mut rng = StdRng::seed_from_u64(7);
        for (game, expected) in [("red", 0x8000), ("crystal", 0x8000), ("emerald", 0x20000)] {
            let image = synthesize_save(&request(config(game), None), &mut rng).unwrap();
            assert_eq!(image.len(), expected, "{game}");
            assert_eq!(image.extension(), ".sav");
        }
    }

    #[test]
    fn long_names_are_rejected_not_truncated() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut req = request(config("red"), None);
        req.trainer_name = "OVERLONG";
        assert!(matches!(
            synthesize_save(&req, &mut rng),
            Err(EngineError::BadTrainerName(_))
        ));
    }

    #[test]
    fn money_is_clamped_to_the_cap() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut req = request(config("red"), None);
        req.money = 2_000_000;
        let image = synthesize_save(&req, &mut rng).unwrap();
        // Gen 1 money is 3-byte BCD at a fixed offset.
        assert_eq!(&image.as_slice()[0x25F3..0x25F6], &[0x99, 0x99, 0x99]);
    }

    #[test]
    fn both_output_paths_see_identical_bytes() {
        let mut rng = StdRng::seed_from_u64(7);
        let image = synthesize_save(&request(config("red"), None), &mut rng).unwrap();
        let mut editable = image.clone();
        assert_eq!(editable.as_mut_slice().to_vec(), image.into_vec());
    }
}
