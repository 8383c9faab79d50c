use std::fmt;

/// Failures surfaced by engine operations.
///
/// "Unrecognized input" (unknown header, no matching configuration) is not an
/// error: those seams return `Option` so callers can treat the buffer as an
/// unsupported cartridge image rather than a crash. This enum covers the
/// structural failures that abort a whole operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The matched configuration does not declare a byte offset the
    /// operation needs.
    MissingOffset { game: String, name: &'static str },
    /// The matched configuration does not declare a structure size the
    /// operation needs.
    MissingSize { game: String, name: &'static str },
    /// Randomization candidate pool came up empty; there is nothing to
    /// randomize into.
    EmptyPool,
    /// A species identifier falls outside the reference table's domain.
    UnsupportedSpecies(u16),
    /// Trainer name is too long or contains characters the generation's
    /// text encoding cannot represent.
    BadTrainerName(String),
    /// The game-configuration table failed to parse or validate.
    InvalidConfig(String),
    /// Save synthesis was requested for a generation the engine does not
    /// support.
    UnsupportedGeneration(u8),
    /// The buffer is too short for the structure being written.
    BufferTooSmall { expected: usize, actual: usize },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOffset { game, name } => {
                write!(f, "configuration for {game} is missing offset `{name}`")
            }
            Self::MissingSize { game, name } => {
                write!(f, "configuration for {game} is missing size `{name}`")
            }
            Self::EmptyPool => write!(f, "randomization candidate pool is empty"),
            Self::UnsupportedSpecies(id) => write!(f, "species id {id} is outside the known table"),
            Self::BadTrainerName(name) => write!(f, "trainer name {name:?} cannot be encoded"),
            Self::InvalidConfig(reason) => write!(f, "invalid game configuration table: {reason}"),
            Self::UnsupportedGeneration(generation) => {
                write!(f, "generation {generation} is not supported")
            }
            Self::BufferTooSmall { expected, actual } => {
                write!(f, "buffer too small: need {expected} bytes, got {actual}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;
