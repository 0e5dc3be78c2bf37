use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rule variant, fixed for the lifetime of a game. Serialized lowercase
/// to match the shared lobby document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plain tic-tac-toe, no rotation.
    Classic,
    /// Rotating, with each mark's oldest placement rendered fading.
    Beginner,
    /// Rotating, full visibility.
    Normal,
    /// Rotating, only each mark's most recent placement visible.
    Expert,
    /// Rotating, one random cell becomes permanently blocked mid-game.
    Luck,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Classic,
        Mode::Beginner,
        Mode::Normal,
        Mode::Expert,
        Mode::Luck,
    ];

    /// Whether the 3-mark rotation rule applies.
    pub fn rotates(self) -> bool {
        !matches!(self, Mode::Classic)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Classic => "classic",
            Mode::Beginner => "beginner",
            Mode::Normal => "normal",
            Mode::Expert => "expert",
            Mode::Luck => "luck",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(Mode::Classic),
            "beginner" => Ok(Mode::Beginner),
            "normal" => Ok(Mode::Normal),
            "expert" => Ok(Mode::Expert),
            "luck" => Ok(Mode::Luck),
            other => Err(EngineError::invalid_state(format!(
                "Unknown game mode: {}",
                other
            ))),
        }
    }
}
