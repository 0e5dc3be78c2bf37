use crate::error::LobbyError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lobby codes are 6 uppercase ASCII letters.
pub const CODE_LEN: usize = 6;

/// Lookup key for a shared lobby document. Carries no game semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LobbyCode(String);

impl LobbyCode {
    /// Draw a fresh random code.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..CODE_LEN)
            .map(|_| rng.gen_range(b'A'..=b'Z') as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LobbyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LobbyCode {
    type Err = LobbyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(LobbyError::InvalidCode(s.to_string()));
        }
        Ok(Self(code))
    }
}
