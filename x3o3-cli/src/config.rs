use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use x3o3_engine::Mode;

/// Persisted CLI preferences. Lives as JSON under the user data dir.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    pub last_mode: Mode,
    pub verbose: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            last_mode: Mode::Classic,
            verbose: false,
        }
    }
}

impl CliConfig {
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("x3o3")
            .join("config.json")
    }

    /// Load preferences, falling back to defaults on a missing or
    /// unreadable file.
    pub fn load(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = CliConfig::load(Path::new("/nonexistent/x3o3/config.json"));
        assert_eq!(config.last_mode, Mode::Classic);
    }
}
