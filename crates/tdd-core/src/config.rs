use crate::error::{Result, TddError};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_LANGUAGE: &str = "python";

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Per-repository engine settings, read from `.mcp/config.yaml`.
///
/// The file is optional. Every field has a default so a partial file only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Wall-clock bound for each external command, in seconds.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
    /// Language recorded in generated checklists when no hint is given.
    #[serde(default = "default_language")]
    pub default_language: String,
}

fn default_command_timeout_secs() -> u64 {
    900
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: default_command_timeout_secs(),
            default_language: default_language(),
        }
    }
}

impl EngineConfig {
    /// Load the repository config, falling back to defaults when the file
    /// does not exist. A file that exists but does not parse is an error.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: EngineConfig = serde_yaml::from_str(&data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn validate(&self) -> Result<()> {
        if self.command_timeout_secs == 0 {
            return Err(TddError::InvalidConfig(
                "command_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = EngineConfig::load(dir.path()).unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.command_timeout(), Duration::from_secs(900));
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".mcp")).unwrap();
        std::fs::write(
            dir.path().join(".mcp/config.yaml"),
            "command_timeout_secs: 30\n",
        )
        .unwrap();
        let cfg = EngineConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.command_timeout_secs, 30);
        assert_eq!(cfg.default_language, "python");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".mcp")).unwrap();
        std::fs::write(
            dir.path().join(".mcp/config.yaml"),
            "command_timeout_secs: 0\n",
        )
        .unwrap();
        assert!(matches!(
            EngineConfig::load(dir.path()),
            Err(TddError::InvalidConfig(_))
        ));
    }

    #[test]
    fn config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let cfg = EngineConfig {
            command_timeout_secs: 60,
            default_language: "go".to_string(),
        };
        cfg.save(dir.path()).unwrap();
        assert_eq!(EngineConfig::load(dir.path()).unwrap(), cfg);
    }
}
