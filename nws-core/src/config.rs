use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_TABLE_PATH: &str = "./countyTable.csv";
pub const DEFAULT_USER_AGENT: &str = "NWSApi-Project/0.2 (+https://example.com/myapp)";
pub const DEFAULT_API_BASE: &str = "https://api.weather.gov";
pub const DEFAULT_WRAP_WIDTH: usize = 80;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// table_path = "/data/countyTable.csv"
/// user_agent = "my-forecast (me@example.com)"
/// wrap_width = 72
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub table_path: PathBuf,

    /// api.weather.gov rejects requests without an identifying User-Agent.
    pub user_agent: String,

    pub wrap_width: usize,
    pub timeout_secs: u64,
    pub api_base: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            wrap_width: DEFAULT_WRAP_WIDTH,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nws-forecast", "nws")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.wrap_width == 0 {
            return Err(anyhow!("wrap_width must be greater than zero"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(anyhow!(
                "user_agent must not be empty.\n\
                 Hint: run `nws configure` and enter a contact string."
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.table_path, PathBuf::from("./countyTable.csv"));
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let cfg = Config::from_toml("wrap_width = 60\nuser_agent = \"me (me@example.com)\"").unwrap();
        assert_eq!(cfg.wrap_width, 60);
        assert_eq!(cfg.user_agent, "me (me@example.com)");
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn zero_wrap_width_is_rejected() {
        let err = Config::from_toml("wrap_width = 0").unwrap_err();
        assert!(err.to_string().contains("wrap_width"));
    }

    #[test]
    fn blank_user_agent_is_rejected() {
        let err = Config::from_toml("user_agent = \"  \"").unwrap_err();
        assert!(err.to_string().contains("Hint: run `nws configure`"));
    }

    #[test]
    fn toml_roundtrip_keeps_values() {
        let cfg = Config { wrap_width: 72, ..Config::default() };
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }
}
