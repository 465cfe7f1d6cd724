use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// External converter invocation: an argv template where `{source}`,
/// `{dest}` and `{session}` are substituted per item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WriterConfig {
    pub command: Vec<String>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            command: vec![
                "nwb-convert".to_string(),
                "{source}".to_string(),
                "{dest}".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub source_root: Option<PathBuf>,
    #[serde(default)]
    pub output_root: Option<PathBuf>,
    /// Worker pool bound. Each in-flight item holds raw imaging data in
    /// memory, so this stays small.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub writer: WriterConfig,
}

fn default_concurrency() -> usize {
    1
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path(None);
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::Config(format!("{}: {}", path.display(), err)))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|err| Error::Config(err.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. NWBPACK_CONFIG environment variable (with tilde expansion)
/// 3. System config directory
/// 4. ~/.nwbpack (fallback for systems without a standard config directory)
pub fn resolve_config_path(explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return expand_tilde(path);
    }

    if let Ok(env_path) = std::env::var("NWBPACK_CONFIG") {
        return expand_tilde(&env_path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("nwbpack").join("config.toml");
    }

    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".nwbpack").join("config.toml");
    }

    PathBuf::from("nwbpack.toml")
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            source_root: Some(PathBuf::from("/data/sessions")),
            output_root: Some(PathBuf::from("/data/nwb")),
            concurrency: 4,
            writer: WriterConfig {
                command: vec!["convert".into(), "{source}".into(), "{dest}".into()],
            },
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "concurrency = \"many\"").unwrap();

        assert!(matches!(Config::load_from(&path), Err(Error::Config(_))));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "source_root = \"/data/sessions\"").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.source_root, Some(PathBuf::from("/data/sessions")));
        assert_eq!(config.concurrency, 1);
        assert!(!config.writer.command.is_empty());
    }
}
