//! Configuration for the host metrics facade and CLI

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up under the user's config directory.
const CONFIG_FILE: &str = "config.toml";

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupportConfig {
    /// Volume whose capacity the disk queries report
    pub disk_path: PathBuf,

    /// Kill mount/unmount commands running longer than this (seconds).
    /// `None` waits indefinitely.
    pub command_timeout_secs: Option<u64>,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            disk_path: crate::platform::default_disk_path(),
            command_timeout_secs: Some(60),
            log_level: "info".into(),
        }
    }
}

impl SupportConfig {
    /// Load config from TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write the default configuration to `path`, refusing to replace an
    /// existing file unless `force` is set.
    pub fn init(path: &Path, force: bool) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() && !force {
            return Err(format!("{} already exists (use --force to overwrite)", path.display()).into());
        }
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// `<config dir>/os-support/config.toml`, when a config dir exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("os-support").join(CONFIG_FILE))
    }

    /// Load `explicit` if given, else the default file if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SupportConfig::default();
        assert_eq!(config.command_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: SupportConfig = toml::from_str("disk_path = \"/srv\"").unwrap();
        assert_eq!(config.disk_path, PathBuf::from("/srv"));
        assert_eq!(config.command_timeout_secs, Some(60));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("os-support-test-{}", std::process::id()))
            .join(CONFIG_FILE);

        let config = SupportConfig {
            disk_path: PathBuf::from("/data"),
            command_timeout_secs: Some(5),
            log_level: "debug".into(),
        };
        config.save(&path).unwrap();

        let loaded = SupportConfig::resolve(Some(&path)).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let path = std::env::temp_dir()
            .join(format!("os-support-init-{}", std::process::id()))
            .join(CONFIG_FILE);

        let custom = SupportConfig {
            log_level: "warn".into(),
            ..SupportConfig::default()
        };
        custom.save(&path).unwrap();

        assert!(SupportConfig::init(&path, false).is_err());
        assert_eq!(SupportConfig::load(&path).unwrap().log_level, "warn");

        SupportConfig::init(&path, true).unwrap();
        assert_eq!(SupportConfig::load(&path).unwrap().log_level, "info");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(SupportConfig::resolve(Some(Path::new("/no/such/os-support.toml"))).is_err());
    }
}
