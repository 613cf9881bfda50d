use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::sweep::tasks::TaskId;
use crate::sweep::SweepContext;

/// Global devsweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Device (`/dev/nvme0n1p2`) or mount point (`/`) for the free-space report
    #[serde(default = "default_volume")]
    pub volume: String,

    /// journald entries older than this are vacuumed
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,

    /// Directory names treated as regenerable dependency directories
    #[serde(default = "default_dependency_dirs")]
    pub dependency_dirs: Vec<String>,

    /// Paths to exclude from the dependency scan
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Prefix privileged commands with sudo
    #[serde(default = "default_true")]
    pub use_sudo: bool,

    /// Tasks that never run
    #[serde(default)]
    pub skip: Vec<TaskId>,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_volume() -> String {
    "/".to_string()
}
fn default_log_retention_days() -> u32 {
    7
}
fn default_dependency_dirs() -> Vec<String> {
    vec!["node_modules".to_string()]
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            log_retention_days: default_log_retention_days(),
            dependency_dirs: default_dependency_dirs(),
            exclude_paths: Vec::new(),
            use_sudo: true,
            skip: Vec::new(),
            output_format: OutputFormat::Human,
        }
    }
}

impl Config {
    /// Get the devsweep data directory (~/.devsweep)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".devsweep")
    }

    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from file, or fall back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize the devsweep data directories
    pub fn init_dirs() -> Result<()> {
        for dir in [Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Build the explicit run context. CLI overrides win over the file.
    pub fn resolve(&self, home: Option<&Path>, volume: Option<&str>) -> Result<SweepContext> {
        let home = match home {
            Some(home) => home.to_path_buf(),
            None => dirs::home_dir().context("Could not determine the home directory")?,
        };
        let home = home
            .canonicalize()
            .with_context(|| format!("Home directory is not usable: {}", home.display()))?;

        Ok(SweepContext {
            home,
            volume: volume.map(str::to_string).unwrap_or_else(|| self.volume.clone()),
            log_retention_days: self.log_retention_days,
            dependency_dirs: self.dependency_dirs.clone(),
            exclude_paths: self.exclude_paths.clone(),
            use_sudo: self.use_sudo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.volume, "/");
        assert_eq!(config.log_retention_days, 7);
        assert_eq!(config.dependency_dirs, vec!["node_modules".to_string()]);
        assert!(config.use_sudo);
        assert!(config.skip.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            volume = "/dev/nvme0n1p2"
            skip = ["snap", "logs"]
            "#,
        )
        .unwrap();
        assert_eq!(config.volume, "/dev/nvme0n1p2");
        assert_eq!(config.skip, vec![TaskId::Snap, TaskId::Logs]);
        assert_eq!(config.log_retention_days, 7);
        assert_eq!(config.output_format, OutputFormat::Human);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let mut config = Config::default();
        config.log_retention_days = 14;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.log_retention_days, 14);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded.volume, "/");
    }

    #[test]
    fn test_resolve_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Config::default()
            .resolve(Some(dir.path()), Some("/dev/sda1"))
            .unwrap();
        assert_eq!(ctx.home, dir.path().canonicalize().unwrap());
        assert_eq!(ctx.volume, "/dev/sda1");
        assert!(Config::default()
            .resolve(Some(&dir.path().join("missing")), None)
            .is_err());
    }
}
