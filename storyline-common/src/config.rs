//! Bootstrap configuration loading and root folder resolution
//!
//! Configuration sources, highest priority first:
//! 1. Command-line arguments
//! 2. Environment variables (`STORYLINE_ROOT_FOLDER`)
//! 3. TOML configuration file
//! 4. Compiled defaults
//!
//! A missing TOML file is never fatal: a warning is logged and compiled
//! defaults are used.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "STORYLINE_ROOT_FOLDER";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the object store and database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Submission pipeline settings (optional)
    #[serde(default)]
    pub submission: SubmissionSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Submission pipeline settings (`[submission]` table)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionSettings {
    /// Document-store collection receiving draft works
    pub collection: String,
    /// Object-store prefix for uploaded cover images
    pub asset_prefix: String,
    /// Dashboard route; detail views live at `<dashboard_path>/<id>`
    pub dashboard_path: String,
    /// How long a notification stays visible
    pub notification_display_ms: u64,
    /// Delay between the success notification and the redirect
    pub redirect_delay_ms: u64,
    /// Deadline for the upload step (unset or 0 = unbounded)
    pub upload_timeout_ms: Option<u64>,
    /// Deadline for the record creation step (unset or 0 = unbounded)
    pub create_timeout_ms: Option<u64>,
    /// Delete the uploaded asset when record creation fails
    pub cleanup_orphaned_assets: bool,
    /// Base URL prepended to object paths when resolving public references
    pub public_base_url: Option<String>,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            collection: "stories".to_string(),
            asset_prefix: "covers".to_string(),
            dashboard_path: "/writerDashboard".to_string(),
            notification_display_ms: 3000,
            redirect_delay_ms: 1000,
            upload_timeout_ms: None,
            create_timeout_ms: None,
            cleanup_orphaned_assets: true,
            public_base_url: None,
        }
    }
}

impl SubmissionSettings {
    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(Error::Config("submission.collection must not be empty".to_string()));
        }
        if self.asset_prefix.trim_matches('/').is_empty() {
            return Err(Error::Config("submission.asset_prefix must not be empty".to_string()));
        }
        if self.notification_display_ms == 0 {
            return Err(Error::Config(
                "submission.notification_display_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn notification_display(&self) -> Duration {
        crate::time::millis_to_duration(self.notification_display_ms)
    }

    pub fn redirect_delay(&self) -> Duration {
        crate::time::millis_to_duration(self.redirect_delay_ms)
    }

    pub fn upload_deadline(&self) -> Option<Duration> {
        crate::time::optional_deadline(self.upload_timeout_ms)
    }

    pub fn create_deadline(&self) -> Option<Duration> {
        crate::time::optional_deadline(self.create_timeout_ms)
    }

    /// Detail view route for a newly created work
    pub fn detail_path(&self, work_id: &str) -> String {
        format!("{}/{}", self.dashboard_path.trim_end_matches('/'), work_id)
    }
}

/// OS-dependent compiled defaults
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
        }
    }
}

fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/storyline
        dirs::data_local_dir()
            .map(|d| d.join("storyline"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/storyline"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("storyline"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/storyline"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("storyline"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\storyline"))
    } else {
        PathBuf::from("./storyline_data")
    }
}

/// Default TOML location for a module: `<config dir>/storyline/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("storyline").join(format!("{}.toml", module_name)))
}

/// Load TOML configuration with graceful degradation
///
/// A missing file yields `TomlConfig::default()` plus a warning. A file that
/// exists but cannot be read or parsed is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file {} not found, using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;
    config.submission.validate()?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Write TOML configuration, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    /// Root folder given on the command line
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Root folder from an already-loaded TOML config
    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("[{}] Root folder from command line: {}", self.module_name, path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                info!("[{}] Root folder from {}: {}", self.module_name, ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            info!("[{}] Root folder from TOML: {}", self.module_name, path.display());
            return path.clone();
        }

        let path = CompiledDefaults::for_current_platform().root_folder;
        info!("[{}] Root folder from compiled default: {}", self.module_name, path.display());
        path
    }
}

/// Creates the root folder layout on first start
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.objects_path())?;
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("storyline.db")
    }

    pub fn objects_path(&self) -> PathBuf {
        self.root_folder.join("objects")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_defaults() {
        let settings = SubmissionSettings::default();
        assert_eq!(settings.collection, "stories");
        assert_eq!(settings.asset_prefix, "covers");
        assert_eq!(settings.notification_display(), Duration::from_secs(3));
        assert_eq!(settings.redirect_delay(), Duration::from_secs(1));
        assert!(settings.upload_deadline().is_none());
        assert!(settings.cleanup_orphaned_assets);
    }

    #[test]
    fn test_detail_path_strips_trailing_slash() {
        let mut settings = SubmissionSettings::default();
        assert_eq!(settings.detail_path("abc"), "/writerDashboard/abc");
        settings.dashboard_path = "/writerDashboard/".to_string();
        assert_eq!(settings.detail_path("abc"), "/writerDashboard/abc");
    }

    #[test]
    fn test_validate_rejects_empty_collection() {
        let settings = SubmissionSettings {
            collection: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_display_interval() {
        let settings = SubmissionSettings {
            notification_display_ms: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [submission]
            redirect_delay_ms = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.submission.redirect_delay_ms, 250);
        assert_eq!(config.submission.collection, "stories");
        assert_eq!(config.logging.level, "info");
        assert!(config.root_folder.is_none());
    }
}
