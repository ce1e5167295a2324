//! Updater configuration
//!
//! Loaded from a TOML file (`updater.toml` by default). The four location
//! fields are required; timing knobs have defaults matching the shipped
//! updater behavior.

use crate::errors::UpdateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "updater.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdaterConfig {
    /// URL of the candidate executable
    pub release_url: String,

    /// URL of the expected SHA-256 (bare digest or sha256sum line)
    pub checksum_url: String,

    /// Location of the protected executable
    pub install_path: PathBuf,

    /// Directory where timestamped backups accumulate (never pruned)
    pub backup_dir: PathBuf,

    /// Image name of the protected application
    #[serde(default = "default_process_name")]
    pub process_name: String,

    /// Total time to wait for the process to stop (seconds)
    #[serde(default = "default_stop_max_wait")]
    pub stop_max_wait_secs: u64,

    /// Poll interval while waiting for the process to stop (milliseconds)
    #[serde(default = "default_stop_poll_interval")]
    pub stop_poll_interval_ms: u64,

    /// Network timeout for each fetch (seconds)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_process_name() -> String {
    "Lon.exe".to_string()
}

fn default_stop_max_wait() -> u64 {
    5
}

fn default_stop_poll_interval() -> u64 {
    500
}

fn default_fetch_timeout() -> u64 {
    30
}

impl UpdaterConfig {
    /// Load and validate the configuration file
    pub fn load(path: &Path) -> Result<Self, UpdateError> {
        let content = fs::read_to_string(path)
            .map_err(|e| UpdateError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: UpdaterConfig = toml::from_str(&content)
            .map_err(|e| UpdateError::Config(format!("invalid {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), UpdateError> {
        if self.release_url.trim().is_empty() || self.checksum_url.trim().is_empty() {
            return Err(UpdateError::Config(
                "release_url and checksum_url must be set".to_string(),
            ));
        }
        if self.install_path.as_os_str().is_empty() || self.backup_dir.as_os_str().is_empty() {
            return Err(UpdateError::Config(
                "install_path and backup_dir must be set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn stop_max_wait(&self) -> Duration {
        Duration::from_secs(self.stop_max_wait_secs)
    }

    pub fn stop_poll_interval(&self) -> Duration {
        Duration::from_millis(self.stop_poll_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load_str(content: &str) -> Result<UpdaterConfig, UpdateError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        UpdaterConfig::load(file.path())
    }

    #[test]
    fn test_full_config_round_trip() {
        let config = load_str(
            r#"
release_url = "https://releases.example.com/lon/latest/Lon.exe"
checksum_url = "https://releases.example.com/lon/latest/Lon.exe.sha256"
install_path = "C:/Program Files/Lon/Lon.exe"
backup_dir = "C:/Program Files/Lon/backups"
process_name = "Lon.exe"
stop_max_wait_secs = 10
stop_poll_interval_ms = 250
fetch_timeout_secs = 60
"#,
        )
        .unwrap();

        assert_eq!(config.process_name, "Lon.exe");
        assert_eq!(config.stop_max_wait(), Duration::from_secs(10));
        assert_eq!(config.stop_poll_interval(), Duration::from_millis(250));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_defaults_applied_for_optional_fields() {
        let config = load_str(
            r#"
release_url = "https://releases.example.com/Lon.exe"
checksum_url = "https://releases.example.com/Lon.exe.sha256"
install_path = "/opt/lon/Lon.exe"
backup_dir = "/opt/lon/backups"
"#,
        )
        .unwrap();

        assert_eq!(config.process_name, "Lon.exe");
        assert_eq!(config.stop_max_wait(), Duration::from_secs(5));
        assert_eq!(config.stop_poll_interval(), Duration::from_millis(500));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_required_field_is_config_error() {
        let result = load_str(
            r#"
release_url = "https://releases.example.com/Lon.exe"
install_path = "/opt/lon/Lon.exe"
backup_dir = "/opt/lon/backups"
"#,
        );
        assert!(matches!(result, Err(UpdateError::Config(_))));
    }

    #[test]
    fn test_empty_required_field_is_config_error() {
        let result = load_str(
            r#"
release_url = ""
checksum_url = "https://releases.example.com/Lon.exe.sha256"
install_path = "/opt/lon/Lon.exe"
backup_dir = "/opt/lon/backups"
"#,
        );
        assert!(matches!(result, Err(UpdateError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = UpdaterConfig::load(Path::new("/nonexistent/updater.toml"));
        assert!(matches!(result, Err(UpdateError::Config(_))));
    }
}
