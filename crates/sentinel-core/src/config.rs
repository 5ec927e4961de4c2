//! Platform configuration
//!
//! Loaded from TOML, YAML or JSON (chosen by file extension). Every field
//! has a default, so an empty file is a valid configuration.

use crate::error::{PlatformError, Result};
use sentinel_scanner::ScanTiming;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Name printed on exported certificates
    pub organization: String,
    /// Directory of persisted entries; `None` keeps state in memory
    pub state_dir: Option<PathBuf>,
    /// Directory receiving exported certificates
    pub export_dir: PathBuf,
    pub auth: AuthConfig,
    pub scan: ScanTiming,
    pub log: LogConfig,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            organization: "SentinelGRC".to_string(),
            state_dir: None,
            export_dir: PathBuf::from("."),
            auth: AuthConfig::default(),
            scan: ScanTiming::default(),
            log: LogConfig::default(),
        }
    }
}

impl PlatformConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With persisted state under `dir`
    #[inline]
    #[must_use]
    pub fn with_state_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.state_dir = Some(dir.into());
        self
    }

    /// With certificate output under `dir`
    #[inline]
    #[must_use]
    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = dir.into();
        self
    }

    /// With organisation name
    #[inline]
    #[must_use]
    pub fn with_organization(mut self, name: impl Into<String>) -> Self {
        self.organization = name.into();
        self
    }

    /// With scan stage timing
    #[inline]
    #[must_use]
    pub fn with_scan_timing(mut self, timing: ScanTiming) -> Self {
        self.scan = timing;
        self
    }

    /// With auth settings
    #[inline]
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// No simulated waiting anywhere (tests, `--fast`)
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.auth.login_delay_ms = 0;
        self.auth.signup_delay_ms = 0;
        self.scan = ScanTiming::instant();
        self
    }

    /// Load from a file, picking the format from its extension
    ///
    /// # Errors
    /// Returns [`PlatformError::Io`] if the file cannot be read, or
    /// [`PlatformError::Config`] for an unknown extension or bad content
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PlatformError::io_error(path, e))?;
        Self::parse(path, &text)
    }

    /// Parse `text` as the format implied by `path`
    ///
    /// # Errors
    /// Returns [`PlatformError::Config`] for an unknown extension or bad content
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "toml" => toml::from_str(text).map_err(|e| PlatformError::config(path, e)),
            "yaml" | "yml" => serde_yaml::from_str(text).map_err(|e| PlatformError::config(path, e)),
            "json" => serde_json::from_str(text).map_err(|e| PlatformError::config(path, e)),
            other => Err(PlatformError::config(
                path,
                format!("unsupported config format: '{other}'"),
            )),
        }
    }
}

/// Simulated authentication settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub login_delay_ms: u64,
    pub signup_delay_ms: u64,
    /// Start with the demo user signed in when no session was persisted
    pub start_signed_in: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_delay_ms: 1000,
            signup_delay_ms: 1200,
            start_signed_in: true,
        }
    }
}

impl AuthConfig {
    #[must_use]
    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    #[must_use]
    pub fn signup_delay(&self) -> Duration {
        Duration::from_millis(self.signup_delay_ms)
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_files_give_defaults() {
        assert_eq!(PlatformConfig::parse(Path::new("a.toml"), "").unwrap(), PlatformConfig::default());
        assert_eq!(PlatformConfig::parse(Path::new("a.json"), "{}").unwrap(), PlatformConfig::default());
    }

    #[test]
    fn toml_sections() {
        let text = r#"
organization = "Acme Corp"
state_dir = "/var/lib/sentinel"

[auth]
login_delay_ms = 10
start_signed_in = false

[scan]
stage_delay_ms = 5

[log]
json = true
"#;
        let config = PlatformConfig::parse(Path::new("sentinel.toml"), text).unwrap();
        assert_eq!(config.organization, "Acme Corp");
        assert_eq!(config.state_dir, Some(PathBuf::from("/var/lib/sentinel")));
        assert_eq!(config.auth.login_delay_ms, 10);
        assert_eq!(config.auth.signup_delay_ms, 1200);
        assert!(!config.auth.start_signed_in);
        assert_eq!(config.scan.stage_delay_ms, 5);
        assert_eq!(config.scan.start_delay_ms, 500);
        assert!(config.log.json);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn yaml_is_accepted() {
        let config =
            PlatformConfig::parse(Path::new("c.YML"), "organization: Globex\nexport_dir: out\n").unwrap();
        assert_eq!(config.organization, "Globex");
        assert_eq!(config.export_dir, PathBuf::from("out"));
    }

    #[test]
    fn unknown_extension_and_bad_content() {
        let err = PlatformConfig::parse(Path::new("c.ini"), "").unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
        assert!(PlatformConfig::parse(Path::new("c.toml"), "auth = 3").is_err());
    }

    #[test]
    fn builders() {
        let config = PlatformConfig::new()
            .with_organization("Initech")
            .with_state_dir("/tmp/s")
            .without_delays();
        assert_eq!(config.organization, "Initech");
        assert_eq!(config.auth.login_delay(), Duration::ZERO);
        assert_eq!(config.scan, ScanTiming::instant());
    }
}
