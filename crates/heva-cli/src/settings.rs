//! Settings for the `heva` binary.
//!
//! Read from an optional TOML file, then from `HEVA_`-prefixed
//! environment variables (`HEVA_SEED_PATH`, `HEVA_LOG_FORMAT`,
//! `HEVA_SESSION_LIFETIME_SECS`).

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use heva_auth::AuthConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub seed_path: Option<PathBuf>,
    pub log_format: LogFormat,
    pub session_lifetime_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed_path: None,
            log_format: LogFormat::default(),
            session_lifetime_secs: AuthConfig::default().session_lifetime_secs,
        }
    }
}

impl Settings {
    /// Load settings; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("HEVA").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            session_lifetime_secs: self.session_lifetime_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(settings.seed_path, None);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.session_lifetime_secs, 28_800);
    }

    #[test]
    fn file_values_are_read() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "seed_path = \"data/seed.json\"\nlog_format = \"text\"\nsession_lifetime_secs = 600"
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.seed_path, Some(PathBuf::from("data/seed.json")));
        assert_eq!(settings.log_format, LogFormat::Text);
        assert_eq!(settings.auth_config().session_lifetime_secs, 600);
    }
}
