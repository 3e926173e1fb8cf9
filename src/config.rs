use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    /// Socket address for the HTTP server
    pub listen: Option<String>,
    /// Region dataset overriding the embedded default
    pub dataset_path: Option<PathBuf>,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: Option<String>,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn listen(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "listen = \"127.0.0.1:8080\"\ndataset_path = \"/etc/regioncoder/countries.json\"\nlog_filter = \"debug\""
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.listen(), "127.0.0.1:8080");
        assert_eq!(
            config.dataset_path.as_deref(),
            Some(Path::new("/etc/regioncoder/countries.json"))
        );
        assert_eq!(config.log_filter(), "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.listen(), DEFAULT_LISTEN);
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert!(config.dataset_path.is_none());
    }

    #[test]
    fn test_missing_or_invalid_config_errors() {
        assert!(Config::load_from_file("/nonexistent/regioncoder.toml").is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen = [").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }
}
