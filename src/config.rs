//! Configuration loading.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML config file,
//! environment variables, command-line flags. A missing config file is not an
//! error.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use gwconsole_table::{DEFAULT_EMPTY_TEXT, DEFAULT_PAGE_SIZE_OPTIONS};
use serde::Deserialize;
use thiserror::Error;

pub const ENV_CONFIG: &str = "GWCONSOLE_CONFIG";
pub const ENV_API_URL: &str = "GWCONSOLE_API_URL";
pub const ENV_LOG: &str = "GWCONSOLE_LOG";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8880/";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Invalid TOML in {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Where service records come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The gateway admin API
    #[default]
    Http,
    /// A SQLite file seeded with demo services
    Local,
}

/// `config.toml` as written by the user; every field is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub api_url: Option<String>,

    #[serde(default)]
    pub backend: Option<Backend>,

    #[serde(default)]
    pub local_db_path: Option<PathBuf>,

    /// Rows per page on first load
    #[serde(default)]
    pub page_size: Option<usize>,

    #[serde(default)]
    pub page_size_options: Option<Vec<usize>>,

    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Shown when a page has no rows
    #[serde(default)]
    pub empty_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_url: String,
    pub backend: Backend,
    pub local_db_path: PathBuf,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub log_file_path: PathBuf,
    pub empty_text: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            backend: Backend::default(),
            local_db_path: default_db_path(),
            page_size: DEFAULT_PAGE_SIZE_OPTIONS
                .first()
                .copied()
                .unwrap_or(10),
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            log_file_path: default_log_path(),
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
        }
    }
}

/// Flags that override everything else; `None` leaves the value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub api_url: Option<String>,
    pub local: bool,
    pub page_size: Option<usize>,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "gwconsole")
}

#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

#[must_use]
pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .join("gwconsole.log")
        })
        .unwrap_or_else(|| PathBuf::from("gwconsole.log"))
}

#[must_use]
pub fn default_db_path() -> PathBuf {
    gwconsole_api::default_db_path(
        project_dirs().map(|dirs| dirs.data_dir().to_path_buf()),
    )
}

/// Reads and parses `path`; `Ok(None)` when the file does not exist.
pub fn load_config_file(
    path: impl Into<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| {
        ConfigError::ReadError {
            path: path.clone(),
            reason: e.to_string(),
        }
    })?;

    let config = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Loads the config file from the explicit path, then `GWCONSOLE_CONFIG`,
/// then the platform default.
pub fn load_config_with_precedence(
    config_path: Option<&Path>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidPath(String::new()));
        }
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    default_config_path().map_or(Ok(None), |path| load_config_file(path))
}

#[must_use]
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        api_url: config.api_url.unwrap_or(defaults.api_url),
        backend: config.backend.unwrap_or(defaults.backend),
        local_db_path: config.local_db_path.unwrap_or(defaults.local_db_path),
        page_size: config.page_size.unwrap_or(defaults.page_size),
        page_size_options: config
            .page_size_options
            .unwrap_or(defaults.page_size_options),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        empty_text: config.empty_text.unwrap_or(defaults.empty_text),
    }
}

/// `GWCONSOLE_API_URL` replaces the API base, `GWCONSOLE_LOG` the log file.
#[must_use]
pub fn apply_env_overrides(config: ResolvedConfig) -> ResolvedConfig {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

fn apply_overrides_from(
    mut config: ResolvedConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.is_empty()) {
        config.api_url = url;
    }
    if let Some(path) = lookup(ENV_LOG).filter(|path| !path.is_empty()) {
        config.log_file_path = PathBuf::from(path);
    }
    config
}

#[must_use]
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    cli: &CliOverrides,
) -> ResolvedConfig {
    if let Some(url) = &cli.api_url {
        config.api_url.clone_from(url);
    }
    if cli.local {
        config.backend = Backend::Local;
    }
    if let Some(page_size) = cli.page_size {
        config.page_size = page_size;
    }
    config
}

/// Rejects values the table would otherwise silently normalise away.
pub fn validate(config: &ResolvedConfig) -> Result<(), ConfigError> {
    if config.page_size == 0 {
        return Err(ConfigError::InvalidValue {
            field: "page_size",
            reason: "must be at least 1".to_string(),
        });
    }
    if config.page_size_options.iter().all(|&size| size == 0) {
        return Err(ConfigError::InvalidValue {
            field: "page_size_options",
            reason: "needs at least one positive size".to_string(),
        });
    }
    if config.backend == Backend::Http {
        url::Url::parse(&config.api_url).map_err(|e| {
            ConfigError::InvalidValue {
                field: "api_url",
                reason: e.to_string(),
            }
        })?;
    }
    Ok(())
}

/// Full chain: defaults, file, env, CLI.
pub fn resolve(
    config_path: Option<&Path>,
    cli: &CliOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let file = load_config_with_precedence(config_path)?;
    let config = apply_cli_overrides(apply_env_overrides(merge_config(file)), cli);
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_config_file(dir.path().join("absent.toml"));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let file = write_config(
            r#"
api_url = "https://gw.example.test/"
backend = "local"
page_size = 20
page_size_options = [20, 50]
empty_text = "Nothing here"
"#,
        );

        let config =
            merge_config(load_config_file(file.path()).expect("valid toml"));
        assert_eq!(config.api_url, "https://gw.example.test/");
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.page_size, 20);
        assert_eq!(config.page_size_options, vec![20, 50]);
        assert_eq!(config.empty_text, "Nothing here");
        assert_eq!(config.log_file_path, default_log_path());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let file = write_config("theme = \"dark\"\n");
        let result = load_config_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://env.example.test/"),
            (ENV_LOG, "/tmp/gw-env.log"),
        ]);
        let config = apply_overrides_from(ResolvedConfig::default(), |key| {
            env.get(key).map(ToString::to_string)
        });
        assert_eq!(config.api_url, "http://env.example.test/");
        assert_eq!(config.log_file_path, PathBuf::from("/tmp/gw-env.log"));
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let config = apply_overrides_from(ResolvedConfig::default(), |_| {
            Some(String::new())
        });
        assert_eq!(config, ResolvedConfig::default());
    }

    #[test]
    fn test_cli_has_highest_precedence() {
        let file = ConfigFile {
            api_url: Some("http://file.example.test/".to_string()),
            page_size: Some(30),
            ..ConfigFile::default()
        };
        let cli = CliOverrides {
            api_url: Some("http://cli.example.test/".to_string()),
            local: true,
            page_size: Some(40),
        };

        let config = apply_cli_overrides(merge_config(Some(file)), &cli);
        assert_eq!(config.api_url, "http://cli.example.test/");
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.page_size, 40);
    }

    #[test]
    fn test_validate_rejects_zero_page_size_and_bad_url() {
        let zero = ResolvedConfig {
            page_size: 0,
            ..ResolvedConfig::default()
        };
        assert!(matches!(
            validate(&zero),
            Err(ConfigError::InvalidValue { field: "page_size", .. })
        ));

        let bad_url = ResolvedConfig {
            api_url: "not a url".to_string(),
            ..ResolvedConfig::default()
        };
        assert!(matches!(
            validate(&bad_url),
            Err(ConfigError::InvalidValue { field: "api_url", .. })
        ));

        // the URL is unused by the local backend
        let local = ResolvedConfig {
            backend: Backend::Local,
            ..bad_url
        };
        assert!(validate(&local).is_ok());
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate(&ResolvedConfig::default()).is_ok());
        assert_eq!(ResolvedConfig::default().page_size, 10);
    }
}
