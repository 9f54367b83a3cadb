//! Configuration loading and root folder resolution
//!
//! Configuration is resolved once at startup into an [`AppConfig`] and passed
//! explicitly to the components that need it.
//!
//! Priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (including values loaded from `<root>/.env`)
//! 3. TOML config file (`<root>/rerate.toml`)
//! 4. Compiled defaults (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "RERATE_ROOT";

/// Environment variable holding Criticker cookies as a JSON array
pub const CRITICKER_COOKIES_ENV_VAR: &str = "RERATE_CRITICKER_COOKIES";

/// Config file name looked up inside the root folder
pub const CONFIG_FILE_NAME: &str = "rerate.toml";

/// Dotenv file name looked up inside the root folder
pub const DOTENV_FILE_NAME: &str = ".env";

const DEFAULT_IMDB_RATINGS_PATH: &str = "data/imdb.csv";
const DEFAULT_KINOPOISK_RATINGS_PATH: &str = "kinopoisk_ratings_parser/data.csv";
const DEFAULT_LOG_DIR: &str = "logs";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_CRITICKER_URL: &str = "https://www.criticker.com";
const DEFAULT_CRITICKER_COOKIE_DOMAIN: &str = ".criticker.com";
const DEFAULT_COOKIE_PATH: &str = "/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// On-disk TOML configuration
///
/// Every field is optional; missing fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// IMDb export (relative paths resolve against the root folder)
    pub imdb_ratings_path: Option<PathBuf>,
    /// Kinopoisk export (relative paths resolve against the root folder)
    pub kinopoisk_ratings_path: Option<PathBuf>,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Criticker site configuration
    pub criticker: SiteConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`info`, `debug`, `rerate_sync=trace`, ...)
    pub level: String,
    /// Directory receiving `rerate.log`
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

/// Browser cookie copied from a logged-in session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Cookie {
    /// Fill in domain and path when the exported cookie omits them
    pub fn with_defaults(mut self, domain: &str) -> Self {
        if self.domain.is_none() {
            self.domain = Some(domain.to_string());
        }
        if self.path.is_none() {
            self.path = Some(DEFAULT_COOKIE_PATH.to_string());
        }
        self
    }

    /// `Set-Cookie` form, carrying domain and path when known
    pub fn set_cookie_string(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);
        if let Some(domain) = &self.domain {
            out.push_str("; Domain=");
            out.push_str(domain);
        }
        if let Some(path) = &self.path {
            out.push_str("; Path=");
            out.push_str(path);
        }
        out
    }
}

/// Ratings site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site base URL, without trailing slash
    pub base_url: String,
    /// Upper bound for a single site request
    pub request_timeout_secs: u64,
    /// Session cookies
    pub cookies: Vec<Cookie>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CRITICKER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cookies: Vec::new(),
        }
    }
}

impl SiteConfig {
    pub fn has_cookies(&self) -> bool {
        !self.cookies.is_empty()
    }
}

/// Fully resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub root_folder: PathBuf,
    pub imdb_ratings_path: PathBuf,
    pub kinopoisk_ratings_path: PathBuf,
    pub logging: LoggingConfig,
    pub criticker: SiteConfig,
}

impl AppConfig {
    /// Load configuration for the given root folder
    ///
    /// Reads `<root>/.env` (if present) into the process environment, then the
    /// TOML file (`config_file` or `<root>/rerate.toml`), then applies
    /// environment overrides.
    pub fn load(root_folder: &Path, config_file: Option<&Path>) -> Result<Self> {
        load_dotenv(root_folder)?;

        let config_path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| root_folder.join(CONFIG_FILE_NAME));
        let toml_config = load_toml_config(&config_path)?;

        let env_cookies = cookies_from_env(CRITICKER_COOKIES_ENV_VAR)?;
        Ok(Self::from_toml(root_folder, toml_config, env_cookies))
    }

    /// Resolve a parsed TOML config against the root folder
    ///
    /// `env_cookies`, when present, replaces the TOML cookie list.
    pub fn from_toml(
        root_folder: &Path,
        toml_config: TomlConfig,
        env_cookies: Option<Vec<Cookie>>,
    ) -> Self {
        let resolve = |p: PathBuf| {
            if p.is_absolute() {
                p
            } else {
                root_folder.join(p)
            }
        };

        let mut criticker = toml_config.criticker;
        if let Some(cookies) = env_cookies {
            debug!(count = cookies.len(), "Criticker cookies taken from environment");
            criticker.cookies = cookies;
        }
        criticker.cookies = criticker
            .cookies
            .into_iter()
            .map(|c| c.with_defaults(DEFAULT_CRITICKER_COOKIE_DOMAIN))
            .collect();
        criticker.base_url = criticker.base_url.trim_end_matches('/').to_string();

        let mut logging = toml_config.logging;
        logging.log_dir = resolve(logging.log_dir);

        Self {
            root_folder: root_folder.to_path_buf(),
            imdb_ratings_path: resolve(
                toml_config
                    .imdb_ratings_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_IMDB_RATINGS_PATH)),
            ),
            kinopoisk_ratings_path: resolve(
                toml_config
                    .kinopoisk_ratings_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_KINOPOISK_RATINGS_PATH)),
            ),
            logging,
            criticker,
        }
    }
}

/// Root folder resolution:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. Current working directory (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, env_var_name: &str) -> Result<PathBuf> {
    if let Some(path) = cli_arg {
        return Ok(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    std::env::current_dir()
        .map_err(|e| Error::Config(format!("Could not determine current directory: {}", e)))
}

/// Read a TOML config file
///
/// A missing file is not an error: a warning is logged and defaults are used.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse a JSON cookie list from an environment variable
///
/// Unset or blank variable yields `None`; malformed JSON is a config error.
pub fn cookies_from_env(env_var_name: &str) -> Result<Option<Vec<Cookie>>> {
    let raw = match std::env::var(env_var_name) {
        Ok(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(None),
    };

    serde_json::from_str::<Vec<Cookie>>(&raw)
        .map(Some)
        .map_err(|e| {
            Error::Config(format!(
                "{} must be a JSON list of cookies: {}",
                env_var_name, e
            ))
        })
}

fn load_dotenv(root_folder: &Path) -> Result<()> {
    let path = root_folder.join(DOTENV_FILE_NAME);
    if !path.exists() {
        return Ok(());
    }

    dotenvy::from_path(&path)
        .map_err(|e| Error::Config(format!("Failed to load {}: {}", path.display(), e)))?;
    debug!("Loaded environment from {}", path.display());
    Ok(())
}
