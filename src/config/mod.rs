//! Configuration management.
//!
//! Settings are layered, lowest to highest priority: built-in defaults, a TOML
//! file, then `PAPERVISTA_*` environment variables. Nested keys use a double
//! underscore, e.g. `PAPERVISTA_SERVER__PORT=9000`.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8000
//!
//! [client]
//! server_url = "http://127.0.0.1:8000"
//! timeout_secs = 60
//!
//! [arxiv]
//! base_url = "http://export.arxiv.org/api/query"
//! timeout_secs = 30
//! max_attempts = 3
//!
//! [session]
//! id_strategy = "sequential"
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::IdStrategy;
use crate::sources::ARXIV_API_URL;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PAPERVISTA";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Service bind address
    #[serde(default)]
    pub server: ServerConfig,

    /// How the CLI reaches the service
    #[serde(default)]
    pub client: ClientConfig,

    /// arXiv provider settings
    #[serde(default)]
    pub arxiv: ArxivConfig,

    /// Session identifier settings
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Service bind address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

/// CLI client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of a running service
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_client_timeout(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_server_url() -> String {
    format!("http://{}:{}", default_host(), default_port())
}

fn default_client_timeout() -> u64 {
    60
}

/// arXiv provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivConfig {
    #[serde(default = "default_arxiv_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_arxiv_timeout")]
    pub timeout_secs: u64,

    /// Attempts per search, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            base_url: default_arxiv_url(),
            timeout_secs: default_arxiv_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl ArxivConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_arxiv_url() -> String {
    ARXIV_API_URL.to_string()
}

fn default_arxiv_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

/// Session identifier configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter level when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Render as a TOML document
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

/// Load configuration from defaults, an optional file and the environment.
///
/// An explicitly given file must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    build_config(path, None)
}

fn build_config(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<Config, config::ConfigError> {
    let mut builder =
        config::Config::builder().add_source(config::Config::try_from(&Config::default())?);

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .source(env),
        )
        .build()?;

    settings.try_deserialize()
}

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("papervista").join("config.toml"))
}

/// The default configuration file, if one exists
pub fn find_config_file() -> Option<PathBuf> {
    default_config_path().filter(|path| path.is_file())
}

/// Write the default configuration to `path`, creating parent directories.
///
/// Refuses to overwrite an existing file.
pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        ));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = Config::default()
        .to_toml()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, body)
}
