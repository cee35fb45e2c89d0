use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use toml_edit::{table, value, DocumentMut, Item};

/// Configuration for songlib.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (PORT, MUSIC_INFO_URL, LOG_LEVEL, SONG_LIBRARY_DB_PATH)
/// 3. Config file (~/.config/songlib/config.toml)
/// 4. Built-in defaults (lowest priority)
///
/// The first two are resolved by the binary's argument parser and applied
/// with [`Config::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TCP port the HTTP API listens on.
    pub port: u16,

    /// Base URL of the music-info service used to enrich new songs.
    pub music_info_url: Option<String>,

    /// Path to the SQLite database.
    ///
    /// Default: ~/.local/share/songlib/songlib.db
    pub database_path: PathBuf,

    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,

    pub enrichment: EnrichmentConfig,

    pub database: DatabaseConfig,

    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Per-request timeout for the music-info service.
    pub timeout_secs: u64,

    /// When `true`, a song is only created if enrichment succeeds. When
    /// `false`, it is stored without metadata and a warning is logged.
    pub required: bool,

    /// Retries after a transient failure (0 disables retrying).
    pub max_retries: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            required: true,
            max_retries: 2,
        }
    }
}

impl EnrichmentConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// How long a statement waits on a locked database.
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5000,
        }
    }
}

impl DatabaseConfig {
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            shutdown_grace_secs: 5,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub const fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            music_info_url: None,
            database_path: default_db_path(),
            log_level: "info".to_string(),
            enrichment: EnrichmentConfig::default(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub music_info_url: Option<String>,
    pub database_path: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from a specific file.
    ///
    /// A missing file is not an error; defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply CLI/environment values on top of the loaded configuration.
    #[must_use]
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(url) = overrides.music_info_url {
            self.music_info_url = Some(url);
        }
        if let Some(path) = overrides.database_path {
            self.database_path = path;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        self
    }

    /// Look up a setting by its dotted key, formatted for display.
    pub fn get(&self, key: &str) -> Result<String> {
        let shown = match key {
            "port" => self.port.to_string(),
            "music_info_url" => self
                .music_info_url
                .clone()
                .unwrap_or_else(|| "<not set>".to_string()),
            "database_path" => self.database_path.display().to_string(),
            "log_level" => self.log_level.clone(),
            "enrichment.timeout_secs" => self.enrichment.timeout_secs.to_string(),
            "enrichment.required" => self.enrichment.required.to_string(),
            "enrichment.max_retries" => self.enrichment.max_retries.to_string(),
            "database.busy_timeout_ms" => self.database.busy_timeout_ms.to_string(),
            "server.shutdown_grace_secs" => self.server.shutdown_grace_secs.to_string(),
            _ => bail!(
                "Unknown config key: {}\n\nValid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        };
        Ok(shown)
    }
}

/// Every key accepted by `config get` and `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "port",
    "music_info_url",
    "database_path",
    "log_level",
    "enrichment.timeout_secs",
    "enrichment.required",
    "enrichment.max_retries",
    "database.busy_timeout_ms",
    "server.shutdown_grace_secs",
];

/// Get the default database path.
///
/// Returns: ~/.local/share/songlib/songlib.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("songlib")
        .join("songlib.db")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/songlib/config.toml
/// - macOS: ~/Library/Application Support/songlib/config.toml
/// - Windows: %APPDATA%\songlib\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("songlib")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Songlib Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Port for the HTTP API
# Environment: PORT
port = 8080

# Base URL of the music-info service queried when a song is created.
# Requests are sent as GET <url>?group=...&song=...
# Environment: MUSIC_INFO_URL
music_info_url = "http://localhost:8081/info"

# Path to the SQLite database
# Environment: SONG_LIBRARY_DB_PATH
# Default: Platform-specific data directory
#database_path = "/path/to/custom/songlib.db"

# Log filter used when RUST_LOG is not set
# Environment: LOG_LEVEL
log_level = "info"

[enrichment]
# Timeout for each music-info request, in seconds
timeout_secs = 10
# Refuse to create songs whose metadata cannot be fetched.
# Set to false to store them without metadata (a warning is logged).
required = true
# Retries after a transient failure (timeouts, 5xx, 429)
max_retries = 2

[database]
# How long a statement waits on a locked database, in milliseconds
busy_timeout_ms = 5000

[server]
# Grace period for in-flight requests after SIGINT/SIGTERM, in seconds
shutdown_grace_secs = 5
"#
}

/// Create the config file with example content if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

/// Set a single key in the config file, preserving comments and layout.
///
/// The value is checked against the key's type before anything is written.
pub fn set_config_value(path: &Path, key: &str, raw: &str) -> Result<()> {
    ensure_config_file(path)?;

    let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
    let mut doc: DocumentMut = contents.parse().context("Failed to parse config file")?;

    let item = typed_value(key, raw)?;
    match key.split_once('.') {
        Some((section, field)) => {
            let section_item = doc.as_table_mut().entry(section).or_insert(table());
            let Some(section_table) = section_item.as_table_mut() else {
                bail!("[{}] in {} is not a table", section, path.display());
            };
            section_table.insert(field, item);
        }
        None => {
            doc.as_table_mut().insert(key, item);
        }
    }

    // Reject edits that would leave the file unloadable.
    toml::from_str::<Config>(&doc.to_string())
        .with_context(|| format!("Value {raw:?} is not valid for {key}"))?;

    std::fs::write(path, doc.to_string()).context("Failed to write config file")?;
    Ok(())
}

fn typed_value(key: &str, raw: &str) -> Result<Item> {
    let item = match key {
        "port"
        | "enrichment.timeout_secs"
        | "enrichment.max_retries"
        | "database.busy_timeout_ms"
        | "server.shutdown_grace_secs" => {
            let n: i64 = raw
                .parse()
                .with_context(|| format!("{key} expects an integer, got {raw:?}"))?;
            value(n)
        }
        "enrichment.required" => {
            let b: bool = raw
                .parse()
                .with_context(|| format!("{key} expects true or false, got {raw:?}"))?;
            value(b)
        }
        "music_info_url" | "database_path" | "log_level" => value(raw),
        _ => bail!(
            "Unknown config key: {}\n\nValid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        ),
    };
    Ok(item)
}
