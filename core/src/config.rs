//! Layered client configuration.
//!
//! Precedence, later layers winning:
//! 1. Built-in defaults
//! 2. `config.toml` in the showroom home (`$SHOWROOM_HOME`, else `~/.showroom`)
//!    or an explicit file
//! 3. `SHOWROOM_*` environment variables
//!
//! Command-line flags are applied on top by the binary.
//!
//! ```toml
//! endpoint = "http://127.0.0.1:8000/api/chat"
//! timeout_ms = 30000
//! markdown = true
//! log_dir = "/tmp/showroom-logs"
//!
//! [catalog]
//! products = ["The Cloud Sofa", "Classic Chesterfield"]
//! ```

use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::ProductCatalog;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000/api/chat";
pub const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_HOME_DIR: &str = ".showroom";
const DEFAULT_ENV_PREFIX: &str = "SHOWROOM";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for ${var}: '{value}' (expected: {expected})")]
    InvalidEnvValue {
        var: String,
        value: String,
        expected: &'static str,
    },

    #[error("endpoint must not be empty")]
    EmptyEndpoint,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    /// `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
    /// Render bot replies as markdown.
    pub markdown: bool,
    pub log_dir: PathBuf,
    pub catalog: ProductCatalog,
}

impl ClientConfig {
    fn defaults(home: &Path) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            markdown: true,
            log_dir: home.join("log"),
            catalog: ProductCatalog::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigToml {
    endpoint: Option<String>,
    timeout_ms: Option<u64>,
    markdown: Option<bool>,
    log_dir: Option<PathBuf>,
    catalog: Option<CatalogToml>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogToml {
    #[serde(default)]
    products: Vec<String>,
}

/// Builder for [`ClientConfig`].
pub struct ConfigLoader {
    home: Option<PathBuf>,
    file: Option<PathBuf>,
    env_prefix: String,
    skip_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            home: None,
            file: None,
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            skip_env: false,
        }
    }

    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = Some(home);
        self
    }

    /// Read this file instead of `<home>/config.toml`. Unlike the default
    /// file, an explicit file must exist.
    pub fn with_file(mut self, file: PathBuf) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn skip_env_layer(mut self) -> Self {
        self.skip_env = true;
        self
    }

    pub fn load(self) -> Result<ClientConfig, ConfigError> {
        self.load_with_env(|var| std::env::var(var).ok())
    }

    /// Same as [`ConfigLoader::load`] with an explicit environment lookup.
    pub fn load_with_env<F>(self, lookup: F) -> Result<ClientConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = self.resolve_home(&lookup);
        let mut config = ClientConfig::defaults(&home);

        let (path, required) = match &self.file {
            Some(file) => (file.clone(), true),
            None => (home.join(CONFIG_FILE_NAME), false),
        };
        if let Some(file) = read_config_file(&path, required)? {
            apply_file(&mut config, file);
        }

        if !self.skip_env {
            self.apply_env(&mut config, &lookup)?;
        }

        if config.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        Ok(config)
    }

    fn resolve_home<F>(&self, lookup: &F) -> PathBuf
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(home) = &self.home {
            return home.clone();
        }
        if let Some(home) = lookup(&format!("{}_HOME", self.env_prefix)) {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .map(|h| h.join(DEFAULT_HOME_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_DIR))
    }

    fn apply_env<F>(&self, config: &mut ClientConfig, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| format!("{}_{name}", self.env_prefix);

        if let Some(endpoint) = lookup(&var("ENDPOINT")) {
            config.endpoint = endpoint;
        }

        let timeout_var = var("TIMEOUT_MS");
        if let Some(raw) = lookup(&timeout_var) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnvValue {
                    var: timeout_var.clone(),
                    value: raw.clone(),
                    expected: "milliseconds as an unsigned integer",
                })?;
            config.timeout = timeout_from_ms(ms);
        }

        let markdown_var = var("MARKDOWN");
        if let Some(raw) = lookup(&markdown_var) {
            config.markdown = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnvValue {
                var: markdown_var.clone(),
                value: raw.clone(),
                expected: "true/false/1/0",
            })?;
        }

        if let Some(dir) = lookup(&var("LOG_DIR")) {
            config.log_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

fn read_config_file(path: &Path, required: bool) -> Result<Option<ConfigToml>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
}

fn apply_file(config: &mut ClientConfig, file: ConfigToml) {
    if let Some(endpoint) = file.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(ms) = file.timeout_ms {
        config.timeout = timeout_from_ms(ms);
    }
    if let Some(markdown) = file.markdown {
        config.markdown = markdown;
    }
    if let Some(log_dir) = file.log_dir {
        config.log_dir = log_dir;
    }
    if let Some(catalog) = file.catalog {
        config.catalog = ProductCatalog::from_products(catalog.products);
    }
}

/// Zero disables the timeout.
pub fn timeout_from_ms(ms: u64) -> Option<Duration> {
    (ms > 0).then_some(Duration::from_millis(ms))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
