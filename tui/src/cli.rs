use clap::Parser;
use showroom_core::ClientConfig;
use showroom_core::ConfigError;
use showroom_core::ConfigLoader;
use showroom_core::config::timeout_from_ms;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(version, about = "Terminal chat client for the showroom assistant")]
pub struct Cli {
    /// Config file to read instead of `$SHOWROOM_HOME/config.toml`.
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Chat endpoint URL.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in milliseconds; 0 waits indefinitely.
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Show assistant replies as plain text instead of rendering markdown.
    #[arg(long = "no-markdown", default_value_t = false)]
    pub no_markdown: bool,
}

impl Cli {
    /// Resolve configuration with command-line flags as the last layer.
    pub fn load_config(&self) -> Result<ClientConfig, ConfigError> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = &self.config {
            loader = loader.with_file(path.clone());
        }
        let mut config = loader.load()?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(ms) = self.timeout_ms {
            config.timeout = timeout_from_ms(ms);
        }
        if self.no_markdown {
            config.markdown = false;
        }
    }
}
