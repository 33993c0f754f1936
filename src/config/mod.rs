// Configuration module entry point
// Ambient process settings; the listen port and work delay are not configurable

mod types;

use std::net::SocketAddr;

use crate::error::Error;

pub use types::{Config, LoggingConfig, PerformanceConfig, ServerConfig};

/// Port the server always listens on.
pub const LISTEN_PORT: u16 = 8080;

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml"; a missing file is not an error
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                // e.g. SERVER_PERFORMANCE__MAX_CONNECTIONS=256
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("logging.access_log", false)?
            .set_default("logging.access_log_format", "common")?
            .set_default("performance.keep_alive_timeout", 75)?
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the runtime cannot start with
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.workers == Some(0) {
            return Err(config::ConfigError::Message(
                "server.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{LISTEN_PORT}", self.server.host);
        addr.parse::<SocketAddr>()
            .map_err(|source| Error::InvalidAddress { addr, source })
    }
}
