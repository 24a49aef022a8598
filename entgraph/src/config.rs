use crate::error::{EntError, EntResult};
use sea_orm::ConnectOptions;
use serde::Deserialize;
use std::time::Duration;

pub const DRIVERS: [&str; 3] = ["mysql", "postgres", "sqlite3"];

/// Connection settings for [`crate::Client::connect`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    pub driver: String,
    pub dsn: String,
    /// Log every statement through sqlx.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            dsn: dsn.into(),
            debug: false,
            max_connections: None,
            connect_timeout_secs: None,
        }
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = Some(n);
        self
    }

    pub fn from_json(json: &str) -> EntResult<Self> {
        serde_json::from_str(json).map_err(|e| EntError::InvalidConfig(e.to_string()))
    }

    /// Read `ENTGRAPH_DRIVER`, `ENTGRAPH_DSN`, `ENTGRAPH_DEBUG` and
    /// `ENTGRAPH_MAX_CONNECTIONS`.
    pub fn from_env() -> EntResult<Self> {
        let var = |name: &str| std::env::var(name).ok();
        let driver = var("ENTGRAPH_DRIVER")
            .ok_or_else(|| EntError::InvalidConfig("ENTGRAPH_DRIVER is not set".to_string()))?;
        let dsn = var("ENTGRAPH_DSN")
            .ok_or_else(|| EntError::InvalidConfig("ENTGRAPH_DSN is not set".to_string()))?;
        let mut config = Config::new(driver, dsn);
        if let Some(debug) = var("ENTGRAPH_DEBUG") {
            config.debug = matches!(debug.as_str(), "1" | "true" | "TRUE" | "yes");
        }
        if let Some(n) = var("ENTGRAPH_MAX_CONNECTIONS") {
            let n = n.parse::<u32>().map_err(|e| {
                EntError::InvalidConfig(format!("ENTGRAPH_MAX_CONNECTIONS: {}", e))
            })?;
            config.max_connections = Some(n);
        }
        Ok(config)
    }

    /// Check the driver name and that the DSN scheme belongs to it.
    pub fn validate(&self) -> EntResult<()> {
        let schemes: &[&str] = match self.driver.as_str() {
            "mysql" => &["mysql"],
            "postgres" => &["postgres", "postgresql"],
            "sqlite3" => &["sqlite"],
            other => return Err(EntError::UnsupportedDriver(other.to_string())),
        };
        let scheme = self.dsn.split(':').next().unwrap_or_default();
        if !schemes.contains(&scheme) {
            return Err(EntError::InvalidConfig(format!(
                "dsn {:?} does not match driver {:?}",
                self.dsn, self.driver
            )));
        }
        Ok(())
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut opts = ConnectOptions::new(self.dsn.clone());
        opts.sqlx_logging(self.debug)
            .sqlx_logging_level(log::LevelFilter::Debug);
        if let Some(n) = self.max_connections {
            opts.max_connections(n);
        }
        if let Some(secs) = self.connect_timeout_secs {
            opts.connect_timeout(Duration::from_secs(secs));
        }
        opts
    }
}
