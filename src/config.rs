use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_MODEL_PATH: &str = "artifacts/risk_model.ot";
pub const DEFAULT_META_PATH: &str = "artifacts/risk_model.meta.json";
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model_path: PathBuf,
    pub meta_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    /// Log every prediction at info level (`LOG_PRED=1`).
    pub log_predictions: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            meta_path: PathBuf::from(DEFAULT_META_PATH),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            log_predictions: false,
        }
    }
}

impl Config {
    /// `MODEL_PATH`, `META_PATH`, `BIND_HOST`, `PORT`, `LOG_PRED`; unset keys
    /// keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Config::default();
        if let Some(p) = lookup("MODEL_PATH") {
            cfg.model_path = PathBuf::from(p);
        }
        if let Some(p) = lookup("META_PATH") {
            cfg.meta_path = PathBuf::from(p);
        }
        if let Some(h) = lookup("BIND_HOST") {
            cfg.host = h.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                key: "BIND_HOST",
                value: h.clone(),
                reason: e.to_string(),
            })?;
        }
        if let Some(p) = lookup("PORT") {
            cfg.port = p.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                key: "PORT",
                value: p.clone(),
                reason: e.to_string(),
            })?;
        }
        cfg.log_predictions = lookup("LOG_PRED").as_deref() == Some("1");
        Ok(cfg)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
