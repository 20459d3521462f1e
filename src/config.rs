use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::snapshot::DEFAULT_SNAPSHOT_TTL;

pub const DEFAULT_MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built front-end shell.
    pub static_dir: PathBuf,
    pub snapshot_ttl: Duration,
    pub max_body_bytes: usize,
    /// Optional JSON file replacing the built-in country table.
    pub life_expectancy_table: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            static_dir: PathBuf::from("dist"),
            snapshot_ttl: DEFAULT_SNAPSHOT_TTL,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            life_expectancy_table: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let host = env::var("APP_HOST").unwrap_or(defaults.host);

        let port = match env::var("APP_PORT") {
            Ok(raw) => raw.parse::<u16>().context("APP_PORT must be a valid u16")?,
            Err(_) => defaults.port,
        };

        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let snapshot_ttl = match env::var("SNAPSHOT_TTL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .context("SNAPSHOT_TTL_SECS must be a valid u64")?,
            ),
            Err(_) => defaults.snapshot_ttl,
        };

        let max_body_bytes = match env::var("MAX_BODY_BYTES") {
            Ok(raw) => raw
                .parse::<usize>()
                .context("MAX_BODY_BYTES must be a valid usize")?,
            Err(_) => defaults.max_body_bytes,
        };

        let life_expectancy_table = env::var("LIFE_EXPECTANCY_TABLE").ok().map(PathBuf::from);

        Ok(Self {
            host,
            port,
            static_dir,
            snapshot_ttl,
            max_body_bytes,
            life_expectancy_table,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
