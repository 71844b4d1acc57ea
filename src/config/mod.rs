mod file_config;

pub use file_config::{ConnectivityConfig, FileConfig};

use crate::store::CategoryReplacePolicy;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_PROBE_HOST: &str = "1.1.1.1";
pub const DEFAULT_PROBE_PORT: u16 = 443;
pub const DEFAULT_PROBE_INTERVAL_SEC: u64 = 5;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub api_base_url: Option<String>,
    pub db_path: Option<PathBuf>,
    pub request_timeout_sec: Option<u64>,
    pub category_replace_policy: Option<CategoryReplacePolicy>,
    pub probe_host: Option<String>,
    pub probe_port: Option<u16>,
    pub probe_interval_sec: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub db_path: PathBuf,
    /// `None` leaves the timeout to the HTTP client.
    pub request_timeout: Option<Duration>,
    pub category_replace_policy: CategoryReplacePolicy,
    pub connectivity: ConnectivitySettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivitySettings {
    pub probe_host: String,
    pub probe_port: u16,
    pub probe_interval: Duration,
}

impl ConnectivitySettings {
    pub fn probe_addr(&self) -> String {
        format!("{}:{}", self.probe_host, self.probe_port)
    }
}

impl Default for ConnectivitySettings {
    fn default() -> Self {
        Self {
            probe_host: DEFAULT_PROBE_HOST.to_string(),
            probe_port: DEFAULT_PROBE_PORT,
            probe_interval: Duration::from_secs(DEFAULT_PROBE_INTERVAL_SEC),
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_base_url = file
            .api_base_url
            .or_else(|| cli.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            bail!("api_base_url must be an http(s) URL, got {:?}", api_base_url);
        }

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .unwrap_or_else(|| PathBuf::from("catalog.db"));

        let request_timeout = match file.request_timeout_sec.or(cli.request_timeout_sec) {
            Some(0) => bail!("request_timeout_sec must be greater than 0"),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let category_replace_policy = file
            .category_replace_policy
            .or(cli.category_replace_policy)
            .unwrap_or_default();

        let conn_file = file.connectivity.unwrap_or_default();
        let probe_interval_sec = conn_file
            .probe_interval_sec
            .or(cli.probe_interval_sec)
            .unwrap_or(DEFAULT_PROBE_INTERVAL_SEC);
        if probe_interval_sec == 0 {
            bail!("probe_interval_sec must be greater than 0");
        }
        let connectivity = ConnectivitySettings {
            probe_host: conn_file
                .probe_host
                .or_else(|| cli.probe_host.clone())
                .unwrap_or_else(|| DEFAULT_PROBE_HOST.to_string()),
            probe_port: conn_file
                .probe_port
                .or(cli.probe_port)
                .unwrap_or(DEFAULT_PROBE_PORT),
            probe_interval: Duration::from_secs(probe_interval_sec),
        };

        Ok(Self {
            api_base_url,
            db_path,
            request_timeout,
            category_replace_policy,
            connectivity,
        })
    }
}
