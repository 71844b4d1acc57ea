use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::store::CategoryReplacePolicy;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub db_path: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub category_replace_policy: Option<CategoryReplacePolicy>,

    pub connectivity: Option<ConnectivityConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ConnectivityConfig {
    pub probe_host: Option<String>,
    pub probe_port: Option<u16>,
    pub probe_interval_sec: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
