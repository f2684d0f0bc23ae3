use serde::Deserialize;
use std::path::Path;

/// Top-level config loaded from `prtg.toml`, with `PRTG_*` environment overrides.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DatasourceConfig {
    #[serde(default)]
    pub prtg: PrtgConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrtgConfig {
    /// Base URL of the PRTG server, without port or path (e.g. `https://prtg.local`).
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub api_key: String,
    /// Skip TLS certificate verification (self-signed PRTG installs).
    #[serde(default)]
    pub allow_insecure: bool,
    /// Upper bound on objects scanned when collecting editor metadata.
    #[serde(default = "default_metadata_limit")]
    pub metadata_limit: u64,
}

impl Default for PrtgConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            port: default_port(),
            api_key: String::new(),
            allow_insecure: false,
            metadata_limit: default_metadata_limit(),
        }
    }
}

fn default_port() -> u16 {
    1616
}

fn default_metadata_limit() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl DatasourceConfig {
    /// Load config from a TOML file. Returns defaults if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("config file not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `PRTG_*` overrides on top of whatever the file provided.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PRTG_URL") {
            self.prtg.url = url;
        }
        if let Some(port) = lookup("PRTG_PORT").and_then(|p| p.parse().ok()) {
            self.prtg.port = port;
        }
        if let Some(key) = lookup("PRTG_API_KEY") {
            self.prtg.api_key = key;
        }
        if let Some(insecure) = lookup("PRTG_ALLOW_INSECURE") {
            self.prtg.allow_insecure = matches!(insecure.as_str(), "1" | "true" | "yes");
        }
        if let Some(limit) = lookup("PRTG_METADATA_LIMIT").and_then(|l| l.parse().ok()) {
            self.prtg.metadata_limit = limit;
        }
        if let Some(addr) = lookup("PRTG_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
    }
}
