use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::data::loader::parse_url;

/// Trending gallery of the last day, viral sort, album previews included.
pub const DEFAULT_ENDPOINT: &str =
    "https://api.imgur.com/3/gallery/hot/viral/day/1?showViral=true&mature=false&album_previews=true";

/// Environment variable naming a JSON config file.
pub const CONFIG_PATH_VAR: &str = "GALLERY_CONFIG";
pub const ENDPOINT_VAR: &str = "GALLERY_ENDPOINT";
pub const CLIENT_ID_VAR: &str = "GALLERY_CLIENT_ID";

// ---------------------------------------------------------------------------
// GalleryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Gallery listing endpoint.
    pub endpoint: String,
    /// Imgur application client ID, sent as `Client-ID <id>`.
    pub client_id: String,
    pub request_timeout_secs: u64,
    pub use_proxy: bool,
    /// Completed thumbnails kept in memory.
    pub thumbnail_cache_capacity: usize,
    /// Longest side, in pixels, thumbnails are scaled down to.
    pub thumbnail_size: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client_id: String::new(),
            request_timeout_secs: 30,
            use_proxy: true,
            thumbnail_cache_capacity: 128,
            thumbnail_size: 160,
        }
    }
}

impl GalleryConfig {
    /// Build the configuration from the environment: the JSON file named by
    /// `GALLERY_CONFIG` (if any), then `GALLERY_ENDPOINT` / `GALLERY_CLIENT_ID`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::load(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(
            std::env::var(ENDPOINT_VAR).ok(),
            std::env::var(CLIENT_ID_VAR).ok(),
        );
        config.validate()?;

        if config.client_id.is_empty() {
            log::warn!("No client ID configured; set {CLIENT_ID_VAR} or `client_id` in the config file");
        }
        Ok(config)
    }

    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, endpoint: Option<String>, client_id: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(client_id) = client_id {
            self.client_id = client_id.trim().to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        parse_url(&self.endpoint).context("invalid gallery endpoint")?;
        if self.thumbnail_size == 0 {
            bail!("thumbnail_size must be greater than zero");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
