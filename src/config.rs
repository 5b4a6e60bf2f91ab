use crate::constants::{CACHE_KEY, CATALOG_PATH, PLACEHOLDER_IMAGE};
use crate::error::{Result, WorksError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub content_store: ContentStoreConfig,
    pub site: SiteConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentStoreConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Read token for private datasets.
    pub token: Option<String>,
    /// Unset means no timeout; only cancellation ends a slow fetch.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            project_id: "nwnpryai".to_string(),
            dataset: "production".to_string(),
            api_version: "2024-10-10".to_string(),
            use_cdn: true,
            token: None,
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub origin: String,
    pub catalog_path: String,
    pub placeholder_image: String,
    pub cache_key: String,
    /// Directory holding the CLI's session snapshot.
    pub session_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            catalog_path: CATALOG_PATH.to_string(),
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            cache_key: CACHE_KEY.to_string(),
            session_dir: PathBuf::from(".session"),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to defaults
    /// when the file is absent, then applies environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_PATH))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let config_content = fs::read_to_string(path).map_err(|e| {
                WorksError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            Self::from_toml(&config_content)?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Config::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("UCP_SANITY_PROJECT_ID") {
            self.content_store.project_id = v;
        }
        if let Ok(v) = std::env::var("UCP_SANITY_DATASET") {
            self.content_store.dataset = v;
        }
        if let Ok(v) = std::env::var("UCP_SANITY_TOKEN") {
            self.content_store.token = Some(v);
        }
        if let Ok(v) = std::env::var("UCP_SITE_ORIGIN") {
            self.site.origin = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.content_store.project_id.trim().is_empty() {
            return Err(WorksError::Config("content_store.project_id must not be empty".into()));
        }
        if self.content_store.dataset.trim().is_empty() {
            return Err(WorksError::Config("content_store.dataset must not be empty".into()));
        }
        if !self.site.catalog_path.starts_with('/') {
            return Err(WorksError::Config(format!(
                "site.catalog_path must start with '/': {}",
                self.site.catalog_path
            )));
        }
        Ok(())
    }
}
