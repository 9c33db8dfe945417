//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::dex::urls::DEFAULT_EXTERNAL_PROFILE_BASE;
use crate::source::DEFAULT_TTL_SECS;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Public site URL used to build page links (default: empty, which
    /// produces root-relative links).
    pub site_url: String,

    /// Site directory holding `pages/` and `templates/` (default: ./site).
    pub site_dir: PathBuf,

    /// Directory of `<dataset>.json` files (default: ./data).
    pub data_dir: PathBuf,

    /// Remote sheet API endpoint. When set, datasets are fetched from it
    /// instead of `data_dir`.
    pub sheet_api_url: Option<String>,

    /// How long fetched datasets stay cached; 0 disables caching.
    pub sheet_cache_ttl: Duration,

    /// Base URL for designer and artist profile links.
    pub external_profile_base: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let site_url = env::var("SITE_URL").unwrap_or_default();

        let site_dir = env::var("SITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./site"));

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let sheet_api_url = env::var("SHEET_API_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let sheet_cache_ttl = env::var("SHEET_CACHE_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .map(Duration::from_secs)
            .context("SHEET_CACHE_TTL_SECS must be a whole number of seconds")?;

        let external_profile_base = env::var("EXTERNAL_PROFILE_BASE")
            .unwrap_or_else(|_| DEFAULT_EXTERNAL_PROFILE_BASE.to_string());

        Ok(Self {
            port,
            site_url,
            site_dir,
            data_dir,
            sheet_api_url,
            sheet_cache_ttl,
            external_profile_base,
        })
    }

    /// Directory of page configuration files.
    pub fn pages_dir(&self) -> PathBuf {
        self.site_dir.join("pages")
    }

    /// Directory of template overrides.
    pub fn templates_dir(&self) -> PathBuf {
        self.site_dir.join("templates")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            site_url: String::new(),
            site_dir: PathBuf::from("./site"),
            data_dir: PathBuf::from("./data"),
            sheet_api_url: None,
            sheet_cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            external_profile_base: DEFAULT_EXTERNAL_PROFILE_BASE.to_string(),
        }
    }
}
