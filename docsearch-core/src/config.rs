//! src/config.rs
//! ============================================================================
//! # Config: Search Front-end Configuration Loader
//!
//! Loads settings as TOML from the platform config path using the
//! [`directories`](https://docs.rs/directories) crate. Missing files are
//! written with defaults on first load.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use tokio::fs as TokioFs;

use crate::{error::AppError, model::query_state::MAX_QUERY_LEN};

/// Settings for the search endpoint and the debounced dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Full URL of the `GET /search` endpoint
    pub endpoint: String,

    /// Documentation language sent with every request
    pub language: String,

    /// Documentation version sent with every request
    pub version: String,

    /// Settle window for keystroke coalescing
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,

    /// Upper bound on a single search request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Queries are truncated to this many characters
    pub max_query_len: usize,

    /// Mirror the query into the page URL's `query` parameter
    pub url_sync: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/search".to_string(),
            language: "en".to_string(),
            version: "latest".to_string(),
            debounce: Duration::from_millis(200),
            request_timeout: Duration::from_secs(5),
            max_query_len: MAX_QUERY_LEN,
            url_sync: true,
        }
    }
}

/// Analytics sink selection.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub enabled: bool,

    /// When set, events are POSTed here; otherwise they go to the log.
    pub endpoint: Option<String>,
}

/// Site the hit URLs belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base used to resolve relative hit URLs before navigation
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Overlay (modal) presentation instead of inline
    pub overlay: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { overlay: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub log_dir: PathBuf,

    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            level: "info".to_string(),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Config {
    /// Loads config from the platform config dir, or writes and returns defaults.
    ///
    /// The config is expected at `$XDG_CONFIG_HOME/docsearch/config.toml`
    /// (Linux), or equivalent on Windows/macOS.
    pub async fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path).await
    }

    /// Loads config from an explicit path, creating it with defaults if missing.
    pub async fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })?;
            let cfg: Self = toml::from_str(&text).map_err(AppError::from)?;
            cfg.validate()?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    pub async fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await.map_err(AppError::from)?;
        }

        let toml_str = toml::to_string_pretty(self).map_err(AppError::from)?;
        TokioFs::write(path, toml_str).await.map_err(AppError::from)?;

        Ok(())
    }

    /// Returns the canonical config file path using `directories::ProjectDirs`.
    pub fn config_path() -> Result<PathBuf, AppError> {
        let proj_dirs =
            ProjectDirs::from("org", "docsearch", "docsearch").ok_or(AppError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Reject settings the controller cannot run with.
    pub fn validate(&self) -> Result<(), AppError> {
        let endpoint = self.search.endpoint.as_str();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AppError::invalid_input(
                "search.endpoint",
                format!("expected an http(s) URL, got '{endpoint}'"),
            ));
        }
        if !(1..=MAX_QUERY_LEN).contains(&self.search.max_query_len) {
            return Err(AppError::invalid_input(
                "search.max_query_len",
                format!("must be between 1 and {MAX_QUERY_LEN}"),
            ));
        }
        if self.site.base_url.is_empty() {
            return Err(AppError::invalid_input("site.base_url", "must not be empty"));
        }
        if self.analytics.enabled && self.analytics.endpoint.as_deref() == Some("") {
            return Err(AppError::invalid_input("analytics.endpoint", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config::load_from(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(cfg.search.debounce, Duration::from_millis(200));
        assert_eq!(cfg.search.max_query_len, 512);
        assert!(cfg.search.url_sync);
    }

    #[tokio::test]
    async fn test_partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(
            &path,
            "[search]\nlanguage = \"de\"\ndebounce = \"350ms\"\n\n[ui]\noverlay = false\n",
        )
        .await
        .unwrap();

        let cfg = Config::load_from(&path).await.unwrap();
        assert_eq!(cfg.search.language, "de");
        assert_eq!(cfg.search.version, "latest");
        assert_eq!(cfg.search.debounce, Duration::from_millis(350));
        assert!(!cfg.ui.overlay);
        assert!(!cfg.analytics.enabled);
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[search]\nendpoint = \"localhost/search\"\n")
            .await
            .unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        let app_err = err.downcast_ref::<AppError>().unwrap();
        assert!(matches!(
            app_err,
            AppError::InvalidInput { field, .. } if field == "search.endpoint"
        ));
    }

    #[test]
    fn test_defaults_validate() {
        assert!(Config::default().validate().is_ok());

        let mut cfg = Config::default();
        cfg.search.max_query_len = 0;
        assert!(cfg.validate().is_err());

        cfg.search.max_query_len = MAX_QUERY_LEN;
        assert!(cfg.validate().is_ok());

        cfg.search.max_query_len = MAX_QUERY_LEN + 1;
        assert!(cfg.validate().is_err());
    }
}
