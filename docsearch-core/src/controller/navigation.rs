// docsearch-core/src/controller/navigation.rs

use tracing::{info, warn};

/// Full (non-client-side) navigation to a location.
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Opens hit URLs in the system browser, resolving relative ones
/// against the site base.
#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    base_url: String,
}

impl BrowserNavigator {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn resolve(&self, url: &str) -> String {
        resolve_url(&self.base_url, url)
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        let target = self.resolve(url);
        info!("navigating to {}", target);
        if let Err(e) = open::that_detached(&target) {
            warn!("failed to open {}: {}", target, e);
        }
    }
}

/// Absolute URLs pass through; anything else is joined onto `base`.
#[must_use]
pub fn resolve_url(base: &str, url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }

    let base = base.trim_end_matches('/');
    if url.starts_with('/') {
        format!("{base}{url}")
    } else {
        format!("{base}/{url}")
    }
}
