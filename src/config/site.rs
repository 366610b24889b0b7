//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Title used when no configuration is present
pub const DEFAULT_TITLE: &str = "Gary Wu";

/// Tagline used when no configuration is present
pub const DEFAULT_TAGLINE: &str = "Developer workflows and AI-assisted writing";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    /// Platform name to profile URL, in file order. Entries may be left empty.
    pub social: IndexMap<String, Option<String>>,
    /// Show the publication date on homepage cards
    pub show_dates: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            tagline: DEFAULT_TAGLINE.to_string(),
            social: IndexMap::new(),
            show_dates: true,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    /// or cannot be parsed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No site config at {:?}, using defaults", path);
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                tracing::debug!("Loaded site config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Invalid site config {:?}, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    /// Social links that have a non-empty URL, in configured order
    pub fn social_links(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.social.iter().filter_map(|(platform, url)| {
            let url = url.as_deref()?.trim();
            if url.is_empty() {
                None
            } else {
                Some((platform.as_str(), url))
            }
        })
    }
}
