//! readme-press: a small static site generator for README-style posts
//!
//! Each post lives in its own directory as a markdown document with optional
//! front-matter. A build renders every post and a homepage into the output
//! directory, then inlines the stylesheet so each page is a single file.

pub mod commands;
pub mod config;
pub mod content;
pub mod css;
pub mod generator;
pub mod readme;
pub mod server;
pub mod templates;

use std::path::{Path, PathBuf};

/// The site being built: configuration plus resolved paths
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// File and directory names
    pub layout: config::SiteLayout,
    /// Base directory
    pub base_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
}

impl Site {
    /// Create a site rooted at a directory, with the default layout
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self::with_layout(base_dir, config::SiteLayout::default())
    }

    /// Create a site with a custom layout
    pub fn with_layout<P: AsRef<Path>>(base_dir: P, layout: config::SiteLayout) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_or_default(base_dir.join(&layout.config_file));
        let output_dir = base_dir.join(&layout.output_dir);

        Self {
            config,
            layout,
            base_dir,
            output_dir,
        }
    }

    /// Load posts, write pages and refresh the README summary.
    /// CSS inlining is a separate step.
    pub fn generate(&self) -> anyhow::Result<Vec<content::Post>> {
        commands::build::generate(self)
    }

    /// Inline CSS into the generated pages
    pub fn inline_css(&self) -> anyhow::Result<css::InlineReport> {
        commands::inline_css::run(self)
    }

    /// Files that trigger a rebuild in watch mode
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        self.layout.watch_paths(&self.base_dir)
    }
}
