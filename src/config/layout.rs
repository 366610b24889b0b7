//! Where content lives and where output goes
//!
//! The build reads a fixed set of post directories rather than walking the
//! tree. The list and the other well-known paths are plain data here so tests
//! can point the pipeline at a temporary directory.

use std::path::{Path, PathBuf};

/// Post directories read by a default build, in input order
pub const DEFAULT_SOURCE_DIRS: &[&str] = &["git-publish", "bootstrapping-setup", "w-slash-ai"];

/// Fixed file and directory names used by the pipeline
#[derive(Debug, Clone)]
pub struct SiteLayout {
    /// Post directory names, relative to the base directory
    pub source_dirs: Vec<String>,
    /// Document read from inside each post directory
    pub document_name: String,
    /// Output directory, relative to the base directory
    pub output_dir: String,
    /// Site configuration file, relative to the base directory
    pub config_file: String,
    /// Theme configuration watched by the dev server
    pub theme_config: String,
    /// Prebuilt stylesheet, relative to the output directory
    pub stylesheet: String,
    /// Project README that receives the generated summary
    pub readme: String,
    /// Glob patterns (relative to the base directory) listed as theme files
    pub theme_patterns: Vec<String>,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            source_dirs: DEFAULT_SOURCE_DIRS.iter().map(|d| d.to_string()).collect(),
            document_name: "README.md".to_string(),
            output_dir: "dist".to_string(),
            config_file: "_config.yml".to_string(),
            theme_config: "tailwind.config.js".to_string(),
            stylesheet: "tailwind.css".to_string(),
            readme: "README.md".to_string(),
            theme_patterns: vec![
                "tailwind.config.js".to_string(),
                "styles/**/*.css".to_string(),
            ],
        }
    }
}

impl SiteLayout {
    /// Layout with a custom list of post directories
    pub fn with_source_dirs<I, S>(dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source_dirs: dirs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Path of the document for one post directory
    pub fn document_path(&self, base_dir: &Path, dir: &str) -> PathBuf {
        base_dir.join(dir).join(&self.document_name)
    }

    /// Paths the dev server watches: config, every post document, theme config
    pub fn watch_paths(&self, base_dir: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(self.source_dirs.len() + 2);
        paths.push(base_dir.join(&self.config_file));
        paths.extend(
            self.source_dirs
                .iter()
                .map(|dir| self.document_path(base_dir, dir)),
        );
        paths.push(base_dir.join(&self.theme_config));
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = SiteLayout::default();
        assert_eq!(layout.source_dirs.len(), 3);
        assert_eq!(layout.output_dir, "dist");
        assert_eq!(layout.document_name, "README.md");
    }

    #[test]
    fn test_watch_paths_order() {
        let layout = SiteLayout::with_source_dirs(["a", "b"]);
        let base = Path::new("/site");
        let paths = layout.watch_paths(base);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/site/_config.yml"),
                PathBuf::from("/site/a/README.md"),
                PathBuf::from("/site/b/README.md"),
                PathBuf::from("/site/tailwind.config.js"),
            ]
        );
    }
}
