//! Project README summary
//!
//! When the project README contains both marker comments, the text between
//! them is replaced with a list of the posts found by the last build and the
//! theme files present in the project.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::Post;
use crate::Site;

pub const START_MARKER: &str = "<!-- readme-press:start -->";
pub const END_MARKER: &str = "<!-- readme-press:end -->";

/// Outcome of a README refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadmeUpdate {
    Updated,
    Unchanged,
    NoReadme,
    NoMarkers,
}

/// Rewrite the generated section of the project README
pub fn update(site: &Site, posts: &[Post]) -> Result<ReadmeUpdate> {
    let path = site.base_dir.join(&site.layout.readme);
    let current = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => {
            tracing::debug!("No README at {:?}, skipping summary", path);
            return Ok(ReadmeUpdate::NoReadme);
        }
    };

    let theme_files = theme_files(&site.base_dir, &site.layout.theme_patterns)?;
    let section = render_section(posts, &site.layout.document_name, &theme_files);

    let Some(updated) = replace_section(&current, &section) else {
        tracing::debug!("README {:?} has no summary markers, skipping", path);
        return Ok(ReadmeUpdate::NoMarkers);
    };

    if updated == current {
        return Ok(ReadmeUpdate::Unchanged);
    }

    fs::write(&path, updated).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::info!("Updated README summary in {:?}", path);
    Ok(ReadmeUpdate::Updated)
}

/// Files matching the theme patterns, relative to the base directory, sorted
pub fn theme_files(base_dir: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let full = base_dir.join(pattern);
        let full = full.to_string_lossy();
        for entry in glob::glob(&full).with_context(|| format!("Bad glob pattern {:?}", pattern))? {
            match entry {
                Ok(path) if path.is_file() => {
                    let relative = path.strip_prefix(base_dir).unwrap_or(&path).to_path_buf();
                    files.push(relative);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Cannot read theme file: {}", e),
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Markdown for the generated section, without the markers
fn render_section(posts: &[Post], document_name: &str, theme_files: &[PathBuf]) -> String {
    let mut out = String::from("\n## Posts\n\n");
    if posts.is_empty() {
        out.push_str("_No posts found._\n");
    }
    for post in posts {
        out.push_str(&format!(
            "- [{}](./{}/{}): {}\n",
            post.title, post.slug, document_name, post.description
        ));
    }

    out.push_str("\n## Theme files\n\n");
    if theme_files.is_empty() {
        out.push_str("_No theme files found._\n");
    }
    for file in theme_files {
        out.push_str(&format!("- `{}`\n", file.display()));
    }
    out.push('\n');
    out
}

/// Swap the text between the markers. None when either marker is missing.
fn replace_section(readme: &str, section: &str) -> Option<String> {
    let start = readme.find(START_MARKER)? + START_MARKER.len();
    let end = start + readme[start..].find(END_MARKER)?;
    Some(format!("{}{}{}", &readme[..start], section, &readme[end..]))
}
