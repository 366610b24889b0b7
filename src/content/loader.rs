//! Content loader - loads posts from the declared source directories

use anyhow::Result;
use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;

use super::{description, sort_by_date_desc, FrontMatter, MarkdownRenderer, Post};
use crate::Site;

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"(?m)^#\s+(.+)$").unwrap();
}

/// Loads posts for a site
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self {
            site,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load every readable post, newest first.
    /// Directories whose document cannot be read are skipped.
    /// Undated posts share one build time so they keep their declared order.
    pub fn load_posts(&self) -> Vec<Post> {
        let build_time = Local::now();
        let mut posts = Vec::new();

        for dir in &self.site.layout.source_dirs {
            match self.load_post(dir, build_time) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", dir, e);
                }
            }
        }

        sort_by_date_desc(&mut posts);
        posts
    }

    /// Load a single post from its directory, dating it `build_time` when
    /// the front-matter has no usable date
    fn load_post(&self, dir: &str, build_time: DateTime<Local>) -> Result<Post> {
        let path = self
            .site
            .layout
            .document_path(&self.site.base_dir, dir);
        let raw = fs::read_to_string(&path)?;
        let (fm, body) = FrontMatter::parse(&raw);

        let title = fm
            .title()
            .map(str::to_string)
            .or_else(|| first_heading(body))
            .unwrap_or_else(|| dir.to_string());

        let description = fm
            .description()
            .map(str::to_string)
            .unwrap_or_else(|| description::describe(body));

        let date = match fm.non_empty("date") {
            Some(value) => fm.parse_date().unwrap_or_else(|| {
                tracing::warn!("Unrecognized date {:?} in {:?}, using build time", value, path);
                build_time
            }),
            None => build_time,
        };

        let content = self.renderer.render(body)?;
        tracing::debug!("Loaded post {:?} from {:?}", title, path);

        Ok(Post {
            title,
            description,
            date,
            slug: dir.to_string(),
            content,
            source_file: path,
        })
    }
}

/// Text of the first top-level heading
fn first_heading(body: &str) -> Option<String> {
    TITLE_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteLayout;
    use chrono::Duration;
    use std::path::Path;

    fn write_post(base: &Path, dir: &str, content: &str) {
        let post_dir = base.join(dir);
        fs::create_dir_all(&post_dir).unwrap();
        fs::write(post_dir.join("README.md"), content).unwrap();
    }

    fn site(base: &Path, dirs: &[&str]) -> Site {
        Site::with_layout(base, SiteLayout::with_source_dirs(dirs.iter().copied()))
    }

    #[test]
    fn test_missing_directory_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(
            tmp.path(),
            "a",
            "---\ntitle: Hello\n---\n# Hello\n\nThis is a long enough paragraph of explanatory text exceeding fifty characters total.",
        );

        let site = site(tmp.path(), &["a", "b"]);
        let posts = ContentLoader::new(&site).load_posts();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "a");
        assert_eq!(posts[0].title, "Hello");
        assert_eq!(
            posts[0].description,
            "This is a long enough paragraph of explanatory text exceeding fifty characters total."
        );
        assert!(posts[0].content.contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_title_fallbacks() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "from-heading", "# Heading Title\n\nBody.");
        write_post(tmp.path(), "from-dir", "No heading at all.");

        let site = site(tmp.path(), &["from-heading", "from-dir"]);
        let loader = ContentLoader::new(&site);

        let now = Local::now();

        assert_eq!(loader.load_post("from-heading", now).unwrap().title, "Heading Title");
        assert_eq!(loader.load_post("from-dir", now).unwrap().title, "from-dir");
    }

    #[test]
    fn test_explicit_description_wins() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(
            tmp.path(),
            "a",
            "---\ndescription: \"Written by hand\"\n---\n# A\n\nThis is a long enough paragraph of explanatory text exceeding fifty characters total.",
        );

        let site = site(tmp.path(), &["a"]);
        let post = ContentLoader::new(&site).load_post("a", Local::now()).unwrap();
        assert_eq!(post.description, "Written by hand");
    }

    #[test]
    fn test_missing_date_defaults_to_build_time() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "a", "# A\n\nBody.");
        write_post(tmp.path(), "b", "---\ndate: someday\n---\n# B\n");

        let site = site(tmp.path(), &["a", "b"]);
        let loader = ContentLoader::new(&site);
        let build_time = Local::now() - Duration::hours(3);

        assert_eq!(loader.load_post("a", build_time).unwrap().date, build_time);
        assert_eq!(loader.load_post("b", build_time).unwrap().date, build_time);
    }

    #[test]
    fn test_undated_posts_keep_declared_order() {
        let tmp = tempfile::tempdir().unwrap();
        for dir in ["first", "second", "third"] {
            write_post(tmp.path(), dir, "# Untitled\n\nBody.");
        }

        let site = site(tmp.path(), &["first", "second", "third"]);
        let before = Local::now();
        let posts = ContentLoader::new(&site).load_posts();
        let after = Local::now();

        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second", "third"]);
        assert!(posts.iter().all(|p| p.date >= before && p.date <= after));
    }

    #[test]
    fn test_posts_sorted_by_date() {
        let tmp = tempfile::tempdir().unwrap();
        write_post(tmp.path(), "old", "---\ndate: 2023-01-01\n---\n# Old\n");
        write_post(tmp.path(), "new", "---\ndate: 2024-06-01\n---\n# New\n");
        write_post(tmp.path(), "mid", "---\ndate: 2023-09-15\n---\n# Mid\n");

        let site = site(tmp.path(), &["old", "new", "mid"]);
        let posts = ContentLoader::new(&site).load_posts();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid", "old"]);
        assert!(posts.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn test_first_heading() {
        assert_eq!(
            first_heading("intro\n# Real Title\n## Sub"),
            Some("Real Title".to_string())
        );
        assert_eq!(first_heading("## Only sub"), None);
    }
}
