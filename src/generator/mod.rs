//! Generator module - writes the homepage and post pages

use anyhow::{Context, Result};
use std::fs;

use crate::content::Post;
use crate::templates::TemplateRenderer;
use crate::Site;

/// Homepage file name inside the output directory
pub const INDEX_FILE: &str = "index.html";

/// Static page generator using the embedded templates
pub struct Generator<'a> {
    site: &'a Site,
    renderer: TemplateRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    pub fn new(site: &'a Site) -> Result<Self> {
        Ok(Self {
            site,
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Write the homepage and one page per post.
    /// Existing files are overwritten; nothing else in the output directory is touched.
    pub fn generate(&self, posts: &[Post]) -> Result<()> {
        let output_dir = &self.site.output_dir;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {:?}", output_dir))?;

        let homepage = self.renderer.render_home(posts, &self.site.config)?;
        let index_path = output_dir.join(INDEX_FILE);
        fs::write(&index_path, homepage)
            .with_context(|| format!("Failed to write {:?}", index_path))?;
        tracing::debug!("Wrote {:?}", index_path);

        for post in posts {
            let html = self.renderer.render_post(post, &self.site.config)?;
            let path = output_dir.join(post.file_name());
            fs::write(&path, html).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::debug!("Wrote {:?}", path);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteLayout;
    use chrono::Local;
    use std::path::PathBuf;

    #[test]
    fn test_generate_writes_pages() {
        let tmp = tempfile::tempdir().unwrap();
        let site = Site::with_layout(tmp.path(), SiteLayout::with_source_dirs(["hello"]));
        let posts = vec![Post {
            title: "Hello".to_string(),
            description: "Greeting".to_string(),
            date: Local::now(),
            slug: "hello".to_string(),
            content: "<p>Hi</p>".to_string(),
            source_file: PathBuf::from("hello/README.md"),
        }];

        Generator::new(&site).unwrap().generate(&posts).unwrap();

        let index = fs::read_to_string(site.output_dir.join(INDEX_FILE)).unwrap();
        assert!(index.contains("hello.html"));
        let page = fs::read_to_string(site.output_dir.join("hello.html")).unwrap();
        assert!(page.contains("<p>Hi</p>"));
    }

    #[test]
    fn test_generate_without_posts() {
        let tmp = tempfile::tempdir().unwrap();
        let site = Site::with_layout(tmp.path(), SiteLayout::with_source_dirs(Vec::<String>::new()));

        Generator::new(&site).unwrap().generate(&[]).unwrap();

        assert!(site.output_dir.join(INDEX_FILE).exists());
    }
}
