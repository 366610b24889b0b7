//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Both pages carry the same
//! placeholder `<style>` block, which the CSS inliner later replaces by exact
//! string match.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::Post;

/// Style block left in every page for the CSS inliner
pub const CSS_PLACEHOLDER: &str =
    "<style>\n    /* Tailwind will be inlined here by the build process */\n  </style>";

/// Platforms with a built-in icon: (name, label, svg)
const SOCIAL_ICONS: &[(&str, &str, &str)] = &[
    (
        "github",
        "GitHub",
        r#"<svg viewBox="0 0 24 24" fill="currentColor" class="w-6 h-6"><path d="M12 .5C5.65.5.5 5.65.5 12a11.5 11.5 0 0 0 7.86 10.92c.58.1.79-.25.79-.56v-2c-3.2.7-3.87-1.37-3.87-1.37-.52-1.33-1.28-1.69-1.28-1.69-1.04-.71.08-.7.08-.7 1.15.08 1.76 1.19 1.76 1.19 1.03 1.76 2.69 1.25 3.35.96.1-.75.4-1.25.73-1.54-2.55-.29-5.24-1.28-5.24-5.68 0-1.26.45-2.28 1.19-3.09-.12-.29-.52-1.46.11-3.05 0 0 .97-.31 3.17 1.18a11 11 0 0 1 5.77 0c2.2-1.49 3.17-1.18 3.17-1.18.63 1.59.23 2.76.11 3.05.74.81 1.19 1.83 1.19 3.09 0 4.41-2.69 5.38-5.26 5.67.41.36.78 1.06.78 2.14v3.17c0 .31.21.67.8.56A11.5 11.5 0 0 0 23.5 12C23.5 5.65 18.35.5 12 .5z"/></svg>"#,
    ),
    (
        "twitter",
        "Twitter",
        r#"<svg viewBox="0 0 24 24" fill="currentColor" class="w-6 h-6"><path d="M18.24 2.25h3.31l-7.23 8.26 8.5 11.24h-6.66l-5.21-6.82-5.97 6.82H1.67l7.73-8.84L1.25 2.25h6.83l4.71 6.23 5.45-6.23zm-1.16 17.52h1.83L7.08 4.13H5.12l11.96 15.64z"/></svg>"#,
    ),
];

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Post content is already HTML from the markdown renderer
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("home.html", include_str!("theme/home.html")),
            ("post.html", include_str!("theme/post.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render the homepage: header plus one card per post, in the given order
    pub fn render_home(&self, posts: &[Post], config: &SiteConfig) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(config));
        context.insert("social", &social_links(config));
        context.insert("show_dates", &config.show_dates);
        context.insert(
            "posts",
            &posts.iter().map(PostData::from).collect::<Vec<_>>(),
        );

        Ok(self.tera.render("home.html", &context)?)
    }

    /// Render a single post page
    pub fn render_post(&self, post: &Post, config: &SiteConfig) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", &SiteData::from(config));
        context.insert("post", &PostData::from(post));

        Ok(self.tera.render("post.html", &context)?)
    }
}

/// Configured social links that have a known icon
fn social_links(config: &SiteConfig) -> Vec<SocialLink> {
    config
        .social_links()
        .filter_map(|(platform, url)| {
            let key = platform.to_ascii_lowercase();
            let Some((_, label, icon)) = SOCIAL_ICONS.iter().find(|(name, _, _)| *name == key)
            else {
                tracing::debug!("No icon for social platform {:?}, skipping", platform);
                return None;
            };
            Some(SocialLink {
                platform: key,
                url: url.to_string(),
                label: label.to_string(),
                icon: icon.to_string(),
            })
        })
        .collect()
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub tagline: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            tagline: config.tagline.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub description: String,
    pub date: String,
    pub url: String,
    pub content: String,
}

impl From<&Post> for PostData {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            description: post.description.clone(),
            date: post.date.format("%-m/%-d/%Y").to_string(),
            url: post.file_name(),
            content: post.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
    pub label: String,
    pub icon: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::path::PathBuf;

    fn post(slug: &str, title: &str, day: u32) -> Post {
        Post {
            title: title.to_string(),
            description: format!("About {}", title),
            date: Local.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            slug: slug.to_string(),
            content: "<p>Hello <strong>world</strong></p>".to_string(),
            source_file: PathBuf::from(format!("{}/README.md", slug)),
        }
    }

    #[test]
    fn test_home_defaults() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_home(&[post("a", "First", 2)], &SiteConfig::default())
            .unwrap();

        assert!(html.contains("<title>Gary Wu</title>"));
        assert!(html.contains(CSS_PLACEHOLDER));
        assert!(html.contains(r#"<a href="a.html""#));
        assert!(html.contains("About First"));
        assert!(html.contains("3/2/2024"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_home_keeps_post_order() {
        let renderer = TemplateRenderer::new().unwrap();
        let posts = [post("new", "Newest", 20), post("old", "Oldest", 1)];
        let html = renderer.render_home(&posts, &SiteConfig::default()).unwrap();

        let newest = html.find("Newest").unwrap();
        let oldest = html.find("Oldest").unwrap();
        assert!(newest < oldest);
    }

    #[test]
    fn test_home_tagline_on_hover() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig {
            tagline: "Notes from the terminal".to_string(),
            ..SiteConfig::default()
        };
        let html = renderer.render_home(&[], &config).unwrap();
        assert!(html.contains(r#"title="Notes from the terminal""#));
    }

    #[test]
    fn test_home_hides_dates() {
        let renderer = TemplateRenderer::new().unwrap();
        let config = SiteConfig {
            show_dates: false,
            ..SiteConfig::default()
        };
        let html = renderer.render_home(&[post("a", "First", 2)], &config).unwrap();
        assert!(!html.contains("<time"));
    }

    #[test]
    fn test_social_links_filtered() {
        let mut config = SiteConfig::default();
        config
            .social
            .insert("GitHub".to_string(), Some("https://github.com/me".to_string()));
        config
            .social
            .insert("mastodon".to_string(), Some("https://example.social/@me".to_string()));
        config.social.insert("twitter".to_string(), None);

        let links = social_links(&config);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].platform, "github");

        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer.render_home(&[], &config).unwrap();
        assert!(html.contains(r#"href="https://github.com/me""#));
        assert!(!html.contains("example.social"));
    }

    #[test]
    fn test_post_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render_post(&post("a", "First", 2), &SiteConfig::default())
            .unwrap();

        assert!(html.contains("<title>First</title>"));
        assert!(html.contains(r#"<a href="index.html""#));
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
        assert!(html.contains(CSS_PLACEHOLDER));
    }
}
