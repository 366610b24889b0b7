//! Build the site

use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, ExitStatus};
use std::time::Instant;
use thiserror::Error;

use crate::content::loader::ContentLoader;
use crate::content::Post;
use crate::generator::Generator;
use crate::{readme, Site};

/// Build steps that run out of process
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("CSS inlining failed with {0}")]
    InlineCss(ExitStatus),
}

/// Generate pages, then inline CSS in a child process of this executable
pub fn run(site: &Site) -> Result<()> {
    let exe = std::env::current_exe().context("Cannot locate the current executable")?;
    run_with(site, &exe)
}

/// Like [`run`], with an explicit program for the CSS step.
/// The program is called as `<program> --cwd <base_dir> inline-css`.
pub fn run_with(site: &Site, program: &Path) -> Result<()> {
    let start = Instant::now();

    generate(site)?;
    inline_css_step(site, program)?;

    println!(
        "✅ Build complete! Single-file HTML generated in {}",
        site.output_dir.display()
    );
    tracing::info!("Built in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Load posts, write every page and refresh the README summary
pub fn generate(site: &Site) -> Result<Vec<Post>> {
    println!("🔄 Reading markdown files...");
    let posts = ContentLoader::new(site).load_posts();

    println!("📝 Found {} posts", posts.len());
    for post in &posts {
        println!("  - {}", post.title);
    }

    println!("🏗️  Generating HTML...");
    Generator::new(site)?.generate(&posts)?;

    readme::update(site, &posts)?;

    Ok(posts)
}

fn inline_css_step(site: &Site, program: &Path) -> Result<()> {
    let status = Command::new(program)
        .arg("--cwd")
        .arg(&site.base_dir)
        .arg("inline-css")
        .status()
        .with_context(|| format!("Failed to start CSS inlining with {:?}", program))?;

    if !status.success() {
        return Err(BuildError::InlineCss(status).into());
    }
    Ok(())
}
