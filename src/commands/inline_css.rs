//! Inline CSS into the generated pages

use anyhow::Result;

use crate::css::{CssInliner, InlineReport};
use crate::Site;

/// Replace the style placeholder in every page of the output directory
pub fn run(site: &Site) -> Result<InlineReport> {
    println!("🎨 Inlining CSS...");

    let stylesheet = site.output_dir.join(&site.layout.stylesheet);
    let report = CssInliner::new(&site.output_dir, stylesheet).run()?;

    println!(
        "🎉 CSS inlining complete! ({} inlined, {} unchanged)",
        report.inlined.len(),
        report.untouched.len()
    );
    Ok(report)
}
