//! CSS inlining for generated pages
//!
//! Every page is written with [`CSS_PLACEHOLDER`]. This step swaps it for the
//! real stylesheet so each HTML file is self-contained. The prebuilt
//! stylesheet wins when present; otherwise a fixed table of utility rules is
//! used.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::templates::CSS_PLACEHOLDER;

lazy_static! {
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Utility class rules used when no prebuilt stylesheet exists: (selector, declarations)
const FALLBACK_RULES: &[(&str, &str)] = &[
    ("*", "box-sizing: border-box;"),
    ("body", "margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;"),
    (".bg-gray-50", "background-color: #f9fafb;"),
    (".bg-white", "background-color: #ffffff;"),
    (".bg-gray-200", "background-color: #e5e7eb;"),
    (".min-h-screen", "min-height: 100vh;"),
    (".max-w-4xl", "max-width: 56rem;"),
    (".max-w-2xl", "max-width: 42rem;"),
    (".max-w-none", "max-width: none;"),
    (".w-full", "width: 100%;"),
    (".mx-auto", "margin-left: auto; margin-right: auto;"),
    (".mx-2", "margin-left: 0.5rem; margin-right: 0.5rem;"),
    (".px-4", "padding-left: 1rem; padding-right: 1rem;"),
    (".py-8", "padding-top: 2rem; padding-bottom: 2rem;"),
    (".p-1", "padding: 0.25rem;"),
    (".p-6", "padding: 1.5rem;"),
    (".p-8", "padding: 2rem;"),
    (".pb-4", "padding-bottom: 1rem;"),
    (".mb-1", "margin-bottom: 0.25rem;"),
    (".mb-2", "margin-bottom: 0.5rem;"),
    (".mb-3", "margin-bottom: 0.75rem;"),
    (".mb-4", "margin-bottom: 1rem;"),
    (".mb-8", "margin-bottom: 2rem;"),
    (".mb-12", "margin-bottom: 3rem;"),
    (".mt-16", "margin-top: 4rem;"),
    (".mr-1", "margin-right: 0.25rem;"),
    (".mr-2", "margin-right: 0.5rem;"),
    (".mr-4", "margin-right: 1rem;"),
    (".ml-4", "margin-left: 1rem;"),
    (".w-4", "width: 1rem;"),
    (".h-4", "height: 1rem;"),
    (".w-6", "width: 1.5rem;"),
    (".h-6", "height: 1.5rem;"),
    (".w-8", "width: 2rem;"),
    (".h-8", "height: 2rem;"),
    (".flex", "display: flex;"),
    (".inline-block", "display: inline-block;"),
    (".justify-between", "justify-content: space-between;"),
    (".justify-center", "justify-content: center;"),
    (".items-center", "align-items: center;"),
    (".text-4xl", "font-size: 2.25rem; line-height: 2.5rem;"),
    (".text-3xl", "font-size: 1.875rem; line-height: 2.25rem;"),
    (".text-2xl", "font-size: 1.5rem; line-height: 2rem;"),
    (".text-xl", "font-size: 1.25rem; line-height: 1.75rem;"),
    (".text-lg", "font-size: 1.125rem; line-height: 1.75rem;"),
    (".text-base", "font-size: 1rem; line-height: 1.5rem;"),
    (".text-sm", "font-size: 0.875rem; line-height: 1.25rem;"),
    (".font-bold", "font-weight: 700;"),
    (".font-semibold", "font-weight: 600;"),
    (".font-normal", "font-weight: 400;"),
    (".text-gray-900", "color: #111827;"),
    (".text-gray-600", "color: #4b5563;"),
    (".text-gray-500", "color: #6b7280;"),
    (".text-blue-600", "color: #2563eb;"),
    (".text-blue-800", "color: #1e40af;"),
    (".text-center", "text-align: center;"),
    (".border", "border-width: 1px;"),
    (".border-b", "border-bottom-width: 1px;"),
    (".border-gray-200", "border-color: #e5e7eb;"),
    (".rounded-lg", "border-radius: 0.5rem;"),
    (".rounded-full", "border-radius: 9999px;"),
    (".shadow-sm", "box-shadow: 0 1px 2px 0 rgb(0 0 0 / 0.05);"),
    (".shadow-md", "box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1);"),
    (".space-y-6 > * + *", "margin-top: 1.5rem;"),
    (".transition-shadow", "transition-property: box-shadow; transition-timing-function: cubic-bezier(0.4, 0, 0.2, 1); transition-duration: 150ms;"),
    (r".hover\:shadow-md:hover", "box-shadow: 0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1);"),
    (r".hover\:text-blue-800:hover", "color: #1e40af;"),
    (r".focus\:outline-none:focus", "outline: none;"),
    ("a", "text-decoration: none;"),
    (".prose", "max-width: 65ch;"),
    (".prose-lg", "font-size: 1.125rem; line-height: 1.8;"),
    (".prose h1", "font-size: 2.25rem; font-weight: 800; margin-top: 0; margin-bottom: 0.8888889em;"),
    (".prose h2", "font-size: 1.5rem; font-weight: 700; margin-top: 2em; margin-bottom: 1em;"),
    (".prose h3", "font-size: 1.25rem; font-weight: 600; margin-top: 1.6em; margin-bottom: 0.6em;"),
    (".prose p", "margin-top: 1.25em; margin-bottom: 1.25em;"),
    (".prose li", "margin-top: 0.5em; margin-bottom: 0.5em;"),
    (".prose code", "color: #ef4444; background-color: #f3f4f6; padding: 0.25rem 0.5rem; border-radius: 0.25rem; font-size: 0.875em;"),
    (".prose pre", "background-color: #1f2937; color: #f9fafb; padding: 1rem; border-radius: 0.5rem; overflow-x: auto;"),
    (".prose pre code", "background-color: transparent; color: inherit; padding: 0;"),
];

/// Build the fallback stylesheet as a single whitespace-collapsed line
pub fn fallback_css() -> String {
    let css = FALLBACK_RULES
        .iter()
        .map(|(selector, declarations)| format!("{} {{ {} }}", selector, declarations))
        .collect::<Vec<_>>()
        .join("\n");
    WHITESPACE_RE.replace_all(&css, " ").trim().to_string()
}

/// Where the inlined CSS came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CssSource {
    Stylesheet,
    Fallback,
}

/// Result of one inlining pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineReport {
    /// Pages whose placeholder was replaced
    pub inlined: Vec<String>,
    /// Pages without a placeholder, left as they were
    pub untouched: Vec<String>,
}

/// Replaces the style placeholder in every page of an output directory
pub struct CssInliner {
    output_dir: PathBuf,
    stylesheet: PathBuf,
}

impl CssInliner {
    /// Inliner for `output_dir`, preferring `stylesheet` when it can be read
    pub fn new<P: AsRef<Path>, S: AsRef<Path>>(output_dir: P, stylesheet: S) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            stylesheet: stylesheet.as_ref().to_path_buf(),
        }
    }

    /// Read the prebuilt stylesheet, or fall back to the utility table
    pub fn load_css(&self) -> (String, CssSource) {
        match fs::read_to_string(&self.stylesheet) {
            Ok(css) => {
                tracing::info!("Loaded stylesheet {:?}", self.stylesheet);
                (css, CssSource::Stylesheet)
            }
            Err(_) => {
                tracing::info!(
                    "{:?} not found, falling back to built-in CSS",
                    self.stylesheet
                );
                (fallback_css(), CssSource::Fallback)
            }
        }
    }

    /// Inline CSS into every `.html` file directly inside the output directory
    pub fn run(&self) -> Result<InlineReport> {
        let (css, _) = self.load_css();
        let style = format!("<style>{}</style>", css);
        let mut report = InlineReport::default();

        for entry in WalkDir::new(&self.output_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("Failed to list {:?}", self.output_dir))?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_html_file(path) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            if inline_file(path, &style)? {
                tracing::info!("Inlined CSS for {}", name);
                report.inlined.push(name);
            } else {
                tracing::debug!("No style placeholder in {}, left unchanged", name);
                report.untouched.push(name);
            }
        }

        Ok(report)
    }
}

/// Replace the placeholder in one file. Returns false (and does not write)
/// when the file has no placeholder. Pages need not be valid UTF-8.
fn inline_file(path: &Path, style: &str) -> Result<bool> {
    let html = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let placeholder = CSS_PLACEHOLDER.as_bytes();
    let Some(start) = html
        .windows(placeholder.len())
        .position(|window| window == placeholder)
    else {
        return Ok(false);
    };

    let mut inlined = Vec::with_capacity(html.len() + style.len());
    inlined.extend_from_slice(&html[..start]);
    inlined.extend_from_slice(style.as_bytes());
    inlined.extend_from_slice(&html[start + placeholder.len()..]);
    fs::write(path, inlined).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(true)
}

fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "html")
        .unwrap_or(false)
}
