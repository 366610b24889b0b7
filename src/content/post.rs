//! Post model

use chrono::{DateTime, Local};
use std::path::PathBuf;

/// A blog post, built once per run from one source document
#[derive(Debug, Clone)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Short summary shown on the homepage
    pub description: String,

    /// Publication date
    pub date: DateTime<Local>,

    /// Source directory name, also the output file stem
    pub slug: String,

    /// Rendered HTML content
    pub content: String,

    /// Document the post was read from
    pub source_file: PathBuf,
}

impl Post {
    /// Output file name relative to the output directory
    pub fn file_name(&self) -> String {
        format!("{}.html", self.slug)
    }
}

/// Sort posts newest first, keeping input order for equal dates
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}
