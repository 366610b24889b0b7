//! Content module - reads post documents and turns them into posts

pub mod description;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::MarkdownRenderer;
pub use post::{sort_by_date_desc, Post};
