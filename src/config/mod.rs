//! Configuration module

mod layout;
mod site;

pub use layout::SiteLayout;
pub use site::{SiteConfig, DEFAULT_TAGLINE, DEFAULT_TITLE};
