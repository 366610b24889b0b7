//! Command implementations behind the CLI

pub mod build;
pub mod inline_css;
