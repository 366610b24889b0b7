//! CLI entry point for readme-press

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "readme-press")]
#[command(version)]
#[command(about = "Build README-style posts into a single-file HTML blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the site into the output directory
    #[command(alias = "b")]
    Build,

    /// Serve the output directory locally
    #[command(alias = "s")]
    Serve {
        /// Rebuild when posts, config or theme files change
        #[arg(short, long)]
        watch: bool,
    },

    /// Inline CSS into generated pages (run by `build`)
    #[command(hide = true)]
    InlineCss,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "readme_press=debug,info"
    } else {
        "readme_press=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let site = readme_press::Site::new(&base_dir);

    match cli.command {
        Commands::Build => {
            tracing::info!("Building site in {:?}", base_dir);
            readme_press::commands::build::run(&site)?;
        }

        Commands::Serve { watch } => {
            readme_press::server::start(&site, readme_press::server::DEFAULT_PORT, watch).await?;
        }

        Commands::InlineCss => {
            site.inline_css()?;
        }
    }

    Ok(())
}
