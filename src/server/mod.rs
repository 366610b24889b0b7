//! Development server for the output directory

pub mod watch;

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::Site;

/// Port the preview server listens on
pub const DEFAULT_PORT: u16 = 3000;

/// Document served for `/`
const DEFAULT_DOCUMENT: &str = "index.html";

/// Server state
struct ServerState {
    public_dir: PathBuf,
}

/// Start the development server, optionally rebuilding on changes
pub async fn start(site: &Site, port: u16, watch: bool) -> Result<()> {
    let state = Arc::new(ServerState {
        public_dir: site.output_dir.clone(),
    });

    let app = Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    if watch {
        let paths = site.watch_paths();
        let build = watch::BuildCommand::current(&site.base_dir)?;

        tokio::spawn(async move {
            if let Err(e) = watch::watch_and_rebuild(paths, build).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("🌐 Preview server running at http://localhost:{}", port);
    println!("📁 Serving files from {}", site.output_dir.display());
    if watch {
        println!("👀 Watching for changes...");
    }
    println!("🔥 Press Ctrl+C to stop");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Fallback handler that serves every path from the output directory
async fn fallback_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    serve_path(&state.public_dir, uri.path()).await
}

/// Respond with the file for a request path, or 404
pub async fn serve_path(public_dir: &Path, request_path: &str) -> Response {
    let file_path = resolve_path(public_dir, request_path);

    match tokio::fs::read(&file_path).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, content_type(&file_path))],
            bytes,
        )
            .into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Map a request path onto the output directory.
/// `..` segments are not filtered; this server is for local previews only.
pub fn resolve_path(public_dir: &Path, request_path: &str) -> PathBuf {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    if decoded == "/" {
        return public_dir.join(DEFAULT_DOCUMENT);
    }
    public_dir.join(decoded.trim_start_matches('/'))
}

/// Content type for a file extension
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        _ => "text/plain",
    }
}
