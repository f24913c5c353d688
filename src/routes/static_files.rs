//! Static File Serving
//!
//! Serves the built portfolio frontend. Unknown paths fall back to
//! `index.html` so client-side routes keep working on reload.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use std::path::{Path, PathBuf};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

/// Locate the frontend build directory.
pub fn find_static_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured {
        if dir.is_dir() {
            return Some(dir.to_path_buf());
        }
        warn!(path = %dir.display(), "Configured static directory does not exist");
    }

    let candidates = [
        PathBuf::from("frontend/dist"),
        PathBuf::from("../frontend/dist"),
        PathBuf::from("dist"),
        PathBuf::from("static"),
    ];

    candidates.into_iter().find(|path| path.is_dir())
}

/// Create router for serving static files
pub fn router(configured: Option<&Path>) -> Router {
    match find_static_dir(configured) {
        Some(dir) => {
            info!(path = %dir.display(), "Serving frontend from directory");
            let index = dir.join("index.html");
            let serve_dir = ServeDir::new(&dir)
                .append_index_html_on_directories(true)
                .not_found_service(ServeFile::new(index));
            Router::new().fallback_service(serve_dir)
        }
        None => {
            warn!("Static files directory not found, frontend may not be built");
            Router::new().fallback(placeholder)
        }
    }
}

async fn placeholder() -> Response {
    let html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Portfolio API</title>
</head>
<body>
    <h1>Portfolio API</h1>
    <p>The frontend has not been built. Available endpoints:</p>
    <ul>
        <li><code>GET /api/health</code></li>
        <li><code>GET /api/profile</code></li>
        <li><code>GET /api/projects?filter=all</code></li>
        <li><code>GET /api/skills</code></li>
        <li><code>GET /api/motion-graphics?category=all</code></li>
        <li><code>GET /api/media/url?bucket=images&amp;path=t1.jpg</code></li>
        <li><code>POST /api/contact</code></li>
    </ul>
</body>
</html>"#;

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response()
}
