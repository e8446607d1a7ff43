//! Static file serving for the local server: the widget's HTML/JS/CSS from the static root.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
  extract::State,
  http::{header::CONTENT_TYPE, StatusCode, Uri},
  response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::state::AppState;

/// Content type by file extension; anything unknown is served as raw bytes.
pub fn content_type_for(path: &Path) -> &'static str {
  let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase();
  match ext.as_str() {
    "html" => "text/html",
    "js" => "application/javascript",
    "css" => "text/css",
    "json" => "application/json",
    "png" => "image/png",
    "jpg" => "image/jpeg",
    "gif" => "image/gif",
    "svg" => "image/svg+xml",
    "ico" => "image/x-icon",
    _ => "application/octet-stream",
  }
}

/// Map a request path onto the static root. `/` is the index page; `..` and
/// absolute components never resolve.
pub fn resolve_under(root: &Path, request_path: &str) -> Option<PathBuf> {
  let rel = match request_path {
    "" | "/" => "index.html",
    p => p.trim_start_matches('/'),
  };
  let mut out = root.to_path_buf();
  let mut pushed = false;
  for comp in Path::new(rel).components() {
    match comp {
      Component::Normal(part) => {
        out.push(part);
        pushed = true;
      }
      Component::CurDir => {}
      _ => return None,
    }
  }
  pushed.then_some(out)
}

fn not_found() -> Response {
  (StatusCode::NOT_FOUND, "File not found").into_response()
}

pub async fn serve_static(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
  let Some(file) = resolve_under(&state.static_root, uri.path()) else {
    debug!(target: "ode_tutor", path = %uri.path(), "Rejected static path");
    return not_found();
  };

  match tokio::fs::read(&file).await {
    Ok(bytes) => (StatusCode::OK, [(CONTENT_TYPE, content_type_for(&file))], bytes).into_response(),
    Err(e) if e.kind() == ErrorKind::NotFound => not_found(),
    Err(e) => {
      error!(target: "ode_tutor", path = %file.display(), error = %e, "Static file read failed");
      (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
    }
  }
}
