//! Serves one in-memory file either whole or in fixed-size chunks.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::ops::Range;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    data: Bytes,
    file_name: Arc<str>,
    chunk_size: usize,
}

impl AppState {
    pub fn new(data: impl Into<Bytes>, file_name: &str, chunk_size: usize) -> Self {
        Self {
            data: data.into(),
            file_name: file_name.into(),
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// Byte range of chunk `n`, clamped to the file; past the end it is empty.
pub fn chunk_range(len: usize, chunk_size: usize, n: u64) -> Range<usize> {
    let len = len as u64;
    let start = n.saturating_mul(chunk_size as u64).min(len);
    let end = start.saturating_add(chunk_size as u64).min(len);
    start as usize..end as usize
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(Health { status: "ok" }) }))
        .route("/chunk/{n}", get(get_chunk))
        .route("/getfile", get(get_file))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_chunk(State(state): State<AppState>, Path(n): Path<u64>) -> impl IntoResponse {
    let range = chunk_range(state.data.len(), state.chunk_size, n);
    debug!("chunk {} -> bytes {:?}", n, range);
    attachment(
        state.data.slice(range),
        OCTET_STREAM,
        format!("{}.part{n}", state.file_name),
    )
}

async fn get_file(State(state): State<AppState>) -> impl IntoResponse {
    attachment(
        state.data.clone(),
        content_type(&state.file_name),
        state.file_name.to_string(),
    )
}

const OCTET_STREAM: &str = "application/octet-stream";

/// Media type for the whole file, picked from its extension. Chunks are
/// always sent as raw bytes.
pub fn content_type(file_name: &str) -> &'static str {
    let ext = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => return OCTET_STREAM,
    };
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "mp4" => "video/mp4",
        _ => OCTET_STREAM,
    }
}

fn attachment(body: Bytes, content_type: &'static str, file_name: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
}
