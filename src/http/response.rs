//! Response construction for both request modes.
//!
//! # Responsibilities
//! - Index mode: scan, render, `200 text/html`
//! - File mode: open the resolved file and stream it in bounded chunks
//!
//! # Design Decisions
//! - File bodies are pulled by hyper, so a slow client slows the reads
//! - Dropping the body (client gone) drops the file handle
//! - A stalled read ends the body with an error, cutting the connection

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use bytes::{Bytes, BytesMut};
use futures_util::{stream, Stream};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::error::ServeError;
use crate::http::content_type;
use crate::http::index_page::render_index;
use crate::observability::metrics;
use crate::routing::{resolve_file, RoutingMode};
use crate::scan::DirectoryScanner;

/// Upper bound on a single body chunk.
pub const CHUNK_SIZE: usize = 64 * 1024;

pub async fn index_response(
    scanner: &DirectoryScanner,
    routing: RoutingMode,
    scan_timeout: Duration,
) -> Result<Response, ServeError> {
    let start = Instant::now();
    let entries = scanner.scan_with_timeout(scan_timeout).await?;
    metrics::record_scan(entries.len(), start.elapsed());

    tracing::debug!(
        entries = entries.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Directory scanned"
    );

    Ok(Html(render_index(&entries, routing)).into_response())
}

pub async fn file_response(
    root: &Path,
    url_path: &str,
    idle_timeout: Duration,
) -> Result<Response, ServeError> {
    let resolved = resolve_file(root, url_path).await?;
    let file = File::open(&resolved.path)
        .await
        .map_err(ServeError::StreamSetupFailed)?;

    tracing::debug!(path = ?resolved.path, bytes = resolved.len, "Streaming file");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type::mime_for_path(resolved.requested_name()).to_string()),
            (header::CONTENT_LENGTH, resolved.len.to_string()),
        ],
        Body::from_stream(file_stream(file, idle_timeout)),
    )
        .into_response())
}

/// Read `file` in chunks of at most [`CHUNK_SIZE`], failing if one read
/// takes longer than `idle_timeout`.
pub fn file_stream(file: File, idle_timeout: Duration) -> impl Stream<Item = io::Result<Bytes>> + Send {
    stream::try_unfold(file, move |mut file| async move {
        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
        match tokio::time::timeout(idle_timeout, file.read_buf(&mut buf)).await {
            Ok(Ok(0)) => Ok(None),
            Ok(Ok(_)) => Ok(Some((buf.freeze(), file))),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "File read failed mid-stream");
                Err(e)
            }
            Err(_) => Err(io::Error::new(io::ErrorKind::TimedOut, "file read stalled")),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_stream_is_chunked_and_complete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.bin");
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &data).unwrap();

        let file = File::open(&path).await.unwrap();
        let chunks: Vec<Bytes> = file_stream(file, Duration::from_secs(5))
            .try_collect()
            .await
            .unwrap();

        assert!(chunks.len() >= 4);
        assert!(chunks.iter().all(|c| c.len() <= CHUNK_SIZE));
        assert_eq!(chunks.concat(), data);
    }

    #[tokio::test]
    async fn test_file_response_headers() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("hello.txt"), "hello").unwrap();
        let root = dir.path().canonicalize().unwrap();

        let response = file_response(&root, "/hello.txt", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "5");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_content_type_uses_decoded_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let root = dir.path().canonicalize().unwrap();

        let response = file_response(&root, "/a%2Etxt", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }

    #[tokio::test]
    async fn test_unknown_extension_is_octet_stream() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("data.bin"), [0u8, 1, 2]).unwrap();
        let root = dir.path().canonicalize().unwrap();

        let response = file_response(&root, "/data.bin", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            content_type::OCTET_STREAM
        );
    }
}
