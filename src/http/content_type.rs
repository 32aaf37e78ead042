//! Extension to MIME type lookup.
//!
//! # Design Decisions
//! - Fixed table, compiled in; no runtime registration
//! - Lookup is case-sensitive on the raw suffix (`PNG` is not `png`)
//! - `render_in_listing` only affects how the index page links a file

use crate::scan::filter::extension_of;

/// Fallback for files served in path routing mode with no known extension.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A static extension mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentTypeRule {
    pub extension: &'static str,
    pub mime_type: &'static str,
    /// Browsers display it inline; otherwise the listing offers a download.
    pub render_in_listing: bool,
}

const fn rule(extension: &'static str, mime_type: &'static str, render_in_listing: bool) -> ContentTypeRule {
    ContentTypeRule {
        extension,
        mime_type,
        render_in_listing,
    }
}

static CONTENT_TYPES: [ContentTypeRule; 14] = [
    rule("ico", "image/x-icon", true),
    rule("json", "application/json", true),
    rule("txt", "text/plain", true),
    rule("css", "text/css", true),
    rule("png", "image/png", true),
    rule("jpg", "image/jpeg", true),
    rule("wav", "audio/wav", false),
    rule("mp3", "audio/mpeg", false),
    rule("svg", "image/svg+xml", true),
    rule("pdf", "application/pdf", false),
    rule("doc", "application/msword", true),
    rule("avi", "video/x-msvideo", false),
    rule("mkv", "video/x-matroska", false),
    rule("mp4", "video/mp4", false),
];

/// Look up the rule for a raw extension (without the dot).
pub fn resolve(extension: &str) -> Option<&'static ContentTypeRule> {
    CONTENT_TYPES.iter().find(|r| r.extension == extension)
}

/// Look up the rule for the last segment of a `/`-separated path.
pub fn resolve_path(path: &str) -> Option<&'static ContentTypeRule> {
    let name = path.rsplit('/').next().unwrap_or(path);
    extension_of(name).and_then(resolve)
}

/// MIME type to send for a served file.
pub fn mime_for_path(path: &str) -> &'static str {
    resolve_path(path).map(|r| r.mime_type).unwrap_or(OCTET_STREAM)
}
