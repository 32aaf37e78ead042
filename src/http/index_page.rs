//! HTML index page.

use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::format::format_bytes;
use crate::http::content_type;
use crate::routing::RoutingMode;
use crate::scan::Entry;

const STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.2.0/dist/css/bootstrap.min.css";

/// Render the listing for `entries`.
///
/// In extension routing the visible label is the file's base name without
/// extension; otherwise it is the full relative path.
pub fn render_index(entries: &[Entry], routing: RoutingMode) -> String {
    let mut items = String::new();
    for entry in entries {
        let label = match routing {
            RoutingMode::Extension => entry.stem(),
            RoutingMode::Path => entry.relative_path.as_str(),
        };
        let inline = content_type::resolve_path(&entry.relative_path)
            .map(|rule| rule.render_in_listing)
            .unwrap_or(true);
        let target = if inline { "target=\"_blank\"" } else { "download" };

        let _ = write!(
            items,
            "\n            <li class=\"list-group-item\">\n                <a href=\"{}\" {}>{}</a>",
            encode_double_quoted_attribute(&href_for(&entry.relative_path)),
            target,
            encode_text(label),
        );
        if let Some(size) = entry.size_bytes {
            let _ = write!(
                items,
                " <span class=\"badge text-bg-light\">{}</span>",
                format_bytes(size)
            );
        }
        items.push_str("\n            </li>");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
    <head>
        <meta charset="utf-8">
        <meta name="viewport" content="width=device-width,initial-scale=1,minimum-scale=1,maximum-scale=1,user-scalable=yes">
        <link href="{STYLESHEET}" rel="stylesheet">
        <title>DIRLL - List of Files</title>
    </head>
    <body>
        <div class="container pt-5">
            <ul class="list-group">{items}
            </ul>
        </div>
    </body>
</html>
"#
    )
}

/// Percent-encode each segment, keeping the `/` separators.
pub fn href_for(relative_path: &str) -> String {
    relative_path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, size: Option<u64>) -> Entry {
        Entry {
            relative_path: path.to_string(),
            size_bytes: size,
        }
    }

    #[test]
    fn test_lists_every_entry() {
        let html = render_index(
            &[entry("/a.txt", None), entry("/sub/b.txt", None)],
            RoutingMode::Path,
        );
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("name=\"viewport\""));
        assert!(html.contains("rel=\"stylesheet\""));
        assert!(html.contains("<a href=\"/a.txt\" target=\"_blank\">/a.txt</a>"));
        assert!(html.contains("<a href=\"/sub/b.txt\" target=\"_blank\">/sub/b.txt</a>"));
        assert_eq!(html.matches("<li class").count(), 2);
    }

    #[test]
    fn test_sizes_are_formatted() {
        let html = render_index(&[entry("/big.txt", Some(1536))], RoutingMode::Path);
        assert!(html.contains("1.5 KB"));
    }

    #[test]
    fn test_extension_mode_labels_and_downloads() {
        let html = render_index(&[entry("/movies/holiday.mp4", None)], RoutingMode::Extension);
        assert!(html.contains("<a href=\"/movies/holiday.mp4\" download>holiday</a>"));
    }

    #[test]
    fn test_names_are_escaped_and_encoded() {
        let html = render_index(&[entry("/<b> & co.txt", None)], RoutingMode::Path);
        assert!(html.contains("href=\"/%3Cb%3E%20%26%20co.txt\""));
        assert!(html.contains(">/&lt;b&gt; &amp; co.txt</a>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_empty_listing() {
        let html = render_index(&[], RoutingMode::Path);
        assert!(html.contains("<ul class=\"list-group\">"));
        assert!(!html.contains("<li class"));
    }
}
