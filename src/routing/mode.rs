//! Index vs file mode selection.
//!
//! # Design Decisions
//! - `Path` routing: only `/` is the index, everything else is a file
//! - `Extension` routing: known content types are files, everything else
//!   (including unknown extensions) renders the index

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http::content_type;

/// How a deployment tells index requests from file requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    #[default]
    Path,
    Extension,
}

/// What a single request will be answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Index,
    File,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Index => "index",
            Mode::File => "file",
        }
    }
}

impl RoutingMode {
    pub fn select(&self, path: &str) -> Mode {
        match self {
            RoutingMode::Path => {
                if path == "/" {
                    Mode::Index
                } else {
                    Mode::File
                }
            }
            RoutingMode::Extension => match content_type::resolve_path(path) {
                Some(_) => Mode::File,
                None => Mode::Index,
            },
        }
    }
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingMode::Path => write!(f, "path"),
            RoutingMode::Extension => write!(f, "extension"),
        }
    }
}

impl FromStr for RoutingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(RoutingMode::Path),
            "extension" | "ext" => Ok(RoutingMode::Extension),
            other => Err(format!("unknown routing mode '{}' (expected 'path' or 'extension')", other)),
        }
    }
}
