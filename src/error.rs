//! Engine error types.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, BundleError>;

/// Which parser rejected a bundle's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    Script,
    Style,
}

impl fmt::Display for ParseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => f.write_str("script"),
            Self::Style => f.write_str("stylesheet"),
        }
    }
}

/// Errors raised while resolving, checking, building or writing a bundle.
///
/// Any error aborts the bundle's build before its modification times are
/// committed, so the next trigger retries the whole bundle.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("unknown bundle `{0}`")]
    UnknownBundle(String),

    #[error("IO error on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch `{url}`: {reason}")]
    Fetch {
        url: String,
        /// HTTP status, when the remote answered at all
        status: Option<u16>,
        reason: String,
    },

    #[error("`{ext}` hook failed on `{file}`")]
    Hook {
        file: String,
        ext: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to parse {kind} `{name}`: {message}")]
    Parse {
        kind: ParseKind,
        name: String,
        message: String,
    },

    #[error("no serializer for output `{name}` (expected .js, .css or .html)")]
    UnsupportedOutputType { name: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BundleError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(kind: ParseKind, name: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            name: name.to_string(),
            message: message.into(),
        }
    }
}
