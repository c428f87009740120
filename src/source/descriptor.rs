//! File descriptors: one readable input of a bundle.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::remote::Fetcher;
use crate::error::{BundleError, Result};
use crate::freshness::mtime;

/// Where a descriptor's content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// File under the source root.
    Local(PathBuf),
    /// Absolute URL, fetched on every read.
    Remote(String),
    /// Another bundle; its serialized output is the content.
    Bundle {
        /// Name of the nested bundle in the registry
        name: String,
        /// Output artifact of the nested bundle
        output: PathBuf,
    },
}

/// Uniform handle over one bundle input.
///
/// The logical `name` is the relative path or URL as written in the bundle
/// definition (or produced by wildcard expansion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    name: String,
    source: Source,
}

impl FileDescriptor {
    pub fn local(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: Source::Local(path.into()),
        }
    }

    pub fn remote(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: url.clone(),
            source: Source::Remote(url),
        }
    }

    pub fn bundle(name: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            source: Source::Bundle {
                name: name.clone(),
                output: output.into(),
            },
            name,
        }
    }

    /// Logical name within the owning bundle.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Name of the nested bundle, if this descriptor references one.
    pub fn bundle_ref(&self) -> Option<&str> {
        match &self.source {
            Source::Bundle { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Resolved path or URL, for display.
    pub fn location(&self) -> String {
        match &self.source {
            Source::Local(path) | Source::Bundle { output: path, .. } => {
                path.display().to_string()
            }
            Source::Remote(url) => url.clone(),
        }
    }

    /// Extension without the leading dot, used for hook lookup.
    ///
    /// For URLs only the path component counts (`x.js?v=2` is `js`).
    pub fn extension(&self) -> Option<&str> {
        let path = match &self.source {
            Source::Remote(url) => url_path(url),
            _ => self.name.as_str(),
        };
        Path::new(path).extension().and_then(|e| e.to_str())
    }

    /// Whether modification times can be probed for this input.
    pub fn supports_mtime(&self) -> bool {
        !matches!(self.source, Source::Remote(_))
    }

    /// Probe the current modification time.
    ///
    /// Local files report their own mtime, nested bundles the mtime of their
    /// output artifact (`None` while it does not exist yet). Remote resources
    /// have no modification time.
    pub fn probe_mtime(&self) -> Result<Option<SystemTime>> {
        match &self.source {
            Source::Local(path) => mtime::probe(path).map(Some),
            Source::Bundle { output, .. } => Ok(mtime::get_mtime(output)),
            Source::Remote(_) => Ok(None),
        }
    }

    /// Read the full content as text.
    pub fn read(&self, fetcher: &Fetcher) -> Result<String> {
        match &self.source {
            Source::Local(path) | Source::Bundle { output: path, .. } => {
                fs::read_to_string(path).map_err(|err| BundleError::io(path, err))
            }
            Source::Remote(url) => fetcher.fetch(url),
        }
    }
}

/// Path component of a URL-ish string: everything after the authority,
/// without query or fragment.
fn url_path(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = rest.find('/').map_or("", |i| &rest[i..]);
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}
