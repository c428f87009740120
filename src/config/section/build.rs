//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! src = "public"        # Source root; bundle outputs are written under it
//! emit = "bundled"      # Enumeration mode: bundled | files
//! jobs = 8              # Content-collection worker threads (default: all cores)
//! fetch_timeout = 30    # Remote source fetch timeout in seconds
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a bundle is enumerated for embedding into markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitMode {
    /// One entry: the bundle's own output name.
    #[default]
    Bundled,
    /// Every constituent logical file name, in bundle order.
    Files,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Source root directory. Patterns and outputs are relative to it.
    pub src: PathBuf,

    /// Enumeration mode used by `sheaf list` and `Engine::emit`.
    pub emit: EmitMode,

    /// Worker threads for content collection (`None` = rayon default).
    pub jobs: Option<usize>,

    /// Remote fetch timeout in seconds.
    pub fetch_timeout: u64,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            src: "public".into(),
            emit: EmitMode::Bundled,
            jobs: None,
            fetch_timeout: 30,
        }
    }
}

impl BuildSectionConfig {
    pub const SRC: FieldPath = FieldPath::new("build.src");
    pub const JOBS: FieldPath = FieldPath::new("build.jobs");
    pub const FETCH_TIMEOUT: FieldPath = FieldPath::new("build.fetch_timeout");

    /// Validate build configuration.
    ///
    /// # Checks
    /// - `src` must be an existing directory
    /// - `jobs`, when set, must be at least 1
    /// - `fetch_timeout` must be at least 1 second
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.src.exists() {
            diag.error_with_hint(
                Self::SRC,
                format!("source root not found: {}", self.src.display()),
                "create the directory or point `build.src` at your asset root",
            );
        } else if !self.src.is_dir() {
            diag.error(
                Self::SRC,
                format!("source root is not a directory: {}", self.src.display()),
            );
        }

        if self.jobs == Some(0) {
            diag.error(Self::JOBS, "must be at least 1");
        }

        if self.fetch_timeout == 0 {
            diag.error(Self::FETCH_TIMEOUT, "must be at least 1 second");
        }
    }
}
