//! Configuration management for `sheaf.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── bundles    # [bundles]
//! │   └── hooks      # [hooks.<ext>]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # SheafConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! [build]
//! src = "public"
//!
//! [bundles]
//! "js/app.js" = ["js/lib/.*\\.js", "js/main.js"]
//!
//! [hooks.coffee]
//! command = ["coffee", "--stdio", "--print"]
//! ```

pub mod section;
pub mod types;
mod util;

pub use section::{BuildSectionConfig, BundlesConfig, EmitMode, HookConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name.
pub const CONFIG_FILE: &str = "sheaf.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sheaf.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheafConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Bundle definitions
    #[serde(default)]
    pub bundles: BundlesConfig,

    /// Extension-keyed transform hooks
    #[serde(default)]
    pub hooks: BTreeMap<String, HookConfig>,
}

impl SheafConfig {
    /// Locate and load the configuration.
    ///
    /// `config` may be absolute, or a file name searched upward from `cwd`.
    pub fn load(cwd: &Path, config: &Path) -> Result<Self, ConfigError> {
        let path = find_config_file(cwd, config).ok_or_else(|| {
            ConfigError::Io(
                cwd.join(config),
                std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found"),
            )
        })?;

        let mut config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path and resolve paths against its directory.
    ///
    /// Does not validate; call [`SheafConfig::validate`] afterwards.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let mut config = Self::from_str(&content)?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.config_path = path.to_path_buf();
        config.set_root(&root);
        Ok(config)
    }

    /// Set the root directory and resolve relative paths against it.
    pub fn set_root(&mut self, root: &Path) {
        self.root = root.to_path_buf();
        if self.build.src.is_relative() {
            self.build.src = root.join(&self.build.src);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Absolute source root (`build.src`).
    pub fn src_root(&self) -> &Path {
        &self.build.src
    }

    /// Validate the whole configuration, collecting every problem.
    ///
    /// Warnings are printed; errors are returned together.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.bundles.validate(&mut diag);
        for (ext, hook) in &self.hooks {
            hook.validate(ext, &mut diag);
        }

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[build]
src = "assets"
emit = "files"

[bundles]
"js/app.js" = ["js/a.js", "js/b.js"]
"css/site.css" = ["css/.*\\.css"]

[hooks.txt]
command = ["cat"]
"#;

    #[test]
    fn test_from_str() {
        let config = SheafConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.build.emit, EmitMode::Files);
        assert_eq!(config.bundles.len(), 2);
        assert_eq!(config.hooks["txt"].command, vec!["cat"]);
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let err = SheafConfig::from_str("[bundles\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_path_resolves_src() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, SAMPLE).unwrap();

        let config = SheafConfig::from_path(&path).unwrap();
        assert_eq!(config.get_root(), dir.path());
        assert_eq!(config.src_root(), dir.path().join("assets"));
        assert_eq!(config.config_path, path);
    }

    #[test]
    fn test_load_reports_missing_src() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), SAMPLE).unwrap();

        let err = SheafConfig::load(dir.path(), Path::new(CONFIG_FILE)).unwrap_err();
        let ConfigError::Diagnostics(diag) = err else {
            panic!("expected diagnostics, got {err:?}");
        };
        assert!(
            diag.errors()
                .iter()
                .any(|e| e.field == BuildSectionConfig::SRC)
        );
    }

    #[test]
    fn test_load_valid() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[build]\nsrc = \"assets\"\n[bundles]\n\"app.js\" = [\"a.js\"]\n",
        )
        .unwrap();

        let config = SheafConfig::load(dir.path(), Path::new(CONFIG_FILE)).unwrap();
        assert_eq!(config.bundles.len(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SheafConfig::load(dir.path(), Path::new("nope-sheaf.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }
}
