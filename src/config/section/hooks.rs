//! `[hooks]` section configuration.
//!
//! Each key is a source file extension; the command receives the raw file
//! content on stdin and must print the transformed content on stdout.
//!
//! # Example
//!
//! ```toml
//! [hooks.coffee]
//! command = ["coffee", "--stdio", "--print"]
//!
//! [hooks.scss]
//! command = ["sass", "--stdin", "--load-path=$SHEAF_ROOT/css"]
//! quiet = false
//! ```

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};

/// Configuration for a single extension hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Whether this hook is enabled (default: true).
    pub enable: bool,

    /// Display name for logging (defaults to command[0]).
    pub name: Option<String>,

    /// Command and arguments to execute.
    /// Supports `$SHEAF_*` variable substitution.
    pub command: Vec<String>,

    /// Suppress stderr output of successful runs (default: true).
    pub quiet: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enable: true,
            name: None,
            command: Vec::new(),
            quiet: true,
        }
    }
}

impl HookConfig {
    pub const COMMAND: FieldPath = FieldPath::new("hooks.command");

    /// Name shown in logs.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.command.first().map(String::as_str))
            .unwrap_or("hook")
    }

    /// Validate a hook registered for `ext`.
    ///
    /// # Checks
    /// - If enabled:
    ///   - `command` must not be empty
    ///   - `command[0]` must be an installed executable
    pub fn validate(&self, ext: &str, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }

        let Some(program) = self.command.first() else {
            diag.error_with_hint(
                Self::COMMAND,
                format!("hook for `{ext}` has an empty command"),
                "set `command` or disable the hook with `enable = false`",
            );
            return;
        };

        if which::which(program).is_err() {
            diag.error_with_hint(
                Self::COMMAND,
                format!("hook for `{ext}`: `{program}` not found in PATH"),
                format!("install `{program}` or fix the command"),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let hook = HookConfig {
            command: vec!["coffee".into(), "-sp".into()],
            ..Default::default()
        };
        assert_eq!(hook.display_name(), "coffee");

        let hook = HookConfig {
            name: Some("coffeescript".into()),
            ..hook
        };
        assert_eq!(hook.display_name(), "coffeescript");
    }

    #[test]
    fn test_validate_empty_command() {
        let mut diag = ConfigDiagnostics::new();
        HookConfig::default().validate("coffee", &mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("coffee"));
    }

    #[test]
    fn test_validate_disabled_is_skipped() {
        let mut diag = ConfigDiagnostics::new();
        let hook = HookConfig {
            enable: false,
            ..Default::default()
        };
        hook.validate("coffee", &mut diag);
        assert!(diag.is_empty());
    }

    #[test]
    fn test_validate_missing_program() {
        let mut diag = ConfigDiagnostics::new();
        let hook = HookConfig {
            command: vec!["sheaf-definitely-not-installed".into()],
            ..Default::default()
        };
        hook.validate("coffee", &mut diag);
        assert_eq!(diag.len(), 1);
        assert!(diag.errors()[0].message.contains("not found"));
    }
}
