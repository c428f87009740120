//! Hooks backed by external commands.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::TransformHook;
use crate::config::HookConfig;
use crate::source::FileDescriptor;
use crate::utils::exec::Cmd;

/// Runs a command with the raw content on stdin and bundles its stdout.
///
/// `$SHEAF_FILE` (resolved path or URL), `$SHEAF_NAME` (logical name) and
/// `$SHEAF_ROOT` (source root) are substituted in the arguments and
/// exported to the process.
#[derive(Debug, Clone)]
pub struct CommandHook {
    name: String,
    command: Vec<String>,
    cwd: PathBuf,
    src_root: PathBuf,
    quiet: bool,
}

impl CommandHook {
    pub fn new(hook: &HookConfig, cwd: &Path, src_root: &Path) -> Self {
        Self {
            name: hook.display_name().to_string(),
            command: hook.command.clone(),
            cwd: cwd.to_path_buf(),
            src_root: src_root.to_path_buf(),
            quiet: hook.quiet,
        }
    }

    fn vars(&self, file: &FileDescriptor) -> [(&'static str, String); 3] {
        [
            ("SHEAF_FILE", file.location()),
            ("SHEAF_NAME", file.name().to_string()),
            ("SHEAF_ROOT", self.src_root.display().to_string()),
        ]
    }
}

impl TransformHook for CommandHook {
    fn transform(&self, file: &FileDescriptor, content: String) -> anyhow::Result<String> {
        let vars = self.vars(file);
        let command = resolve_args(&self.command, &vars);

        let output = Cmd::from_slice(&command)
            .cwd(&self.cwd)
            .envs(vars.iter().map(|(k, v)| (*k, v.as_str())))
            .stdin(content)
            .quiet(self.quiet)
            .run()?;

        String::from_utf8(output.stdout)
            .with_context(|| format!("`{}` printed invalid UTF-8", self.name))
    }
}

/// Replace `$KEY` occurrences in every argument.
pub fn resolve_args(args: &[String], vars: &[(&str, String)]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (key, value)| {
                acc.replace(&format!("${key}"), value)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hook(command: &[&str]) -> HookConfig {
        HookConfig {
            command: command.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_args() {
        let vars = [
            ("SHEAF_NAME", "js/a.coffee".to_string()),
            ("SHEAF_ROOT", "/site/public".to_string()),
        ];
        let args = vec![
            "--name=$SHEAF_NAME".to_string(),
            "$SHEAF_ROOT/lib".to_string(),
            "plain".to_string(),
        ];
        assert_eq!(
            resolve_args(&args, &vars),
            ["--name=js/a.coffee", "/site/public/lib", "plain"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_pipes_content_through_command() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(&hook(&["tr", "a-z", "A-Z"]), dir.path(), dir.path());
        let file = FileDescriptor::local("a.txt", dir.path().join("a.txt"));

        assert_eq!(hook.transform(&file, "shout".into()).unwrap(), "SHOUT");
    }

    #[cfg(unix)]
    #[test]
    fn test_exports_variables() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(
            &hook(&["sh", "-c", "printf '%s|%s' \"$SHEAF_NAME\" \"$1\"", "sh", "$SHEAF_NAME"]),
            dir.path(),
            dir.path(),
        );
        let file = FileDescriptor::local("js/b.txt", dir.path().join("js/b.txt"));

        assert_eq!(hook.transform(&file, String::new()).unwrap(), "js/b.txt|js/b.txt");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(&hook(&["false"]), dir.path(), dir.path());
        let file = FileDescriptor::local("a.txt", dir.path().join("a.txt"));
        assert!(hook.transform(&file, "x".into()).is_err());
    }
}
