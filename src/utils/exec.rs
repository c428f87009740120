//! External command execution.
//!
//! A small builder used by command hooks: content goes in through stdin,
//! the transformed content comes back on stdout.
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let output = Cmd::from_slice(&["coffee", "--stdio", "--print"])
//!     .cwd(root)
//!     .envs([("SHEAF_FILE", "js/app.coffee")])
//!     .stdin(source)
//!     .run()?;
//! ```

use crate::log;
use anyhow::{Context, Result};
use std::{
    ffi::{OsStr, OsString},
    io::Write,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
    thread,
};

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(String, String)>,
    stdin_data: Vec<u8>,
    quiet: bool,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Create from a command array (e.g., `["npx", "sass", "--stdin"]`).
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let mut iter = cmd.iter();
        let program = iter
            .next()
            .map(|s| s.as_ref().to_owned())
            .unwrap_or_default();
        Self::new(program).args(iter)
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    pub fn args<I, S>(self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        args.into_iter().fold(self, Self::arg)
    }

    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Set environment variables for the subprocess.
    pub fn envs<K, V, I>(mut self, vars: I) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in vars {
            self.envs.push((k.as_ref().to_owned(), v.as_ref().to_owned()));
        }
        self
    }

    /// Data piped to the process's stdin.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = data.as_ref().to_vec();
        self
    }

    /// Suppress logging of the process's stderr on success.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    /// Run to completion. A non-zero exit status is an error carrying the
    /// process's stderr.
    pub fn run(self) -> Result<Output> {
        let name = self.program_name();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .envs(self.envs.iter().cloned())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))?;

        // Feed stdin from another thread so a child filling its stdout pipe
        // cannot block us.
        let stdin = child.stdin.take();
        let data = self.stdin_data;
        let output = thread::scope(|scope| {
            let writer = scope.spawn(move || -> std::io::Result<()> {
                if let Some(mut stdin) = stdin {
                    stdin.write_all(&data)?;
                }
                Ok(())
            });

            let output = child
                .wait_with_output()
                .with_context(|| format!("Failed to wait for `{name}`"));

            match writer.join() {
                // The child may exit without reading everything; its status
                // tells the real story.
                Ok(Err(err)) if err.kind() != std::io::ErrorKind::BrokenPipe => {
                    Err(err).with_context(|| format!("Failed to write stdin to `{name}`"))
                }
                Err(_) => Err(anyhow::anyhow!("stdin writer for `{name}` panicked")),
                _ => output,
            }
        })?;

        if !output.status.success() {
            anyhow::bail!(format_error(&name, &output));
        }

        if !self.quiet {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            if !stderr.is_empty() {
                log!(&name; "{}", stderr);
            }
        }

        Ok(output)
    }
}

/// Format error message for failed command.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut msg = format!("Command `{name}` failed with {}", output.status);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        msg.push('\n');
        msg.push_str(stderr);
    }
    msg
}
