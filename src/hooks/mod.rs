//! Extension-keyed transform hooks.
//!
//! A hook receives an input's descriptor and raw content and returns the
//! content to bundle instead. At most one hook exists per extension.
//!
//! - [`TransformHook`]: the hook contract, implemented for plain closures
//! - [`CommandHook`]: a hook backed by an external command (`[hooks.<ext>]`)

mod command;

pub use command::{CommandHook, resolve_args};

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::SheafConfig;
use crate::error::{BundleError, Result};
use crate::source::FileDescriptor;

/// Transforms the raw content of one input.
pub trait TransformHook: Send + Sync {
    fn transform(&self, file: &FileDescriptor, content: String) -> anyhow::Result<String>;
}

impl<F> TransformHook for F
where
    F: Fn(&FileDescriptor, String) -> anyhow::Result<String> + Send + Sync,
{
    fn transform(&self, file: &FileDescriptor, content: String) -> anyhow::Result<String> {
        self(file, content)
    }
}

/// Hooks keyed by extension (without the dot).
#[derive(Clone, Default)]
pub struct HookSet {
    hooks: FxHashMap<String, Arc<dyn TransformHook>>,
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.extensions()).finish()
    }
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Command hooks for every enabled `[hooks.<ext>]` entry.
    pub fn from_config(config: &SheafConfig) -> Self {
        let mut set = Self::new();
        for (ext, hook) in config.hooks.iter().filter(|(_, h)| h.enable) {
            set.register(
                ext,
                CommandHook::new(hook, config.get_root(), config.src_root()),
            );
        }
        set
    }

    /// Register `hook` for `ext` (`"coffee"` or `".coffee"`), returning the
    /// hook it replaces.
    pub fn register(
        &mut self,
        ext: &str,
        hook: impl TransformHook + 'static,
    ) -> Option<Arc<dyn TransformHook>> {
        let ext = ext.trim_start_matches('.').to_string();
        self.hooks.insert(ext, Arc::new(hook))
    }

    pub fn get(&self, ext: &str) -> Option<&Arc<dyn TransformHook>> {
        self.hooks.get(ext)
    }

    /// Registered extensions, sorted.
    pub fn extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run the hook registered for the file's extension, if any.
    pub fn apply(&self, file: &FileDescriptor, content: String) -> Result<String> {
        let Some(ext) = file.extension() else {
            return Ok(content);
        };
        let Some(hook) = self.hooks.get(ext) else {
            return Ok(content);
        };

        crate::debug!("hook"; "{} ({})", file.name(), ext);
        hook.transform(file, content).map_err(|source| BundleError::Hook {
            file: file.name().to_string(),
            ext: ext.to_string(),
            source,
        })
    }
}
