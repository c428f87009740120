//! Bundle registry: name → resolved bundle definition.
//!
//! Built once from configuration and read concurrently afterwards. The only
//! mutable part is each bundle's [`BundleState`], behind the bundle's own
//! lock, so builds of the same bundle are serialized while different
//! bundles build in parallel.

use std::path::{Path, PathBuf};

use parking_lot::{Mutex, MutexGuard};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::{ConfigError, EmitMode, SheafConfig};
use crate::error::{BundleError, Result};
use crate::freshness::BundleState;
use crate::source::{FileDescriptor, resolve_bundle};

/// One bundle: its output artifact and ordered inputs.
#[derive(Debug)]
pub struct BundleDefinition {
    name: String,
    output: PathBuf,
    files: Vec<FileDescriptor>,
    state: Mutex<BundleState>,
}

impl BundleDefinition {
    pub fn new(name: impl Into<String>, output: impl Into<PathBuf>, files: Vec<FileDescriptor>) -> Self {
        let state = Mutex::new(BundleState::new(files.len()));
        Self {
            name: name.into(),
            output: output.into(),
            files,
            state,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output artifact path (`src_root/name`).
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Inputs in concatenation order.
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Names of the bundles this one includes, in order.
    pub fn nested(&self) -> impl Iterator<Item = &str> {
        self.files.iter().filter_map(FileDescriptor::bundle_ref)
    }

    /// Take the bundle's lock. Held for a whole check/build cycle.
    pub fn lock(&self) -> MutexGuard<'_, BundleState> {
        self.state.lock()
    }
}

/// All bundles of one engine.
#[derive(Debug)]
pub struct Registry {
    src_root: PathBuf,
    bundles: FxHashMap<String, BundleDefinition>,
}

impl Registry {
    /// Resolve every `(name, patterns)` pair against `src_root`.
    ///
    /// Fails on unreadable wildcard directories and on reference cycles.
    pub fn new<I>(src_root: impl Into<PathBuf>, bundles: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let src_root = src_root.into();
        let bundles: Vec<(String, Vec<String>)> = bundles.into_iter().collect();
        let names: FxHashSet<String> = bundles.iter().map(|(name, _)| name.clone()).collect();

        let mut resolved = FxHashMap::default();
        for (name, patterns) in bundles {
            let files = resolve_bundle(&src_root, &name, &patterns, &names)?;
            let output = src_root.join(name.trim_start_matches('/'));
            crate::debug!("resolve"; "{} ({} inputs)", name, files.len());
            resolved.insert(name.clone(), BundleDefinition::new(name, output, files));
        }

        let registry = Self {
            src_root,
            bundles: resolved,
        };
        registry.reject_cycles()?;
        Ok(registry)
    }

    pub fn from_config(config: &SheafConfig) -> Result<Self> {
        Self::new(
            config.src_root(),
            config
                .bundles
                .iter()
                .map(|(name, patterns)| (name.clone(), patterns.clone())),
        )
    }

    pub fn src_root(&self) -> &Path {
        &self.src_root
    }

    pub fn get(&self, name: &str) -> Result<&BundleDefinition> {
        self.bundles
            .get(name)
            .ok_or_else(|| BundleError::UnknownBundle(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }

    /// Bundle names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    /// Names to embed in markup for `name`.
    ///
    /// Bundled mode yields the bundle itself, per-file mode its inputs in
    /// order.
    pub fn emit(&self, name: &str, mode: EmitMode) -> Result<Vec<String>> {
        let bundle = self.get(name)?;
        Ok(match mode {
            EmitMode::Bundled => vec![bundle.name.clone()],
            EmitMode::Files => bundle.files.iter().map(|f| f.name().to_string()).collect(),
        })
    }

    /// Depth-first search over bundle references.
    fn reject_cycles(&self) -> Result<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            registry: &'a Registry,
            name: &'a str,
            marks: &mut FxHashMap<&'a str, Mark>,
            path: &mut Vec<&'a str>,
        ) -> std::result::Result<(), String> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => {
                    let start = path.iter().position(|n| *n == name).unwrap_or(0);
                    let mut cycle = path[start..].to_vec();
                    cycle.push(name);
                    return Err(cycle.join(" -> "));
                }
                None => {}
            }

            marks.insert(name, Mark::Visiting);
            path.push(name);
            if let Some(bundle) = registry.bundles.get(name) {
                for nested in bundle.nested() {
                    visit(registry, nested, marks, path)?;
                }
            }
            path.pop();
            marks.insert(name, Mark::Done);
            Ok(())
        }

        let mut marks = FxHashMap::default();
        for name in self.names() {
            let mut path = Vec::new();
            visit(self, name, &mut marks, &mut path).map_err(|cycle| {
                BundleError::Config(ConfigError::Validation(format!(
                    "bundle reference cycle: {cycle}"
                )))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use std::fs;
    use tempfile::TempDir;

    fn bundles(items: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
        items
            .iter()
            .map(|(name, patterns)| {
                (
                    name.to_string(),
                    patterns.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_new_resolves_bundles() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::new(
            dir.path(),
            bundles(&[
                ("js/lib.js", &["js/a.js"]),
                ("js/all.js", &["js/lib.js", "js/b.js"]),
            ]),
        )
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), ["js/all.js", "js/lib.js"]);

        let all = registry.get("js/all.js").unwrap();
        assert_eq!(all.output(), dir.path().join("js/all.js"));
        assert_eq!(all.nested().collect::<Vec<_>>(), ["js/lib.js"]);
        assert!(matches!(all.files()[1].source(), Source::Local(_)));
    }

    #[test]
    fn test_get_unknown() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::new(dir.path(), bundles(&[])).unwrap();
        assert!(registry.is_empty());
        assert!(!registry.contains("nope.js"));
        assert!(matches!(
            registry.get("nope.js"),
            Err(BundleError::UnknownBundle(name)) if name == "nope.js"
        ));
    }

    #[test]
    fn test_emit_modes() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::new(
            dir.path(),
            bundles(&[("app.js", &["b.js", "a.js", "https://cdn.example.com/c.js"])]),
        )
        .unwrap();

        assert_eq!(registry.emit("app.js", EmitMode::Bundled).unwrap(), ["app.js"]);
        assert_eq!(
            registry.emit("app.js", EmitMode::Files).unwrap(),
            ["b.js", "a.js", "https://cdn.example.com/c.js"]
        );
        assert!(registry.emit("other.js", EmitMode::Files).is_err());
    }

    #[test]
    fn test_rejects_self_reference() {
        let dir = TempDir::new().unwrap();
        let err = Registry::new(dir.path(), bundles(&[("app.js", &["app.js"])])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cycle"), "{msg}");
        assert!(msg.contains("app.js -> app.js"), "{msg}");
    }

    #[test]
    fn test_rejects_indirect_cycle() {
        let dir = TempDir::new().unwrap();
        let err = Registry::new(
            dir.path(),
            bundles(&[("a.js", &["b.js"]), ("b.js", &["c.js"]), ("c.js", &["a.js"])]),
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::Config(ConfigError::Validation(_))));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let dir = TempDir::new().unwrap();
        let registry = Registry::new(
            dir.path(),
            bundles(&[
                ("base.css", &["x.css"]),
                ("left.css", &["base.css"]),
                ("right.css", &["base.css"]),
                ("all.css", &["left.css", "right.css"]),
            ]),
        );
        assert!(registry.is_ok());
    }

    #[test]
    fn test_from_config() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("public/css")).unwrap();
        fs::write(dir.path().join("public/css/a.css"), "a{}").unwrap();
        fs::write(dir.path().join("public/css/b.css"), "b{}").unwrap();

        let mut config = SheafConfig::from_str(
            "[bundles]\n\"css/site.css\" = [\"css/.*\\\\.css\"]\n",
        )
        .unwrap();
        config.set_root(dir.path());

        let registry = Registry::from_config(&config).unwrap();
        assert_eq!(
            registry.emit("css/site.css", EmitMode::Files).unwrap(),
            ["css/a.css", "css/b.css"]
        );
    }
}
