//! Build orchestration.
//!
//! `Engine::build(name)` for one bundle:
//! - **Check** - probe every input (recursively through nested bundles)
//! - **Skip** - nothing changed and the artifact exists: done
//! - **Nested** - build referenced bundles first, in bundle order
//! - **Collect** - read inputs in parallel, apply hooks, keep bundle order
//! - **Save** - serialize and atomically replace the artifact
//! - **Commit** - record the probed mtimes
//!
//! The bundle's lock is held throughout, so concurrent builds of one bundle
//! run one after another (the later ones usually find it fresh). Any error
//! returns before the commit, so the next build retries everything.

mod collect;

use std::fs;
use std::io::ErrorKind;
use std::thread;
use std::time::Duration;

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::{BuildSectionConfig, ConfigError, EmitMode, SheafConfig};
use crate::error::{BundleError, Result};
use crate::freshness;
use crate::hooks::HookSet;
use crate::registry::{BundleDefinition, Registry};
use crate::serialize;
use crate::source::Fetcher;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Result of a successful build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Inputs unchanged and artifact present; nothing was done.
    Fresh,
    /// The artifact was (re)written.
    Built,
}

/// Tunables of an [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Content-collection threads (`None`: one per CPU).
    pub jobs: Option<usize>,
    pub fetch_timeout: Duration,
    /// Enumeration mode for [`Engine::emit`].
    pub emit: EmitMode,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&BuildSectionConfig::default())
    }
}

impl From<&BuildSectionConfig> for EngineOptions {
    fn from(build: &BuildSectionConfig) -> Self {
        Self {
            jobs: build.jobs,
            fetch_timeout: Duration::from_secs(build.fetch_timeout),
            emit: build.emit,
        }
    }
}

/// Incremental bundle builder over one [`Registry`].
pub struct Engine {
    registry: Registry,
    hooks: HookSet,
    fetcher: Fetcher,
    pool: ThreadPool,
    emit: EmitMode,
}

impl Engine {
    pub fn new(registry: Registry, hooks: HookSet) -> Result<Self> {
        Self::with_options(registry, hooks, EngineOptions::default())
    }

    pub fn with_options(registry: Registry, hooks: HookSet, options: EngineOptions) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(options.jobs.unwrap_or(0))
            .thread_name(|i| format!("sheaf-collect-{i}"))
            .build()
            .map_err(|err| {
                BundleError::Config(ConfigError::Validation(format!(
                    "failed to start worker pool: {err}"
                )))
            })?;

        Ok(Self {
            registry,
            hooks,
            fetcher: Fetcher::new(options.fetch_timeout),
            pool,
            emit: options.emit,
        })
    }

    /// Registry, command hooks and options from a loaded configuration.
    pub fn from_config(config: &SheafConfig) -> Result<Self> {
        let registry = Registry::from_config(config)?;
        let hooks = HookSet::from_config(config);
        Self::with_options(registry, hooks, EngineOptions::from(&config.build))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    /// Whether `name` would rebuild, without building.
    ///
    /// True when an input changed or the artifact is missing.
    pub fn check(&self, name: &str) -> Result<bool> {
        let bundle = self.registry.get(name)?;
        let mut state = bundle.lock();
        let changed = freshness::check(&self.registry, bundle, &mut state)?;
        Ok(changed || !bundle.output().is_file())
    }

    /// Make sure the artifact of `name` is up to date.
    pub fn build(&self, name: &str) -> Result<BuildOutcome> {
        self.build_bundle(self.registry.get(name)?)
    }

    fn build_bundle(&self, bundle: &BundleDefinition) -> Result<BuildOutcome> {
        let mut state = bundle.lock();

        let changed = freshness::check(&self.registry, bundle, &mut state)?;
        if !changed && bundle.output().is_file() {
            debug!("skip"; "{} is up to date", bundle.name());
            return Ok(BuildOutcome::Fresh);
        }

        // Nested artifacts must exist before collection reads them; their
        // stamps are re-probed so the commit records the new artifacts.
        for (index, file) in bundle.files().iter().enumerate() {
            let Some(nested) = file.bundle_ref() else {
                continue;
            };
            self.build_bundle(self.registry.get(nested)?)?;
            let probed = file.probe_mtime()?;
            if let Some(stamp) = state.stamp_mut(index) {
                stamp.observe(probed);
            }
        }

        let contents = collect::collect(&self.pool, bundle.files(), &self.hooks, &self.fetcher)?;
        serialize::save(bundle.name(), bundle.output(), &contents)?;
        state.commit();

        log!("build"; "{} ({})", bundle.name(), plural_count(contents.len(), "input"));
        Ok(BuildOutcome::Built)
    }

    /// Build several bundles concurrently, one thread each.
    ///
    /// Outcomes come back in the order of `names`.
    pub fn build_many<'a, I>(&self, names: I) -> Vec<(&'a str, Result<BuildOutcome>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        thread::scope(|scope| {
            let handles: Vec<_> = names
                .into_iter()
                .map(|name| (name, scope.spawn(move || self.build(name))))
                .collect();

            handles
                .into_iter()
                .map(|(name, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                    (name, result)
                })
                .collect()
        })
    }

    /// Build every registered bundle.
    pub fn build_all(&self) -> Vec<(&str, Result<BuildOutcome>)> {
        self.build_many(self.registry.names())
    }

    /// Delete the artifact of `name`. Returns whether one existed.
    ///
    /// The next build of the bundle rewrites it.
    pub fn clean(&self, name: &str) -> Result<bool> {
        let bundle = self.registry.get(name)?;
        let _state = bundle.lock();
        match fs::remove_file(bundle.output()) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(BundleError::io(bundle.output(), err)),
        }
    }

    /// Names to embed in markup for `name`, in the configured emit mode.
    pub fn emit(&self, name: &str) -> Result<Vec<String>> {
        self.registry.emit(name, self.emit)
    }

    pub fn emit_mode(&self) -> EmitMode {
        self.emit
    }
}
