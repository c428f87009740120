//! `sheaf watch`: rebuild on changes under the source root.
//!
//! Events are debounced, then the selected bundles are built again (those
//! whose inputs did not change are no-ops). Writes to bundle artifacts and
//! in-flight temporary files are ignored. Files appearing or disappearing
//! can change what wildcard patterns match, so those events re-resolve the
//! registry first.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use notify::event::{MetadataKind, ModifyKind};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use sheaf::serialize::TEMP_PREFIX;
use sheaf::utils::plural::plural_count;
use sheaf::{Engine, SheafConfig, debug, log, logger};

use super::build::{Summary, build};

const DEBOUNCE: Duration = Duration::from_millis(300);
const POLL: Duration = Duration::from_millis(100);

/// What a batch of events asks for.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Pending {
    #[default]
    None,
    /// Contents changed: rebuild.
    Rebuild,
    /// Files came or went: re-resolve patterns, then rebuild.
    Rescan,
}

impl Pending {
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::Rescan, _) | (_, Self::Rescan) => Self::Rescan,
            (Self::Rebuild, _) | (_, Self::Rebuild) => Self::Rebuild,
            _ => Self::None,
        }
    }
}

pub fn run(config: &SheafConfig, bundles: &[String]) -> Result<()> {
    let mut engine = Engine::from_config(config)?;
    let names = super::select(&engine, bundles)?;
    let mut artifacts = artifact_paths(&engine);

    report(build(&engine, &names));

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("failed to set Ctrl+C handler")?;

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .context("failed to start file watcher")?;
    watcher
        .watch(config.src_root(), RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", config.src_root().display()))?;

    log!("watch"; "watching {} (Ctrl+C to stop)", config.src_root().display());

    let mut pending = Pending::None;
    let mut last_event = Instant::now();

    while !stop.load(Ordering::SeqCst) {
        match rx.recv_timeout(POLL) {
            Ok(Ok(event)) => {
                let kind = classify(&event, &artifacts);
                if kind != Pending::None {
                    debug!("watch"; "{:?} {:?}", event.kind, event.paths);
                    pending = pending.merge(kind);
                    last_event = Instant::now();
                }
            }
            Ok(Err(err)) => log!("error"; "watch: {}", err),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if pending == Pending::None || last_event.elapsed() < DEBOUNCE {
            continue;
        }

        // A fresh engine re-resolves wildcards and starts with no stamps,
        // so every selected bundle rebuilds once.
        if pending == Pending::Rescan {
            match Engine::from_config(config) {
                Ok(fresh) => {
                    debug!("watch"; "re-resolved {}", plural_count(fresh.registry().len(), "bundle"));
                    engine = fresh;
                    artifacts = artifact_paths(&engine);
                }
                Err(err) => {
                    logger::status_error("rescan failed", &format!("{:#}", anyhow::Error::from(err)));
                    pending = Pending::None;
                    continue;
                }
            }
        }
        pending = Pending::None;

        report(build(&engine, &names));
    }

    log!("watch"; "stopped");
    Ok(())
}

/// Output artifacts of every bundle; events on them are our own writes.
fn artifact_paths(engine: &Engine) -> FxHashSet<PathBuf> {
    let registry = engine.registry();
    registry
        .names()
        .into_iter()
        .filter_map(|name| registry.get(name).ok())
        .map(|bundle| bundle.output().to_path_buf())
        .collect()
}

fn is_ignored(path: &Path, artifacts: &FxHashSet<PathBuf>) -> bool {
    artifacts.contains(path)
        || path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(TEMP_PREFIX))
}

fn classify(event: &Event, artifacts: &FxHashSet<PathBuf>) -> Pending {
    let kind = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => Pending::Rescan,
        EventKind::Modify(ModifyKind::Name(_)) => Pending::Rescan,
        // mtimes drive change detection, so a touch counts
        EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::AccessTime | MetadataKind::Permissions | MetadataKind::Ownership,
        )) => Pending::None,
        EventKind::Modify(_) => Pending::Rebuild,
        _ => Pending::None,
    };

    if kind == Pending::None || event.paths.iter().all(|p| is_ignored(p, artifacts)) {
        return Pending::None;
    }
    kind
}

fn report(summary: Summary) {
    if summary.failed > 0 {
        logger::status_error(
            &format!("{} failed", plural_count(summary.failed, "bundle")),
            "see errors above",
        );
    } else if summary.built > 0 {
        logger::status_success(&format!("rebuilt {}", plural_count(summary.built, "bundle")));
    } else {
        logger::status_unchanged("all bundles up to date");
    }
}
