//! Per-bundle stamps and the recursive change check.

use std::time::SystemTime;

use crate::error::Result;
use crate::registry::{BundleDefinition, Registry};

/// Modification-time bookkeeping for one input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stamp {
    /// Time committed after the last successful build.
    pub mtime: Option<SystemTime>,
    /// Time seen by the most recent probe.
    pub ttime: Option<SystemTime>,
}

impl Stamp {
    /// Store a probe result and report whether it differs from the
    /// committed time. Never-committed stamps always count as changed.
    pub fn observe(&mut self, probed: Option<SystemTime>) -> bool {
        self.ttime = probed;
        self.mtime.is_none() || self.mtime != probed
    }

    pub fn commit(&mut self) {
        self.mtime = self.ttime;
    }
}

/// Mutable state of one bundle, guarded by the bundle's lock.
///
/// `stamps[i]` belongs to the bundle's `i`-th input.
#[derive(Debug, Clone, Default)]
pub struct BundleState {
    stamps: Vec<Stamp>,
}

impl BundleState {
    pub fn new(inputs: usize) -> Self {
        Self {
            stamps: vec![Stamp::default(); inputs],
        }
    }

    pub fn stamps(&self) -> &[Stamp] {
        &self.stamps
    }

    pub fn stamp_mut(&mut self, index: usize) -> Option<&mut Stamp> {
        self.stamps.get_mut(index)
    }

    /// Promote every probed time to committed.
    pub fn commit(&mut self) {
        self.stamps.iter_mut().for_each(Stamp::commit);
    }
}

/// Whether any input of `bundle` changed since its last successful build.
///
/// Every input is probed, so a following commit records all of them.
/// Nested bundles are checked recursively under their own lock, and the
/// nested artifact's mtime is compared as well, which catches the inner
/// bundle having been rebuilt on its own. Remote inputs never count as
/// changed.
pub fn check(registry: &Registry, bundle: &BundleDefinition, state: &mut BundleState) -> Result<bool> {
    let mut changed = false;

    for (file, stamp) in bundle.files().iter().zip(state.stamps.iter_mut()) {
        if let Some(nested) = file.bundle_ref() {
            let nested = registry.get(nested)?;
            let mut nested_state = nested.lock();
            changed |= check(registry, nested, &mut nested_state)?;
            changed |= stamp.observe(file.probe_mtime()?);
        } else if file.supports_mtime() {
            changed |= stamp.observe(file.probe_mtime()?);
        }
    }

    Ok(changed)
}
