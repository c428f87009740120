//! Content collection for one bundle.

use rayon::ThreadPool;
use rayon::prelude::*;

use crate::error::Result;
use crate::hooks::HookSet;
use crate::source::{FileDescriptor, Fetcher};

/// Read every input in parallel on `pool`, in bundle order.
///
/// Nested bundles contribute their artifact as is; other inputs go through
/// the hook registered for their extension. The first error wins.
pub fn collect(
    pool: &ThreadPool,
    files: &[FileDescriptor],
    hooks: &HookSet,
    fetcher: &Fetcher,
) -> Result<Vec<String>> {
    pool.install(|| {
        files
            .par_iter()
            .map(|file| read_one(file, hooks, fetcher))
            .collect()
    })
}

fn read_one(file: &FileDescriptor, hooks: &HookSet, fetcher: &Fetcher) -> Result<String> {
    let content = file.read(fetcher)?;
    if file.bundle_ref().is_some() {
        return Ok(content);
    }
    hooks.apply(file, content)
}
