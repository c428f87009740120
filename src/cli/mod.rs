//! CLI commands: thin triggers around [`sheaf::Engine`].

mod args;
pub mod build;
pub mod list;
pub mod watch;

pub use args::{Cli, Commands};

use sheaf::{BundleError, Engine};

/// Requested bundle names, or every bundle when none were given.
fn select(engine: &Engine, requested: &[String]) -> sheaf::Result<Vec<String>> {
    let registry = engine.registry();
    if requested.is_empty() {
        return Ok(registry.names().into_iter().map(str::to_string).collect());
    }

    match requested.iter().find(|name| !registry.contains(name)) {
        Some(unknown) => Err(BundleError::UnknownBundle(unknown.clone())),
        None => Ok(requested.to_vec()),
    }
}
