//! sheaf - an incremental asset bundler.
//!
//! Named bundles (ordered lists of local files, wildcard patterns, URLs and
//! other bundles) are merged into one artifact each: markup concatenated,
//! stylesheets and scripts minified. A bundle is rebuilt only when one of
//! its inputs changed since its last successful build.
//!
//! ```ignore
//! let config = SheafConfig::load(&cwd, Path::new(CONFIG_FILE))?;
//! let engine = Engine::from_config(&config)?;
//! engine.build("js/app.js")?;
//! ```

pub mod build;
pub mod config;
pub mod error;
pub mod freshness;
pub mod hooks;
pub mod logger;
pub mod registry;
pub mod serialize;
pub mod source;
pub mod utils;

pub use build::{BuildOutcome, Engine, EngineOptions};
pub use config::{CONFIG_FILE, EmitMode, SheafConfig};
pub use error::{BundleError, ParseKind, Result};
pub use hooks::{HookSet, TransformHook};
pub use registry::{BundleDefinition, Registry};
pub use source::{FileDescriptor, Source};
