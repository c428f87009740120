//! Change detection over bundle inputs by modification time.
//!
//! Each input keeps a [`Stamp`]: the time committed at the last successful
//! build and the time seen by the latest probe. Nested bundles are checked
//! recursively.

mod detect;
pub mod mtime;

pub use detect::{BundleState, Stamp, check};
