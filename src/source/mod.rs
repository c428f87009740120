//! Bundle inputs: pattern resolution and file descriptors.
//!
//! - [`resolve`]: expands configured patterns into ordered descriptors
//! - [`descriptor`]: local file / remote resource / nested bundle handle
//! - [`remote`]: HTTP fetching for remote resources

mod descriptor;
mod remote;
mod resolve;

pub use descriptor::{FileDescriptor, Source};
pub use remote::Fetcher;
pub use resolve::{is_remote, resolve_bundle};
