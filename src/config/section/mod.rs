//! Configuration section definitions.
//!
//! Each module corresponds to a section in `sheaf.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `build`   | `[build]`    | Source root, emit mode, workers, timeout |
//! | `bundles` | `[bundles]`  | Bundle name → ordered patterns           |
//! | `hooks`   | `[hooks]`    | Extension → transform command            |

mod build;
mod bundles;
mod hooks;

pub use build::{BuildSectionConfig, EmitMode};
pub use bundles::BundlesConfig;
pub use hooks::HookConfig;
