//! `[bundles]` section configuration.
//!
//! Maps an output name (relative to `build.src`) to the ordered list of
//! patterns it is made of. A pattern is a local path whose file-name segment
//! may be a wildcard regex, an absolute URL, or the name of another bundle.
//!
//! # Example
//!
//! ```toml
//! [bundles]
//! "js/app.js"    = ["js/lib/.*\\.js", "js/main.js"]
//! "css/site.css" = ["css/reset.css", "https://cdn.example.com/grid.css"]
//! "js/all.js"    = ["js/app.js", "js/analytics.js"]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::serialize::OutputKind;
use crate::source::is_remote;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundlesConfig(pub BTreeMap<String, Vec<String>>);

impl BundlesConfig {
    pub const BUNDLES: FieldPath = FieldPath::new("bundles");

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate bundle definitions.
    ///
    /// # Checks
    /// - at least one bundle is defined (warning)
    /// - every bundle has at least one non-empty pattern
    /// - remote patterns are valid URLs
    /// - the output name has a known serializer (warning)
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.0.is_empty() {
            diag.warn(Self::BUNDLES, "no bundles defined");
        }

        for (name, patterns) in &self.0 {
            if patterns.is_empty() {
                diag.error(Self::BUNDLES, format!("bundle `{name}` has no patterns"));
                continue;
            }

            for pattern in patterns {
                if pattern.trim().is_empty() {
                    diag.error(Self::BUNDLES, format!("bundle `{name}` has an empty pattern"));
                } else if is_remote(pattern)
                    && let Err(err) = url::Url::parse(pattern)
                {
                    diag.error(
                        Self::BUNDLES,
                        format!("bundle `{name}`: invalid URL `{pattern}` ({err})"),
                    );
                }
            }

            if OutputKind::from_name(name).is_none() {
                diag.warn(
                    Self::BUNDLES,
                    format!("`{name}` has no known output type, building it will fail"),
                );
            }
        }
    }
}
