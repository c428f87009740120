//! Output serialization, dispatched on the bundle name's extension.
//!
//! - markup (`.html`, `.htm`): contents joined with newlines, verbatim
//! - style (`.css`): joined, then minified as one stylesheet
//! - script (`.js`, `.mjs`, `.cjs`): fragments parsed as one program,
//!   compressed and mangled
//!
//! Artifacts are written atomically (see [`write_atomic`]).

mod markup;
mod script;
mod style;
mod write;

pub use script::ScriptUnit;
pub use write::{TEMP_PREFIX, write_atomic};

use std::path::Path;

use crate::error::{BundleError, Result};

/// Serialization rule for an output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Markup,
    Style,
    Script,
}

impl OutputKind {
    /// Rule for a bundle name, by extension (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "html" | "htm" => Some(Self::Markup),
            "css" => Some(Self::Style),
            "js" | "mjs" | "cjs" => Some(Self::Script),
            _ => None,
        }
    }
}

/// Produce the artifact text for bundle `name` from its ordered contents.
pub fn render(name: &str, contents: &[String]) -> Result<String> {
    let kind = OutputKind::from_name(name).ok_or_else(|| BundleError::UnsupportedOutputType {
        name: name.to_string(),
    })?;

    match kind {
        OutputKind::Markup => Ok(markup::join(contents)),
        OutputKind::Style => style::minify(name, contents),
        OutputKind::Script => {
            let mut unit = ScriptUnit::new(name);
            for content in contents {
                unit.push(content)?;
            }
            unit.minify()
        }
    }
}

/// Render and atomically write bundle `name` to `output`.
pub fn save(name: &str, output: &Path, contents: &[String]) -> Result<()> {
    let code = render(name, contents)?;
    write_atomic(output, code.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_output_kind() {
        assert_eq!(OutputKind::from_name("index.html"), Some(OutputKind::Markup));
        assert_eq!(OutputKind::from_name("a/b.HTM"), Some(OutputKind::Markup));
        assert_eq!(OutputKind::from_name("css/site.css"), Some(OutputKind::Style));
        assert_eq!(OutputKind::from_name("app.mjs"), Some(OutputKind::Script));
        assert_eq!(OutputKind::from_name("data.json"), None);
        assert_eq!(OutputKind::from_name("README"), None);
    }

    #[test]
    fn test_unsupported_output() {
        let err = render("data.json", &["{}".to_string()]).unwrap_err();
        assert!(matches!(err, BundleError::UnsupportedOutputType { name } if name == "data.json"));
    }

    #[test]
    fn test_save_markup() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("partials/all.html");
        save(
            "partials/all.html",
            &output,
            &["<p>a</p>".to_string(), "<p>b</p>".to_string()],
        )
        .unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "<p>a</p>\n<p>b</p>");
    }

    #[test]
    fn test_failed_render_keeps_artifact() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("app.js");
        fs::write(&output, "var old;").unwrap();

        assert!(save("app.js", &output, &["var = ;".to_string()]).is_err());
        assert_eq!(fs::read_to_string(output).unwrap(), "var old;");
    }
}
