//! Pattern expansion: configured patterns → ordered file descriptors.
//!
//! A pattern whose file-name segment contains `*` lists its directory and
//! keeps the entries whose base name matches the segment read as a regular
//! expression (a bare `*` keeps everything); a wildcard matching nothing
//! contributes nothing. Anything else is taken literally. Names that match
//! another bundle become nested references.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use rustc_hash::FxHashSet;

use super::FileDescriptor;
use crate::config::ConfigError;
use crate::error::{BundleError, Result};

static REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").expect("static regex is valid")
});

/// Whether a logical name designates a remote resource (`scheme://...`).
pub fn is_remote(name: &str) -> bool {
    REMOTE.is_match(name)
}

/// Resolve every pattern of bundle `bundle` into descriptors, in order.
///
/// `bundles` holds all bundle names of the registry, so names that match
/// one of them resolve to nested-bundle references.
pub fn resolve_bundle(
    src_root: &Path,
    bundle: &str,
    patterns: &[String],
    bundles: &FxHashSet<String>,
) -> Result<Vec<FileDescriptor>> {
    let mut names = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        names.extend(expand_pattern(src_root, bundle, pattern)?);
    }

    // Never let unmatched globs silently produce an empty bundle.
    if names.is_empty() {
        crate::debug!("resolve"; "`{}` matched nothing, using its patterns literally", bundle);
        names = patterns.to_vec();
    }

    Ok(names
        .into_iter()
        .map(|name| classify(src_root, name, bundles))
        .collect())
}

/// Expand one pattern into logical names.
fn expand_pattern(src_root: &Path, bundle: &str, pattern: &str) -> Result<Vec<String>> {
    if is_remote(pattern) {
        return Ok(vec![pattern.to_string()]);
    }

    let (dir, segment) = split_pattern(pattern);
    if !segment.contains('*') {
        return Ok(vec![pattern.to_string()]);
    }

    let matcher = if segment == "*" {
        None
    } else {
        Some(wildcard_regex(segment)?)
    };

    let dir_path = local_path(src_root, dir);
    let entries = fs::read_dir(&dir_path).map_err(|err| BundleError::io(&dir_path, err))?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| matcher.as_ref().is_none_or(|re| re.is_match(name)))
        .map(|name| join_logical(dir, &name))
        .filter(|name| name != bundle)
        .collect();
    names.sort();

    if names.is_empty() {
        crate::debug!("resolve"; "`{}` matched nothing", pattern);
    }
    Ok(names)
}

/// Split a pattern into its directory prefix and file-name segment.
fn split_pattern(pattern: &str) -> (&str, &str) {
    pattern.rsplit_once('/').unwrap_or(("", pattern))
}

fn join_logical(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Join a logical name onto the source root, never escaping it through a
/// leading slash.
fn local_path(src_root: &Path, name: &str) -> std::path::PathBuf {
    src_root.join(name.trim_start_matches('/'))
}

/// Compile a wildcard segment.
///
/// The segment is a regular expression (unanchored, like `.*\.js`). When it
/// is not valid as one (`*.js`), it is read as an anchored shell glob.
fn wildcard_regex(segment: &str) -> Result<Regex> {
    if let Ok(re) = Regex::new(segment) {
        return Ok(re);
    }

    let glob = regex::escape(segment)
        .replace(r"\*", "[^/]*")
        .replace(r"\?", ".");
    Regex::new(&format!("^{glob}$")).map_err(|err| {
        BundleError::Config(ConfigError::Validation(format!(
            "invalid wildcard `{segment}`: {err}"
        )))
    })
}

fn classify(src_root: &Path, name: String, bundles: &FxHashSet<String>) -> FileDescriptor {
    if bundles.contains(&name) {
        let output = local_path(src_root, &name);
        FileDescriptor::bundle(name, output)
    } else if is_remote(&name) {
        FileDescriptor::remote(name)
    } else {
        let path = local_path(src_root, &name);
        FileDescriptor::local(name, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use tempfile::TempDir;

    fn setup(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn names(files: &[FileDescriptor]) -> Vec<&str> {
        files.iter().map(FileDescriptor::name).collect()
    }

    fn patterns(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("http://a.com/x.js"));
        assert!(is_remote("https://a.com/x.js"));
        assert!(is_remote("git+ssh://host/x"));
        assert!(!is_remote("js/app.js"));
        assert!(!is_remote("/js/http://x"));
        assert!(!is_remote("C:\\js\\app.js"));
    }

    #[test]
    fn test_literal_patterns_keep_order() {
        let dir = setup(&[]);
        let files = resolve_bundle(
            dir.path(),
            "app.js",
            &patterns(&["js/b.js", "js/a.js", "https://cdn.x.com/c.js"]),
            &FxHashSet::default(),
        )
        .unwrap();

        assert_eq!(names(&files), ["js/b.js", "js/a.js", "https://cdn.x.com/c.js"]);
        assert_eq!(*files[0].source(), Source::Local(dir.path().join("js/b.js")));
        assert!(matches!(files[2].source(), Source::Remote(_)));
    }

    #[test]
    fn test_regex_wildcard() {
        let dir = setup(&["js/b.js", "js/a.js", "js/c.css", "js/sub/d.js"]);
        let files = resolve_bundle(
            dir.path(),
            "app.js",
            &patterns(&[r"js/.*\.js", "main.js"]),
            &FxHashSet::default(),
        )
        .unwrap();

        // sorted, files only, followed by the literal
        assert_eq!(names(&files), ["js/a.js", "js/b.js", "main.js"]);
    }

    #[test]
    fn test_bare_star_keeps_all_files() {
        let dir = setup(&["css/b.css", "css/a.css"]);
        let files = resolve_bundle(
            dir.path(),
            "site.css",
            &patterns(&["css/*"]),
            &FxHashSet::default(),
        )
        .unwrap();
        assert_eq!(names(&files), ["css/a.css", "css/b.css"]);
    }

    #[test]
    fn test_glob_fallback_for_invalid_regex() {
        let dir = setup(&["a.js", "b.js", "c.css"]);
        let files = resolve_bundle(
            dir.path(),
            "out.js",
            &patterns(&["*.js"]),
            &FxHashSet::default(),
        )
        .unwrap();
        assert_eq!(names(&files), ["a.js", "b.js"]);
    }

    #[test]
    fn test_wildcard_skips_own_output() {
        let dir = setup(&["js/a.js", "js/app.js"]);
        let files = resolve_bundle(
            dir.path(),
            "js/app.js",
            &patterns(&[r"js/.*\.js"]),
            &FxHashSet::default(),
        )
        .unwrap();
        assert_eq!(names(&files), ["js/a.js"]);
    }

    #[test]
    fn test_unmatched_wildcard_contributes_nothing() {
        let dir = setup(&["js/a.js", "css/a.css"]);
        let files = resolve_bundle(
            dir.path(),
            "app.js",
            &patterns(&[r"css/.*\.js", r"js/.*\.js", "main.js"]),
            &FxHashSet::default(),
        )
        .unwrap();
        assert_eq!(names(&files), ["js/a.js", "main.js"]);
    }

    #[test]
    fn test_all_wildcards_unmatched_falls_back_to_patterns() {
        let dir = setup(&["js/a.css", "css/a.js"]);
        let files = resolve_bundle(
            dir.path(),
            "app.js",
            &patterns(&[r"js/.*\.js", "css/*.css"]),
            &FxHashSet::default(),
        )
        .unwrap();

        assert_eq!(names(&files), [r"js/.*\.js", "css/*.css"]);
        assert_eq!(
            *files[0].source(),
            Source::Local(dir.path().join(r"js/.*\.js"))
        );
    }

    #[test]
    fn test_missing_wildcard_directory_errors() {
        let dir = setup(&[]);
        let err = resolve_bundle(
            dir.path(),
            "app.js",
            &patterns(&[r"nope/.*\.js"]),
            &FxHashSet::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }

    #[test]
    fn test_no_patterns_no_files() {
        let dir = setup(&[]);
        let files =
            resolve_bundle(dir.path(), "app.js", &[], &FxHashSet::default()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_bundle_names_become_references() {
        let dir = setup(&[]);
        let bundles: FxHashSet<String> =
            ["js/lib.js".to_string(), "js/all.js".to_string()].into_iter().collect();
        let files = resolve_bundle(
            dir.path(),
            "js/all.js",
            &patterns(&["js/lib.js", "js/extra.js"]),
            &bundles,
        )
        .unwrap();

        assert_eq!(files[0].bundle_ref(), Some("js/lib.js"));
        assert_eq!(
            *files[0].source(),
            Source::Bundle {
                name: "js/lib.js".into(),
                output: dir.path().join("js/lib.js"),
            }
        );
        assert_eq!(files[1].bundle_ref(), None);
    }

    #[test]
    fn test_leading_slash_stays_under_root() {
        let dir = setup(&[]);
        let files = resolve_bundle(
            dir.path(),
            "app.js",
            &patterns(&["/js/a.js"]),
            &FxHashSet::default(),
        )
        .unwrap();
        assert_eq!(*files[0].source(), Source::Local(dir.path().join("js/a.js")));
    }
}
