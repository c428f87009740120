//! Script bundling: several fragments, one minified program.
//!
//! Fragments are validated one by one (so a syntax error names the input it
//! came from), then joined and compiled as a single classic script. Scope
//! analysis, compression and mangling therefore see every fragment at once:
//! later fragments may use earlier top-level declarations, and top-level
//! names stay untouched because they are globals.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions, LegalComment};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::error::{BundleError, ParseKind, Result};

/// Fragments are separated so that a trailing line comment or a missing
/// semicolon cannot merge two inputs.
const SEPARATOR: &str = "\n;\n";

/// An ordered set of script fragments compiled as one program.
#[derive(Debug)]
pub struct ScriptUnit {
    name: String,
    fragments: Vec<String>,
}

impl ScriptUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragments: Vec::new(),
        }
    }

    fn source_type() -> SourceType {
        SourceType::script()
    }

    /// Parse and append one fragment.
    pub fn push(&mut self, fragment: &str) -> Result<()> {
        let label = format!("{} (input {})", self.name, self.fragments.len() + 1);
        parse_check(&label, fragment)?;
        self.fragments.push(fragment.to_string());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Compress, mangle and print the whole unit.
    ///
    /// Only `/*!` (legal) comments survive.
    pub fn minify(self) -> Result<String> {
        let source = self.fragments.join(SEPARATOR);

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &source, Self::source_type()).parse();
        if let Some(err) = ret.errors.first() {
            return Err(BundleError::parse(ParseKind::Script, &self.name, err.to_string()));
        }

        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        let ret = Minifier::new(options).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions {
                    legal: LegalComment::Inline,
                    ..CommentOptions::disabled()
                },
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;

        Ok(code)
    }
}

fn parse_check(label: &str, fragment: &str) -> Result<()> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, fragment, ScriptUnit::source_type()).parse();
    match ret.errors.first() {
        Some(err) => Err(BundleError::parse(ParseKind::Script, label, err.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn minify(fragments: &[&str]) -> String {
        let mut unit = ScriptUnit::new("app.js");
        for fragment in fragments {
            unit.push(fragment).unwrap();
        }
        unit.minify().unwrap()
    }

    /// Run a script with node, if installed.
    fn node(code: &str) -> Option<String> {
        let node = which::which("node").ok()?;
        let output = Command::new(node).arg("-e").arg(code).output().ok()?;
        assert!(
            output.status.success(),
            "node failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    const LIB: &str = r#"
        function accumulate(values) {
            var runningTotal = 0;
            for (var index = 0; index < values.length; index++) {
                runningTotal += values[index];
            }
            return runningTotal;
        }
        var greeting = "sum";
    "#;

    const MAIN: &str = r#"
        // uses declarations from the previous input
        var result = accumulate([1, 2, 3, 4]);
        console.log(greeting + "=" + result);
        console.log(typeof accumulate);
    "#;

    #[test]
    fn test_locals_are_mangled_globals_kept() {
        let code = minify(&[LIB, MAIN]);

        assert!(code.contains("accumulate"), "{code}");
        assert!(!code.contains("runningTotal"), "{code}");
        assert!(!code.contains("uses declarations"), "{code}");
        assert!(code.len() < LIB.len() + MAIN.len());
    }

    #[test]
    fn test_execution_matches_sources() {
        let code = minify(&[LIB, MAIN]);
        let joined = [LIB, MAIN].join("\n");

        let (Some(expected), Some(actual)) = (node(&joined), node(&code)) else {
            return;
        };
        assert_eq!(expected, "sum=10\nfunction\n");
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_unused_top_level_declarations_survive() {
        let code = minify(&[
            "function addNumbers(firstValue, secondValue) { return firstValue + secondValue; }",
            "var apiVersion = 1;",
            "let sharedConfig = { retries: 3 };",
        ]);

        assert!(code.contains("function addNumbers("), "{code}");
        assert!(code.contains("apiVersion"), "{code}");
        assert!(code.contains("sharedConfig"), "{code}");
        // parameters are still local
        assert!(!code.contains("firstValue"), "{code}");
    }

    #[test]
    fn test_legal_comments_survive() {
        let code = minify(&["/*! keep: MIT */\nvar licensed = 1;\n/* drop */\nvar other = 2;"]);
        assert!(code.contains("keep: MIT"), "{code}");
        assert!(!code.contains("drop"), "{code}");
    }

    #[test]
    fn test_fragments_do_not_merge() {
        // no trailing newline or semicolon on the first input
        let code = minify(&["var first = 1 // trailing", "var second = first + 1"]);
        assert!(code.contains("second"), "{code}");
    }

    #[test]
    fn test_parse_error_names_input() {
        let mut unit = ScriptUnit::new("app.js");
        unit.push("var ok = 1;").unwrap();
        let err = unit.push("function (").unwrap_err();
        match err {
            BundleError::Parse { kind, name, .. } => {
                assert_eq!(kind, ParseKind::Script);
                assert_eq!(name, "app.js (input 2)");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert_eq!(unit.len(), 1);
    }

    #[test]
    fn test_empty_unit() {
        let unit = ScriptUnit::new("app.js");
        assert!(unit.is_empty());
        assert_eq!(unit.minify().unwrap().trim(), "");
    }
}
