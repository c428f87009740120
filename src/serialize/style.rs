//! Stylesheet minification with lightningcss.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

use crate::error::{BundleError, ParseKind, Result};

/// Join all inputs and minify them as a single stylesheet, so rules from
/// different files can be merged.
pub fn minify(name: &str, contents: &[String]) -> Result<String> {
    let source = contents.join("\n");
    let parse_err = |msg: String| BundleError::parse(ParseKind::Style, name, msg);

    let mut stylesheet = StyleSheet::parse(
        &source,
        ParserOptions {
            filename: name.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|err| parse_err(err.to_string()))?;

    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|err| parse_err(err.to_string()))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| parse_err(err.to_string()))?;

    Ok(result.code)
}
