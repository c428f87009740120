/// Markup bundles are concatenated verbatim, one newline between inputs.
pub fn join(contents: &[String]) -> String {
    contents.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join(&[]), "");
        assert_eq!(join(&["<a>".into()]), "<a>");
        assert_eq!(join(&["<a>\n".into(), "  <b>".into()]), "<a>\n\n  <b>");
    }
}
