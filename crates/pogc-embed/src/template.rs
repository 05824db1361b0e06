use std::path::Path;

use crate::error::TemplateError;
use crate::escape::EscapedLiteral;

/// Token in the stub that is replaced by the escaped script. The quotes are
/// part of the token, so an unmodified stub still compiles.
pub const PLACEHOLDER: &str = "\"/* SCRIPT_CONTENT_HERE */\"";

const BUNDLED_STUB: &str = include_str!("../../../pogc/stub.c");

/// C source skeleton with a single [`PLACEHOLDER`].
#[derive(Debug, Clone)]
pub struct StubTemplate {
    /// Shown in error messages (file path or `<bundled>`).
    name: String,
    text: String,
}

impl StubTemplate {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a stub from disk.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::debug!("loaded stub template {} ({} bytes)", path.display(), text.len());
        Ok(Self::new(path.display().to_string(), text))
    }

    /// The stub shipped inside the binary.
    pub fn bundled() -> Self {
        Self::new("<bundled>", BUNDLED_STUB)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholder_count(&self) -> usize {
        self.text.matches(PLACEHOLDER).count()
    }

    /// Replace the placeholder with `literal`, leaving every other byte of
    /// the template untouched.
    ///
    /// Fails unless the placeholder occurs exactly once.
    pub fn substitute(&self, literal: &EscapedLiteral) -> Result<String, TemplateError> {
        let not_found = || TemplateError::PlaceholderNotFound {
            template: self.name.clone(),
        };
        match self.placeholder_count() {
            0 => return Err(not_found()),
            1 => {}
            count => {
                return Err(TemplateError::MultiplePlaceholders {
                    template: self.name.clone(),
                    count,
                });
            }
        }
        let start = self.text.find(PLACEHOLDER).ok_or_else(not_found)?;

        let expr = literal.to_c_expr();
        let end = start + PLACEHOLDER.len();
        let mut out = String::with_capacity(self.text.len() - PLACEHOLDER.len() + expr.len());
        out.push_str(&self.text[..start]);
        out.push_str(&expr);
        out.push_str(&self.text[end..]);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::escape_script;

    const STUB: &str = "#include <stdio.h>\nconst char S[] = \"/* SCRIPT_CONTENT_HERE */\";\nint main(void) { return 0; }\n";

    #[test]
    fn substitutes_placeholder() {
        let stub = StubTemplate::new("stub.c", STUB);
        let out = stub.substitute(&escape_script("print(1);")).unwrap();
        assert_eq!(
            out,
            "#include <stdio.h>\nconst char S[] = \"print(1);\\n\";\nint main(void) { return 0; }\n"
        );
    }

    #[test]
    fn surrounding_text_is_untouched() {
        let stub = StubTemplate::new("stub.c", STUB);
        let lit = escape_script("a\nb");
        let out = stub.substitute(&lit).unwrap();

        let start = STUB.find(PLACEHOLDER).unwrap();
        let tail = &STUB[start + PLACEHOLDER.len()..];
        assert!(out.starts_with(&STUB[..start]));
        assert!(out.ends_with(tail));
        assert_eq!(out.len(), STUB.len() - PLACEHOLDER.len() + lit.to_c_expr().len());
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let stub = StubTemplate::new("stub.c", "int main(void) { return 0; }\n");
        let err = stub.substitute(&escape_script("x")).unwrap_err();
        assert!(matches!(err, TemplateError::PlaceholderNotFound { ref template } if template == "stub.c"));
    }

    #[test]
    fn unquoted_comment_is_not_the_placeholder() {
        let stub = StubTemplate::new("stub.c", "const char S[] = /* SCRIPT_CONTENT_HERE */;\n");
        assert_eq!(stub.placeholder_count(), 0);
        assert!(stub.substitute(&escape_script("x")).is_err());
    }

    #[test]
    fn repeated_placeholder_is_an_error() {
        let text = format!("{STUB}{STUB}");
        let stub = StubTemplate::new("twice.c", text);
        let err = stub.substitute(&escape_script("x")).unwrap_err();
        assert!(matches!(err, TemplateError::MultiplePlaceholders { count: 2, .. }));
    }

    #[test]
    fn bundled_stub_has_one_placeholder() {
        let stub = StubTemplate::bundled();
        assert_eq!(stub.name(), "<bundled>");
        assert_eq!(stub.placeholder_count(), 1);
        assert!(stub.text().contains("ext_interpret"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = StubTemplate::load(Path::new("does/not/exist/stub.c")).unwrap_err();
        assert!(matches!(err, TemplateError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist/stub.c"));
    }

    // ── Property-based tests ────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn substitute_keeps_surrounding_bytes(
                prefix in "[^\"]{0,120}",
                suffix in "[^\"]{0,120}",
                script in "\\PC{0,80}"
            ) {
                let stub = StubTemplate::new("stub.c", format!("{prefix}{PLACEHOLDER}{suffix}"));
                let literal = escape_script(&script);
                let out = stub.substitute(&literal).unwrap();
                prop_assert_eq!(out, format!("{prefix}{}{suffix}", literal.to_c_expr()));
            }

            #[test]
            fn quote_free_template_has_no_placeholder(text in "[^\"]{0,200}") {
                let stub = StubTemplate::new("plain.c", text);
                let is_not_found = matches!(
                    stub.substitute(&escape_script("x")),
                    Err(TemplateError::PlaceholderNotFound { .. })
                );
                prop_assert!(is_not_found);
            }
        }
    }
}
