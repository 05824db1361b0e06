use std::fmt;

/// A script encoded as adjacent C string literals, one per source line.
///
/// ```text
///   say "hi\there"    ──▶    "say \"hi\\there\"\n"
/// ```
///
/// The C compiler concatenates adjacent literals, so the fragments joined by
/// newlines form a single string expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscapedLiteral {
    fragments: Vec<String>,
}

/// Escape `script` into a multi-line C string expression.
///
/// `\n`, `\r\n` and a lone `\r` all end a line. Backslashes, double
/// quotes and question marks are escaped. Every line gets a trailing
/// `\n` escape, so a script without a final newline gains one. An empty
/// script becomes `""`.
pub fn escape_script(script: &str) -> EscapedLiteral {
    let mut fragments: Vec<String> = split_lines(script).into_iter().map(quote_line).collect();
    if fragments.is_empty() {
        fragments.push("\"\"".to_string());
    }
    log::debug!("escaped script into {} literal fragment(s)", fragments.len());
    EscapedLiteral { fragments }
}

impl EscapedLiteral {
    /// The quoted fragments, in source order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.fragments.len()
    }

    /// The full C expression: fragments joined by newlines.
    pub fn to_c_expr(&self) -> String {
        self.fragments.join("\n")
    }

    /// Recover the text the C compiler will see once the literals are
    /// concatenated and their escapes resolved.
    pub fn decode(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            let body = fragment
                .strip_prefix('"')
                .and_then(|f| f.strip_suffix('"'))
                .unwrap_or(fragment);
            let mut chars = body.chars();
            while let Some(ch) = chars.next() {
                if ch != '\\' {
                    out.push(ch);
                    continue;
                }
                match chars.next() {
                    Some('n') => out.push('\n'),
                    Some(other) => out.push(other),
                    None => out.push('\\'),
                }
            }
        }
        out
    }
}

impl fmt::Display for EscapedLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, fragment) in self.fragments.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn quote_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 5);
    out.push('"');
    for ch in line.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            // keeps `??/` and friends from forming trigraphs
            '?' => out.push_str("\\?"),
            _ => out.push(ch),
        }
    }
    out.push_str("\\n\"");
    out
}
