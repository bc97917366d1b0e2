use std::borrow::Cow;
use std::path::Path;

/// Stylesheet grammar variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Plain CSS
    Plain,
    /// SCSS: nesting, `$variables`, `//` comments and `#{}` interpolation
    Extended,
}

impl Dialect {
    /// Pick the grammar from the file suffix. Only `.scss` selects the
    /// extended grammar, everything else is parsed as plain CSS.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("scss") => Dialect::Extended,
            _ => Dialect::Plain,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Plain => "css",
            Dialect::Extended => "scss",
        }
    }

    /// Whether `#{...}` is text rather than a block
    pub fn supports_interpolation(&self) -> bool {
        matches!(self, Dialect::Extended)
    }

    /// Rewrite the input into something the CSS tokenizer accepts without
    /// moving any byte, so token positions stay valid for the original text.
    pub fn prepare<'a>(&self, contents: &'a str) -> Cow<'a, str> {
        match self {
            Dialect::Plain => Cow::Borrowed(contents),
            Dialect::Extended => blank_line_comments(contents),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Replace every `//` comment with spaces up to (not including) the newline.
///
/// Strings, block comments and unquoted `url(...)` arguments are skipped so
/// `"http://..."` and `url(//cdn/x.png)` survive.
fn blank_line_comments(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut i = 0;

    while i < len {
        match bytes[i] {
            quote @ (b'"' | b'\'') => {
                i += 1;
                while i < len && bytes[i] != quote && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = match text[i + 2..].find("*/") {
                    Some(offset) => i + 2 + offset + 2,
                    None => len,
                };
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = text[i..].find('\n').map(|offset| i + offset).unwrap_or(len);
                let buf = out.get_or_insert_with(|| String::with_capacity(len));
                buf.push_str(&text[copied..i]);
                buf.extend(std::iter::repeat(' ').take(end - i));
                copied = end;
                i = end;
            }
            b'(' if i >= 3 && bytes[i - 3..i].eq_ignore_ascii_case(b"url") => {
                i = text[i..].find(')').map(|offset| i + offset + 1).unwrap_or(len);
            }
            _ => i += 1,
        }
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&text[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    }
}
