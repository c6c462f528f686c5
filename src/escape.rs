use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap()
});

/// Makes `input` safe for XML text, attribute values and comments.
///
/// `&` that already begins an entity reference is kept, `-` becomes `&#45;` so
/// `--` never appears inside a comment, and runs of spaces keep their width
/// via `&#160;`. Every call returns an independent value.
pub fn xml_string(input: &str) -> Cow<'_, str> {
    if !input
        .bytes()
        .any(|b| matches!(b, b'&' | b'<' | b'>' | b'-' | b'"' | b'\''))
        && !input.contains("  ")
    {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    let mut prev = None;
    for (idx, ch) in input.char_indices() {
        match ch {
            '&' if !ENTITY_RE.is_match(&input[idx..]) => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '-' => out.push_str("&#45;"),
            ' ' if prev == Some(' ') => out.push_str("&#160;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
        prev = Some(ch);
    }
    Cow::Owned(out)
}
