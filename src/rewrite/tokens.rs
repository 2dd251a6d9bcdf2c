//! Line-token helpers shared by the decomposition steps.
//!
//! The rewriter never builds an AST; everything below works on the
//! whitespace-split tokens of a single line.

/// Strip one layer of matching single or double quotes from a value.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();

    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);

        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }

    value
}

/// First whitespace-delimited token of a line, if any.
pub fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// Parse `key = value` when the line splits into exactly that token triple.
///
/// Values carrying inner whitespace do not match; this mirrors the tolerance
/// of the rest of the rewriter and is deliberate.
pub fn scalar_assignment<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let mut tokens = line.split_whitespace();
    let (k, eq, value) = (tokens.next()?, tokens.next()?, tokens.next()?);

    if tokens.next().is_some() || k != key || eq != "=" {
        return None;
    }

    Some(strip_quotes(value))
}

/// True when the line is a bare `keyword {` block opener.
pub fn opens_block(line: &str, keyword: &str) -> bool {
    let mut tokens = line.split_whitespace();

    matches!(
        (tokens.next(), tokens.next(), tokens.next()),
        (Some(k), Some("{"), None) if k == keyword
    )
}
