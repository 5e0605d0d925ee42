//! Quote scanning and brace matching.
//!
//! ICU quoting: a doubled apostrophe (`''`) is a literal apostrophe and never
//! changes state; a single apostrophe opens or closes a quoted run. Nothing
//! inside a quoted run is structural. All functions here are pure and work on
//! byte indices; every structural character is ASCII, so the indices they
//! return are always char boundaries.

const QUOTE: u8 = b'\'';

/// Advance over the byte at `index`, returning the next index and the
/// quoting state after it.
fn step(bytes: &[u8], index: usize, quoted: bool) -> (usize, bool) {
    if bytes[index] == QUOTE {
        if bytes.get(index + 1) == Some(&QUOTE) {
            return (index + 2, quoted);
        }
        return (index + 1, !quoted);
    }
    (index + 1, quoted)
}

/// Whether `position` lies inside an unterminated quoted run, scanning from
/// the start of `text`.
pub fn is_quoted_position(text: &str, position: usize) -> bool {
    let bytes = text.as_bytes();
    let mut index = 0;
    let mut quoted = false;
    while index < position && index < bytes.len() {
        (index, quoted) = step(bytes, index, quoted);
    }
    quoted
}

/// Iterate over `(index, byte)` pairs from `start` that are not quoted.
///
/// The quoting state at `start` is computed from the beginning of `text`.
/// The second apostrophe of a `''` pair is skipped entirely.
pub(crate) fn unquoted_bytes(text: &str, start: usize) -> impl Iterator<Item = (usize, u8)> + '_ {
    let bytes = text.as_bytes();
    let mut index = start;
    let mut quoted = is_quoted_position(text, start);
    std::iter::from_fn(move || {
        while index < bytes.len() {
            let current = index;
            let was_quoted = quoted;
            (index, quoted) = step(bytes, current, quoted);
            if bytes[current] == QUOTE || was_quoted {
                continue;
            }
            return Some((current, bytes[current]));
        }
        None
    })
}

/// Index of the `}` that closes the `{` at `start`, or `None` if unterminated.
pub fn find_matching_brace(value: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, byte) in unquoted_bytes(value, start) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the first unquoted `,` at nesting depth 0 at or after `start`.
pub fn find_top_level_comma(value: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, byte) in unquoted_bytes(value, start) {
        match byte {
            b'{' => depth += 1,
            // stray closing braces never push depth below zero
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return Some(index),
            _ => {}
        }
    }
    None
}

/// Remove ICU quoting: `''` becomes `'`, and the apostrophes delimiting a
/// quoted run are dropped while its content is kept.
pub fn unescape_icu_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\'' {
            if chars.peek() == Some(&'\'') {
                chars.next();
                result.push('\'');
            }
            continue;
        }
        result.push(ch);
    }
    result
}

/// Double every apostrophe so that text spliced into a rendered message
/// survives [`unescape_icu_text`] unchanged.
pub fn escape_apostrophes(text: &str) -> String {
    text.replace('\'', "''")
}
