//! Helpers that recover raw inline text from source slices.
//!
//! Pulldown reports byte ranges for every block; inside containers those
//! ranges still carry `>` prefixes and indentation on continuation lines,
//! which have to go before the text can be handed to inline resolution.

use std::sync::LazyLock;

use regex::Regex;

/// The blockquote prefix character.
pub const QUOTE_PREFIX: char = '>';

static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#{1,6}(?:[ \t]+(.*?))?(?:[ \t]+#+)?[ \t]*$").expect("valid ATX heading regex")
});

/// Removes at most `depth` blockquote markers from the start of `line`.
///
/// A marker is `>` after up to three spaces of indentation, plus one optional
/// space. Stops at the first position that is not a marker, so a `>` past the
/// container depth stays in the text.
pub fn strip_quote_prefixes(line: &str, depth: usize) -> &str {
    let mut rest = line;
    for _ in 0..depth {
        let indent = rest.len() - rest.trim_start_matches(' ').len();
        if indent > 3 {
            break;
        }
        let Some(after) = rest[indent..].strip_prefix(QUOTE_PREFIX) else {
            break;
        };
        rest = after.strip_prefix(' ').unwrap_or(after);
    }
    rest
}

/// Joins the lines of a block's source slice, removing the prefixes of the
/// `depth` blockquotes that contain it.
///
/// The slice starts at the block's content, so the first line carries no
/// prefix. Trailing whitespace on inner lines is kept; two spaces there are a
/// hard break.
pub fn unquote_lines(raw: &str, depth: usize) -> String {
    raw.lines()
        .enumerate()
        .map(|(i, line)| {
            let line = if i == 0 {
                line
            } else {
                strip_quote_prefixes(line, depth)
            };
            line.trim_start()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Extracts the inline text of an ATX or setext heading.
pub fn heading_text(raw: &str, depth: usize) -> String {
    let unquoted = unquote_lines(raw, depth);
    let first = unquoted.lines().next().unwrap_or_default();
    if let Some(caps) = ATX_HEADING.captures(first) {
        return caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();
    }

    // Setext: everything but the underline.
    let lines: Vec<&str> = unquoted.lines().collect();
    match lines.split_last() {
        Some((_, content)) if !content.is_empty() => content
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => unquoted,
    }
}

/// Returns true when a gap between two blocks contains at least one blank line.
///
/// `gap` must start at the newline that ended the previous block; the first
/// and last segments are partial lines and never count.
pub fn has_blank_line(gap: &str) -> bool {
    let segments: Vec<&str> = gap.split('\n').collect();
    if segments.len() < 3 {
        return false;
    }
    segments[1..segments.len() - 1]
        .iter()
        .any(|line| line.chars().all(|c| c.is_whitespace() || c == QUOTE_PREFIX))
}
