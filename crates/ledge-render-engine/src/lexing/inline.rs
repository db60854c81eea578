use std::sync::LazyLock;

use pulldown_cmark::{BrokenLink, CowStr, Event, Options, Parser, Tag, TagEnd, html};
use regex::Regex;

use super::LinkTable;

static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,9})([.)])(?:[ \t]|$)").expect("valid ordered marker regex"));

/// Line starts that would turn inline text back into a block construct.
static BLOCK_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[-+*](?:[ \t]|$)|#{1,6}(?:[ \t]|$)|>|(?:[-*_][ \t]*){3,}$|=+[ \t]*$|`{3,}|~{3,})")
        .expect("valid block marker regex")
});

/// Renders inline markdown spans in `text` to HTML.
///
/// Reference links (`[text][label]`, `[label]`) resolve against `links`; the
/// surrounding paragraph wrapper produced by pulldown is dropped.
pub fn resolve_inline(text: &str, links: &LinkTable, options: Options) -> String {
    let shielded = text
        .lines()
        .map(|line| shield_block_marker(line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n");

    let parser = Parser::new_with_broken_link_callback(
        &shielded,
        options,
        Some(|link: BrokenLink<'_>| {
            links.get(&link.reference).map(|def| {
                (
                    CowStr::from(def.href.clone()),
                    CowStr::from(def.title.clone().unwrap_or_default()),
                )
            })
        }),
    )
    .filter(|event| {
        !matches!(
            event,
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)
        )
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out.trim_end().to_string()
}

/// Escapes a leading list, heading, quote, rule or fence marker.
fn shield_block_marker(line: &str) -> String {
    if let Some(caps) = ORDERED_MARKER.captures(line)
        && let (Some(digits), Some(delim)) = (caps.get(1), caps.get(2))
    {
        return format!(
            "{}\\{}{}",
            digits.as_str(),
            delim.as_str(),
            &line[delim.end()..]
        );
    }
    if BLOCK_MARKER.is_match(line) {
        return format!("\\{line}");
    }
    line.to_string()
}
