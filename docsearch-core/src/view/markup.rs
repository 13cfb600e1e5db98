//! Display-only handling of the HTML fragments found in hit strings.
//!
//! `<mark>` marks matched terms; every other tag is dropped and the common
//! entities are decoded. Hit data itself is never modified.

use ratatui::{style::Style, text::Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// Split `raw` into plain and highlighted runs.
#[must_use]
pub fn parse_marked(raw: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current = String::new();
    let mut highlighted = false;
    let mut rest = raw;

    while let Some(open) = rest.find('<') {
        current.push_str(&decode_entities(&rest[..open]));
        let after = &rest[open..];

        let Some(close) = after.find('>') else {
            // unterminated tag, keep as text
            current.push_str(&decode_entities(after));
            rest = "";
            break;
        };

        let tag = after[1..close].trim().to_ascii_lowercase();
        let toggle = match tag.as_str() {
            "mark" => Some(true),
            "/mark" => Some(false),
            _ => None,
        };

        if let Some(on) = toggle {
            if on != highlighted {
                flush(&mut segments, &mut current, highlighted);
                highlighted = on;
            }
        }
        rest = &after[close + 1..];
    }

    current.push_str(&decode_entities(rest));
    flush(&mut segments, &mut current, highlighted);
    segments
}

/// Tags removed, entities decoded.
#[must_use]
pub fn plain_text(raw: &str) -> String {
    parse_marked(raw).into_iter().map(|s| s.text).collect()
}

/// Styled spans: `base` for plain runs, `base` patched with `mark` otherwise.
#[must_use]
pub fn to_spans(raw: &str, base: Style, mark: Style) -> Vec<Span<'static>> {
    parse_marked(raw)
        .into_iter()
        .map(|seg| {
            let style = if seg.highlighted { base.patch(mark) } else { base };
            Span::styled(seg.text, style)
        })
        .collect()
}

fn flush(segments: &mut Vec<Segment>, current: &mut String, highlighted: bool) {
    if current.is_empty() {
        return;
    }
    segments.push(Segment {
        text: std::mem::take(current),
        highlighted,
    });
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
